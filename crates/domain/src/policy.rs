use crate::errors::DomainError;
use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How long files are kept, as calendar years + months + days.
///
/// Parses plain day counts (`"365"`, `"365d"`) and compound forms
/// (`"2y"`, `"18m"`, `"1y6m"`, `"1y2m3d"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetentionPeriod {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl RetentionPeriod {
    pub fn days(days: u32) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    pub fn cutoff_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, DomainError> {
        let total_months = self
            .years
            .checked_mul(12)
            .and_then(|m| m.checked_add(self.months))
            .ok_or_else(|| DomainError::InvalidRetention(self.to_string()))?;

        now.checked_sub_months(Months::new(total_months))
            .and_then(|t| t.checked_sub_signed(TimeDelta::days(i64::from(self.days))))
            .ok_or_else(|| DomainError::InvalidRetention(self.to_string()))
    }
}

impl FromStr for RetentionPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        if input.is_empty() {
            return Err(DomainError::InvalidRetention("empty".to_string()));
        }

        if let Ok(days) = input.parse::<u32>() {
            return Self::checked(Self::days(days), s);
        }

        let mut period = Self::default();
        let mut seen = [false; 3];
        let mut digits = String::new();

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                continue;
            }
            let slot = match ch {
                'y' => 0,
                'm' => 1,
                'd' => 2,
                _ => return Err(DomainError::InvalidRetention(s.to_string())),
            };
            if digits.is_empty() || seen[slot] {
                return Err(DomainError::InvalidRetention(s.to_string()));
            }
            let value: u32 = digits
                .parse()
                .map_err(|_| DomainError::InvalidRetention(s.to_string()))?;
            match slot {
                0 => period.years = value,
                1 => period.months = value,
                _ => period.days = value,
            }
            seen[slot] = true;
            digits.clear();
        }

        if !digits.is_empty() {
            return Err(DomainError::InvalidRetention(s.to_string()));
        }

        Self::checked(period, s)
    }
}

impl RetentionPeriod {
    fn checked(period: Self, raw: &str) -> Result<Self, DomainError> {
        if period.is_zero() {
            return Err(DomainError::InvalidRetention(format!(
                "{raw} (retention must be longer than zero)"
            )));
        }
        Ok(period)
    }
}

impl fmt::Display for RetentionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.years == 0 && self.months == 0 {
            return write!(f, "{}d", self.days);
        }
        if self.years > 0 {
            write!(f, "{}y", self.years)?;
        }
        if self.months > 0 {
            write!(f, "{}m", self.months)?;
        }
        if self.days > 0 {
            write!(f, "{}d", self.days)?;
        }
        Ok(())
    }
}

/// Include/exclude filter on file extensions. Extensions are compared
/// lower-case and without the leading dot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl ExtensionFilter {
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            include: include.into_iter().filter_map(normalize).collect(),
            exclude: exclude.into_iter().filter_map(normalize).collect(),
        }
    }

    pub fn allows(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());

        match ext {
            Some(ext) => {
                !self.exclude.contains(&ext) && (self.include.is_empty() || self.include.contains(&ext))
            }
            None => self.include.is_empty(),
        }
    }

    pub fn include(&self) -> impl Iterator<Item = &str> {
        self.include.iter().map(String::as_str)
    }

    pub fn exclude(&self) -> impl Iterator<Item = &str> {
        self.exclude.iter().map(String::as_str)
    }
}

fn normalize<S: AsRef<str>>(raw: S) -> Option<String> {
    let ext = raw.as_ref().trim().trim_start_matches('.').to_ascii_lowercase();
    (!ext.is_empty()).then_some(ext)
}

/// Selection rule for one run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    cutoff: DateTime<Utc>,
    filter: ExtensionFilter,
}

impl RetentionPolicy {
    pub fn new(cutoff: DateTime<Utc>, filter: ExtensionFilter) -> Self {
        Self { cutoff, filter }
    }

    pub fn from_period(
        period: RetentionPeriod,
        now: DateTime<Utc>,
        filter: ExtensionFilter,
    ) -> Result<Self, DomainError> {
        Ok(Self::new(period.cutoff_from(now)?, filter))
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    pub fn filter(&self) -> &ExtensionFilter {
        &self.filter
    }

    /// A file is selected iff it is strictly older than the cutoff and its
    /// extension passes the filters.
    pub fn selects(&self, path: &Path, modified: DateTime<Utc>) -> bool {
        modified < self.cutoff && self.filter.allows(path)
    }
}
