pub mod retention;

pub use retention::{RetentionJob, ScheduleOutcome};
