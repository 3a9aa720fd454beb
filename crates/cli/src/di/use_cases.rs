use super::Adapters;
use archive_retention_application::services::PathResolver;
use archive_retention_application::use_cases::RunRetentionUseCase;

pub fn build_retention_use_case(adapters: &Adapters) -> RunRetentionUseCase {
    let resolver = PathResolver::new(
        adapters.credentials.clone(),
        adapters.connector.clone(),
        adapters.fs.clone(),
    );

    RunRetentionUseCase::new(
        resolver,
        adapters.lock_store.clone(),
        adapters.probe.clone(),
        adapters.walker.clone(),
        adapters.fs.clone(),
        adapters.audit.clone(),
    )
}
