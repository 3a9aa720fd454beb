pub mod run_retention;

pub use run_retention::RunRetentionUseCase;
