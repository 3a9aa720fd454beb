pub mod retention;

pub use retention::RunRetentionUseCase;
