mod candidate_enumerator;
mod deletion_pipeline;
mod directory_reclaimer;
mod execution_lock;
mod path_resolver;
mod progress_reporter;
mod run_stats;
mod touched_directories;

pub use candidate_enumerator::CandidateEnumerator;
pub use deletion_pipeline::{DeletionPipeline, PipelineOutcome, PipelineSettings};
pub use directory_reclaimer::DirectoryReclaimer;
pub use execution_lock::{ExecutionLock, LockGuard};
pub use path_resolver::{PathResolver, ResolvedTarget};
pub use progress_reporter::ProgressReporter;
pub use run_stats::RunStats;
pub use touched_directories::TouchedDirectories;
