pub mod local_file_system;
pub mod walkdir_walker;

pub use local_file_system::LocalFileSystem;
pub use walkdir_walker::WalkdirTreeWalker;
