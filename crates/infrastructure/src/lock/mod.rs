pub mod file_lock_store;

pub use file_lock_store::FileLockStore;
