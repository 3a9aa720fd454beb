mod audit_sink;
mod credential_store;
mod file_system;
mod lock_store;
mod process_probe;
mod share_connector;
mod tree_walker;

pub use audit_sink::AuditSink;
pub use credential_store::CredentialStore;
pub use file_system::FileSystem;
pub use lock_store::{LockCreation, LockRead, LockStore};
pub use process_probe::{Liveness, ProcessIdentity, ProcessProbe};
pub use share_connector::{ShareConnector, ShareSession};
pub use tree_walker::{TreeWalker, WalkEntry};
