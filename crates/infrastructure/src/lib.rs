pub mod audit;
pub mod credentials;
pub mod fs;
pub mod lock;
pub mod share;
pub mod system;
