pub mod cifs;
pub mod direct;

pub use cifs::CifsShareConnector;
pub use direct::DirectShareConnector;
