pub mod process_probe;

pub use process_probe::LocalProcessProbe;
