/// fern dispatcher setup with log file rotation.
pub mod logger;

pub use logger::setup_logging;
