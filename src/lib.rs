pub mod config;
pub mod scanner;
pub mod transport;
pub mod remote;
pub mod report;
pub mod logging;
pub mod error;
pub mod engine;

pub use error::ListerError;
pub type Result<T> = std::result::Result<T, ListerError>;
