pub mod config;
pub mod tender;

pub use config::Config;
pub use tender::*;
