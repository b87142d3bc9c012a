pub mod api;
pub mod config;
pub mod http;
pub mod upstream;

pub use self::config::Config;
