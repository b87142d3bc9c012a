use std::{net, time::Duration};

use serde::Deserialize;

#[derive(Deserialize)]
pub struct Config {
    pub http: Http,
    pub upstream: Upstream,
}

#[derive(Deserialize)]
pub struct Http {
    pub server: Server,
    pub cors: Cors,
}

#[derive(Deserialize)]
pub struct Server {
    pub addr: net::SocketAddr,
}

#[derive(Deserialize)]
pub struct Cors {
    pub allowed_origins: Vec<String>,
}

/// Maintenance REST API the gateway fronts.
#[derive(Clone, Deserialize)]
pub struct Upstream {
    /// API root, e.g. `http://localhost:8080/api`.
    pub base_url: String,

    /// Origin that relative image paths are resolved against.
    pub asset_origin: String,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_login_timeout", with = "humantime_serde")]
    pub login_timeout: Duration,

    /// Offset of the upstream's offset-less local timestamps.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i8,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_login_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_utc_offset_hours() -> i8 {
    8
}
