use std::error::Error;

use tokio::{fs, net};
use tracing_subscriber::{
    layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use campus_repair::{http, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = fs::read_to_string("config.toml").await?;
    let config = toml::from_str::<Config>(&config)?;

    let app = http::app(&config)?;

    let listener = net::TcpListener::bind(config.http.server.addr).await?;
    tracing::info!(
        addr = %config.http.server.addr,
        upstream = %config.upstream.base_url,
        "gateway listening",
    );
    axum::serve(listener, app).await?;

    Ok(())
}
