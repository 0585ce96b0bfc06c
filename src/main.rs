use rustycookie::config::{self, ServerConfig};
use rustycookie::net::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[async_std::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rustycookie=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => ServerConfig::from_file(&path),
        None => ServerConfig::default(),
    };
    if config::set_config(cfg).is_err() {
        tracing::warn!("config already initialized, ignoring loaded config");
    }

    let server = Server::bind(config::config()).await?;
    tracing::info!(
        addr = %server.local_addr()?,
        trust_proxy = config::config().trust_proxy,
        "rustycookie listening"
    );
    server.run().await
}
