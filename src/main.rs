mod api;
mod import;
mod library;
mod reader;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Path to data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: String,

    /// Bearer token required on mutating routes. Unset leaves them open.
    #[arg(long, env = "MANGA_DEN_ADMIN_TOKEN")]
    admin_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "manga_den=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    tracing::info!("Starting manga-den on port {}", args.port);

    let store = manga_den_storage::Store::new(&args.data_dir).await?;
    api::server::serve(args.port, store, args.admin_token).await?;

    Ok(())
}
