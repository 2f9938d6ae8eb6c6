use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use storefront_core::{HttpCatalogSource, Storefront};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::load_settings;
use console::ConsoleNotifier;

#[derive(Parser, Debug)]
#[command(about = "Browse the flower catalog, fill a cart and place an order")]
struct Args {
    #[arg(long, default_value = "storefront.toml")]
    config: PathBuf,
    /// Overrides the configured catalog endpoint.
    #[arg(long)]
    catalog_url: Option<String>,
    /// Seconds before the order banner hides itself.
    #[arg(long)]
    banner_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(url) = args.catalog_url {
        settings.catalog_url = url;
    }
    if let Some(secs) = args.banner_secs {
        settings.banner_dismiss_secs = secs;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let source = HttpCatalogSource::new(settings.catalog_url()?);
    info!(url = %source.url(), "storefront: starting");

    let mut storefront = Storefront::new(settings.banner_dismiss());
    let what = storefront.load_catalog(&source).await;
    console::redraw(&mut io::stdout(), &storefront, what)?;
    println!("\nfilters: {}", storefront.filter_options().join(", "));
    println!("type `help` for commands");

    console::run(&mut storefront, &ConsoleNotifier)
}
