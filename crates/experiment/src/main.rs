//! Thin entrypoint for the `bystander-experiment` CLI. All logic lives in the library crate.

use anyhow::Result;
use bystander_experiment::{run, Cli};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("bystander_experiment=info".parse()?),
        )
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("[bystander-experiment error] {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
