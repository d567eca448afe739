use clap::Parser;
use account_registry::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    cli::commands::run(cli).await
}
