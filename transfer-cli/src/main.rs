use clap::Parser;

mod app;
mod cli;
mod commands;
mod error;

use crate::app::App;
use crate::cli::Cli;
use crate::commands::Commands;
pub use crate::error::AppError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let app = App::open(args.catalog, args.config.as_deref())?;

    match args.command {
        Commands::Browse(browse) => browse.run(&app).await?,
        Commands::Toggle(toggle) => toggle.run(&app).await?,
        Commands::Status(status) => status.run(&app)?,
        Commands::Reset(reset) => reset.run(&app)?,
    }

    Ok(())
}
