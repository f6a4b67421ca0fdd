use std::path::PathBuf;

use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "transfer-cli")]
#[clap(about = "Select channel content to import or export", long_about = None)]
pub struct Cli {
    #[clap(long, global = true, help = "Catalog JSON file to browse")]
    pub catalog: Option<PathBuf>,
    #[clap(
        long,
        global = true,
        help = "Configuration file, defaults to the user config directory"
    )]
    pub config: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Commands,
}
