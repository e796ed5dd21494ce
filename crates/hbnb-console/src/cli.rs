use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "hbnb",
    about = "Command interpreter for the HBnB object store",
    version,
)]
pub struct Cli {
    /// JSON file the objects are loaded from and saved to
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Run these command lines instead of reading stdin
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub commands: Vec<String>,
}
