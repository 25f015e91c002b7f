use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{ChangeArgs, FindArgs, handle_change, handle_find};

pub mod build_file;
pub mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "regroup",
    author,
    version,
    about = "Rewrite dependency group coordinates in Gradle and Maven build files",
    help_template = "{name} {version}\n{about}\n\n{usage-heading} {usage}\n\n{all-args}"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Change(ChangeArgs),
    Find(FindArgs),
}

pub async fn main(args: &[String]) -> Result<()> {
    let cli = Cli::parse_from(args);
    match cli.command {
        Commands::Change(args) => handle_change(&args).await?,
        Commands::Find(args) => handle_find(&args).await?,
    }
    Ok(())
}
