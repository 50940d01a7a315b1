//! tac-installer entry point
//!
//! Parses the command line, runs the selected command and turns failures into a
//! readable message plus a non-zero exit status.

use anyhow::Result;
use clap::Parser;
use tac_installer::cli;
use tac_installer::core::{EXIT_FAILURE, user_friendly_error};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(EXIT_FAILURE);
        }
    }
}
