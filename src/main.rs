//! RAML doc generator - Command-line tool documenting the axum routes of a Rust project.
//!
//! # Usage
//!
//! ```bash
//! raml-docgen [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Write RAML documentation with links into a GitHub repository:
//! ```bash
//! raml-docgen ./blog -o api.raml --title Blog \
//!     --link-prefix https://github.com/acme/blog/blob/main/
//! ```
//!
//! Generate JSON documentation for one router only:
//! ```bash
//! raml-docgen ./blog -f json --router app
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use raml_docgen::cli;

fn main() -> Result<()> {
    // The verbose flag decides the log level, so parse before validating
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("RAML doc generator starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("RAML document generation completed successfully");

    Ok(())
}
