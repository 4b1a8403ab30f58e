mod agents;
mod cli;
mod error;
mod repository;
mod requirements;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;
use workflow::SyncOptions;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var(utils::VERBOSE_ENV, "1");
        }
    }

    let result = match cli.command {
        Commands::Sync {
            file,
            branches,
            lang,
            mode,
            no_git,
        } => workflow::execute_sync(
            &cli.path,
            SyncOptions::new(file, &branches, lang, mode, no_git),
        ),
        Commands::List { file, json } => workflow::execute_list(&cli.path, &file, json),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
