// SPDX-FileCopyrightText: 2026 Tutorgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tutorgate - a single-endpoint study-assistant relay.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod inspect;
mod serve;
mod shutdown;

use clap::{Parser, Subcommand};

/// Tutorgate - a single-endpoint study-assistant relay.
#[derive(Parser, Debug)]
#[command(name = "tutorgate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP service (default).
    Serve,
    /// Show which profile a message would be routed to.
    Classify {
        /// The message to classify.
        message: String,
    },
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = match tutorgate_config::load_and_validate() {
                Ok(config) => config,
                Err(errors) => {
                    tutorgate_config::render_errors(&errors);
                    std::process::exit(1);
                }
            };
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Classify { message } => {
            let config = load_offline_config();
            match inspect::classify_report(&config.routing, &message) {
                Ok(report) => println!("{report}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Config => {
            let config = load_offline_config();
            match inspect::render_config(&config) {
                Ok(rendered) => print!("{rendered}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Configuration for commands that never contact the upstream API.
fn load_offline_config() -> tutorgate_config::TutorgateConfig {
    match tutorgate_config::load_and_validate_routing() {
        Ok(config) => config,
        Err(errors) => {
            tutorgate_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["tutorgate"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn classify_takes_message() {
        let cli = Cli::try_parse_from(["tutorgate", "classify", "explain recursion"]).unwrap();
        match cli.command {
            Some(Commands::Classify { message }) => assert_eq!(message, "explain recursion"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn classify_requires_message() {
        assert!(Cli::try_parse_from(["tutorgate", "classify"]).is_err());
    }
}
