//! Terminal host for npm-scout.
//!
//! Thin presentation glue: each subcommand maps onto one core operation and
//! renders through [`TerminalFrontend`].

mod install;
mod terminal;

use clap::{Parser, Subcommand};
use install::PackageManager;
use scout_core::{Frontend, RegistryConfig, Result};
use scout_npm::{NpmClient, extract_package_names, parse_manifest, plan_update};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use terminal::TerminalFrontend;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "npm-scout", version, about = "Search and inspect npm packages")]
struct Cli {
    /// Path to a JSON registry configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the registry by free text
    Search {
        query: String,
        /// Results per page (clamped to 250)
        #[arg(long)]
        size: Option<usize>,
        /// Result offset (clamped to 5000)
        #[arg(long)]
        from: Option<usize>,
    },
    /// Typeahead suggestions for a partial name
    Suggest {
        query: String,
        /// Suggestion count (clamped to 100)
        #[arg(long)]
        size: Option<usize>,
    },
    /// Full metadata for a package at its latest version
    Info { name: String },
    /// Release history, newest first
    History {
        name: String,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Extract package names from text (argument or stdin) and search each
    Extract {
        text: Option<String>,
        /// Fetch full latest-version metadata instead of searching
        #[arg(long)]
        info: bool,
    },
    /// Analyze the dependency sections of a package.json
    Deps { path: PathBuf },
    /// Plan (and optionally apply) dependency updates for a package.json
    Update {
        path: PathBuf,
        /// Write the rewritten manifest back to disk
        #[arg(long)]
        write: bool,
    },
    /// Generate an install command
    Install {
        name: String,
        /// Package manager; prompts for a choice when omitted
        #[arg(long, value_enum)]
        manager: Option<PackageManager>,
        /// Install as a dev dependency
        #[arg(long)]
        dev: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let client = NpmClient::new(config);
    let frontend = TerminalFrontend;

    match cli.command {
        Command::Search { query, size, from } => {
            let page = client.search(&query, size, from).await?;
            if page.results.is_empty() {
                println!("No packages found for \"{query}\"");
            } else {
                frontend.render_search_results(&page);
            }
        }
        Command::Suggest { query, size } => {
            let suggestions = client.suggest(&query, size).await?;
            if suggestions.is_empty() {
                println!("No suggestions found for \"{query}\"");
            } else {
                frontend.render_suggestions(&suggestions);
            }
        }
        Command::Info { name } => {
            let info = client.get_latest(&name).await?;
            frontend.render_package_info(&info);
        }
        Command::History { name, limit } => {
            let history = client.get_version_history(&name, Some(limit)).await?;
            frontend.render_version_history(&history);
        }
        Command::Extract { text, info } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let names: Vec<String> = extract_package_names(&text).into_iter().collect();
            if names.is_empty() {
                println!("No package names found.");
                return Ok(());
            }
            if info {
                let infos = client.get_many(&names).await;
                frontend.render_batch_info(&infos);
            } else {
                let results = client.search_many(&names, 3).await;
                frontend.render_search_by_name(&results);
            }
        }
        Command::Deps { path } => {
            let text = std::fs::read_to_string(&path)?;
            let info = parse_manifest(&text)?;
            frontend.render_manifest_info(&info);
        }
        Command::Update { path, write } => {
            let text = std::fs::read_to_string(&path)?;
            let plan = plan_update(&client, &text).await?;
            frontend.render_update_plan(&plan);
            if write && plan.changed > 0 {
                std::fs::write(&path, &plan.manifest)?;
                println!("\nWrote {}", path.display());
            }
        }
        Command::Install { name, manager, dev } => {
            let manager = match manager {
                Some(manager) => manager,
                None => {
                    let labels: Vec<String> = PackageManager::ALL
                        .iter()
                        .map(|m| m.label().to_string())
                        .collect();
                    // Dismissing the prompt cancels the command.
                    let Some(index) = frontend.choose("Select a package manager:", &labels)
                    else {
                        return Ok(());
                    };
                    PackageManager::ALL[index]
                }
            };
            println!("{}", manager.install_command(&name, dev));
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<RegistryConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(RegistryConfig::default()),
    }
}
