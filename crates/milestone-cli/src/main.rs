mod config;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::io::Write;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use config::{MilestoneConfig, Overrides};

#[derive(Parser)]
#[command(
    name = "milestone",
    version,
    about = "Turn a free-text request into a time-phased plan"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a milestone config file
    Init {
        /// Generative service API key (omit for template-only plans)
        #[arg(long)]
        api_key: Option<String>,
        /// Model name
        #[arg(long)]
        model: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print how a query is classified
    Classify {
        /// Free-text request
        query: String,
    },
    /// Generate a plan and print it as JSON
    Generate {
        /// Free-text request
        query: String,
        /// Use templates only, even if an API key is configured
        #[arg(long)]
        offline: bool,
        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
        /// API key (overrides MILESTONE_API_KEY and the config file)
        #[arg(long)]
        api_key: Option<String>,
        /// Model name (overrides MILESTONE_MODEL and the config file)
        #[arg(long)]
        model: Option<String>,
    },
    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
        /// Use templates only, even if an API key is configured
        #[arg(long)]
        offline: bool,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Execute the `milestone init` command: write config file.
fn cmd_init(api_key: Option<String>, model: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let has_key = api_key.is_some();
    let cfg = config::ConfigFile {
        llm: config::LlmSection {
            api_key,
            model,
            ..config::LlmSection::default()
        },
        server: config::ServerSection::default(),
    };

    let path = config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    if has_key {
        println!("  llm.api_key = (set)");
    } else {
        println!("  llm.api_key not set; plans will come from templates only.");
        println!("  Set MILESTONE_API_KEY or rerun with --api-key to enable refinement.");
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("failed to serialize output")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").context("failed to write output")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            api_key,
            model,
            force,
        } => {
            cmd_init(api_key, model, force)?;
        }
        Commands::Classify { query } => {
            print_json(&milestone_core::classify(&query), false)?;
        }
        Commands::Generate {
            query,
            offline,
            compact,
            api_key,
            model,
        } => {
            let resolved = MilestoneConfig::resolve(&Overrides {
                api_key,
                model,
                offline,
                ..Overrides::default()
            })?;
            let planner = resolved.planner()?;
            let plan = planner.generate(&query).await;
            print_json(&plan, compact)?;
        }
        Commands::Serve {
            bind,
            port,
            offline,
        } => {
            let resolved = MilestoneConfig::resolve(&Overrides {
                bind,
                port,
                offline,
                ..Overrides::default()
            })?;
            let planner = resolved.planner()?;
            serve_cmd::run_serve(planner, &resolved.bind, resolved.port).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "milestone",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_flags_parse() {
        let cli = Cli::try_parse_from([
            "milestone",
            "generate",
            "weekly plan",
            "--offline",
            "--compact",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                query,
                offline,
                compact,
                ..
            } => {
                assert_eq!(query, "weekly plan");
                assert!(offline);
                assert!(compact);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn serve_port_must_be_numeric() {
        assert!(Cli::try_parse_from(["milestone", "serve", "--port", "http"]).is_err());
    }
}
