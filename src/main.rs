//! Redsight CLI entry point.

use anyhow::Result;
use clap::Parser;
use redsight::cli::{commands, Cli, Commands};
use redsight::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = Settings::load_from(cli.config.as_ref())?;
    settings.apply_env();

    // Initialize logging; stdout is reserved for MCP and JSON output
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("redsight={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match &cli.command {
        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Search {
            query,
            search_type,
            subreddit,
            time_filter,
            limit,
        } => {
            commands::run_search(
                query,
                search_type,
                subreddit.as_deref(),
                time_filter,
                *limit,
                settings,
            )
            .await?;
        }

        Commands::Analyze {
            post_url,
            sort,
            limit,
        } => {
            commands::run_analyze(post_url, sort, *limit, settings).await?;
        }

        Commands::Trends {
            subreddits,
            period,
            limit,
        } => {
            commands::run_trends(subreddits, period, *limit, settings).await?;
        }

        Commands::Fetch {
            url,
            raw,
            user_agent,
        } => {
            commands::run_fetch(url, *raw, user_agent.as_deref(), settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, cli.config.as_ref())?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, cli.config.as_ref())?;
        }
    }

    Ok(())
}
