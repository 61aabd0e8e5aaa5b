use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use safetychat::config::DEFAULT_CONFIG_FILE;
use safetychat::{serve, AppConfig, Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "safetychat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file holding GROQ_API_KEY
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Override the completion model from the config file
    #[arg(long, global = true)]
    model: Option<String>,

    /// Answer with canned replies instead of calling the provider
    #[arg(long, global = true)]
    mock_completions: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Configuration must be valid before anything is served.
    let mut app = AppConfig::load(&cli.config)?;
    if let Some(model) = cli.model {
        app = app.with_model(model);
    }
    info!("Loaded configuration from {}", cli.config);

    let container = Container::new(ContainerConfig {
        app,
        mock_completions: cli.mock_completions,
    })?;
    if container.mock_completions() {
        info!("Answering with mock completions (model {})", container.model());
    } else {
        info!("Answering with model {}", container.model());
    }

    if let Some(bind) = cli.command.bind_address() {
        let handle = serve(Arc::new(container), &bind).await?;
        info!("Open http://{bind}/ in a browser; press Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;
        return handle.shutdown().await;
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn serve_defaults_to_localhost() {
        let cli = Cli::try_parse_from(["safetychat", "serve"]).unwrap();
        assert_eq!(
            cli.command.bind_address().as_deref(),
            Some("127.0.0.1:8501")
        );
        assert_eq!(cli.config, DEFAULT_CONFIG_FILE);
    }

    #[test]
    fn public_flag_binds_all_interfaces() {
        let cli = Cli::try_parse_from(["safetychat", "serve", "--public", "--port", "9000"]).unwrap();
        assert_eq!(cli.command.bind_address().as_deref(), Some("0.0.0.0:9000"));
    }

    #[test]
    fn ask_requires_a_prompt() {
        assert!(Cli::try_parse_from(["safetychat", "ask"]).is_err());
        let cli = Cli::try_parse_from(["safetychat", "--mock-completions", "ask", "hi"]).unwrap();
        assert!(cli.mock_completions);
        assert!(cli.command.bind_address().is_none());
    }
}
