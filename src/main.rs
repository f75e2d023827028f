use clap::{Parser, Subcommand};
use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;

use opsbot::application::errors::BotError;
use opsbot::application::services::RunStateService;
use opsbot::application::Bot;
use opsbot::commands;
use opsbot::domain::traits::{Backend, RunStateStore};
use opsbot::extensions::{self, EchoExtension};
use opsbot::infrastructure::adapters::{build_backend, build_members, hybrid::HybridBackend};
use opsbot::infrastructure::config::Config;
use opsbot::infrastructure::storage::JsonFileStore;

#[derive(Parser)]
#[command(name = "opsbot")]
#[command(about = "A chat-ops bot that runs commands on request", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: String,

    /// Telegram bot token (overrides config)
    #[arg(short, long, global = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Post a message to every configured conversation and exit
    Send {
        text: String,
        /// Log failures but exit successfully
        #[arg(short = 'i', long)]
        ignore_errors: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let config = load_config(&cli.config, cli.token);
            block_on(run_bot(config))
        }
        Commands::Send { text, ignore_errors } => {
            let config = load_config(&cli.config, cli.token);
            let code = block_on(send(config, text));
            if ignore_errors {
                ExitCode::SUCCESS
            } else {
                code
            }
        }
        Commands::Version => {
            println!("opsbot v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Commands::InitConfig => init_config(),
    }
}

fn load_config(path: &str, token_override: Option<String>) -> Config {
    let mut config = if std::path::Path::new(path).exists() {
        Config::load_or_env(path)
    } else {
        tracing::info!("No config at {}, using defaults", path);
        Config::load_env()
    };
    if let Some(token) = token_override {
        config.apply_overrides(|key| (key == "BOT_TOKEN").then(|| token.clone()));
    }
    config
}

fn block_on(task: impl Future<Output = Result<(), BotError>>) -> ExitCode {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match rt.block_on(task) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_bot(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting opsbot: {}", config.bot.name);

    let backend = build_backend(&config)?;
    let store: Arc<dyn RunStateStore> = Arc::new(JsonFileStore::new(config.state_path()));
    let run_state = Arc::new(RunStateService::load(store).await);

    let mut builder =
        Bot::builder(config.bot.name.clone(), backend, run_state).with_label(config.label());
    commands::register_builtins(&mut builder)?;
    extensions::install_default(&mut builder, Arc::new(EchoExtension)).await;
    if let Some(help) = &config.bot.help {
        builder.set_help(help.clone());
    }

    builder.build().listen().await
}

async fn send(config: Config, text: String) -> Result<(), BotError> {
    let members = build_members(&config)?;
    if members.is_empty() {
        return Err(BotError::Config("no adapters enabled".to_string()));
    }
    HybridBackend::new(members).send_message(&text, "").await;
    Ok(())
}

fn init_config() -> ExitCode {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to render config: {}", e);
            ExitCode::FAILURE
        }
    }
}
