use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tarot_bot::adapters::ai::{OpenAIConfig, OpenAIProvider};
use tarot_bot::adapters::catalog::load_catalog;
use tarot_bot::adapters::postgres::{self, PostgresHistoryRepository, PostgresUserRepository};
use tarot_bot::adapters::storage::{
    InMemoryHistoryRepository, InMemoryOnboardingStore, InMemoryUserRepository,
};
use tarot_bot::adapters::telegram::{TelegramBot, TelegramClient, TelegramConfig, TelegramError};
use tarot_bot::application::{AnswerSynthesizer, CommandRouter, RouterPorts, RouterSettings};
use tarot_bot::config::{AppConfig, LogConfig, LogFormat, ValidationError};
use tarot_bot::domain::catalog::CatalogError;
use tarot_bot::domain::foundation::{DomainError, UserId};
use tarot_bot::ports::{AIError, HistoryRepository, UserRepository};

#[derive(Debug, Error)]
enum StartupError {
    #[error("card catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("store: {0}")]
    Store(#[from] DomainError),

    #[error("answer backend: {0}")]
    Provider(#[from] AIError),

    #[error("configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("bot api: {0}")]
    Transport(#[from] TelegramError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    init_tracing(&config.log);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Bot stopped");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log: &LogConfig) {
    let registry = tracing_subscriber::registry().with(log.filter());
    match log.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let catalog = load_catalog(config.reading.cards_path.as_deref()).await?;

    let (users, history) = open_store(&config).await?;
    let synthesizer = build_synthesizer(&config)?;

    let router = CommandRouter::new(
        RouterPorts {
            users,
            history,
            sessions: Arc::new(InMemoryOnboardingStore::new()),
            catalog: Arc::new(catalog),
            synthesizer,
        },
        RouterSettings {
            price: config.reading.price()?,
            history_limit: config.reading.history_limit,
            admin: config.bot.admin_user_id.map(UserId::new),
        },
    );

    let client = TelegramClient::new(
        TelegramConfig::new(config.bot.token.clone()).with_base_url(config.bot.api_base_url.clone()),
    );
    let bot = TelegramBot::new(client, Arc::new(router), config.bot.poll_timeout());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    bot.run(shutdown_rx).await?;
    Ok(())
}

type Store = (Arc<dyn UserRepository>, Arc<dyn HistoryRepository>);

async fn open_store(config: &AppConfig) -> Result<Store, StartupError> {
    if !config.database.is_configured() {
        warn!("No database configured, balances and history are kept in memory");
        return Ok((
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryHistoryRepository::new()),
        ));
    }

    let pool = postgres::connect(&config.database).await?;
    info!("Database connection pool created");

    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
        info!("Database migrations applied");
    }

    Ok((
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresHistoryRepository::new(pool)),
    ))
}

fn build_synthesizer(config: &AppConfig) -> Result<AnswerSynthesizer, StartupError> {
    let Some(api_key) = config.ai.api_key() else {
        info!("No answer backend configured, using the offline template");
        return Ok(AnswerSynthesizer::offline());
    };

    let provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key)
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    )?;
    info!(model = %config.ai.model, "Answer backend configured");

    Ok(AnswerSynthesizer::with_provider(Arc::new(provider)))
}
