//! Command-line host
//!
//! Plays the part of the embedding application: builds the transport and the
//! gateway from configuration, opens one editor, drives it, and reports its
//! notifications on stderr.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::config::{Command, Config, Target};
use crate::core::{ChannelNotifier, Notification};
use crate::editor::{EditorFactory, LoadOutcome, SaveOutcome};
use crate::gateway;
use crate::rpc::{HttpTransport, RpcTransport};

/// Run the host against the process arguments
pub async fn run() -> Result<ExitCode> {
    let (config, command) = Config::from_args_and_env()?;
    init_logging(&config.log_level);

    if let Some(path) = &config.config_path {
        log::debug!("using config file {}", path.display());
    }

    let transport = connect(&config).await?;
    let (notifier, mut notifications) = ChannelNotifier::new();
    let factory = EditorFactory::new(gateway::build(config.gateway, transport), Arc::new(notifier));
    log::debug!("editing through the {} gateway", factory.gateway_kind());

    let succeeded = match command {
        Command::Show { target } => show(&factory, &target).await,
        Command::Edit { target, input } => edit(&factory, &target, input.as_deref()).await,
    };

    report(&mut notifications);

    Ok(if succeeded? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_logging(level: &str) {
    // RUST_LOG still wins over the configured level.
    let env = env_logger::Env::default().default_filter_or(level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already initialized");
    }
}

async fn connect(config: &Config) -> Result<Arc<dyn RpcTransport>> {
    let transport = HttpTransport::new(&config.url).context("failed to build HTTP client")?;

    match &config.credentials {
        Some(credentials) => {
            transport
                .authenticate(
                    &credentials.database,
                    &credentials.login,
                    &credentials.password,
                )
                .await
                .with_context(|| format!("failed to authenticate against {}", config.url))?;
        }
        None if config.missing_credentials.is_empty() => {
            log::warn!("no credentials configured, calling {} anonymously", config.url)
        }
        None => log::warn!(
            "incomplete credentials (missing {}), calling {} anonymously",
            config.missing_credentials.join(", "),
            config.url
        ),
    }

    Ok(Arc::new(transport))
}

async fn show(factory: &EditorFactory, target: &Target) -> Result<bool> {
    let mut editor = factory.create(&target.context())?;

    if editor.initialize().await != LoadOutcome::Loaded {
        editor.close();
        return Ok(false);
    }

    let session = editor.close();
    let mut stdout = tokio::io::stdout();
    stdout.write_all(session.content.as_bytes()).await?;
    stdout.flush().await?;
    Ok(true)
}

async fn edit(factory: &EditorFactory, target: &Target, input: Option<&Path>) -> Result<bool> {
    let mut editor = factory.create(&target.context())?;

    if editor.initialize().await != LoadOutcome::Loaded {
        editor.close();
        return Ok(false);
    }

    let text = read_input(input).await?;
    editor.on_content_change(text);
    let outcome = editor.save().await;
    editor.close();

    Ok(outcome == SaveOutcome::Saved)
}

async fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn report(notifications: &mut mpsc::UnboundedReceiver<Notification>) {
    while let Ok(notification) = notifications.try_recv() {
        eprintln!("[{}] {}", notification.kind, notification.message);
    }
}
