// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `countdown serve` and `countdown check` command implementations.
//!
//! Opens SQLite storage, wires the conversation controller to the Telegram
//! transport, and long-polls until SIGTERM or Ctrl+C.

use std::sync::Arc;
use std::time::Duration;

use countdown_agent::{
    CommandRouter, ConversationController, ConversationTracker, install_signal_handler,
    spawn_sweeper,
};
use countdown_config::CountdownConfig;
use countdown_core::{
    ChatTransport, Clock, CountdownError, EventStore, HealthStatus, PluginAdapter, SystemClock,
};
use countdown_storage::SqliteEventStore;
use countdown_telegram::TelegramTransport;
use tracing::{error, info, warn};

/// How often abandoned picker sessions are swept from memory.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the `countdown serve` command.
pub async fn run_serve(config: CountdownConfig) -> Result<(), CountdownError> {
    init_tracing(&config.bot.log_level);

    info!(name = %config.bot.name, "starting countdown serve");

    let store = open_store(&config).await?;

    #[cfg(feature = "prometheus")]
    let _metrics = if config.prometheus.enabled {
        let address = config
            .prometheus
            .listen_address
            .parse()
            .map_err(|e| CountdownError::Config(format!("prometheus.listen_address: {e}")))?;
        Some(countdown_prometheus::PrometheusAdapter::install(address)?)
    } else {
        None
    };

    let transport = Arc::new(TelegramTransport::new(&config.telegram)?);
    if let Err(e) = transport.register_commands().await {
        warn!(error = %e, "failed to publish the command menu");
    }

    let tracker = Arc::new(ConversationTracker::from_config(&config.conversation));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let controller = ConversationController::new(
        store.clone() as Arc<dyn EventStore>,
        transport.clone() as Arc<dyn ChatTransport>,
        tracker.clone(),
        clock,
    );
    let router = Arc::new(CommandRouter::from_config(controller, &config.chats));

    if let Some(chat) = router.fallback_chat() {
        info!(fallback_chat = chat.0, "fallback chat enabled");
    }

    let cancel = install_signal_handler();
    let sweeper = spawn_sweeper(tracker, SWEEP_INTERVAL, cancel.clone());

    countdown_telegram::run(transport.bot().clone(), router, cancel.clone()).await;

    // Polling also stops when Telegram rejects the token; make sure the
    // sweeper follows in that case too.
    cancel.cancel();
    if let Err(e) = sweeper.await {
        warn!(error = %e, "session sweeper did not stop cleanly");
    }

    if let Err(e) = store.close().await {
        error!(error = %e, "failed to close storage");
    }

    info!("countdown stopped");
    Ok(())
}

/// Runs the `countdown check` command.
///
/// Opens storage and asks every adapter for its health without starting the
/// dispatcher. Exits non-zero when any adapter is unhealthy.
pub async fn run_check(config: CountdownConfig) -> Result<(), CountdownError> {
    init_tracing(&config.bot.log_level);

    let store = open_store(&config).await?;
    let mut unhealthy = 0usize;

    unhealthy += report(store.as_ref()).await;

    match TelegramTransport::new(&config.telegram) {
        Ok(transport) => unhealthy += report(&transport).await,
        Err(e) => {
            println!("  [FAIL] telegram: {e}");
            unhealthy += 1;
        }
    }

    store.close().await?;

    if unhealthy > 0 {
        return Err(CountdownError::Internal(format!(
            "{unhealthy} adapter(s) unhealthy"
        )));
    }
    println!("all adapters healthy");
    Ok(())
}

async fn open_store(config: &CountdownConfig) -> Result<Arc<SqliteEventStore>, CountdownError> {
    let store = SqliteEventStore::new(config.storage.clone());
    store.initialize().await?;

    match store.health_check().await? {
        HealthStatus::Healthy => {}
        HealthStatus::Degraded(reason) => warn!(%reason, "storage degraded"),
        HealthStatus::Unhealthy(reason) => {
            return Err(CountdownError::Storage {
                source: reason.into(),
            });
        }
    }

    info!(path = %config.storage.database_path, "storage initialized");
    Ok(Arc::new(store))
}

/// Prints one adapter's health line and returns 1 when it is unhealthy.
async fn report(adapter: &dyn PluginAdapter) -> usize {
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => {
            println!("  [ OK ] {}", adapter.name());
            0
        }
        Ok(HealthStatus::Degraded(reason)) => {
            println!("  [WARN] {}: {reason}", adapter.name());
            0
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            println!("  [FAIL] {}: {reason}", adapter.name());
            1
        }
        Err(e) => {
            println!("  [FAIL] {}: {e}", adapter.name());
            1
        }
    }
}

/// Target directives match by prefix, so `countdown` also covers the
/// `countdown_*` library crates.
fn default_directives(log_level: &str) -> String {
    format!("countdown={log_level},warn")
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` wins when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
