//! Shakeguard Daemon - Main entry point
//!
//! Boots the verification engine and, in the absence of real sensor
//! hardware, drives one complete transfer flow against a synthetic
//! accelerometer feed: access code entry, transfer request, shake
//! verification, and the resulting balance update.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shakeguard_core::{account::format_amount, Account, Outcome, STANDARD_GRAVITY};
use shakeguard_daemon::{
    wall_clock_ms, DaemonConfig, DigitOutcome, LoggingSink, LoginGate, SecurityStore, SensorHub,
    Verifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shakeguard_daemon=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shakeguard daemon v{}", env!("CARGO_PKG_VERSION"));

    // Load or create config
    let config_path = std::env::var("SHAKEGUARD_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::config_dir()
                .unwrap_or_else(|| std::path::PathBuf::from("/etc"))
                .join("shakeguard")
                .join("daemon.json")
        });

    let config = if config_path.exists() {
        DaemonConfig::load(&config_path)?
    } else {
        let config = DaemonConfig::default();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        config.save(&config_path)?;
        info!("Created default config at {:?}", config_path);
        config
    };

    config.ensure_directories()?;

    // Initialize components
    let store = Arc::new(RwLock::new(SecurityStore::open(config.store_path())?));
    let account = Arc::new(RwLock::new(Account::new(config.starting_balance)));
    let hub = Arc::new(SensorHub::new(config.sensor_channel_capacity));

    let mut login = LoginGate::new(Arc::clone(&store));
    let verifier = Verifier::new(
        Arc::clone(&store),
        Arc::clone(&account),
        Arc::clone(&hub),
        Arc::new(LoggingSink),
    );

    // Unlock with the access code
    for digit in [7u8, 1, 1, 5, 2, 0] {
        match login.push_digit(digit).await? {
            DigitOutcome::LockedOut { .. } => {
                let state = store.read().await.state();
                warn!(
                    remaining = %state.format_remaining(wall_clock_ms()),
                    "account locked, try again later"
                );
                return Ok(());
            }
            DigitOutcome::Rejected { lockout_tripped } => {
                warn!(lockout_tripped, "access code rejected");
                return Ok(());
            }
            _ => {}
        }
    }
    anyhow::ensure!(login.is_unlocked(), "access code entry did not unlock");

    // Request a transfer
    let amount = 500_000;
    info!(
        balance = %format_amount(verifier.balance().await),
        amount = %format_amount(amount),
        "requesting transfer"
    );
    let handle = verifier.begin(amount).await?;
    info!(session = %handle.id(), target = handle.target(), "shake the device");

    // Synthetic accelerometer: strong pulses spaced well clear of the
    // debounce window, enough to reach the rolled target
    let pump = {
        let hub = Arc::clone(&hub);
        let target = handle.target();
        tokio::spawn(async move {
            for _ in 0..target {
                hub.publish(2.0 * STANDARD_GRAVITY, 0.0, 0.0);
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
        })
    };

    let outcome = handle.outcome().await?;
    pump.await?;

    match outcome {
        Outcome::Success => info!(
            balance = %format_amount(verifier.balance().await),
            "transfer verified"
        ),
        other => warn!(?other, "transfer not completed"),
    }

    Ok(())
}

/// Helper module for dirs functionality
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }
}
