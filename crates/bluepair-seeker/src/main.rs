// ============================================
// File: crates/bluepair-seeker/src/main.rs
// ============================================
//! # BluePair Seeker Entry Point
//!
//! ## Creation Reason
//! Main entry point for the seeker binary. Handles CLI parsing,
//! logging setup, and a scripted handshake session for exercising
//! the stack end to end.
//!
//! ## Main Functionality
//! - CLI argument parsing with clap
//! - Logging initialization with tracing
//! - Configuration loading
//! - Pairing and action handshakes against the built-in provider
//!
//! ## Usage
//! ```bash
//! # Validate the config file
//! bluepair-seeker validate --config seeker.toml
//!
//! # Run a key-based pairing handshake
//! bluepair-seeker pair
//!
//! # Initial pairing, sending fresh public key material
//! bluepair-seeker pair --exchange-key
//!
//! # Trigger a ring action over the handshake channel
//! bluepair-seeker ring
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The binary talks to an in-process provider; point the library
//!   at a real `GattConnection` implementation for hardware
//! - Logging level comes from the config file, `RUST_LOG` overrides
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI implementation

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bluepair_common::{AuthenticityKey, BluetoothAddress};
use bluepair_core::crypto::PublicKeyMaterial;
use bluepair_core::protocol::{ActionRequest, KeyBasedPairingRequest, RequestFlags};
use bluepair_gatt::MockConnection;
use bluepair_seeker::events::{EventCode, EventSink, TracingEventSink};
use bluepair_seeker::provider::ScriptedProvider;
use bluepair_seeker::{AbortFlag, HandshakeController, SeekerConfig, SeekerError, SightingLog};

// ============================================
// Demo Constants
// ============================================

/// Seeker address reported in retroactive pairing requests.
const SEEKER_ADDRESS: BluetoothAddress =
    BluetoothAddress::new([0x02, 0x1A, 0x33, 0x70, 0x55, 0x91]);

/// Device-action event group and the ring code within it.
const DEVICE_ACTION_EVENT_GROUP: u8 = 0x04;
const RING_EVENT_CODE: u8 = 0x01;

// ============================================
// CLI Definition
// ============================================

/// BluePair Seeker
///
/// Runs the secret handshake against a provider and reports the
/// outcome. The bundled provider answers in-process, so every
/// command works without Bluetooth hardware.
#[derive(Parser, Debug)]
#[command(name = "bluepair-seeker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a key-based pairing handshake
    Pair {
        /// Path to configuration file
        #[arg(short, long, default_value = "/etc/bluepair/seeker.toml")]
        config: PathBuf,

        /// Pair retroactively, reporting the seeker's own address
        #[arg(long)]
        retroactive: bool,

        /// Send fresh public key material with the request
        #[arg(long)]
        exchange_key: bool,
    },

    /// Trigger a ring action over the handshake channel
    Ring {
        /// Path to configuration file
        #[arg(short, long, default_value = "/etc/bluepair/seeker.toml")]
        config: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "/etc/bluepair/seeker.toml")]
        config: PathBuf,
    },
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging("info");

    // Execute command
    let result = match cli.command {
        Commands::Pair {
            config,
            retroactive,
            exchange_key,
        } => cmd_pair(config, retroactive, exchange_key).await,
        Commands::Ring { config } => cmd_ring(config).await,
        Commands::Validate { config } => cmd_validate(config).await,
    };

    // Handle errors
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

// ============================================
// Commands
// ============================================

/// Runs a key-based pairing handshake.
async fn cmd_pair(
    config_path: PathBuf,
    retroactive: bool,
    exchange_key: bool,
) -> anyhow::Result<()> {
    let config = load_or_default_config(&config_path).await;
    init_logging(&config.logging.level);

    let session = DemoSession::start(&config)?;

    println!("🔗 BluePair Secret Handshake");
    println!("════════════════════════════════════════");
    println!();
    println!("   Provider:   {}", session.address);
    println!("   Model ID:   {}", config.provider.parse_model_id()?);
    println!();

    let request = if retroactive {
        KeyBasedPairingRequest::new(session.address, RequestFlags::REQUEST_RETROACTIVE_PAIR)
            .with_seeker_public_address(SEEKER_ADDRESS)
    } else {
        KeyBasedPairingRequest::new(session.address, RequestFlags::REQUEST_DISCOVERABLE)
    };

    let material = if exchange_key {
        use base64::Engine;

        let fresh = PublicKeyMaterial::from_bytes(&rand::random::<[u8; 64]>())
            .context("generating public key material")?;
        println!(
            "   Key material: {}",
            base64::engine::general_purpose::STANDARD.encode(fresh.as_bytes())
        );
        println!();
        Some(fresh)
    } else {
        None
    };

    session.events.set_current_event(EventCode::SecretHandshake);
    let outcome = session
        .controller
        .perform_handshake(&session.key, &request, material.as_ref(), &AbortFlag::new())
        .await;

    match outcome {
        Ok(response) => {
            session.events.log_current_event_succeeded();
            println!("✅ Handshake complete");
            println!();
            println!("   Public address: {}", response.provider_address());
            println!("   Session salt:   {}", hex::encode(&response.as_bytes()[7..]));
            println!();
            Ok(())
        }
        Err(error) => {
            report_failure(&session, &error);
            std::process::exit(1);
        }
    }
}

/// Sends a device-action request over the handshake channel.
async fn cmd_ring(config_path: PathBuf) -> anyhow::Result<()> {
    let config = load_or_default_config(&config_path).await;
    init_logging(&config.logging.level);

    let session = DemoSession::start(&config)?;

    println!("🔔 BluePair Ring Action");
    println!("════════════════════════════════════════");
    println!();

    let request = ActionRequest::new(session.address)
        .with_event(DEVICE_ACTION_EVENT_GROUP, RING_EVENT_CODE);

    session.events.set_current_event(EventCode::SecretHandshake);
    let outcome = session
        .controller
        .perform_action(&session.key, &request, &AbortFlag::new())
        .await;

    match outcome {
        Ok(response) => {
            session.events.log_current_event_succeeded();
            println!("✅ Ring action acknowledged");
            println!();
            println!("   Public address: {}", response.provider_address());
            println!();
            Ok(())
        }
        Err(error) => {
            report_failure(&session, &error);
            std::process::exit(1);
        }
    }
}

/// Validates configuration file.
async fn cmd_validate(config_path: PathBuf) -> anyhow::Result<()> {
    if !config_path.exists() {
        println!("⚠️  Config file not found: {}", config_path.display());
        println!("   Seeker will use default values.");
        return Ok(());
    }

    let config = SeekerConfig::load(&config_path).await?;
    let policy = config.handshake.to_policy();

    println!("✅ Configuration is valid");
    println!();
    println!("Provider:");
    println!("   Address:    {}", config.provider.parse_address()?);
    println!("   Model ID:   {}", config.provider.parse_model_id()?);
    println!();
    println!("Handshake:");
    println!("   Max retries:       {}", policy.max_retries);
    println!("   Retry on timeout:  {}", policy.retry_on_timeout);
    println!("   Short timeout:     {}ms", policy.short_timeout.as_millis());
    println!("   Long timeout:      {}ms", policy.long_timeout.as_millis());
    println!(
        "   Switch after:      {}ms",
        policy.short_retry_max_spent_time.as_millis()
    );
    println!();
    println!("Sightings:");
    println!("   Track provider:    {}", config.sightings.track_provider);
    println!(
        "   Freshness window:  {}s",
        config.sightings.freshness_window_secs
    );
    println!();

    Ok(())
}

// ============================================
// Demo Session
// ============================================

/// Wired-up handshake stack talking to the in-process provider.
struct DemoSession {
    controller: HandshakeController<MockConnection>,
    events: Arc<TracingEventSink>,
    key: AuthenticityKey,
    address: BluetoothAddress,
}

impl DemoSession {
    /// Builds the connection, controller, and provider from config.
    fn start(config: &SeekerConfig) -> anyhow::Result<Self> {
        let address = config.provider.parse_address()?;
        let key = config.provider.parse_key()?;
        let model_id = config.provider.parse_model_id()?;

        let connection = Arc::new(MockConnection::new(address));
        let events = Arc::new(TracingEventSink::new());

        let mut controller =
            HandshakeController::new(Arc::clone(&connection), config.handshake.to_policy())
                .with_event_sink(Arc::clone(&events) as Arc<dyn EventSink>);

        if config.sightings.track_provider {
            let log = SightingLog::new().with_freshness_window(config.sightings.freshness_window());
            log.record(model_id, address);
            controller = controller.with_signal_probe(Arc::new(log.probe_for(model_id)));
            info!(model = %model_id, "tracking provider advertisements");
        }

        let provider = ScriptedProvider::new(connection, key.clone(), address);
        tokio::spawn(async move { provider.serve(1).await });

        Ok(Self {
            controller,
            events,
            key,
            address,
        })
    }
}

// ============================================
// Helper Functions
// ============================================

/// Initializes the tracing subscriber.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .ok();
}

/// Loads config or returns default.
async fn load_or_default_config(path: &PathBuf) -> SeekerConfig {
    if path.exists() {
        SeekerConfig::load(path).await.unwrap_or_default()
    } else {
        info!("Config file not found, using defaults");
        SeekerConfig::default()
    }
}

/// Reports a terminal handshake failure to the user and the event
/// sink.
fn report_failure(session: &DemoSession, error: &SeekerError) {
    if let Some(cause) = error.gatt_cause() {
        session.events.log_current_event_failed(cause);
    }

    match error {
        SeekerError::SignalLost { .. } => {
            println!("❌ Provider advertisement went quiet; handshake abandoned");
        }
        SeekerError::SignalRotated { new_address, .. } => {
            println!("❌ Provider rotated its address to {new_address}");
            println!();
            println!("Re-run pairing against the rotated address.");
        }
        other => {
            println!("❌ Handshake failed: {other}");
        }
    }
}
