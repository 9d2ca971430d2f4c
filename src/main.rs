pub mod adapter;
pub mod input;
pub mod mapping;
pub mod persistence;

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use color_eyre::eyre::{eyre, Result};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::adapter::poller::{PollerHandle, PollerSettings};
use crate::adapter::report::ControllerSnapshot;
use crate::adapter::source::{IdleSource, ReplaySource};
use crate::input::classifier::{detect_rising_edge, is_active};
use crate::input::logical::LogicalInput;
use crate::mapping::binder::{Binder, ListenStep};
use crate::mapping::mapping_types::N64Button;
use crate::persistence::profile_store::ProfileStore;
use crate::persistence::{ControllerProfile, InputSettings};

enum Mode {
    /// Log rising edges and live activity for one port.
    Monitor,
    /// Listen for one input press and bind it to an N64 button slot.
    Listen(N64Button),
}

struct CliArgs {
    mode: Mode,
    port: usize,
    capture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;
    let cli = parse_args()?;

    let store = ProfileStore::new()?;
    store.ensure_default_profiles().await?;
    let profile = store.load(cli.port).await;
    info!("Loaded profile for port {}", cli.port);

    let poller_settings = PollerSettings {
        poll_interval_ms: profile.settings.poll_interval_ms,
    };
    let poller = match &cli.capture {
        Some(path) => PollerHandle::new(ReplaySource::from_file(path)?, poller_settings),
        None => {
            info!("No capture given; polling an idle transport (all ports disconnected)");
            PollerHandle::new(IdleSource, poller_settings)
        }
    };

    if !poller.start_polling() {
        return Err(eyre!("adapter polling could not be started"));
    }

    let result = match cli.mode {
        Mode::Listen(button) => run_listen(&poller, &store, profile, cli.port, button).await,
        Mode::Monitor => run_monitor(&poller, &profile, cli.port).await,
    };

    poller.stop_polling();
    result
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

fn parse_args() -> Result<CliArgs> {
    let mut mode = Mode::Monitor;
    let mut port = 0usize;
    let mut capture = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "listen" => {
                let name = args
                    .next()
                    .ok_or_else(|| eyre!("listen needs an N64 button name (e.g. `listen c_up`)"))?;
                let button = N64Button::from_key(&name)
                    .ok_or_else(|| eyre!("unknown N64 button {:?}", name))?;
                mode = Mode::Listen(button);
            }
            "--port" => {
                let value = args.next().ok_or_else(|| eyre!("--port needs a number"))?;
                port = value
                    .parse()
                    .map_err(|_| eyre!("invalid port {:?}", value))?;
            }
            "--capture" => {
                let value = args.next().ok_or_else(|| eyre!("--capture needs a file path"))?;
                capture = Some(PathBuf::from(value));
            }
            other => {
                return Err(eyre!(
                    "unexpected argument {:?}; usage: gcadapter-input [listen <button>] [--port N] [--capture FILE]",
                    other
                ));
            }
        }
    }

    Ok(CliArgs {
        mode,
        port,
        capture,
    })
}

/// Run one bind-by-listening session and persist the profile on success.
async fn run_listen(
    poller: &PollerHandle,
    store: &ProfileStore,
    mut profile: ControllerProfile,
    port: usize,
    button: N64Button,
) -> Result<()> {
    info!("Press the controller input to bind to {} (port {})", button, port);

    let binder = Binder::create(
        profile.mapping.clone(),
        profile.settings.trigger_threshold,
        profile.settings.c_stick_threshold,
        profile.settings.listen_timeout_ticks,
    );
    let mut listening = binder.listen(button, poller.get_controller_state(port));

    let mut ticker =
        tokio::time::interval(Duration::from_millis(profile.settings.poll_interval_ms.max(1)));
    loop {
        ticker.tick().await;
        match listening.step(poller.get_controller_state(port)) {
            ListenStep::Pending(next) => listening = next,
            ListenStep::Bound {
                binder,
                slot,
                input,
            } => {
                profile.mapping = binder.into_mapping();
                store.save(port, &profile).await?;
                info!("{} is now bound to {}", slot, input);
                return Ok(());
            }
            ListenStep::TimedOut(_) => {
                return Err(eyre!("no input detected before the listening timeout"));
            }
        }
    }
}

/// Log rising edges and a periodic live summary until Ctrl-C.
async fn run_monitor(
    poller: &PollerHandle,
    profile: &ControllerProfile,
    port: usize,
) -> Result<()> {
    info!("Monitoring port {}; press Ctrl-C to exit", port);
    for (button, input) in profile.mapping.entries() {
        match input {
            Some(input) => info!("  {} <= {}", button, input),
            None => info!("  {} is unbound", button),
        }
    }

    let settings = &profile.settings;
    let mut ticker =
        tokio::time::interval(Duration::from_millis(settings.poll_interval_ms.max(1)));
    let mut prev = poller.get_controller_state(port);
    let mut last_summary = Local::now();
    let summary_interval = chrono::Duration::seconds(5);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        let curr = poller.get_controller_state(port);
        if let Some(input) = detect_rising_edge(
            &prev,
            &curr,
            settings.trigger_threshold,
            settings.c_stick_threshold,
        ) {
            info!("{} pressed", input);
        }

        let now = Local::now();
        if now - last_summary > summary_interval {
            log_live_state(&curr, settings);
            last_summary = now;
        }
        prev = curr;
    }
}

fn log_live_state(state: &ControllerSnapshot, settings: &InputSettings) {
    if !state.is_connected() {
        debug!("No controller connected");
        return;
    }

    let active: Vec<&str> = LogicalInput::ALL
        .iter()
        .copied()
        .filter(|&input| {
            is_active(
                state,
                input,
                settings.trigger_threshold,
                settings.c_stick_threshold,
            )
        })
        .map(LogicalInput::label)
        .collect();

    debug!(
        "Live: stick ({}, {}), c-stick ({}, {}), triggers {}/{}, active [{}]",
        state.left_stick_x,
        state.left_stick_y,
        state.c_stick_x,
        state.c_stick_y,
        state.left_trigger,
        state.right_trigger,
        active.join(", ")
    );
}
