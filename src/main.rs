//! Host simulation entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │  SimulatedMachine     LogEventSink     MemoryConfigStore  │
//! │  (Motion+Endstop+     (EventSink)      (ConfigPort)       │
//! │   Current+Clock)                                         │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │        MotionService (pure logic)                  │  │
//! │  │  HomingSequencer · Transform · MotionState         │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `scarafw [profile.json]`.  Without a profile the stored (default)
//! machine is used.  Runs a home-all pass on a simulated arm and reports
//! the result.

#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::info;

use scarafw::adapters::config_store::MemoryConfigStore;
use scarafw::adapters::log_sink::LogEventSink;
use scarafw::adapters::sim::SimulatedMachine;
use scarafw::app::commands::{HomeCommand, MotionCommand};
use scarafw::app::ports::ConfigPort;
use scarafw::app::service::MotionService;
use scarafw::config::MachineConfig;
use scarafw::motion::JointPose;

/// Where the simulated arm sits at power-on.
const POWER_ON_POSE: JointPose = JointPose::new(37.0, 121.0, 42.0);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("scarafw v{} (host simulation)", env!("CARGO_PKG_VERSION"));

    // ── 1. Profile ────────────────────────────────────────────
    let mut store = MemoryConfigStore::new();
    let config: MachineConfig = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => store.load()?,
    };
    store.save(&config).context("machine profile rejected")?;

    // ── 2. Wire adapters ──────────────────────────────────────
    let mut service = MotionService::new(store.load()?)?;
    let mut hw = SimulatedMachine::new(config, POWER_ON_POSE);
    let mut sink = LogEventSink::new();

    // ── 3. Home, then report ──────────────────────────────────
    service.handle_command(MotionCommand::Home(HomeCommand::all()), &mut hw, &mut sink)?;
    service.handle_command(MotionCommand::ReportJointPositions, &mut hw, &mut sink)?;
    service.handle_command(MotionCommand::ReportPosition, &mut hw, &mut sink)?;

    // A second "home only if unknown" is a no-op.
    let again = HomeCommand {
        only_if_unknown: true,
        ..HomeCommand::all()
    };
    service.handle_command(MotionCommand::Home(again), &mut hw, &mut sink)?;

    info!("{} simulated moves", hw.moves());
    Ok(())
}
