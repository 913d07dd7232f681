use std::time::Duration;

use clap::Args;
use countdown_core::{
    resolve_target, AlertDispatcher, Clock, Config, CountdownEngine, CountdownSession,
    IntervalScheduler, ManualScheduler, SystemClock, TimerStatus,
};
use tracing::{debug, info};

use super::{open_settings, TargetArgs};
use crate::audio::{output_for, TerminalVisibility};
use crate::render::Renderer;

/// Long enough for the last staggered chime note to finish.
const ALERT_TAIL: Duration = Duration::from_millis(600);

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Emit one JSON event per line instead of drawing the countdown
    #[arg(long)]
    pub json: bool,
    /// Disable ANSI colours
    #[arg(long)]
    pub no_color: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_countdown(args))
}

async fn run_countdown(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let spec = args.target.spec(&config)?;
    let clock = SystemClock;
    let target = resolve_target(&spec, clock.now());
    info!(target = %target.instant, zone = %target.zone, "countdown target resolved");

    let (scheduler, mut ticks) = IntervalScheduler::new();
    let engine = CountdownEngine::new(target, clock, scheduler).with_policy(config.ticker.drift);
    let alerts = AlertDispatcher::new(output_for(config.audio.backend), Box::new(TerminalVisibility));
    let mut session = CountdownSession::new(engine, alerts, open_settings());
    let renderer = Renderer::new(args.json, !args.no_color);

    let started = session.start();
    renderer.event(&started, &session.view())?;

    if session.engine().status() == TimerStatus::Running {
        loop {
            tokio::select! {
                tick = ticks.recv() => {
                    if tick.is_none() {
                        break;
                    }
                    let Some(event) = session.tick() else {
                        continue;
                    };
                    renderer.event(&event, &session.view())?;
                    if event.is_expiry() {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    debug!("interrupted");
                    session.shutdown();
                    return Ok(renderer.interrupted()?);
                }
            }
        }
    }

    session.shutdown();
    let view = session.view();
    if view.celebration_active {
        renderer.celebrate(&view)?;
        tokio::time::sleep(ALERT_TAIL).await;
    }
    Ok(())
}

/// One-shot: resolve, initialize, print the view, tear down.
pub fn status(args: TargetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let spec = args.spec(&config)?;
    let clock = SystemClock;
    let target = resolve_target(&spec, clock.now());

    let engine = CountdownEngine::new(target, clock, ManualScheduler::new());
    let mut session = CountdownSession::new(engine, AlertDispatcher::silent(), open_settings());
    session.start();
    let view = session.view();
    session.shutdown();

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
