//! Tap Breaker headless runner
//!
//! Usage: `tap-breaker [settings.json] [seconds] [seed]`
//!
//! Runs the scene with autoplay taps at a display-synced frame rate, logs
//! progress and prints the final scene snapshot as JSON.

use std::process::ExitCode;

use tap_breaker::Settings;
use tap_breaker::consts::SIM_DT;
use tap_breaker::sim::{GameScene, Host};

const DEFAULT_SECONDS: f32 = 10.0;
const DEFAULT_SEED: u64 = 0x5eed;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let settings = match args.first().map(String::as_str) {
        Some(path) if path != "-" => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load settings from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        _ => Settings::default(),
    };
    let seconds = args
        .get(1)
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);
    let seed = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);

    let game = match GameScene::new(settings) {
        Ok(game) => game,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("Tap Breaker starting: {:.1}s of autoplay, seed {}", seconds, seed);
    let mut host = Host::new(game, seed);
    host.set_autoplay(true);

    let mut last_report = 0.0;
    while host.time() < f64::from(seconds) {
        host.frame(SIM_DT);

        if host.time() - last_report >= 1.0 {
            last_report = host.time();
            let stats = host.stats();
            log::info!(
                "t={:.1}s shots={} destroyed={} blocks left={}",
                host.time(),
                stats.shots_fired,
                stats.blocks_destroyed,
                host.game().block_count()
            );
        }

        if host.game().block_count() == 0 && host.game().projectile_count() == 0 {
            break;
        }
    }

    let stats = host.stats();
    log::info!(
        "Finished after {} ticks: {} shots, {} blocks destroyed, {} stale contacts",
        host.ticks(),
        stats.shots_fired,
        stats.blocks_destroyed,
        stats.stale_contacts
    );

    match serde_json::to_string_pretty(&host.game().snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Could not serialize snapshot: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
