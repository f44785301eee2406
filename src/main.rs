//! Breakout headless entry point
//!
//! Loads tuning and levels, then lets the autopilot play one level until it
//! ends or the frame limit is hit.
//!
//! Usage: breakout [--tuning PATH] [--levels PATH] [--level N] [--seed N] [--max-frames N]

use std::path::PathBuf;
use std::process::ExitCode;

use breakout::sim::{Autopilot, Frontend, Game, GameState};
use breakout::{ConfigError, LevelLayout, Tuning};

const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Debug)]
struct Options {
    tuning: Option<PathBuf>,
    levels: Option<PathBuf>,
    level: usize,
    seed: u64,
    max_frames: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tuning: None,
            levels: None,
            level: 0,
            seed: 1,
            max_frames: 60 * 60 * 5,
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--tuning" => options.tuning = Some(PathBuf::from(value()?)),
            "--levels" => options.levels = Some(PathBuf::from(value()?)),
            "--level" => options.level = parse_number(&flag, &value()?)?,
            "--seed" => options.seed = parse_number(&flag, &value()?)?,
            "--max-frames" => options.max_frames = parse_number(&flag, &value()?)?,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn parse_number<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("{flag} expects a number, got {raw:?}"))
}

fn build_game(options: &Options) -> Result<Game, ConfigError> {
    let tuning = match &options.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let layouts = match &options.levels {
        Some(path) => LevelLayout::load_list(path)?,
        None => LevelLayout::builtin(),
    };
    Game::new(tuning, &layouts, Frontend::headless())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Breakout (headless) starting...");

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            log::error!("{message}");
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let mut game = match build_game(&options) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Failed to set up game: {err}");
            return ExitCode::FAILURE;
        }
    };
    game.initialize();
    if let Err(err) = game.orchestrator().select_level(options.level) {
        log::error!("{err}");
        return ExitCode::FAILURE;
    }

    let mut pilot = Autopilot::new(options.seed);
    let mut frames = 0;
    while frames < options.max_frames && game.state() == GameState::Playing {
        let input = pilot.input(&game);
        game.advance(FRAME_DT, &input);
        frames += 1;
    }

    let orchestrator = game.orchestrator();
    let remaining = orchestrator.active_level().map_or(0, |level| level.remaining());
    log::info!(
        "Finished after {frames} frames: state={:?} score={} lives={} blocks left={remaining}",
        game.state(),
        orchestrator.score().current(),
        orchestrator.lives().current(),
    );
    println!(
        "state={:?} score={} lives={} blocks_left={remaining} frames={frames}",
        game.state(),
        orchestrator.score().current(),
        orchestrator.lives().current(),
    );

    game.teardown();
    ExitCode::SUCCESS
}
