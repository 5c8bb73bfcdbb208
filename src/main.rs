use std::env;
use std::io;
use std::path::PathBuf;

use crossterm::{
    cursor::{Hide, Show},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use log::{error, info};

use earth_defender::config::GameConfig;
use earth_defender::constants::LOG_FILE;
use earth_defender::error::{GameError, Result};
use earth_defender::game::Game;
use earth_defender::rendering::{GameGrid, OutputTarget, ScreenBuffer};
use earth_defender::terminal_io::{InputSource, SimulatedInput};

const USAGE: &str = "usage: earth-defender [--config <path>] [--seed <n>] [--frames <n>] [--debug [<width> <height>]]";

#[derive(Debug, Default, PartialEq)]
struct LaunchOptions {
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    max_frames: Option<u64>,
    debug: bool,
    debug_size: Option<(u16, u16)>,
}

impl LaunchOptions {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = LaunchOptions::default();
        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => options.config_path = Some(PathBuf::from(value_for(arg, iter.next())?)),
                "--seed" => options.seed = Some(number_for(arg, iter.next())?),
                "--frames" => options.max_frames = Some(number_for(arg, iter.next())?),
                "--debug" => {
                    options.debug = true;
                    // Optional "<width> <height>" directly after the flag
                    if iter.peek().is_some_and(|next| next.parse::<u16>().is_ok()) {
                        let width = number_for(arg, iter.next())?;
                        let height = number_for(arg, iter.next())?;
                        options.debug_size = Some((width, height));
                    }
                }
                other => return Err(GameError::InvalidArgument(format!("unknown argument `{}`\n{}", other, USAGE))),
            }
        }
        Ok(options)
    }
}

fn value_for<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str> {
    value
        .map(String::as_str)
        .ok_or_else(|| GameError::InvalidArgument(format!("`{}` needs a value\n{}", flag, USAGE)))
}

fn number_for<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T> {
    let raw = value_for(flag, value)?;
    raw.parse::<T>()
        .map_err(|_| GameError::InvalidArgument(format!("`{}` expects a number, got `{}`", flag, raw)))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = LaunchOptions::parse(&args)?;

    let mut config = match &options.config_path {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if options.seed.is_some() {
        config.seed = options.seed;
    }
    config.validate()?;

    simple_logging::log_to_file(LOG_FILE, config.level_filter()?)
        .map_err(|e| GameError::Logging(e.to_string()))?;
    info!("Starting Earth Defender.");

    let result = if options.debug { run_headless(config, &options) } else { run_terminal(config, &options) };
    if let Err(e) = &result {
        error!("Game aborted: {}", e);
    }
    info!("Exiting application.");
    result
}

fn run_headless(mut config: GameConfig, options: &LaunchOptions) -> Result<()> {
    let (width, height) = options.debug_size.unwrap_or((80, 24));
    info!("Debug mode enabled at {}x{}.", width, height);
    // Replays must be reproducible
    if config.seed.is_none() {
        config.seed = Some(0);
    }
    let stdout_target = OutputTarget::ScreenBuffer(ScreenBuffer::new(width, height));
    let input = InputSource::Simulated(SimulatedInput::demo_script());
    let mut game = Game::new(config, width, height, stdout_target, input, true, options.max_frames);
    game.run()
}

fn run_terminal(config: GameConfig, options: &LaunchOptions) -> Result<()> {
    enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
    let result = play_in_terminal(config, options);
    // Restore the terminal even when the game failed
    let restored = restore_terminal();
    result.and(restored)
}

fn play_in_terminal(config: GameConfig, options: &LaunchOptions) -> Result<()> {
    let (width, height) = size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}", width, height);
    let mut stdout_target = OutputTarget::Stdout(io::stdout());
    GameGrid::new(width, height).clear_screen_manual(&mut stdout_target)?;
    stdout_target.execute_other_command(Hide).map_err(|e| { error!("Failed to hide cursor: {}", e); e })?;

    let mut game = Game::new(config, width, height, stdout_target, InputSource::Terminal, false, options.max_frames);
    game.run()?;
    GameGrid::new(width, height).clear_screen_manual(&mut game.stdout_target)?;
    game.stdout_target.execute_other_command(Show)?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| { error!("Failed to disable raw mode on exit: {}", e); e })?;
    Ok(())
}
