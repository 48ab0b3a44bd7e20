mod bird;
mod collision;
mod config;
mod error;
mod game;
mod pipe;
mod round;
mod term;

use std::fs::File;
use std::process::exit;

use config::Config;
use error::Result;
use log::LevelFilter;

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() {
    if let Err(err) = run() {
        eprintln!("flappy: {}", err);
        exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_env()?;
    init_logging(&config)?;

    let mut term = term::TermManager::new(&config.geometry)?;
    term.setup()?;

    let mut game = game::FlappyGame::new(term, config);
    let res = game.run();

    let mut term = game.into_term();
    let restored = term.restore();
    res.and(restored)
}

/// The game owns the terminal, so log lines only go to a file when one is
/// configured.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = File::create(path)?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(())
}
