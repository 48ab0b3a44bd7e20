use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::bird::{BIRD_HEIGHT, BIRD_WIDTH};
use crate::error::{GameError, Result};
use crate::pipe::{PIPE_MIN_HEIGHT, PIPE_OPENING, PIPE_WIDTH};
use crate::TermInt;

pub const DEFAULT_ROWS: TermInt = 40;
pub const DEFAULT_COLS: TermInt = PIPE_WIDTH * 9;
pub const DEFAULT_TICK_MS: u64 = 200;

/// Size of the play field in terminal cells, border included.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub rows: TermInt,
    pub cols: TermInt,
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry { rows: DEFAULT_ROWS, cols: DEFAULT_COLS }
    }
}

impl Geometry {
    /// Rejects fields the game cannot be played on: the gap opening plus two
    /// minimum height pipes must fit vertically, one pipe pair must fit
    /// horizontally and the bird has to spawn above the floor.
    pub fn validate(&self) -> Result<()> {
        let min_rows = PIPE_OPENING + 2 * PIPE_MIN_HEIGHT;
        if self.rows < min_rows {
            return Err(GameError::Geometry(format!(
                "{} rows cannot hold a {}-row opening between two pipes of at least {} rows",
                self.rows, PIPE_OPENING, PIPE_MIN_HEIGHT
            )));
        }

        if self.cols < pair_spacing() || self.cols < BIRD_WIDTH + 2 {
            return Err(GameError::Geometry(format!(
                "{} columns is too narrow for a single pipe pair",
                self.cols
            )));
        }

        if self.bird_spawn().1 + BIRD_HEIGHT >= self.rows {
            return Err(GameError::Geometry(format!("{} rows leave no room for the bird", self.rows)));
        }

        Ok(())
    }

    /// The row the bird crashes into.
    pub fn floor(&self) -> TermInt {
        self.rows
    }

    /// Column where a pipe re-enters the field from the right.
    pub fn pipe_entry_x(&self) -> TermInt {
        self.cols - PIPE_WIDTH - 1
    }

    /// Ticks a pipe spends parked between two traversals.
    pub fn recycle_span(&self) -> TermInt {
        self.cols + PIPE_WIDTH
    }

    /// Pipe pairs needed to keep the field continuously populated.
    pub fn pair_count(&self) -> usize {
        (self.cols / pair_spacing()) as usize
    }

    /// Top left corner of a freshly spawned bird, centered in the field.
    pub fn bird_spawn(&self) -> (TermInt, TermInt) {
        (self.cols / 2 - BIRD_WIDTH / 2, self.rows / 2)
    }
}

#[cfg(test)]
impl Geometry {
    pub fn new(rows: TermInt, cols: TermInt) -> Self {
        Geometry { rows, cols }
    }
}

fn pair_spacing() -> TermInt {
    PIPE_WIDTH * 3 / 2
}

#[derive(Clone, Debug)]
pub struct Config {
    pub geometry: Geometry,
    pub tick: Duration,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            geometry: Geometry::default(),
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            seed: None,
            log_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(ms) = parse_setting::<u64>(&lookup, "FLAPPY_TICK_MS")? {
            config.tick = Duration::from_millis(ms);
        }
        config.seed = parse_setting(&lookup, "FLAPPY_SEED")?;
        config.log_file = lookup("FLAPPY_LOG").filter(|s| !s.is_empty()).map(PathBuf::from);

        config.geometry.validate()?;
        Ok(config)
    }
}

fn parse_setting<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Option<T>> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| GameError::InvalidSetting { name, value }),
    }
}
