use std::io;

use crate::TermInt;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Invalid field geometry: {0}")]
    Geometry(String),

    #[error("Invalid value {value:?} for {name}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("Terminal is {have_cols}x{have_rows}, the game needs at least {need_cols}x{need_rows}")]
    TerminalTooSmall {
        have_cols: TermInt,
        have_rows: TermInt,
        need_cols: TermInt,
        need_rows: TermInt,
    },

    #[error("Terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Logger initialization failed: {0}")]
    Logger(#[from] log::SetLoggerError),
}
