//! A single playthrough: the bird, the pipes and the score, advanced one tick
//! at a time.

use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};

use crate::bird::{Bird, FlightResult};
use crate::config::Geometry;
use crate::error::Result;
use crate::pipe::{FieldStep, PipeField};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Flap,
    TogglePause,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Ground,
    Pipe,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    Quit,
    Crashed(Collision),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundState {
    Running,
    Paused,
    Ended(EndReason),
}

pub struct Round {
    bird: Bird,
    pipes: PipeField,
    rng: StdRng,
    score: u32,
    ticks: u64,
    state: RoundState,
}

impl Round {
    pub fn new(geometry: &Geometry, seed: Option<u64>) -> Result<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let pipes = PipeField::new(geometry, &mut rng)?;

        info!("Round started with {} pipe pairs", pipes.pairs().len());
        Ok(Round { bird: Bird::new(geometry), pipes, rng, score: 0, ticks: 0, state: RoundState::Running })
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &PipeField {
        &self.pipes
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Applies at most one command and, unless the command paused, resumed or
    /// ended the round, advances the simulation by one tick.
    pub fn step(&mut self, command: Option<Command>) -> RoundState {
        match (self.state, command) {
            (RoundState::Ended(_), _) => {}
            (_, Some(Command::Quit)) => self.end(EndReason::Quit),
            (RoundState::Running, Some(Command::TogglePause)) => {
                debug!("Paused at tick {}", self.ticks);
                self.state = RoundState::Paused;
            }
            (RoundState::Paused, Some(Command::TogglePause)) => {
                debug!("Resumed at tick {}", self.ticks);
                self.state = RoundState::Running;
            }
            (RoundState::Paused, _) => {}
            (RoundState::Running, Some(Command::Flap)) => {
                self.bird.flap();
                self.advance();
            }
            (RoundState::Running, None) => self.advance(),
        }

        self.state
    }

    fn advance(&mut self) {
        self.ticks += 1;

        if self.bird.tick() == FlightResult::Crashed {
            self.end(EndReason::Crashed(Collision::Ground));
            return;
        }
        trace!("Tick {}: bird at {:?}", self.ticks, self.bird.pos());

        match self.pipes.tick(&self.bird.bounding_box(), &mut self.rng) {
            FieldStep::Advanced { points } => self.score += points,
            FieldStep::Crashed => self.end(EndReason::Crashed(Collision::Pipe)),
        }
    }

    fn end(&mut self, reason: EndReason) {
        info!("Round ended after {} ticks ({:?}), score {}", self.ticks, reason, self.score);
        self.state = RoundState::Ended(reason);
    }
}

#[cfg(test)]
impl Round {
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
