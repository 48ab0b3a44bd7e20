use log::debug;
use rand::Rng;

use crate::collision::BoundingBox;
use crate::config::Geometry;
use crate::error::Result;
use crate::TermInt;
use FieldStep::*;
use PipeStep::*;

pub const PIPE_WIDTH: TermInt = 8;
pub const PIPE_MIN_HEIGHT: TermInt = 4;
/// Rows of open air between the two halves of a pair.
pub const PIPE_OPENING: TermInt = 10;

const PIPE_CAP: [&str; 3] = ["+------+", "|      |", "++    ++"];
const PIPE_BODY: &str = " |    |";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    /// Parked off screen, entering the field once the countdown runs out.
    Waiting { countdown: TermInt },
    Scrolling,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PipeStep {
    Waited,
    Entered,
    Moved,
    /// Reached the left edge and went back to waiting.
    Recycled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldStep {
    Advanced { points: u32 },
    Crashed,
}

/// One half of a pipe pair, anchored to the ceiling or the floor.
pub struct Pipe {
    is_bottom: bool,
    height: TermInt,
    x: TermInt,
    y: TermInt,
    phase: Phase,
    entry_x: TermInt,
    recycle_span: TermInt,
    rows: TermInt,
}

impl Pipe {
    pub fn new(is_bottom: bool, height: TermInt, countdown: TermInt, geometry: &Geometry) -> Self {
        let phase = if countdown == 0 { Phase::Scrolling } else { Phase::Waiting { countdown } };
        let mut pipe = Pipe {
            is_bottom,
            height,
            x: geometry.pipe_entry_x(),
            y: 1,
            phase,
            entry_x: geometry.pipe_entry_x(),
            recycle_span: geometry.recycle_span(),
            rows: geometry.rows,
        };
        pipe.set_height(height);
        pipe
    }

    pub fn tick(&mut self) -> PipeStep {
        match self.phase {
            Phase::Waiting { countdown } => {
                let countdown = countdown.saturating_sub(1);
                if countdown == 0 {
                    self.x = self.entry_x;
                    self.phase = Phase::Scrolling;
                    Entered
                } else {
                    self.phase = Phase::Waiting { countdown };
                    Waited
                }
            }
            Phase::Scrolling => {
                self.x -= 1;
                if self.x <= 1 {
                    self.phase = Phase::Waiting { countdown: self.recycle_span };
                    Recycled
                } else {
                    Moved
                }
            }
        }
    }

    pub fn set_height(&mut self, height: TermInt) {
        self.height = height;
        self.y = if self.is_bottom { self.rows - height - 1 } else { 1 };
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Scrolling
    }

    /// The bottom edge sits one row above the raw height so the box matches
    /// the drawn opening.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            xs: (self.x, self.x + PIPE_WIDTH - 1),
            ys: (self.y, self.y + self.height.saturating_sub(2)),
        }
    }

    pub fn origin(&self) -> (TermInt, TermInt) {
        (self.x, self.y)
    }

    /// Rows to draw, cap facing the opening.
    pub fn sprite(&self) -> Vec<&'static str> {
        let body = (self.height as usize).saturating_sub(PIPE_CAP.len());
        let mut rows = Vec::with_capacity(self.height as usize);

        if self.is_bottom {
            rows.extend_from_slice(&PIPE_CAP);
            rows.extend(std::iter::repeat(PIPE_BODY).take(body));
        } else {
            rows.extend(std::iter::repeat(PIPE_BODY).take(body));
            rows.extend(PIPE_CAP.iter().rev());
        }

        rows
    }
}

/// Rolls a top height and its complementary bottom height. The two always
/// leave exactly `PIPE_OPENING` rows of air in a field of `rows` rows.
pub fn roll_heights(rng: &mut impl Rng, rows: TermInt) -> (TermInt, TermInt) {
    let top = rng.gen_range(PIPE_MIN_HEIGHT..=rows - PIPE_OPENING - PIPE_MIN_HEIGHT);
    (top, rows - PIPE_OPENING - top)
}

pub struct PipePair {
    pub top: Pipe,
    pub bottom: Pipe,
    regenerations: u32,
}

impl PipePair {
    pub fn new(top_height: TermInt, countdown: TermInt, geometry: &Geometry) -> Self {
        let bottom_height = geometry.rows - PIPE_OPENING - top_height;
        PipePair {
            top: Pipe::new(false, top_height, countdown, geometry),
            bottom: Pipe::new(true, bottom_height, countdown, geometry),
            regenerations: 0,
        }
    }

    fn regenerate(&mut self, (top, bottom): (TermInt, TermInt)) {
        self.top.set_height(top);
        self.bottom.set_height(bottom);
        self.regenerations += 1;
    }

    /// Checks both halves against the bird. Returns `None` on a hit, otherwise
    /// whether the bird just cleared this pair. Both halves share a column
    /// span, so a pass on either counts once.
    fn check(&self, bird: &BoundingBox) -> Option<bool> {
        let mut cleared = false;

        for pipe in [&self.top, &self.bottom] {
            if !pipe.is_visible() {
                continue;
            }

            let pipe_box = pipe.bounding_box();
            if bird.overlaps_x(&pipe_box) {
                if bird.overlaps_y(&pipe_box) {
                    return None;
                }
            } else if bird.just_cleared(&pipe_box) {
                cleared = true;
            }
        }

        Some(cleared)
    }
}

pub struct PipeField {
    rows: TermInt,
    pairs: Vec<PipePair>,
}

impl PipeField {
    pub fn new(geometry: &Geometry, rng: &mut impl Rng) -> Result<Self> {
        geometry.validate()?;

        let pairs = (0..geometry.pair_count())
            .map(|i| {
                let (top, _) = roll_heights(rng, geometry.rows);
                PipePair::new(top, i as TermInt * PIPE_WIDTH * 3, geometry)
            })
            .collect();

        Ok(PipeField { rows: geometry.rows, pairs })
    }

    pub fn pairs(&self) -> &[PipePair] {
        &self.pairs
    }

    pub fn tick(&mut self, bird: &BoundingBox, rng: &mut impl Rng) -> FieldStep {
        let mut points = 0;
        let mut crashed = false;

        for (i, pair) in self.pairs.iter_mut().enumerate() {
            let step = pair.top.tick();
            pair.bottom.tick();

            if step == Recycled {
                pair.regenerate(roll_heights(rng, self.rows));
                debug!(
                    "Pipe pair {} regenerated ({} times) with heights {:?}",
                    i,
                    pair.regenerations,
                    (pair.top.height(), pair.bottom.height())
                );
                continue;
            }

            match pair.check(bird) {
                None => crashed = true,
                Some(true) => points += 1,
                Some(false) => {}
            }
        }

        if crashed { Crashed } else { Advanced { points } }
    }
}

#[cfg(test)]
impl Pipe {
    pub fn x(&self) -> TermInt {
        self.x
    }

    pub fn countdown(&self) -> Option<TermInt> {
        match self.phase {
            Phase::Waiting { countdown } => Some(countdown),
            Phase::Scrolling => None,
        }
    }
}

#[cfg(test)]
impl PipePair {
    pub fn regenerations(&self) -> u32 {
        self.regenerations
    }
}

#[cfg(test)]
impl PipeField {
    pub fn from_pairs(geometry: &Geometry, pairs: Vec<PipePair>) -> Self {
        PipeField { rows: geometry.rows, pairs }
    }
}
