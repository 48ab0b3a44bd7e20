use crate::collision::BoundingBox;
use crate::config::Geometry;
use crate::{Coords, TermInt};
use FlightResult::*;

pub const BIRD_WIDTH: TermInt = 7;
pub const BIRD_HEIGHT: TermInt = 3;
/// Ticks of climbing granted by a single flap.
pub const FLAP_TICKS: u8 = 5;

const WINGS_UP: [&str; 3] = ["00 --", "  0  o.", "  \\--/"];
const WINGS_DOWN: [&str; 3] = ["   --", "000  o.", "  \\--/"];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlightResult {
    Flying,
    Crashed,
}

pub struct Bird {
    pos: Coords,
    boost: u8,
    wings_up: bool,
    floor: TermInt,
}

impl Bird {
    pub fn new(geometry: &Geometry) -> Self {
        Bird { pos: geometry.bird_spawn(), boost: 0, wings_up: true, floor: geometry.floor() }
    }

    pub fn pos(&self) -> Coords {
        self.pos
    }

    /// Re-arms the climb. Flapping again while climbing does not stack.
    pub fn flap(&mut self) {
        self.boost = FLAP_TICKS;
    }

    pub fn tick(&mut self) -> FlightResult {
        if self.boost > 0 {
            self.boost -= 1;
            if self.pos.1 > 1 {
                self.pos.1 -= 1;
            }
        } else {
            self.pos.1 += 1;
        }

        self.wings_up = !self.wings_up;

        if self.pos.1 + BIRD_HEIGHT >= self.floor {
            Crashed
        } else {
            Flying
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.pos, BIRD_WIDTH, BIRD_HEIGHT)
    }

    pub fn sprite(&self) -> &'static [&'static str] {
        if self.wings_up { &WINGS_UP } else { &WINGS_DOWN }
    }
}

#[cfg(test)]
impl Bird {
    pub fn boost(&self) -> u8 {
        self.boost
    }
}
