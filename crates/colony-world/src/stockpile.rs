//! Colony resource stockpile.

use std::fmt;

use crate::{WorldError, WorldResult};

/// A resource bill.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cost {
    pub wood:  u32,
    pub stone: u32,
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wood, {} stone", self.wood, self.stone)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stockpile {
    pub wood:  u32,
    pub stone: u32,
    pub meals: u32,
}

impl Stockpile {
    pub fn can_afford(&self, cost: Cost, unlimited: bool) -> bool {
        unlimited || (self.wood >= cost.wood && self.stone >= cost.stone)
    }

    /// Deduct `cost`.  With `unlimited` set nothing is deducted.
    pub fn spend(&mut self, cost: Cost, unlimited: bool) -> WorldResult<()> {
        if unlimited {
            return Ok(());
        }
        if !self.can_afford(cost, false) {
            return Err(WorldError::InsufficientResources(cost));
        }
        self.wood -= cost.wood;
        self.stone -= cost.stone;
        Ok(())
    }

    /// Take one meal if any remain.
    pub fn take_meal(&mut self) -> bool {
        if self.meals == 0 {
            return false;
        }
        self.meals -= 1;
        true
    }
}
