//! Health and needs.

/// Health plus two needs on a `0..=100` scale where higher is worse.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub health:     f32,
    pub max_health: f32,
    pub hunger:     f32,
    pub fatigue:    f32,
}

impl Vitals {
    pub const NEED_MAX: f32 = 100.0;

    pub fn new(max_health: f32) -> Self {
        Self { health: max_health, max_health, hunger: 0.0, fatigue: 0.0 }
    }

    #[inline]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 { 0.0 } else { (self.health / self.max_health).clamp(0.0, 1.0) }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).max(0.0);
    }

    pub fn heal_full(&mut self) {
        self.health = self.max_health;
    }

    /// Add `hunger` / `fatigue` deltas and clamp into range.
    pub fn add_needs(&mut self, hunger: f32, fatigue: f32) {
        self.hunger = (self.hunger + hunger).clamp(0.0, Self::NEED_MAX);
        self.fatigue = (self.fatigue + fatigue).clamp(0.0, Self::NEED_MAX);
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::new(100.0)
    }
}
