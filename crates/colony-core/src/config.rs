//! Runtime toggles owned by the simulation and passed into every tick.

/// Pause state and time multiplier.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameSpeed {
    pub paused:     bool,
    pub multiplier: f32,
}

impl Default for GameSpeed {
    fn default() -> Self {
        Self { paused: false, multiplier: 1.0 }
    }
}

impl GameSpeed {
    /// Scale a raw timestep.  `None` when paused or the multiplier is not
    /// positive; callers skip the step entirely in that case.
    #[inline]
    pub fn scale(self, dt: f32) -> Option<f32> {
        if self.paused || self.multiplier <= 0.0 || !self.multiplier.is_finite() {
            None
        } else {
            Some(dt * self.multiplier)
        }
    }
}

/// Debug-console switches.  Held by the `Sim`, never process-global.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DebugToggles {
    /// Colonists take no damage.
    pub godmode:               bool,
    /// Construction spends nothing from the stockpile.
    pub unlimited_resources:   bool,
    /// Raids are not spawned.
    pub enemy_spawns_disabled: bool,
}
