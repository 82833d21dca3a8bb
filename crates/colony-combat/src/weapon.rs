//! Weapon definitions, accuracy curves, and the catalog.
//!
//! # CSV format
//!
//! ```csv
//! def_name,category,damage,range,cooldown_secs,acc_close,acc_medium,acc_long
//! rifle,ranged,16,25,1.6,0.9,0.8,0.6
//! club,melee,10,1.5,1.2,0.85,0.85,0.85
//! ```
//!
//! The three accuracy columns are sampled at distance 0, `range / 2` and
//! `range`; the curve interpolates linearly between them.  Melee weapons use
//! only `acc_close`.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use colony_core::DefName;

use crate::{CombatError, CombatResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WeaponCategory {
    Melee,
    Ranged,
}

impl WeaponCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "melee"  => Some(WeaponCategory::Melee),
            "ranged" => Some(WeaponCategory::Ranged),
            _ => None,
        }
    }
}

// ── AccuracyCurve ─────────────────────────────────────────────────────────────

/// Piecewise-linear distance → hit chance, clamped at both ends.
#[derive(Clone, Debug, PartialEq)]
pub struct AccuracyCurve {
    /// `(distance, chance)` sorted by distance.
    points: Vec<(f32, f32)>,
}

impl AccuracyCurve {
    pub fn new(mut points: Vec<(f32, f32)>) -> Self {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        for p in &mut points {
            p.1 = p.1.clamp(0.0, 1.0);
        }
        Self { points }
    }

    pub fn flat(chance: f32) -> Self {
        Self::new(vec![(0.0, chance)])
    }

    pub fn at(&self, distance: f32) -> f32 {
        let Some(&(first_d, first_c)) = self.points.first() else {
            return 0.0;
        };
        if distance <= first_d {
            return first_c;
        }
        for w in self.points.windows(2) {
            let (d0, c0) = w[0];
            let (d1, c1) = w[1];
            if distance <= d1 {
                let span = d1 - d0;
                if span <= f32::EPSILON {
                    return c1;
                }
                return c0 + (c1 - c0) * ((distance - d0) / span);
            }
        }
        self.points.last().map_or(0.0, |p| p.1)
    }
}

// ── WeaponDef ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponDef {
    pub def_name:      DefName,
    pub category:      WeaponCategory,
    pub damage:        f32,
    pub range:         f32,
    pub cooldown_secs: f32,
    pub accuracy:      AccuracyCurve,
}

impl WeaponDef {
    pub fn ranged(name: impl Into<DefName>, damage: f32, range: f32, cooldown_secs: f32, acc: [f32; 3]) -> Self {
        Self {
            def_name: name.into(),
            category: WeaponCategory::Ranged,
            damage,
            range,
            cooldown_secs,
            accuracy: AccuracyCurve::new(vec![(0.0, acc[0]), (range * 0.5, acc[1]), (range, acc[2])]),
        }
    }

    pub fn melee(name: impl Into<DefName>, damage: f32, cooldown_secs: f32, accuracy: f32) -> Self {
        Self {
            def_name: name.into(),
            category: WeaponCategory::Melee,
            damage,
            range: 0.0,
            cooldown_secs,
            accuracy: AccuracyCurve::flat(accuracy),
        }
    }

    #[inline]
    pub fn is_melee(&self) -> bool {
        self.category == WeaponCategory::Melee
    }
}

// ── WeaponCatalog ─────────────────────────────────────────────────────────────

/// All known weapon definitions, keyed by `DefName`.
#[derive(Clone, Debug, Default)]
pub struct WeaponCatalog {
    defs: BTreeMap<DefName, WeaponDef>,
}

impl WeaponCatalog {
    /// Definition used by agents with nothing equipped.
    pub const UNARMED: &'static str = "fists";

    pub fn new() -> Self {
        let mut c = Self::default();
        c.insert(WeaponDef::melee(Self::UNARMED, 5.0, 1.0, 0.85));
        c
    }

    /// The built-in set used when no catalog file is supplied.
    pub fn standard() -> Self {
        let mut c = Self::new();
        c.insert(WeaponDef::melee("club", 10.0, 1.2, 0.85));
        c.insert(WeaponDef::melee("knife", 12.0, 0.8, 0.9));
        c.insert(WeaponDef::ranged("pistol", 10.0, 15.0, 1.0, [0.9, 0.7, 0.5]));
        c.insert(WeaponDef::ranged("shotgun", 18.0, 8.0, 1.5, [0.95, 0.7, 0.3]));
        c.insert(WeaponDef::ranged("rifle", 16.0, 25.0, 1.6, [0.9, 0.8, 0.6]));
        c
    }

    pub fn insert(&mut self, def: WeaponDef) {
        self.defs.insert(def.def_name.clone(), def);
    }

    #[inline]
    pub fn get(&self, name: &DefName) -> Option<&WeaponDef> {
        self.defs.get(name)
    }

    pub fn require(&self, name: &DefName) -> CombatResult<&WeaponDef> {
        self.get(name).ok_or_else(|| CombatError::UnknownWeapon(name.clone()))
    }

    /// The weapon an agent fights with: its equipped def, or fists.
    pub fn wielded(&self, equipped: Option<&DefName>) -> CombatResult<&WeaponDef> {
        match equipped {
            Some(def) => self.require(def),
            None => self.require(&DefName::from(Self::UNARMED)),
        }
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeaponDef> {
        self.defs.values()
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WeaponRecord {
    def_name:      String,
    category:      String,
    damage:        f32,
    range:         f32,
    cooldown_secs: f32,
    acc_close:     f32,
    acc_medium:    f32,
    acc_long:      f32,
}

impl WeaponRecord {
    fn into_def(self) -> CombatResult<WeaponDef> {
        let def = DefName::new(self.def_name.trim());
        let category = WeaponCategory::parse(&self.category).ok_or_else(|| invalid(&def, "unknown category"))?;
        if self.damage < 0.0 || self.cooldown_secs < 0.0 {
            return Err(invalid(&def, "negative damage or cooldown"));
        }
        match category {
            WeaponCategory::Melee => Ok(WeaponDef::melee(def, self.damage, self.cooldown_secs, self.acc_close)),
            WeaponCategory::Ranged if self.range <= 0.0 => Err(invalid(&def, "ranged weapon needs a positive range")),
            WeaponCategory::Ranged => Ok(WeaponDef::ranged(
                def,
                self.damage,
                self.range,
                self.cooldown_secs,
                [self.acc_close, self.acc_medium, self.acc_long],
            )),
        }
    }
}

fn invalid(def: &DefName, reason: &str) -> CombatError {
    CombatError::InvalidWeapon { def: def.clone(), reason: reason.to_owned() }
}

/// Load a catalog file.  The unarmed definition is always present.
pub fn load_catalog_csv(path: &Path) -> CombatResult<WeaponCatalog> {
    let file = std::fs::File::open(path).map_err(CombatError::Io)?;
    load_catalog_reader(file)
}

/// Like [`load_catalog_csv`] but accepts any `Read` source.
pub fn load_catalog_reader<R: Read>(reader: R) -> CombatResult<WeaponCatalog> {
    let mut catalog = WeaponCatalog::new();
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    for result in csv_reader.deserialize::<WeaponRecord>() {
        let row = result.map_err(|e| CombatError::Parse(e.to_string()))?;
        catalog.insert(row.into_def()?);
    }
    Ok(catalog)
}
