//! `colony-combat`: everything between "an agent wants to shoot" and "a hit
//! lands".
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`cover`]       | `cover_fraction`, `best_cover`, `find_cover_positions`    |
//! | [`weapon`]      | `WeaponDef`, `AccuracyCurve`, `WeaponCatalog` + CSV loader|
//! | [`resolver`]    | `resolve_attack`, `AimState`, `CombatConfig`              |
//! | [`engagement`]  | Idle → Aiming → Firing → Idle / Fleeing state machine     |
//!
//! All functions here are pure given their inputs and an injected
//! [`RandomSource`](colony_core::RandomSource); none touch the agent store.

pub mod cover;
pub mod engagement;
pub mod error;
pub mod resolver;
pub mod weapon;


pub use cover::{best_cover, cover_fraction, find_cover_positions, CoverCandidate, CoverHit};
pub use engagement::{EngageInput, Engagement, EngagementPhase, EngagementStep};
pub use error::{CombatError, CombatResult};
pub use resolver::{base_accuracy, effective_accuracy, resolve_attack, AimState, AttackOutcome, CombatConfig};
pub use weapon::{load_catalog_csv, load_catalog_reader, AccuracyCurve, WeaponCatalog, WeaponCategory, WeaponDef};
