//! `colony-equip`: deciding when to pick up a better weapon, and making
//! sure only one agent goes for it.
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`value`]    | `EquipConfig`, `weapon_value`, `evaluate_upgrade`              |
//! | [`claims`]   | `ClaimTable`: single-owner lock keyed by `ItemId`             |
//! | [`resolve`]  | `resolve_claims`: same-tick, nearest-first claim arbitration  |
//! | [`swap`]     | `pick_up_and_equip`: floor → hand, old weapon → floor         |
//! | [`error`]    | `ClaimConflict`, `EquipError`, `EquipResult<T>`                |
//!
//! The claim table is the only agent-shared mutable resource in the decision
//! core.  Every path that ends a claimant's task (completion, interruption,
//! death) releases its claim; [`ClaimTable::release_all_for`] is the hammer
//! used on exit so a claim can never outlive its task.

pub mod claims;
pub mod error;
pub mod resolve;
pub mod swap;
pub mod value;


pub use claims::ClaimTable;
pub use error::{ClaimConflict, EquipError, EquipResult};
pub use resolve::{resolve_claims, Seeker};
pub use swap::{pick_up_and_equip, EquipSwap};
pub use value::{equipment_priority, evaluate_upgrade, weapon_value, EquipConfig, UpgradeCandidate};
