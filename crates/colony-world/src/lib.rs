//! `colony-world`: the static and semi-static world the agents act in.
//!
//! Everything here is owned by the simulation and mutated only in
//! well-defined places (site completion, item pickup/drop).  Agents hold
//! ids into these registries, never references; a failed lookup is how a
//! destroyed target is detected.
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`terrain`]    | `TerrainQuery` trait, `TileGrid`, `Tile`, `BuildingKind`     |
//! | [`obstacle`]   | `CoverKind`, `Obstacle`, R-tree backed `ObstacleIndex`       |
//! | [`items`]      | `FloorItems` registry (`nearby_items`, `remove_item`, `drop_item`) |
//! | [`sites`]      | `WorkSites` (trees, rocks, blueprints, beds, tables)        |
//! | [`stockpile`]  | Colony resources and building costs                          |
//! | [`work`]       | `WorkProvider` trait and the default `NearestWork`           |
//! | [`world`]      | `World` aggregate and site completion side effects           |
//! | [`loader`]     | CSV layout loader                                            |

pub mod error;
pub mod items;
pub mod loader;
pub mod obstacle;
pub mod sites;
pub mod stockpile;
pub mod terrain;
pub mod work;
pub mod world;

#[cfg(test)]
mod tests;

pub use error::{WorldError, WorldResult};
pub use items::{FloorItem, FloorItems, ItemKind};
pub use loader::{load_layout_csv, load_layout_reader};
pub use obstacle::{CoverKind, Obstacle, ObstacleIndex, ObstacleShape, WALL_HALF_THICKNESS};
pub use sites::{SiteKind, WorkSite, WorkSites};
pub use stockpile::{Cost, Stockpile};
pub use terrain::{BuildingKind, TerrainQuery, Tile, TileGrid};
pub use work::{NearestWork, TaskDescriptor, WorkProvider};
pub use world::{SiteCompletion, World};
