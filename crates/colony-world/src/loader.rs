//! CSV world-layout loader.
//!
//! # CSV format
//!
//! One row per placed thing.  `param` is optional except where noted.
//!
//! ```csv
//! kind,x,y,param
//! mountain,0,0,
//! rock,1,0,
//! tree,5,5,
//! wall,8,3,
//! bed,10,10,
//! table,11,10,
//! blueprint,9,3,wall
//! weapon,6,6,rifle
//! chunk,7,2,
//! ```
//!
//! | `kind`      | Effect                                              |
//! |-------------|-----------------------------------------------------|
//! | `mountain`  | Impassable mountain tile                            |
//! | `rock`      | Mountain tile with a mineable site                  |
//! | `tree`      | Tree cover + choppable site                         |
//! | `wall`      | Finished wall building (cover)                      |
//! | `bed`       | Finished bed                                        |
//! | `table`     | Finished table                                      |
//! | `blueprint` | Construction site; `param` = `wall`/`bed`/`table`   |
//! | `weapon`    | Floor weapon at the tile centre; `param` = def name |
//! | `chunk`     | Stone chunk cover                                   |

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use colony_core::{DefName, Vec2};

use crate::items::ItemKind;
use crate::terrain::{BuildingKind, TerrainQuery};
use crate::world::World;
use crate::{WorldError, WorldResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LayoutRecord {
    kind:  String,
    x:     i32,
    y:     i32,
    #[serde(default)]
    param: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a `width × height` world from a layout CSV file.
pub fn load_layout_csv(path: &Path, width: i32, height: i32) -> WorldResult<World> {
    let file = std::fs::File::open(path).map_err(WorldError::Io)?;
    load_layout_reader(file, width, height)
}

/// Like [`load_layout_csv`] but accepts any `Read` source.
pub fn load_layout_reader<R: Read>(reader: R, width: i32, height: i32) -> WorldResult<World> {
    let mut world = World::new(width, height);
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    for (line, result) in csv_reader.deserialize::<LayoutRecord>().enumerate() {
        let row = result.map_err(|e| WorldError::Parse(e.to_string()))?;
        apply_record(&mut world, &row).map_err(|e| match e {
            WorldError::Parse(msg) => WorldError::Parse(format!("row {}: {msg}", line + 1)),
            other => other,
        })?;
    }
    Ok(world)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn apply_record(world: &mut World, row: &LayoutRecord) -> WorldResult<()> {
    let tile = (row.x, row.y);
    match row.kind.trim().to_ascii_lowercase().as_str() {
        "mountain" => world.add_mountain(tile)?,
        "rock"     => { world.add_rock(tile)?; }
        "tree"     => { world.add_tree(tile)?; }
        "chunk"    => world.add_stone_chunk(tile)?,
        "wall"     => { world.place_building(tile, BuildingKind::Wall)?; }
        "bed"      => { world.place_building(tile, BuildingKind::Bed)?; }
        "table"    => { world.place_building(tile, BuildingKind::Table)?; }
        "blueprint" => {
            let kind = BuildingKind::parse(&row.param)
                .ok_or_else(|| WorldError::Parse(format!("unknown building '{}'", row.param)))?;
            world.add_blueprint(tile, kind)?;
        }
        "weapon" => {
            if row.param.trim().is_empty() {
                return Err(WorldError::Parse("weapon row needs a def name".into()));
            }
            if !world.grid.in_bounds(row.x, row.y) {
                return Err(WorldError::OutOfBounds { x: row.x, y: row.y });
            }
            let pos = Vec2::tile_center(row.x, row.y);
            world.items.drop_item(ItemKind::Weapon(DefName::new(row.param.trim())), pos);
        }
        other => return Err(WorldError::Parse(format!("unknown layout kind '{other}'"))),
    }
    Ok(())
}
