//! Unit tests for colony-world.

#[cfg(test)]
mod terrain {
    use crate::{BuildingKind, TerrainQuery, Tile, TileGrid};

    #[test]
    fn mountains_buildings_and_edges_block() {
        let mut g = TileGrid::new(4, 4);
        g.set_tile(1, 1, Tile::Mountain).unwrap();
        g.set_building(2, 2, BuildingKind::Bed).unwrap();
        assert!(g.is_passable(0, 0));
        assert!(!g.is_passable(1, 1));
        assert!(g.is_mountain(1, 1));
        assert!(!g.is_passable(2, 2));
        assert_eq!(g.building_at(2, 2), Some(BuildingKind::Bed));
        assert!(!g.is_passable(-1, 0));
        assert!(!g.is_passable(4, 0));
    }

    #[test]
    fn set_out_of_bounds_errors() {
        let mut g = TileGrid::new(2, 2);
        assert!(g.set_tile(5, 5, Tile::Mountain).is_err());
    }
}

#[cfg(test)]
mod obstacles {
    use colony_core::Vec2;

    use crate::{CoverKind, ObstacleIndex, ObstacleShape};

    #[test]
    fn fixed_cover_fractions() {
        assert_eq!(CoverKind::Wall.cover_fraction(), 0.75);
        assert_eq!(CoverKind::StoneChunk.cover_fraction(), 0.50);
        assert_eq!(CoverKind::Tree.cover_fraction(), 0.30);
    }

    #[test]
    fn region_queries_and_removal() {
        let mut idx = ObstacleIndex::new();
        let near = idx.insert(
            CoverKind::Tree,
            ObstacleShape::Circle { center: Vec2::new(2.0, 2.0), radius: 0.4 },
        );
        let far = idx.insert(
            CoverKind::StoneChunk,
            ObstacleShape::Circle { center: Vec2::new(40.0, 40.0), radius: 0.4 },
        );
        let hits: Vec<_> = idx.within_radius(Vec2::new(0.0, 0.0), 5.0).iter().map(|o| o.id).collect();
        assert_eq!(hits, vec![near]);

        assert!(idx.remove(near).is_some());
        assert!(idx.within_radius(Vec2::new(0.0, 0.0), 5.0).is_empty());
        assert!(idx.get(far).is_some());
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn segment_query_finds_wall() {
        let idx = ObstacleIndex::bulk(vec![(
            CoverKind::Wall,
            ObstacleShape::Segment { a: Vec2::new(5.0, 0.0), b: Vec2::new(5.0, 10.0) },
        )]);
        assert_eq!(idx.near_segment(Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0), 0.0).len(), 1);
        assert!(idx.near_segment(Vec2::new(0.0, 20.0), Vec2::new(3.0, 20.0), 0.0).is_empty());
    }
}

#[cfg(test)]
mod items {
    use colony_core::{DefName, Vec2};

    use crate::{FloorItems, ItemKind};

    fn rifle() -> ItemKind {
        ItemKind::Weapon(DefName::from("rifle"))
    }

    #[test]
    fn nearby_sorted_by_distance_then_id() {
        let mut items = FloorItems::new();
        let far = items.drop_item(rifle(), Vec2::new(5.0, 0.0));
        let a = items.drop_item(rifle(), Vec2::new(1.0, 0.0));
        let b = items.drop_item(rifle(), Vec2::new(-1.0, 0.0));
        let found: Vec<_> = items.nearby_items(Vec2::ZERO, 10.0, |_| true).iter().map(|i| i.id).collect();
        assert_eq!(found, vec![a, b, far]);
        assert_eq!(items.nearby_items(Vec2::ZERO, 2.0, |_| true).len(), 2);
    }

    #[test]
    fn remove_then_lookup_fails() {
        let mut items = FloorItems::new();
        let id = items.drop_item(rifle(), Vec2::ZERO);
        assert!(items.remove_item(id).is_ok());
        assert!(items.remove_item(id).is_err());
        assert!(!items.contains(id));
    }

    #[test]
    fn minted_ids_never_collide() {
        let mut items = FloorItems::new();
        let held = items.mint_id();
        let dropped = items.drop_item(rifle(), Vec2::ZERO);
        assert_ne!(held, dropped);
    }
}

#[cfg(test)]
mod sites {
    use colony_core::{AgentId, DebugToggles, TaskKind, Vec2};

    use crate::{BuildingKind, NearestWork, SiteCompletion, TerrainQuery, WorkProvider, World};

    #[test]
    fn reservation_is_exclusive() {
        let mut w = World::new(10, 10);
        let tree = w.add_tree((3, 3)).unwrap();
        w.sites.reserve(tree, AgentId(0)).unwrap();
        assert!(w.sites.reserve(tree, AgentId(1)).is_err());
        w.sites.reserve(tree, AgentId(0)).unwrap();
        w.sites.release_all_for(AgentId(0));
        assert!(w.sites.reserve(tree, AgentId(1)).is_ok());
    }

    #[test]
    fn chopping_a_tree_removes_cover_and_site() {
        let mut w = World::new(10, 10);
        let tree = w.add_tree((3, 3)).unwrap();
        assert_eq!(w.obstacles.len(), 1);
        let out = w.complete_site(tree, DebugToggles::default()).unwrap();
        assert_eq!(out, SiteCompletion::TreeFelled { wood: 10 });
        assert!(w.obstacles.is_empty());
        assert!(w.site_position(tree).is_none());
        assert_eq!(w.stockpile.wood, 10);
    }

    #[test]
    fn mining_leaves_a_stone_chunk() {
        let mut w = World::new(10, 10);
        let rock = w.add_rock((4, 4)).unwrap();
        assert!(!w.is_passable(4, 4));
        w.complete_site(rock, DebugToggles::default()).unwrap();
        assert!(w.is_passable(4, 4));
        assert_eq!(w.obstacles.len(), 1);
        assert_eq!(w.stockpile.stone, 8);
    }

    #[test]
    fn building_spends_unless_unlimited() {
        let mut w = World::new(10, 10);
        let bp = w.add_blueprint((2, 2), BuildingKind::Wall).unwrap();
        assert!(w.complete_site(bp, DebugToggles::default()).is_err());
        assert!(w.sites.contains(bp));

        let unlimited = DebugToggles { unlimited_resources: true, ..Default::default() };
        assert_eq!(w.complete_site(bp, unlimited).unwrap(), SiteCompletion::Built(BuildingKind::Wall));
        assert_eq!(w.building_at(2, 2), Some(BuildingKind::Wall));
        assert_eq!(w.obstacles.len(), 1);
    }

    #[test]
    fn nearest_work_prefers_build_then_distance() {
        let mut w = World::new(20, 20);
        w.stockpile.wood = 100;
        let near_tree = w.add_tree((1, 1)).unwrap();
        let _far_tree = w.add_tree((10, 10)).unwrap();
        let provider = NearestWork::default();
        let toggles = DebugToggles::default();

        let task = provider.find_task_for(AgentId(0), Vec2::ZERO, &w, toggles).unwrap();
        assert_eq!(task.task, TaskKind::Chop);
        assert_eq!(task.target, colony_core::TargetRef::Site(near_tree));

        let bed = w.add_blueprint((15, 15), BuildingKind::Bed).unwrap();
        let task = provider.find_task_for(AgentId(0), Vec2::ZERO, &w, toggles).unwrap();
        assert_eq!(task.task, TaskKind::Build);
        assert_eq!(task.target, colony_core::TargetRef::Site(bed));
        assert_eq!(task.priority, 45);
    }

    #[test]
    fn reserved_sites_are_skipped() {
        let mut w = World::new(20, 20);
        let tree = w.add_tree((1, 1)).unwrap();
        w.sites.reserve(tree, AgentId(9)).unwrap();
        let provider = NearestWork::default();
        assert!(provider.find_task_for(AgentId(0), Vec2::ZERO, &w, DebugToggles::default()).is_none());
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{load_layout_reader, BuildingKind, TerrainQuery, WorldError};

    #[test]
    fn loads_every_kind() {
        let csv = "kind,x,y,param\n\
                   mountain,0,0,\n\
                   rock,1,0,\n\
                   tree,5,5,\n\
                   wall,8,3,\n\
                   bed,10,10,\n\
                   blueprint,9,3,table\n\
                   weapon,6,6,rifle\n\
                   chunk,7,2,\n";
        let w = load_layout_reader(Cursor::new(csv), 16, 16).unwrap();
        assert!(w.is_mountain(0, 0));
        assert!(w.is_mountain(1, 0));
        assert_eq!(w.building_at(8, 3), Some(BuildingKind::Wall));
        assert_eq!(w.items.len(), 1);
        // tree, wall, chunk
        assert_eq!(w.obstacles.len(), 3);
        // rock, tree, bed, blueprint
        assert_eq!(w.sites.len(), 4);
    }

    #[test]
    fn unknown_kind_is_parse_error() {
        let csv = "kind,x,y,param\ncastle,1,1,\n";
        assert!(matches!(load_layout_reader(Cursor::new(csv), 4, 4), Err(WorldError::Parse(_))));
    }

    #[test]
    fn out_of_bounds_rejected() {
        let csv = "kind,x,y,param\ntree,50,1,\n";
        assert!(matches!(
            load_layout_reader(Cursor::new(csv), 4, 4),
            Err(WorldError::OutOfBounds { x: 50, y: 1 })
        ));
    }
}
