//! Unit tests for colony-agent.

#[cfg(test)]
mod states {
    use crate::{AgentKind, StateId};

    #[test]
    fn colonist_declaration_order_is_priority_table_order() {
        let states = AgentKind::Colonist.declared_states();
        assert_eq!(states.len(), 14);
        assert_eq!(states[0], StateId::Dead);
        assert_eq!(states[12], StateId::SeekTask);
        assert_eq!(AgentKind::Colonist.declaration_index(StateId::Chop), Some(9));
    }

    #[test]
    fn enemies_do_not_declare_work_states() {
        for s in [StateId::Chop, StateId::Mine, StateId::Build, StateId::Drafted, StateId::Equipment] {
            assert!(!AgentKind::Enemy.declares(s), "{s}");
        }
        assert!(AgentKind::Enemy.declares(StateId::Hunt));
        assert!(!AgentKind::Colonist.declares(StateId::Hunt));
    }

    #[test]
    fn parse_round_trips_names() {
        assert_eq!(StateId::parse("seek_task"), Some(StateId::SeekTask));
        assert_eq!(StateId::parse(" Drafted "), Some(StateId::Drafted));
        assert_eq!(StateId::parse("SeekTask"), Some(StateId::SeekTask));
        assert_eq!(StateId::parse("dance"), None);
    }
}

#[cfg(test)]
mod vitals {
    use crate::Vitals;

    #[test]
    fn damage_floors_at_zero() {
        let mut v = Vitals::new(50.0);
        v.damage(80.0);
        assert_eq!(v.health, 0.0);
        assert!(v.is_dead());
        v.heal_full();
        assert_eq!(v.health_fraction(), 1.0);
    }

    #[test]
    fn needs_are_clamped() {
        let mut v = Vitals::default();
        v.add_needs(150.0, -5.0);
        assert_eq!(v.hunger, Vitals::NEED_MAX);
        assert_eq!(v.fatigue, 0.0);
    }
}

#[cfg(test)]
mod inventory {
    use colony_core::ItemId;

    use crate::{HeldItem, Inventory, Slot};

    #[test]
    fn equip_returns_previous_weapon() {
        let mut inv = Inventory::default();
        assert!(inv.equip(HeldItem { id: ItemId(1), def: "club".into() }).is_none());
        let old = inv.equip(HeldItem { id: ItemId(2), def: "rifle".into() }).unwrap();
        assert_eq!(old.id, ItemId(1));
        assert_eq!(inv.equipped_weapon().unwrap().def.as_str(), "rifle");
        assert!(inv.take(Slot::Weapon).is_some());
        assert!(inv.equipped_weapon().is_none());
    }
}

#[cfg(test)]
mod store {
    use colony_core::{AgentId, ItemId, Vec2};

    use crate::{AgentError, AgentKind, AgentSpawn, AgentStoreBuilder, HeldItem, StateId};

    fn two_agents() -> (crate::AgentStore, crate::AgentRngs) {
        AgentStoreBuilder::new(7)
            .spawn(AgentSpawn::colonist(Vec2::new(1.0, 1.0)))
            .spawn(AgentSpawn::enemy(Vec2::new(9.0, 1.0)))
            .build()
    }

    #[test]
    fn builder_assigns_ids_and_initial_states() {
        let (store, rngs) = two_agents();
        assert_eq!(store.count, 2);
        assert_eq!(rngs.len(), 2);
        assert_eq!(store.state(AgentId(0)), StateId::SeekTask);
        assert_eq!(store.state(AgentId(1)), StateId::Wander);
        assert_eq!(store.kind[1], AgentKind::Enemy);
    }

    #[test]
    fn set_state_rejects_undeclared_states() {
        let (mut store, _) = two_agents();
        let err = store.set_state(AgentId(1), StateId::Chop, 1.0).unwrap_err();
        assert_eq!(
            err,
            AgentError::UndeclaredState { agent: AgentId(1), kind: AgentKind::Enemy, state: StateId::Chop }
        );
        assert_eq!(store.state(AgentId(1)), StateId::Wander);
    }

    #[test]
    fn set_state_resets_scratch_and_entry_time() {
        let (mut store, _) = two_agents();
        let a = AgentId(0);
        store.scratch[0].timer = 3.0;
        store.set_state(a, StateId::Eat, 4.0).unwrap();
        assert_eq!(store.scratch[0].timer, 0.0);
        assert_eq!(store.time_in_state(a, 6.5), 2.5);
    }

    #[test]
    fn unknown_agent_is_an_error() {
        let (mut store, _) = two_agents();
        assert_eq!(store.set_state(AgentId(5), StateId::Idle, 0.0), Err(AgentError::UnknownAgent(AgentId(5))));
        assert!(store.snapshot(AgentId(5)).is_err());
    }

    #[test]
    fn push_extends_every_column() {
        let (mut store, mut rngs) = two_agents();
        let id = store.push(AgentSpawn::enemy(Vec2::new(20.0, 20.0)).at_time(12.0));
        rngs.push(id);
        assert_eq!(id, AgentId(2));
        assert_eq!(store.count, 3);
        assert_eq!(store.vitals.len(), 3);
        assert_eq!(store.movement.len(), 3);
        assert_eq!(rngs.len(), 3);
        assert_eq!(store.state_entered_secs[2], 12.0);
    }

    #[test]
    fn nearest_living_skips_the_dead() {
        let (mut store, _) = AgentStoreBuilder::new(1)
            .spawn(AgentSpawn::colonist(Vec2::new(0.0, 0.0)))
            .spawn(AgentSpawn::enemy(Vec2::new(2.0, 0.0)))
            .spawn(AgentSpawn::enemy(Vec2::new(5.0, 0.0)))
            .build();
        let from = store.position[0];
        assert_eq!(store.nearest_living(AgentKind::Enemy, from, 10.0, None).map(|x| x.0), Some(AgentId(1)));
        store.vitals[1].damage(1000.0);
        assert_eq!(store.nearest_living(AgentKind::Enemy, from, 10.0, None).map(|x| x.0), Some(AgentId(2)));
        assert!(store.nearest_living(AgentKind::Enemy, from, 4.0, None).is_none());
    }

    #[test]
    fn snapshot_reports_weapon_and_state() {
        let (store, _) = AgentStoreBuilder::new(1)
            .spawn(AgentSpawn::colonist(Vec2::new(3.0, 4.0)).with_weapon(HeldItem { id: ItemId(9), def: "rifle".into() }))
            .build();
        let snap = store.snapshot(AgentId(0)).unwrap();
        assert_eq!(snap.state, StateId::SeekTask);
        assert_eq!(snap.equipped_weapon, Some(ItemId(9)));
        assert_eq!(snap.weapon_def.unwrap().as_str(), "rifle");
        assert!(!snap.is_aiming);
        assert!(snap.intent_phase.is_none());
    }
}
