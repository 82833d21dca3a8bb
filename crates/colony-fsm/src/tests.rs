//! Unit tests for colony-fsm.

#[cfg(test)]
mod harness {
    use colony_agent::{AgentKind, AgentRngs, AgentSpawn, AgentStore, AgentStoreBuilder, StateId};
    use colony_combat::WeaponCatalog;
    use colony_core::{AgentId, DebugToggles};
    use colony_equip::ClaimTable;
    use colony_world::{NearestWork, World};

    use crate::{AgentFsm, Effects, FsmConfig, FsmCtx, FsmEvent, FsmResult};

    pub const DT: f32 = 0.1;

    /// A minimal sim: ticks agents in id order and applies queued damage.
    pub struct Harness {
        pub fsm:     AgentFsm,
        pub store:   AgentStore,
        pub rngs:    AgentRngs,
        pub world:   World,
        pub claims:  ClaimTable,
        pub catalog: WeaponCatalog,
        pub work:    NearestWork,
        pub toggles: DebugToggles,
        pub effects: Effects,
        pub events:  Vec<FsmEvent>,
        pub now:     f64,
    }

    impl Harness {
        pub fn new(world: World, spawns: Vec<AgentSpawn>) -> Self {
            let (store, rngs) = AgentStoreBuilder::new(7).spawn_all(spawns).build();
            Self {
                fsm: AgentFsm::new(FsmConfig::default()),
                store,
                rngs,
                world,
                claims: ClaimTable::new(),
                catalog: WeaponCatalog::standard(),
                work: NearestWork::default(),
                toggles: DebugToggles::default(),
                effects: Effects::new(),
                events: Vec::new(),
                now: 0.0,
            }
        }

        /// Run `f` with a context for `agent`.
        pub fn with_ctx<R>(&mut self, agent: AgentId, f: impl FnOnce(&AgentFsm, &mut FsmCtx<'_>) -> R) -> R {
            let mut ctx = FsmCtx {
                store:   &mut self.store,
                rng:     &mut self.rngs.inner[agent.index()],
                world:   &mut self.world,
                claims:  &mut self.claims,
                catalog: &self.catalog,
                work:    &self.work,
                intents: &self.fsm.intents,
                cfg:     &self.fsm.cfg,
                toggles: self.toggles,
                now:     self.now,
                dt:      DT,
                effects: &mut self.effects,
            };
            f(&self.fsm, &mut ctx)
        }

        pub fn tick_agent(&mut self, agent: AgentId) -> FsmResult<()> {
            self.with_ctx(agent, |fsm, ctx| fsm.tick(agent, ctx))
        }

        /// Tick only `agent`, then apply effects.
        pub fn tick_one(&mut self, agent: AgentId) {
            self.tick_agent(agent).unwrap();
            self.settle();
        }

        /// Tick every agent, then apply effects.
        pub fn step(&mut self) {
            let ids: Vec<AgentId> = self.store.agent_ids().collect();
            for agent in ids {
                self.tick_agent(agent).unwrap();
            }
            self.settle();
        }

        fn settle(&mut self) {
            for d in self.effects.damage.drain(..) {
                self.store.vitals[d.target.index()].damage(d.amount);
            }
            self.events.append(&mut self.effects.events);
            self.now += f64::from(DT);
        }

        pub fn state(&self, agent: AgentId) -> StateId {
            self.store.state(agent)
        }

        pub fn assert_declared(&self) {
            for agent in self.store.agent_ids() {
                let kind: AgentKind = self.store.kind[agent.index()];
                assert!(kind.declares(self.state(agent)), "{agent} in {}", self.state(agent));
            }
        }
    }
}

// ── State tables ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tables {
    use colony_agent::{AgentKind, AgentSpawn, HeldItem, StateId};
    use colony_core::{AgentId, DefName, ItemId, Vec2};
    use colony_world::World;

    use super::harness::Harness;
    use crate::{AgentFsm, FsmConfig, FsmError};

    #[test]
    fn tables_follow_declarations() {
        let fsm = AgentFsm::new(FsmConfig::default());
        for kind in [AgentKind::Colonist, AgentKind::Enemy] {
            let ids: Vec<StateId> = fsm.table(kind).iter().map(|d| d.id).collect();
            assert_eq!(ids.as_slice(), kind.declared_states());
        }
        let colonist: Vec<u8> = fsm.table(AgentKind::Colonist).priorities().map(|(_, p)| p).collect();
        assert_eq!(colonist, vec![100, 100, 99, 85, 65, 60, 45, 45, 42, 40, 25, 20, 15, 10]);
        let enemy: Vec<u8> = fsm.table(AgentKind::Enemy).priorities().map(|(_, p)| p).collect();
        assert_eq!(enemy, vec![100, 100, 80, 50, 12, 10]);
    }

    #[test]
    fn only_dead_is_uninterruptible_and_exemptions_are_the_emergencies() {
        let fsm = AgentFsm::new(FsmConfig::default());
        let table = fsm.table(AgentKind::Colonist);
        for def in table.iter() {
            assert_eq!(def.interruptible, def.id != StateId::Dead, "{}", def.id);
            let exempt = matches!(def.id, StateId::Dead | StateId::Flee | StateId::Drafted);
            assert_eq!(def.exempt.is_some(), exempt, "{}", def.id);
        }
    }

    #[test]
    fn unknown_agents_and_invariant_violations_are_fatal() {
        let mut h = Harness::new(World::new(10, 10), vec![AgentSpawn::enemy(Vec2::new(1.5, 1.5))]);
        let stray = AgentId(4);
        let err = h.with_ctx(AgentId(0), |fsm, ctx| fsm.tick(stray, ctx)).unwrap_err();
        assert_eq!(err, FsmError::UnknownAgent(stray));
        assert_eq!(err.to_string(), "agent AgentId(4) is not in the store");
        assert!(!err.is_recoverable());

        let violation = FsmError::InvariantViolation { agent: AgentId(0), kind: AgentKind::Enemy, state: StateId::Chop };
        assert!(!violation.is_recoverable());
        assert!(FsmError::Unreachable { ticks: 20 }.is_recoverable());
    }

    #[test]
    fn equal_priorities_break_by_declaration_order() {
        let armed = HeldItem { id: ItemId(0), def: DefName::from("pistol") };
        let mut h = Harness::new(World::new(10, 10), vec![
            AgentSpawn::colonist(Vec2::new(1.5, 1.5)).with_weapon(armed),
            AgentSpawn::colonist(Vec2::new(2.5, 1.5)),
        ]);
        let (armed, unarmed) = (AgentId(0), AgentId(1));

        h.with_ctx(armed, |fsm, ctx| {
            let t = fsm.table(AgentKind::Colonist);
            let dead = t.rank(StateId::Dead, armed, ctx).unwrap();
            let flee = t.rank(StateId::Flee, armed, ctx).unwrap();
            assert!(dead > flee);
            // Armed: equipment stays at 45 and beats build only on order.
            let equip = t.rank(StateId::Equipment, armed, ctx).unwrap();
            let build = t.rank(StateId::Build, armed, ctx).unwrap();
            assert_eq!(equip.priority, 45);
            assert!(equip > build);
        });
        h.with_ctx(unarmed, |fsm, ctx| {
            let t = fsm.table(AgentKind::Colonist);
            let equip = t.rank(StateId::Equipment, unarmed, ctx).unwrap();
            let sleep = t.rank(StateId::Sleep, unarmed, ctx).unwrap();
            assert_eq!(equip.priority, 75);
            assert!(equip > sleep);
            let ranked: Vec<StateId> = t.ranked(unarmed, ctx).iter().map(|(_, d)| d.id).collect();
            assert_eq!(&ranked[..4], &[StateId::Dead, StateId::Flee, StateId::Drafted, StateId::Combat]);
        });
    }
}

// ── Task lifecycle ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tasks {
    use colony_agent::{AgentSpawn, StateId};
    use colony_core::{AgentId, TargetId, TargetRef, Vec2};
    use colony_intent::IntentPhase;
    use colony_world::World;

    use super::harness::Harness;
    use crate::{FsmError, FsmEvent};

    const A: AgentId = AgentId(0);

    fn chopper() -> (Harness, TargetId) {
        let mut world = World::new(20, 20);
        let tree = world.add_tree((6, 5)).unwrap();
        (Harness::new(world, vec![AgentSpawn::colonist(Vec2::new(5.5, 5.5))]), tree)
    }

    fn phase(h: &Harness) -> Option<IntentPhase> {
        h.store.intent[A.index()].as_ref().map(|it| it.phase)
    }

    fn work_left(h: &Harness, tree: TargetId) -> f32 {
        h.world.sites.get(tree).unwrap().work_left
    }

    fn tick_until(h: &mut Harness, max: usize, mut done: impl FnMut(&Harness) -> bool) {
        for _ in 0..max {
            if done(h) {
                return;
            }
            h.tick_one(A);
        }
        assert!(done(h), "condition not reached in {max} ticks");
    }

    #[test]
    fn seek_task_picks_up_work() {
        let (mut h, tree) = chopper();
        h.tick_one(A);
        assert_eq!(h.state(A), StateId::Chop);
        assert_eq!(h.world.sites.get(tree).unwrap().reserved_by, Some(A));
        assert_eq!(h.store.intent[0].as_ref().unwrap().target, TargetRef::Site(tree));
    }

    #[test]
    fn colonist_without_work_keeps_seeking() {
        let mut h = Harness::new(World::new(20, 20), vec![AgentSpawn::colonist(Vec2::new(5.5, 5.5))]);
        for _ in 0..60 {
            h.tick_one(A);
            assert_eq!(h.state(A), StateId::SeekTask);
        }
    }

    #[test]
    fn no_work_accrues_before_commit() {
        let (mut h, tree) = chopper();
        let initial = work_left(&h, tree);
        tick_until(&mut h, 50, |h| phase(h) == Some(IntentPhase::Committed));
        // Committed this tick; the first deduction comes next tick.
        assert_eq!(work_left(&h, tree), initial);
        h.tick_one(A);
        assert!(work_left(&h, tree) < initial);
    }

    #[test]
    fn drafting_during_the_dwell_leaves_the_site_untouched() {
        let (mut h, tree) = chopper();
        let initial = work_left(&h, tree);
        tick_until(&mut h, 50, |h| phase(h) == Some(IntentPhase::Deciding));
        h.store.drafted[0] = true;
        h.tick_one(A);

        assert_eq!(h.state(A), StateId::Drafted);
        assert_eq!(work_left(&h, tree), initial);
        assert!(h.store.intent[0].is_none());
        assert_eq!(h.world.sites.get(tree).unwrap().reserved_by, None);
    }

    #[test]
    fn tree_is_felled_and_agent_returns_to_seek_task() {
        let (mut h, tree) = chopper();
        tick_until(&mut h, 200, |h| h.world.sites.get(tree).is_none());
        assert_eq!(h.state(A), StateId::SeekTask);
        assert_eq!(h.world.stockpile.wood, 10);
        assert!(h.events.iter().any(|e| matches!(e, FsmEvent::SiteCompleted { site, .. } if *site == tree)));
    }

    #[test]
    fn destroyed_target_recovers_within_the_tick() {
        let (mut h, tree) = chopper();
        tick_until(&mut h, 50, |h| phase(h) == Some(IntentPhase::Committed));
        h.world.sites.remove(tree);
        h.tick_one(A);

        assert_eq!(h.state(A), StateId::SeekTask);
        assert!(h.store.intent[0].is_none());
        assert!(h.events.iter().any(|e| matches!(
            e,
            FsmEvent::Recovered { state: StateId::Chop, error: FsmError::InvalidTarget(TargetRef::Site(t)), .. } if *t == tree
        )));
    }

    #[test]
    fn commanded_interrupt_exits_on_the_next_tick() {
        let (mut h, _) = chopper();
        tick_until(&mut h, 50, |h| phase(h) == Some(IntentPhase::Committed));
        assert!(h.with_ctx(A, |fsm, ctx| fsm.force_interrupt(A, ctx)).unwrap());
        assert_eq!(phase(&h), Some(IntentPhase::Interrupted));
        h.tick_one(A);
        assert_eq!(h.state(A), StateId::SeekTask);
    }

    #[test]
    fn stuck_move_falls_back_to_seek_task() {
        let mut world = World::new(20, 20);
        for y in 0..20 {
            world.add_mountain((10, y)).unwrap();
        }
        let mut h = Harness::new(world, vec![AgentSpawn::colonist(Vec2::new(5.5, 5.5))]);
        h.store.move_order[0] = Some(Vec2::new(15.5, 5.5));

        h.tick_one(A);
        assert_eq!(h.state(A), StateId::Move);
        tick_until(&mut h, 200, |h| h.state(A) != StateId::Move);

        assert_eq!(h.state(A), StateId::SeekTask);
        assert_eq!(h.store.move_order[0], None);
        assert!(h.events.iter().any(|e| matches!(e, FsmEvent::Recovered { error: FsmError::Unreachable { .. }, .. })));
        assert!(h.store.position[0].x < 10.0);
    }

    #[test]
    fn move_order_is_executed() {
        let mut h = Harness::new(World::new(20, 20), vec![AgentSpawn::colonist(Vec2::new(2.5, 2.5))]);
        h.store.move_order[0] = Some(Vec2::new(8.5, 2.5));
        tick_until(&mut h, 100, |h| h.store.move_order[0].is_none());
        assert!(h.store.position[0].distance(Vec2::new(8.5, 2.5)) <= 0.3);
        assert_ne!(h.state(A), StateId::Move);
    }

    #[test]
    fn tired_colonist_sleeps_on_the_ground_without_a_bed() {
        let mut h = Harness::new(World::new(20, 20), vec![AgentSpawn::colonist(Vec2::new(2.5, 2.5))]);
        h.store.vitals[0].fatigue = 80.0;
        h.tick_one(A);
        assert_eq!(h.state(A), StateId::Sleep);
        assert!(matches!(h.store.intent[0].as_ref().unwrap().target, TargetRef::Spot(_)));
        tick_until(&mut h, 600, |h| h.state(A) != StateId::Sleep);
        assert!(h.store.vitals[0].fatigue <= h.fsm.cfg.wake_fatigue);
    }

    #[test]
    fn hungry_colonist_eats_a_meal() {
        let mut world = World::new(20, 20);
        world.place_building((5, 2), colony_world::BuildingKind::Table).unwrap();
        world.stockpile.meals = 2;
        let mut h = Harness::new(world, vec![AgentSpawn::colonist(Vec2::new(2.5, 2.5))]);
        h.store.vitals[0].hunger = 80.0;
        h.tick_one(A);
        assert_eq!(h.state(A), StateId::Eat);
        tick_until(&mut h, 200, |h| h.state(A) != StateId::Eat);
        assert_eq!(h.world.stockpile.meals, 1);
        assert!(h.store.vitals[0].hunger < 30.0);
    }

    #[test]
    fn starvation_drains_health() {
        let mut h = Harness::new(World::new(20, 20), vec![AgentSpawn::colonist(Vec2::new(2.5, 2.5))]);
        h.store.vitals[0].hunger = 100.0;
        h.tick_one(A);
        assert!(h.store.vitals[0].health < 100.0);
    }
}

// ── Preemption and interruption rules ─────────────────────────────────────────

#[cfg(test)]
mod preemption {
    use colony_agent::{AgentSpawn, HeldItem, StateId};
    use colony_core::{AgentId, DefName, ItemId, Vec2};
    use colony_intent::{IntentPhase, InterruptReason};
    use colony_world::{BuildingKind, World};

    use super::harness::Harness;
    use crate::{FsmError, FsmEvent, ForceOutcome};

    const COLONIST: AgentId = AgentId(0);
    const RAIDER: AgentId = AgentId(1);

    /// An armed, hungry colonist next to a table, a raider far away.
    fn dinner() -> Harness {
        let mut world = World::new(40, 20);
        world.place_building((3, 2), BuildingKind::Table).unwrap();
        world.stockpile.meals = 3;
        let rifle = HeldItem { id: ItemId(100), def: DefName::from("rifle") };
        let mut h = Harness::new(world, vec![
            AgentSpawn::colonist(Vec2::new(2.5, 2.5)).with_weapon(rifle),
            AgentSpawn::enemy(Vec2::new(38.5, 18.5)),
        ]);
        h.store.vitals[0].hunger = 90.0;
        h.tick_one(COLONIST);
        assert_eq!(h.state(COLONIST), StateId::Eat);
        h
    }

    #[test]
    fn non_cancellable_eat_refuses_combat_but_yields_to_drafting() {
        let mut h = dinner();
        // Raider walks into rifle range: combat outranks eat but may not
        // cancel it.
        h.store.position[RAIDER.index()] = Vec2::new(12.5, 2.5);
        h.tick_one(COLONIST);
        assert_eq!(h.state(COLONIST), StateId::Eat);
        assert!(!h.store.intent[0].as_ref().unwrap().permits(InterruptReason::CompetingTask));

        h.store.drafted[0] = true;
        h.tick_one(COLONIST);
        assert_eq!(h.state(COLONIST), StateId::Drafted);
        assert!(h.events.iter().any(|e| matches!(
            e,
            FsmEvent::StateChanged { from: StateId::Eat, to: StateId::Drafted, .. }
        )));
    }

    #[test]
    fn cancellable_task_yields_to_combat() {
        let mut world = World::new(40, 20);
        world.add_tree((3, 2)).unwrap();
        let pistol = HeldItem { id: ItemId(100), def: DefName::from("pistol") };
        let mut h = Harness::new(world, vec![
            AgentSpawn::colonist(Vec2::new(2.5, 2.5)).with_weapon(pistol),
            AgentSpawn::enemy(Vec2::new(38.5, 18.5)),
        ]);
        h.tick_one(COLONIST);
        assert_eq!(h.state(COLONIST), StateId::Chop);
        h.store.position[RAIDER.index()] = Vec2::new(12.5, 2.5);
        h.tick_one(COLONIST);
        assert_eq!(h.state(COLONIST), StateId::Combat);
    }

    #[test]
    fn wounded_colonist_flees_from_any_state() {
        let mut h = dinner();
        h.store.position[RAIDER.index()] = Vec2::new(8.5, 2.5);
        h.store.vitals[0].health = 10.0;
        h.tick_one(COLONIST);
        assert_eq!(h.state(COLONIST), StateId::Flee);
        let before = h.store.position[0].distance(h.store.position[1]);
        for _ in 0..10 {
            h.tick_one(COLONIST);
        }
        assert!(h.store.position[0].distance(h.store.position[1]) >= before);
    }

    #[test]
    fn forced_states_follow_the_same_rules() {
        let mut h = dinner();
        let force = |h: &mut Harness, s: StateId| h.with_ctx(COLONIST, |fsm, ctx| fsm.force_state(COLONIST, s, ctx));

        assert_eq!(force(&mut h, StateId::Attack).unwrap(), ForceOutcome::Undeclared);
        assert_eq!(force(&mut h, StateId::Idle).unwrap(), ForceOutcome::Outranked);
        assert_eq!(force(&mut h, StateId::Combat).unwrap(), ForceOutcome::NotInterruptible);
        assert_eq!(h.state(COLONIST), StateId::Eat);
        assert_eq!(force(&mut h, StateId::Drafted).unwrap(), ForceOutcome::Applied);
        assert_eq!(h.state(COLONIST), StateId::Drafted);
    }

    #[test]
    fn forced_state_that_cannot_start_falls_back() {
        let mut h = Harness::new(World::new(20, 20), vec![AgentSpawn::colonist(Vec2::new(2.5, 2.5))]);
        let err = h
            .with_ctx(COLONIST, |fsm, ctx| fsm.force_state(COLONIST, StateId::Eat, ctx))
            .unwrap_err();
        assert_eq!(err, FsmError::NoTarget(StateId::Eat));
        assert_eq!(h.state(COLONIST), StateId::SeekTask);
    }

    #[test]
    fn death_is_terminal_and_drops_the_weapon() {
        let mut h = dinner();
        h.store.vitals[0].health = 0.0;
        h.tick_one(COLONIST);
        assert_eq!(h.state(COLONIST), StateId::Dead);
        assert!(h.store.inventory[0].equipped_weapon().is_none());
        let dropped: Vec<_> = h.world.items.iter().filter_map(|it| it.kind.weapon_def().cloned()).collect();
        assert_eq!(dropped, vec![DefName::from("rifle")]);
        assert!(h.events.iter().any(|e| matches!(e, FsmEvent::Died { agent } if *agent == COLONIST)));

        h.store.drafted[0] = true;
        h.tick_one(COLONIST);
        assert_eq!(h.state(COLONIST), StateId::Dead);
        let forced = h.with_ctx(COLONIST, |fsm, ctx| fsm.force_state(COLONIST, StateId::Drafted, ctx));
        assert_eq!(forced.unwrap(), ForceOutcome::Outranked);
    }

    #[test]
    fn interrupted_intent_is_never_resumed() {
        let mut h = dinner();
        let intents = h.fsm.intents.clone();
        let rec = h.store.intent[0].as_mut().unwrap();
        assert!(intents.force_interrupt(rec, InterruptReason::Drafted));
        assert_eq!(rec.phase, IntentPhase::Interrupted);
        h.tick_one(COLONIST);
        assert_eq!(h.state(COLONIST), StateId::SeekTask);
        assert!(h.store.intent[0].is_none());
    }
}

// ── Equipment ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod equipment {
    use colony_agent::{AgentSpawn, StateId};
    use colony_core::{AgentId, DefName, Vec2};
    use colony_intent::IntentPhase;
    use colony_world::{ItemKind, World};

    use super::harness::Harness;
    use crate::FsmEvent;

    const A: AgentId = AgentId(0);

    #[test]
    fn claimed_weapon_is_walked_to_picked_up_and_equipped() {
        let mut world = World::new(20, 20);
        let shotgun = world.items.drop_item(ItemKind::Weapon(DefName::from("shotgun")), Vec2::new(9.5, 5.5));
        let mut h = Harness::new(world, vec![AgentSpawn::colonist(Vec2::new(5.5, 5.5))]);
        h.claims.try_claim(shotgun, A).unwrap();

        let mut phases: Vec<IntentPhase> = Vec::new();
        for _ in 0..100 {
            h.tick_one(A);
            if let Some(p) = h.store.intent[0].as_ref().map(|it| it.phase) {
                if phases.last() != Some(&p) {
                    phases.push(p);
                }
            }
            if h.store.inventory[0].equipped_weapon().is_some() {
                break;
            }
        }

        assert_eq!(phases, vec![IntentPhase::Moving, IntentPhase::Deciding, IntentPhase::Committed]);
        let held = h.store.inventory[0].equipped_weapon().unwrap();
        assert_eq!(held.id, shotgun);
        assert_eq!(h.catalog.get(&held.def).unwrap().damage, 18.0);
        assert_eq!(h.state(A), StateId::SeekTask);
        assert!(h.world.items.is_empty());
        assert!(h.claims.is_empty());
        assert!(h.events.iter().any(|e| matches!(e, FsmEvent::Equipped { item, dropped: None, .. } if *item == shotgun)));
    }

    #[test]
    fn vanished_weapon_sends_the_agent_back() {
        let mut world = World::new(20, 20);
        let club = world.items.drop_item(ItemKind::Weapon(DefName::from("club")), Vec2::new(9.5, 5.5));
        let mut h = Harness::new(world, vec![AgentSpawn::colonist(Vec2::new(5.5, 5.5))]);
        h.claims.try_claim(club, A).unwrap();
        h.tick_one(A);
        assert_eq!(h.state(A), StateId::Equipment);

        h.world.items.remove_item(club).unwrap();
        h.tick_one(A);
        assert_eq!(h.state(A), StateId::SeekTask);
        assert!(h.claims.is_empty());
    }
}

// ── Raiders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod raiders {
    use colony_agent::{AgentSpawn, StateId};
    use colony_core::{AgentId, Vec2};
    use colony_world::World;

    use super::harness::Harness;
    use crate::FsmEvent;

    const RAIDER: AgentId = AgentId(1);

    #[test]
    fn raider_hunts_then_attacks() {
        let mut h = Harness::new(World::new(40, 20), vec![
            AgentSpawn::colonist(Vec2::new(5.5, 5.5)),
            AgentSpawn::enemy(Vec2::new(20.5, 5.5)),
        ]);
        h.tick_one(RAIDER);
        assert_eq!(h.state(RAIDER), StateId::Hunt);
        for _ in 0..300 {
            if h.state(RAIDER) == StateId::Attack {
                break;
            }
            h.tick_one(RAIDER);
        }
        assert_eq!(h.state(RAIDER), StateId::Attack);
        assert!(h.store.position[1].distance(h.store.position[0]) <= 1.5);
    }

    #[test]
    fn raider_without_prey_wanders() {
        let mut h = Harness::new(World::new(40, 20), vec![AgentSpawn::enemy(Vec2::new(20.5, 10.5))]);
        let start = h.store.position[0];
        for _ in 0..100 {
            h.tick_one(AgentId(0));
            assert_eq!(h.state(AgentId(0)), StateId::Wander);
        }
        assert_ne!(h.store.position[0], start);
    }

    #[test]
    fn raider_gives_up_on_a_walled_in_colonist_who_keeps_moving() {
        let mut world = World::new(40, 20);
        for y in 4..=10 {
            for x in 4..=10 {
                if x == 4 || x == 10 || y == 4 || y == 10 {
                    world.add_mountain((x, y)).unwrap();
                }
            }
        }
        let mut h = Harness::new(world, vec![
            AgentSpawn::colonist(Vec2::new(5.5, 7.5)),
            AgentSpawn::enemy(Vec2::new(20.5, 7.5)),
        ]);
        let pacing = (0..12).map(|k| 5.5 + 0.25 * k as f32).chain((0..12).map(|k| 8.5 - 0.25 * k as f32));
        let mut hunted = false;
        for x in pacing.cycle().take(400) {
            h.store.position[0] = Vec2::new(x, 7.5);
            h.tick_one(RAIDER);
            match h.state(RAIDER) {
                StateId::Hunt => hunted = true,
                StateId::Wander if hunted => break,
                _ => {}
            }
        }
        assert!(hunted);
        assert_eq!(h.state(RAIDER), StateId::Wander);
        assert!(h.store.position[1].x > 10.0);
    }

    #[test]
    fn wounded_raider_runs_for_the_edge() {
        let mut h = Harness::new(World::new(40, 20), vec![
            AgentSpawn::colonist(Vec2::new(5.5, 5.5)),
            AgentSpawn::enemy(Vec2::new(20.5, 3.5)),
        ]);
        h.store.vitals[1].health = 10.0;
        for _ in 0..100 {
            h.tick_one(RAIDER);
        }
        assert_eq!(h.state(RAIDER), StateId::Flee);
        assert!(h.store.position[1].y <= 0.6);
    }

    #[test]
    fn skirmish_never_leaves_declared_states() {
        let mut h = Harness::new(World::new(30, 30), vec![
            AgentSpawn::colonist(Vec2::new(5.5, 5.5)),
            AgentSpawn::colonist(Vec2::new(6.5, 5.5)),
            AgentSpawn::enemy(Vec2::new(12.5, 6.5)),
            AgentSpawn::enemy(Vec2::new(13.5, 7.5)),
        ]);
        for _ in 0..1500 {
            h.step();
            h.assert_declared();
        }
        assert!(h.events.iter().any(|e| matches!(e, FsmEvent::Shot { .. })));
        assert!(h.store.agent_ids().all(|a| h.state(a) != StateId::Dead || h.store.vitals[a.index()].is_dead()));
    }
}
