//! Unit tests for colony-intent.

#[cfg(test)]
mod lifecycle {
    use colony_core::{TargetId, TargetRef, TaskKind};

    use crate::{IntentController, IntentPhase, IntentTick};

    fn chop() -> (IntentController, crate::IntentRecord) {
        let ctl = IntentController::default();
        let intent = ctl.begin_default(TargetRef::Site(TargetId(1)), TaskKind::Chop);
        (ctl, intent)
    }

    #[test]
    fn moving_deciding_committed() {
        let (ctl, mut it) = chop();
        assert_eq!(it.phase, IntentPhase::Moving);
        assert_eq!(ctl.tick(&mut it, 5.0, 0.1), IntentTick::Moving);
        assert_eq!(ctl.tick(&mut it, 1.2, 0.125), IntentTick::Arrived);
        assert_eq!(it.phase, IntentPhase::Deciding);
        for _ in 0..3 {
            assert_eq!(ctl.tick(&mut it, 1.2, 0.125), IntentTick::Deciding);
        }
        assert!(ctl.commit(&mut it).is_err());
        assert_eq!(ctl.tick(&mut it, 1.2, 0.125), IntentTick::DwellComplete);
        ctl.commit(&mut it).unwrap();
        assert_eq!(it.phase, IntentPhase::Committed);
        assert_eq!(ctl.tick(&mut it, 1.2, 0.1), IntentTick::Committed);
    }

    #[test]
    fn proximity_never_commits() {
        let (ctl, mut it) = chop();
        for _ in 0..100 {
            ctl.tick(&mut it, 0.0, 0.1);
        }
        assert_eq!(it.phase, IntentPhase::Deciding);
    }

    #[test]
    fn leaving_radius_resets_dwell() {
        let (ctl, mut it) = chop();
        ctl.tick(&mut it, 1.0, 0.1);
        ctl.tick(&mut it, 1.0, 0.3);
        assert_eq!(ctl.tick(&mut it, 3.0, 0.1), IntentTick::LeftRadius);
        assert_eq!(it.phase, IntentPhase::Moving);
        assert_eq!(it.decision_elapsed, 0.0);
    }

    #[test]
    fn no_work_unless_committed() {
        let (ctl, mut it) = chop();
        // Passing through the radius without dwelling.
        for d in [4.0, 2.0, 1.0, 0.5, 1.0, 2.0, 4.0] {
            ctl.tick(&mut it, d, 0.1);
            assert_eq!(ctl.work_progress(&it, 10.0, 0.1, 1.0), 0.0);
        }
        ctl.tick(&mut it, 1.0, 0.1);
        ctl.tick(&mut it, 1.0, 0.5);
        ctl.commit(&mut it).unwrap();
        assert!((ctl.work_progress(&it, 10.0, 0.1, 1.5) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn dwell_override_per_task() {
        let mut ctl = IntentController::default();
        ctl.config.dwell_overrides.insert(TaskKind::Build, 1.25);
        let it = ctl.begin_default(TargetRef::Site(TargetId(0)), TaskKind::Build);
        assert_eq!(it.dwell_secs, 1.25);
        let it = ctl.begin_default(TargetRef::Site(TargetId(0)), TaskKind::Mine);
        assert_eq!(it.dwell_secs, 0.5);
    }
}

#[cfg(test)]
mod interrupts {
    use colony_core::{ItemId, TargetRef, TaskKind};

    use crate::{IntentController, IntentPhase, IntentTick, InterruptReason};

    #[test]
    fn drafting_ignores_cancel_policy() {
        let ctl = IntentController::default();
        let mut it = ctl.begin_task(TargetRef::Item(ItemId(3)), TaskKind::Equip, false);
        assert!(ctl.force_interrupt(&mut it, InterruptReason::Drafted));
        assert_eq!(it.phase, IntentPhase::Interrupted);
        assert_eq!(it.interrupt_reason, Some(InterruptReason::Drafted));
        assert_eq!(ctl.tick(&mut it, 0.0, 0.1), IntentTick::Interrupted);
    }

    #[test]
    fn competing_task_respects_cancel_policy() {
        let ctl = IntentController::default();
        let mut locked = ctl.begin_task(TargetRef::Item(ItemId(3)), TaskKind::Equip, false);
        assert!(!ctl.force_interrupt(&mut locked, InterruptReason::CompetingTask));
        assert!(!ctl.force_interrupt(&mut locked, InterruptReason::Command));
        assert_eq!(locked.phase, IntentPhase::Moving);

        let mut open = ctl.begin_task(TargetRef::Item(ItemId(3)), TaskKind::Chop, true);
        assert!(ctl.force_interrupt(&mut open, InterruptReason::CompetingTask));
    }

    #[test]
    fn exempt_reasons() {
        assert!(InterruptReason::Death.is_exempt());
        assert!(InterruptReason::Flee.is_exempt());
        assert!(!InterruptReason::Command.is_exempt());
    }

    #[test]
    fn default_cancel_policies() {
        let ctl = IntentController::default();
        assert!(!ctl.config.cancel_policy(TaskKind::Eat));
        assert!(!ctl.config.cancel_policy(TaskKind::Equip));
        assert!(ctl.config.cancel_policy(TaskKind::Sleep));
    }
}
