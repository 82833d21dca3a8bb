//! Same-tick claim arbitration.
//!
//! Every seeker evaluates against the same claim table; proposals are then
//! granted nearest-first (distance, then `AgentId`).  A seeker whose item
//! went to someone nearer re-evaluates against what is left.  Each round
//! grants at least one claim or ends, so the loop is bounded by the number
//! of seekers.

use colony_core::{AgentId, ItemId, Vec2};
use colony_combat::WeaponCatalog;
use colony_world::FloorItems;
use tracing::debug;

use crate::value::{evaluate_upgrade, EquipConfig};
use crate::ClaimTable;

/// An agent looking for a weapon this tick.
#[derive(Clone, Debug)]
pub struct Seeker<'a> {
    pub agent:   AgentId,
    pub pos:     Vec2,
    pub current: Option<&'a colony_combat::WeaponDef>,
}

/// Grant claims to `seekers`; returns `(agent, item)` for each new claim in
/// grant order.
pub fn resolve_claims(
    seekers: &[Seeker<'_>],
    items: &FloorItems,
    catalog: &WeaponCatalog,
    claims: &mut ClaimTable,
    cfg: &EquipConfig,
) -> Vec<(AgentId, ItemId)> {
    let mut granted = Vec::new();
    let mut pending: Vec<&Seeker<'_>> = seekers.iter().filter(|s| claims.claim_of(s.agent).is_none()).collect();

    for _ in 0..seekers.len() {
        let mut proposals: Vec<(f32, AgentId, ItemId)> = pending
            .iter()
            .filter_map(|s| {
                evaluate_upgrade(s.agent, s.pos, s.current, items, catalog, claims, cfg)
                    .map(|c| (c.distance, s.agent, c.item))
            })
            .collect();
        if proposals.is_empty() {
            break;
        }
        proposals.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut losers = Vec::new();
        for (_, agent, item) in proposals {
            match claims.try_claim(item, agent) {
                Ok(()) => granted.push((agent, item)),
                Err(conflict) => {
                    debug!(%agent, %item, holder = %conflict.holder, "claim lost, re-evaluating");
                    losers.push(agent);
                }
            }
        }
        if losers.is_empty() {
            break;
        }
        pending.retain(|s| losers.contains(&s.agent));
    }
    granted
}
