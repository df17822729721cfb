//! Stand-in combat engine
//!
//! Used when the server runs without a combat engine attached: nobody
//! regenerates and no round ever produces an action, so ticks stay silent.

use tracing::trace;

use crate::application::ports::outbound::{CombatEnginePort, CombatError};
use crate::domain::value_objects::CharacterId;

#[derive(Debug, Default)]
pub struct DetachedCombatEngine;

impl CombatEnginePort for DetachedCombatEngine {
    fn start_regeneration(&self, actor: CharacterId) -> Result<(), CombatError> {
        trace!(actor = %actor, "No engine attached, skipping regeneration");
        Ok(())
    }

    fn update_round(&self, _actor: CharacterId) -> Result<bool, CombatError> {
        Ok(false)
    }
}
