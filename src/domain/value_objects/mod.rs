//! Value objects - Immutable objects defined by their attributes

mod effect;
mod ids;

pub use effect::{
    CharacterRef, Damage, Effect, EffectMetadata, EffectSource, Heal, HEALTH,
};
pub use ids::*;
