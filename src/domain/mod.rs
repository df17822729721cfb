//! Domain layer - Core game model with no infrastructure dependencies
//!
//! This layer contains:
//! - Entities: Character, Party, Room
//! - Value Objects: identifiers, Damage/Heal effects
//! - Domain Events: combat lifecycle events
//! - Domain Services: leveling formulas

pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;
