//! Outbound ports - Interfaces that the combat layer requires from the host

mod combat_engine_port;
mod command_port;
mod event_port;
mod experience_port;
mod movement_port;
mod persistence_port;
mod session_port;
mod world_port;

pub use combat_engine_port::{CombatEnginePort, CombatError};
pub use command_port::{CommandError, CommandPort};
pub use event_port::{EventEmitterPort, ItemEventPort};
pub use experience_port::ExperienceCurvePort;
pub use movement_port::MovementPort;
pub use persistence_port::CharacterPersistencePort;
pub use session_port::{PromptRenderer, SessionPort, TransportKind, COMBAT_PROMPT};
pub use world_port::{WorldError, WorldStatePort};
