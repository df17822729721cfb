//! Domain entities - Core world objects with identity

mod character;
mod party;
mod room;

pub use character::{Attribute, AttributeSet, Character, EquippedItem, HOME_WAYPOINT, WIELD_SLOT};
pub use party::Party;
pub use room::Room;
