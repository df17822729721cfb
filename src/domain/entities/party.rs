//! Party entity - A group of characters adventuring together

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, PartyId};

/// A party of characters
///
/// Membership is kept in join order so iteration is stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub members: Vec<CharacterId>,
}
