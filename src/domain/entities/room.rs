//! Room entity - A place characters can stand in

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::RoomRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomRef,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
impl Room {
    pub fn new(id: impl Into<RoomRef>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
