//! JSON file storage for player characters
//!
//! One file per character at `<data_dir>/characters/<id>.json`. Writes go to
//! a temporary file first and are renamed into place.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::outbound::CharacterPersistencePort;
use crate::domain::entities::Character;
use crate::domain::value_objects::CharacterId;

/// On-disk layout of a saved character
#[derive(Debug, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub saved_at: DateTime<Utc>,
    pub character: Character,
}

pub struct JsonCharacterStore {
    root: PathBuf,
}

impl JsonCharacterStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join("characters"),
        }
    }

    fn path_for(&self, id: CharacterId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Read a saved character, `None` if it was never saved
    pub async fn load(&self, id: CharacterId) -> Result<Option<CharacterRecord>> {
        let path = self.path_for(id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        let record = serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt character file {}", path.display()))?;
        Ok(Some(record))
    }
}

#[async_trait]
impl CharacterPersistencePort for JsonCharacterStore {
    async fn save(&self, character: &Character) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create {}", self.root.display()))?;

        let record = CharacterRecord {
            saved_at: Utc::now(),
            character: character.clone(),
        };
        let json = serde_json::to_vec_pretty(&record)?;

        let path = self.path_for(character.id);
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, json)
            .await
            .with_context(|| format!("Failed to write {}", staging.display()))?;
        tokio::fs::rename(&staging, &path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!(character = %character.id, path = %path.display(), "Character saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::HEALTH;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("hylands-store-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = scratch_dir();
        let store = JsonCharacterStore::new(&dir);
        let mut hero = Character::new("Hero", 4).with_attribute(HEALTH, 80, 120);
        hero.experience = 321;

        store.save(&hero).await.unwrap();
        let record = store.load(hero.id).await.unwrap().unwrap();

        assert_eq!(record.character.name, "Hero");
        assert_eq!(record.character.experience, 321);
        assert_eq!(record.character.health(), 80);
        assert!(dir.join("characters").join(format!("{}.json", hero.id)).exists());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_unknown_character() {
        let store = JsonCharacterStore::new(scratch_dir());
        assert!(store.load(CharacterId::new()).await.unwrap().is_none());
    }
}
