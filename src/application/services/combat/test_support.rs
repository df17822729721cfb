//! Port fakes shared by the combat service tests

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{CombatPorts, PartyBroadcaster};
use crate::application::ports::outbound::{
    CharacterPersistencePort, CombatEnginePort, CombatError, CommandError, CommandPort,
    EventEmitterPort, ItemEventPort, MovementPort, PromptRenderer, SessionPort, TransportKind,
    WorldError, WorldStatePort,
};
use crate::domain::entities::{Character, Party, Room};
use crate::domain::events::{CombatEvent, ItemHit};
use crate::domain::services::StandardExperienceCurve;
use crate::domain::value_objects::{CharacterId, PartyId, RoomRef, HEALTH};
use crate::infrastructure::world::InMemoryWorld;

// =============================================================================
// Sessions
// =============================================================================

#[derive(Default)]
struct FakeSession {
    transport: Option<TransportKind>,
    said: Vec<String>,
    prompts: BTreeMap<String, PromptRenderer>,
    prompts_added: usize,
    shows: usize,
}

#[derive(Default)]
pub struct RecordingSessions {
    sessions: Mutex<HashMap<CharacterId, FakeSession>>,
}

impl RecordingSessions {
    pub fn connect(&self, id: CharacterId, transport: TransportKind) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(
            id,
            FakeSession {
                transport: Some(transport),
                ..FakeSession::default()
            },
        );
    }

    pub fn disconnect(&self, id: CharacterId) {
        self.sessions.lock().unwrap().remove(&id);
    }

    pub fn said_to(&self, id: CharacterId) -> Vec<String> {
        self.sessions
            .lock()
            .unwrap()
            .get(&id)
            .map(|session| session.said.clone())
            .unwrap_or_default()
    }

    pub fn prompts_added(&self, id: CharacterId) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .get(&id)
            .map_or(0, |session| session.prompts_added)
    }

    pub fn prompt_shows(&self, id: CharacterId) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .get(&id)
            .map_or(0, |session| session.shows)
    }

    pub fn render_prompt(&self, id: CharacterId, key: &str) -> Option<String> {
        let renderer = self
            .sessions
            .lock()
            .unwrap()
            .get(&id)
            .and_then(|session| session.prompts.get(key).cloned())?;
        Some(renderer())
    }
}

impl SessionPort for RecordingSessions {
    fn say(&self, recipient: CharacterId, message: &str) {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(&recipient) {
            session.said.push(message.to_string());
        }
    }

    fn transport(&self, id: CharacterId) -> Option<TransportKind> {
        self.sessions
            .lock()
            .unwrap()
            .get(&id)
            .and_then(|session| session.transport)
    }

    fn has_prompt(&self, id: CharacterId, key: &str) -> bool {
        self.sessions
            .lock()
            .unwrap()
            .get(&id)
            .is_some_and(|session| session.prompts.contains_key(key))
    }

    fn add_prompt(&self, id: CharacterId, key: &str, renderer: PromptRenderer) {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(&id) {
            session.prompts.insert(key.to_string(), renderer);
            session.prompts_added += 1;
        }
    }

    fn remove_prompt(&self, id: CharacterId, key: &str) {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(&id) {
            session.prompts.remove(key);
        }
    }

    fn show_prompt(&self, id: CharacterId) {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(&id) {
            session.shows += 1;
        }
    }
}

// =============================================================================
// Combat engine
// =============================================================================

/// What the scripted engine reports for the next round
#[derive(Debug, Clone, Copy)]
pub enum RoundOutcome {
    Idle,
    Acted,
    InvalidTarget,
    Fail,
}

#[derive(Default)]
pub struct ScriptedEngine {
    rounds: Mutex<VecDeque<RoundOutcome>>,
    regenerated: Mutex<Vec<CharacterId>>,
}

impl ScriptedEngine {
    pub fn script(&self, outcome: RoundOutcome) {
        self.rounds.lock().unwrap().push_back(outcome);
    }

    pub fn regenerated(&self) -> Vec<CharacterId> {
        self.regenerated.lock().unwrap().clone()
    }
}

impl CombatEnginePort for ScriptedEngine {
    fn start_regeneration(&self, actor: CharacterId) -> Result<(), CombatError> {
        self.regenerated.lock().unwrap().push(actor);
        Ok(())
    }

    fn update_round(&self, _actor: CharacterId) -> Result<bool, CombatError> {
        let outcome = self
            .rounds
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(RoundOutcome::Idle);

        match outcome {
            RoundOutcome::Idle => Ok(false),
            RoundOutcome::Acted => Ok(true),
            RoundOutcome::InvalidTarget => {
                Err(CombatError::InvalidTarget("target is not here".to_string()))
            }
            RoundOutcome::Fail => Err(CombatError::Engine("round table corrupted".to_string())),
        }
    }
}

// =============================================================================
// Movement, commands, persistence
// =============================================================================

/// State of the character at the moment relocation was requested
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub destination: RoomRef,
    pub health_at_move: i32,
    pub experience_at_move: u64,
}

pub struct RecordingMovement {
    world: Arc<InMemoryWorld>,
    moves: Mutex<Vec<MoveRecord>>,
}

impl RecordingMovement {
    pub fn moves(&self) -> Vec<MoveRecord> {
        self.moves.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovementPort for RecordingMovement {
    async fn move_to(&self, id: CharacterId, destination: &RoomRef) -> Result<(), WorldError> {
        let character = self
            .world
            .character(id)
            .ok_or(WorldError::CharacterNotFound(id))?;
        self.moves.lock().unwrap().push(MoveRecord {
            destination: destination.clone(),
            health_at_move: character.health(),
            experience_at_move: character.experience,
        });

        self.world.move_to(id, destination).await
    }
}

#[derive(Default)]
pub struct RecordingCommands {
    executed: Mutex<Vec<(String, CharacterId)>>,
}

impl RecordingCommands {
    pub fn executed(&self) -> Vec<(String, CharacterId)> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandPort for RecordingCommands {
    async fn execute(
        &self,
        command: &str,
        _args: &str,
        actor: CharacterId,
    ) -> Result<(), CommandError> {
        self.executed
            .lock()
            .unwrap()
            .push((command.to_string(), actor));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPersistence {
    saved: Mutex<Vec<Character>>,
}

impl RecordingPersistence {
    pub fn saved_experience(&self, id: CharacterId) -> Vec<u64> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .filter(|character| character.id == id)
            .map(|character| character.experience)
            .collect()
    }
}

#[async_trait]
impl CharacterPersistencePort for RecordingPersistence {
    async fn save(&self, character: &Character) -> anyhow::Result<()> {
        self.saved.lock().unwrap().push(character.clone());
        Ok(())
    }
}

// =============================================================================
// Events
// =============================================================================

#[derive(Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<(CharacterId, CombatEvent)>>,
}

impl RecordingEmitter {
    pub fn emitted(&self) -> Vec<(CharacterId, CombatEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// Remove and return everything emitted so far
    pub fn take(&self) -> Vec<(CharacterId, CombatEvent)> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl EventEmitterPort for RecordingEmitter {
    fn emit(&self, actor: CharacterId, event: CombatEvent) {
        self.events.lock().unwrap().push((actor, event));
    }
}

#[derive(Default)]
pub struct RecordingItems {
    hits: Mutex<Vec<ItemHit>>,
}

impl RecordingItems {
    pub fn hits(&self) -> Vec<ItemHit> {
        self.hits.lock().unwrap().clone()
    }
}

impl ItemEventPort for RecordingItems {
    fn item_hit(&self, event: ItemHit) {
        self.hits.lock().unwrap().push(event);
    }
}

// =============================================================================
// Fixture
// =============================================================================

/// A small world (`limbo:white`, `limbo:black`, `town:square`) with every port
/// faked
pub struct Fixture {
    pub world: Arc<InMemoryWorld>,
    pub sessions: Arc<RecordingSessions>,
    pub engine: Arc<ScriptedEngine>,
    pub movement: Arc<RecordingMovement>,
    pub commands: Arc<RecordingCommands>,
    pub persistence: Arc<RecordingPersistence>,
    pub emitter: Arc<RecordingEmitter>,
    pub items: Arc<RecordingItems>,
}

impl Fixture {
    pub fn new() -> Self {
        let world = Arc::new(InMemoryWorld::new());
        world.add_room(Room::new("limbo:white", "The White Room"));
        world.add_room(Room::new("limbo:black", "The Black Room"));
        world.add_room(Room::new("town:square", "Town Square"));

        Self {
            movement: Arc::new(RecordingMovement {
                world: Arc::clone(&world),
                moves: Mutex::new(Vec::new()),
            }),
            world,
            sessions: Arc::default(),
            engine: Arc::default(),
            commands: Arc::default(),
            persistence: Arc::default(),
            emitter: Arc::default(),
            items: Arc::default(),
        }
    }

    /// Level 5 player at full health (100) with a rendered session
    pub fn player(&self, name: &str, room: &str) -> CharacterId {
        let character = Character::new(name, 5)
            .with_attribute(HEALTH, 100, 100)
            .with_room(RoomRef::from(room));
        let id = character.id;
        self.world.add_character(character);
        self.sessions.connect(id, TransportKind::Rendered);
        id
    }

    pub fn npc(&self, name: &str, room: &str, health: i32, max_health: i32) -> CharacterId {
        let character = Character::npc(name, 1)
            .with_attribute(HEALTH, health, max_health)
            .with_room(RoomRef::from(room));
        let id = character.id;
        self.world.add_character(character);
        id
    }

    /// Group characters in the given order
    pub fn party(&self, members: &[CharacterId]) {
        self.world.add_party(Party {
            id: PartyId::new(),
            members: members.to_vec(),
        });
    }

    pub fn engage(&self, a: CharacterId, b: CharacterId) {
        self.world.engage(a, b).unwrap();
    }

    pub fn set_health(&self, id: CharacterId, health: i32) {
        self.world
            .modify_character(id, &mut |c| c.set_attribute(HEALTH, health))
            .unwrap();
    }

    pub fn ports(&self) -> CombatPorts {
        CombatPorts {
            world: self.world.clone(),
            sessions: self.sessions.clone(),
            engine: self.engine.clone(),
            movement: self.movement.clone(),
            commands: self.commands.clone(),
            persistence: self.persistence.clone(),
            emitter: self.emitter.clone(),
            items: self.items.clone(),
            experience: Arc::new(StandardExperienceCurve),
        }
    }

    pub fn broadcaster(&self) -> PartyBroadcaster {
        self.ports().party_broadcaster()
    }
}
