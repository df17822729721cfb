//! HTTP API - Feed for the combat engine and the area scripts
//!
//! The engine resolves attacks and heals on its own. It keeps this server's
//! view of the world current (spawns, engagements, attribute values) and then
//! reports the results as combat events. Each accepted event joins the same
//! queue the tick worker and the handlers' follow-up events use.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::application::ports::outbound::{WorldError, WorldStatePort};
use crate::domain::entities::Character;
use crate::domain::value_objects::{CharacterId, RoomRef, HEALTH};
use crate::infrastructure::event_queue::QueuedEvent;
use crate::infrastructure::state::AppState;

type ApiError = (StatusCode, String);

/// Create the API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/events", post(submit_event))
        .route("/api/characters", post(spawn_character))
        .route("/api/engagements", post(engage))
        .route(
            "/api/characters/{id}/attributes/{name}",
            put(set_attribute),
        )
}

fn not_found(e: WorldError) -> ApiError {
    (StatusCode::NOT_FOUND, e.to_string())
}

/// Queue a combat event for a character
async fn submit_event(
    State(state): State<Arc<AppState>>,
    Json(queued): Json<QueuedEvent>,
) -> Result<StatusCode, ApiError> {
    if state.world.character(queued.actor).is_none() {
        return Err(not_found(WorldError::CharacterNotFound(queued.actor)));
    }

    tracing::debug!("Engine reported {} for {}", queued.event.kind(), queued.actor);
    state.events.emit(queued.actor, queued.event);
    Ok(StatusCode::ACCEPTED)
}

#[derive(Debug, Deserialize)]
pub struct SpawnRequest {
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub npc: bool,
    pub room: RoomRef,
    pub max_health: i32,
}

/// Place a new character in a room at full health
async fn spawn_character(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpawnRequest>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    if state.world.room(&request.room).is_none() {
        return Err(not_found(WorldError::RoomNotFound(request.room)));
    }

    let character = if request.npc {
        Character::npc(request.name, request.level)
    } else {
        Character::new(request.name, request.level)
    }
    .with_attribute(HEALTH, request.max_health, request.max_health)
    .with_room(request.room);

    tracing::info!("Spawned {} ({}) in {:?}", character.name, character.id, character.room);
    state.world.add_character(character.clone());
    Ok((StatusCode::CREATED, Json(character)))
}

#[derive(Debug, Deserialize)]
pub struct EngageRequest {
    pub attacker: CharacterId,
    pub target: CharacterId,
}

/// Put two characters in combat with each other
async fn engage(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EngageRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .world
        .engage(request.attacker, request.target)
        .map_err(not_found)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AttributeUpdate {
    pub current: i32,
}

/// Overwrite the current value of an attribute the character already has
async fn set_attribute(
    State(state): State<Arc<AppState>>,
    Path((id, name)): Path<(CharacterId, String)>,
    Json(update): Json<AttributeUpdate>,
) -> Result<StatusCode, ApiError> {
    let mut known = false;
    state
        .world
        .modify_character(id, &mut |c| {
            known = c.attributes.get(&name).is_some();
            c.set_attribute(&name, update.current);
        })
        .map_err(not_found)?;

    if !known {
        return Err((
            StatusCode::NOT_FOUND,
            format!("Character {id} has no attribute {name}"),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}
