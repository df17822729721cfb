//! Hylands combat server
//!
//! Hosts the combat presentation layer of the Hylands MUD:
//! - Narrates hits, heals and damage to players and their parties
//! - Maintains the in-combat health bar prompt
//! - Runs the death and respawn flow and hands out kill experience
//!
//! Players connect over a WebSocket; the combat engine reports hits, heals
//! and deaths over HTTP.

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::ports::outbound::WorldStatePort;
use crate::application::services::combat::{CombatEventService, CombatPorts};
use crate::domain::services::StandardExperienceCurve;
use crate::infrastructure::combat_engine::DetachedCombatEngine;
use crate::infrastructure::commands::CommandManager;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::event_queue::EventQueue;
use crate::infrastructure::items::ItemEventBus;
use crate::infrastructure::persistence::JsonCharacterStore;
use crate::infrastructure::queue_workers::{combat_tick_worker, event_loop_worker};
use crate::infrastructure::session::SessionManager;
use crate::infrastructure::state::AppState;
use crate::infrastructure::world::InMemoryWorld;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hylands_combat=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Hylands combat server");

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Data dir: {}", config.data_dir.display());
    tracing::info!("  Tick interval: {:?}", config.tick_interval());

    // Build the world, then bring players back to their saved state
    let world = match &config.world_file {
        Some(path) => InMemoryWorld::load(path).await?,
        None => {
            tracing::warn!("No world file configured, starting with an empty world");
            InMemoryWorld::new()
        }
    };
    let world = Arc::new(world);
    let store = Arc::new(JsonCharacterStore::new(&config.data_dir));

    let mut restored = 0;
    for id in world.players() {
        if let Some(record) = store
            .load(id)
            .await
            .with_context(|| format!("Failed to restore character {id}"))?
        {
            let mut character = record.character;
            character.combatants.clear();
            character.dying = false;
            world.add_character(character);
            restored += 1;
        }
    }
    tracing::info!(
        "World ready: {} characters ({} restored from disk)",
        world.character_count(),
        restored
    );
    if let Some(room) = &config.starting_room {
        if world.room(room).is_none() {
            tracing::warn!("Starting room {} is not part of the world", room);
        }
    }

    let sessions = Arc::new(SessionManager::new());
    let (events, event_receiver) = EventQueue::new();
    let events = Arc::new(events);

    let items = Arc::new(ItemEventBus::new());
    let item_log_task = {
        let mut hits = items.subscribe();
        tokio::spawn(async move {
            while let Ok(hit) = hits.recv().await {
                tracing::debug!("Item {} hit {}", hit.item, hit.target.name);
            }
        })
    };

    let commands = Arc::new(CommandManager::new(world.clone(), sessions.clone()));
    let ports = CombatPorts {
        world: world.clone(),
        sessions: sessions.clone(),
        engine: Arc::new(DetachedCombatEngine),
        movement: world.clone(),
        commands: commands.clone(),
        persistence: store,
        emitter: events.clone(),
        items,
        experience: Arc::new(StandardExperienceCurve),
    };
    let service = Arc::new(CombatEventService::new(ports, config.combat()));
    tracing::info!("Combat services initialized");

    // Start background workers
    let event_loop = tokio::spawn(event_loop_worker(service, event_receiver));
    let tick_worker = tokio::spawn(combat_tick_worker(
        world.clone(),
        events.clone(),
        config.tick_interval(),
    ));

    let state = Arc::new(AppState::new(world, sessions.clone(), commands, events));

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(infrastructure::websocket::ws_handler))
        .merge(infrastructure::http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down ({} sessions open)", sessions.connected_count());
        }
    }

    tick_worker.abort();
    event_loop.abort();
    item_log_task.abort();

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
