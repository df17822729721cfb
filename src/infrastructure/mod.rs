//! Infrastructure layer - Host adapters for the combat ports
//!
//! This layer contains:
//! - World: in-memory registry of rooms, parties and characters
//! - Session: player sessions, output channels and prompts
//! - Persistence: JSON character files
//! - Commands: the `look` command
//! - Items: item event bus for on-hit scripts
//! - Event queue and workers: event loop and combat tick scheduling
//! - WebSocket and HTTP: player connections and the engine event feed
//! - Config: application configuration

pub mod combat_engine;
pub mod commands;
pub mod config;
pub mod event_queue;
pub mod http;
pub mod items;
pub mod persistence;
pub mod queue_workers;
pub mod session;
pub mod state;
pub mod websocket;
pub mod world;
