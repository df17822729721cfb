//! Application layer - Combat presentation services and the ports they need

pub mod ports;
pub mod services;
