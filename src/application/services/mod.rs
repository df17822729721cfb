//! Application services - Use case implementations
//!
//! The combat services react to combat lifecycle events delivered by the
//! host and depend only on the outbound ports.

pub mod combat;
