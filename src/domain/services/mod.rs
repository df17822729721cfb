//! Domain services - Pure game rules

mod leveling;

pub use leveling::StandardExperienceCurve;
