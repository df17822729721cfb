use crate::domain::services::StandardExperienceCurve;

/// Port for the leveling curve
pub trait ExperienceCurvePort: Send + Sync {
    /// Experience granted for killing a creature of the given level
    fn mob_exp(&self, level: u32) -> u64;
}

impl ExperienceCurvePort for StandardExperienceCurve {
    fn mob_exp(&self, level: u32) -> u64 {
        StandardExperienceCurve::mob_exp(self, level)
    }
}
