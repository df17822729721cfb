//! Leveling formulas
//!
//! Experience rewards follow the classic MMO curve: a flat 45 plus 5 per
//! level of the slain creature.

/// Default experience curve
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardExperienceCurve;

impl StandardExperienceCurve {
    const BASE_REWARD: u64 = 45;
    const REWARD_PER_LEVEL: u64 = 5;

    /// Experience granted for killing a creature of the given level
    pub fn mob_exp(&self, level: u32) -> u64 {
        Self::BASE_REWARD + Self::REWARD_PER_LEVEL * u64::from(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mob_exp() {
        let curve = StandardExperienceCurve;
        assert_eq!(curve.mob_exp(0), 45);
        assert_eq!(curve.mob_exp(1), 50);
        assert_eq!(curve.mob_exp(10), 95);
    }
}
