use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardCategory {
    HealthPickup,
    Damage,
    MissilePickup,
    ArmorUpgrade,
    BeamUpgrade,
    MetroidsRemaining,
    EnemyKill,
    Checkpoint,
    Death,
}

impl RewardCategory {
    pub const ALL: [RewardCategory; 9] = [
        RewardCategory::HealthPickup,
        RewardCategory::Damage,
        RewardCategory::MissilePickup,
        RewardCategory::ArmorUpgrade,
        RewardCategory::BeamUpgrade,
        RewardCategory::MetroidsRemaining,
        RewardCategory::EnemyKill,
        RewardCategory::Checkpoint,
        RewardCategory::Death,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RewardCategory::HealthPickup => "health_pickup",
            RewardCategory::Damage => "damage",
            RewardCategory::MissilePickup => "missile_pickup",
            RewardCategory::ArmorUpgrade => "armor_upgrade",
            RewardCategory::BeamUpgrade => "beam_upgrade",
            RewardCategory::MetroidsRemaining => "metroids_remaining",
            RewardCategory::EnemyKill => "enemy_kill",
            RewardCategory::Checkpoint => "checkpoint",
            RewardCategory::Death => "death",
        }
    }
}

impl fmt::Display for RewardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Reward Weights
// =============================================================================

fn unit_weight() -> f64 {
    1.0
}

/// Non-negative multiplier per category. Zero switches a category off; the sign of a
/// contribution always comes from the event itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardWeights {
    #[serde(default = "unit_weight")]
    pub health_pickup: f64,
    #[serde(default = "unit_weight")]
    pub damage: f64,
    #[serde(default = "unit_weight", alias = "missle_pickup")]
    pub missile_pickup: f64,
    #[serde(default = "unit_weight")]
    pub armor_upgrade: f64,
    #[serde(default = "unit_weight")]
    pub beam_upgrade: f64,
    #[serde(default = "unit_weight")]
    pub metroids_remaining: f64,
    #[serde(default = "unit_weight")]
    pub enemy_kill: f64,
    #[serde(default = "unit_weight")]
    pub checkpoint: f64,
    #[serde(default = "unit_weight", alias = "deaths")]
    pub death: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

impl RewardWeights {
    pub fn uniform(weight: f64) -> Self {
        Self {
            health_pickup: weight,
            damage: weight,
            missile_pickup: weight,
            armor_upgrade: weight,
            beam_upgrade: weight,
            metroids_remaining: weight,
            enemy_kill: weight,
            checkpoint: weight,
            death: weight,
        }
    }

    /// Only `category` counts, with `weight`.
    pub fn only(category: RewardCategory, weight: f64) -> Self {
        Self::uniform(0.0).with(category, weight)
    }

    pub fn with(mut self, category: RewardCategory, weight: f64) -> Self {
        *self.slot_mut(category) = weight;
        self
    }

    pub fn get(&self, category: RewardCategory) -> f64 {
        match category {
            RewardCategory::HealthPickup => self.health_pickup,
            RewardCategory::Damage => self.damage,
            RewardCategory::MissilePickup => self.missile_pickup,
            RewardCategory::ArmorUpgrade => self.armor_upgrade,
            RewardCategory::BeamUpgrade => self.beam_upgrade,
            RewardCategory::MetroidsRemaining => self.metroids_remaining,
            RewardCategory::EnemyKill => self.enemy_kill,
            RewardCategory::Checkpoint => self.checkpoint,
            RewardCategory::Death => self.death,
        }
    }

    fn slot_mut(&mut self, category: RewardCategory) -> &mut f64 {
        match category {
            RewardCategory::HealthPickup => &mut self.health_pickup,
            RewardCategory::Damage => &mut self.damage,
            RewardCategory::MissilePickup => &mut self.missile_pickup,
            RewardCategory::ArmorUpgrade => &mut self.armor_upgrade,
            RewardCategory::BeamUpgrade => &mut self.beam_upgrade,
            RewardCategory::MetroidsRemaining => &mut self.metroids_remaining,
            RewardCategory::EnemyKill => &mut self.enemy_kill,
            RewardCategory::Checkpoint => &mut self.checkpoint,
            RewardCategory::Death => &mut self.death,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for category in RewardCategory::ALL {
            let value = self.get(category);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidWeight { category, value });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Reward Breakdown
// =============================================================================

/// One value per category. Holds raw event magnitudes for a frame-skip window, or weighted
/// contributions once [`RewardBreakdown::weighted`] has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RewardBreakdown {
    values: [f64; RewardCategory::ALL.len()],
}

impl RewardBreakdown {
    pub fn get(&self, category: RewardCategory) -> f64 {
        self.values[category as usize]
    }

    pub fn add(&mut self, category: RewardCategory, amount: f64) {
        self.values[category as usize] += amount;
    }

    pub fn clear(&mut self, category: RewardCategory) {
        self.values[category as usize] = 0.0;
    }

    pub fn weighted(&self, weights: &RewardWeights) -> RewardBreakdown {
        let mut weighted = *self;
        for category in RewardCategory::ALL {
            weighted.values[category as usize] *= weights.get(category);
        }
        weighted
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RewardCategory, f64)> + '_ {
        RewardCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
    }
}

impl AddAssign for RewardBreakdown {
    fn add_assign(&mut self, other: Self) {
        for (value, added) in self.values.iter_mut().zip(other.values) {
            *value += added;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_total() {
        let mut magnitudes = RewardBreakdown::default();
        magnitudes.add(RewardCategory::HealthPickup, 5.0);
        magnitudes.add(RewardCategory::Death, -1.0);
        magnitudes.add(RewardCategory::EnemyKill, 2.0);

        let weights = RewardWeights::default()
            .with(RewardCategory::Death, 10.0)
            .with(RewardCategory::EnemyKill, 0.5);
        let weighted = magnitudes.weighted(&weights);

        assert_eq!(weighted.get(RewardCategory::HealthPickup), 5.0);
        assert_eq!(weighted.get(RewardCategory::Death), -10.0);
        assert_eq!(weighted.get(RewardCategory::EnemyKill), 1.0);
        assert_eq!(weighted.total(), -4.0);
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let weights = RewardWeights::default().with(RewardCategory::Damage, -1.0);
        assert!(matches!(
            weights.validate(),
            Err(ConfigurationError::InvalidWeight {
                category: RewardCategory::Damage,
                ..
            })
        ));
    }

    #[test]
    fn test_nan_weight_is_rejected() {
        let weights = RewardWeights::default().with(RewardCategory::Checkpoint, f64::NAN);
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_only_zeroes_other_categories() {
        let weights = RewardWeights::only(RewardCategory::Checkpoint, 3.0);
        for category in RewardCategory::ALL {
            let expected = if category == RewardCategory::Checkpoint { 3.0 } else { 0.0 };
            assert_eq!(weights.get(category), expected);
        }
    }

    #[test]
    fn test_weights_accept_historical_names() {
        let weights: RewardWeights =
            serde_json::from_str(r#"{"missle_pickup": 2.0, "deaths": 0.0}"#).unwrap();
        assert_eq!(weights.missile_pickup, 2.0);
        assert_eq!(weights.death, 0.0);
        assert_eq!(weights.health_pickup, 1.0);
    }
}
