use super::breakdown::{RewardBreakdown, RewardWeights};

/// Banks weighted event magnitudes and reports the change of the running total.
pub struct RewardAggregator {
    weights: RewardWeights,
    banked: RewardBreakdown,
    previous_total: f64,
}

impl RewardAggregator {
    pub fn new(weights: RewardWeights) -> Self {
        Self {
            weights,
            banked: RewardBreakdown::default(),
            previous_total: 0.0,
        }
    }

    /// Banks the magnitudes of one finished window and returns the step reward,
    /// `state_reward - previous_cumulative_total`.
    pub fn commit(&mut self, window: &RewardBreakdown) -> f64 {
        self.banked += window.weighted(&self.weights);
        let state_reward = self.banked.total();
        let delta = state_reward - self.previous_total;
        self.previous_total = state_reward;
        delta
    }

    pub fn reset(&mut self) {
        self.banked = RewardBreakdown::default();
        self.previous_total = 0.0;
    }

    pub fn cumulative(&self) -> f64 {
        self.previous_total
    }

    /// Weighted contribution per category since the last reset.
    pub fn banked(&self) -> &RewardBreakdown {
        &self.banked
    }

    pub fn weights(&self) -> &RewardWeights {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::RewardCategory;

    #[test]
    fn test_reward_is_delta_of_running_total() {
        let mut aggregator =
            RewardAggregator::new(RewardWeights::only(RewardCategory::MetroidsRemaining, 5.0));

        let mut window = RewardBreakdown::default();
        window.add(RewardCategory::MetroidsRemaining, 1.0);
        assert_eq!(aggregator.commit(&window), 5.0);
        assert_eq!(aggregator.cumulative(), 5.0);

        // Nothing new happened
        assert_eq!(aggregator.commit(&RewardBreakdown::default()), 0.0);
        assert_eq!(aggregator.cumulative(), 5.0);
    }

    #[test]
    fn test_zero_weight_mutes_category() {
        let mut aggregator =
            RewardAggregator::new(RewardWeights::default().with(RewardCategory::Damage, 0.0));
        let mut window = RewardBreakdown::default();
        window.add(RewardCategory::Damage, -3.0);
        window.add(RewardCategory::Checkpoint, 1.0);

        assert_eq!(aggregator.commit(&window), 1.0);
        assert_eq!(aggregator.banked().get(RewardCategory::Damage), 0.0);
    }

    #[test]
    fn test_reset_clears_bank() {
        let mut aggregator = RewardAggregator::new(RewardWeights::default());
        let mut window = RewardBreakdown::default();
        window.add(RewardCategory::EnemyKill, 4.0);
        aggregator.commit(&window);

        aggregator.reset();

        assert_eq!(aggregator.cumulative(), 0.0);
        assert_eq!(aggregator.banked().total(), 0.0);
        assert_eq!(aggregator.commit(&window), 4.0);
    }
}
