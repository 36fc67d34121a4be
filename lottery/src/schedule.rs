use serde::{Deserialize, Serialize};

use crate::{LotteryError, MatchCount};

/// Payout per match count: the reward for `m` matched numbers sits at index `m`,
/// so a game drawing `n` balls needs `n + 1` tiers (including the 0-match tier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardSchedule(Vec<f64>);

impl RewardSchedule {
    pub fn new(rewards: Vec<f64>) -> Self {
        Self(rewards)
    }

    pub fn reward(&self, matched: MatchCount) -> Result<f64, LotteryError> {
        self.0
            .get(matched)
            .copied()
            .ok_or(LotteryError::IndexOutOfRange {
                index: matched,
                len: self.0.len(),
            })
    }

    /// Number of tiers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for RewardSchedule {
    fn from(rewards: Vec<f64>) -> Self {
        Self::new(rewards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_lookup() {
        let schedule = RewardSchedule::from(vec![0.0, 0.0, 0.0, 3.5, 200.0, 80000.0]);
        assert_eq!(schedule.len(), 6);
        assert_eq!(schedule.reward(0), Ok(0.0));
        assert_eq!(schedule.reward(3), Ok(3.5));
        assert_eq!(schedule.reward(5), Ok(80000.0));
        assert_eq!(
            schedule.reward(6),
            Err(LotteryError::IndexOutOfRange { index: 6, len: 6 })
        );
    }

    #[test]
    fn test_deserialize_from_plain_array() {
        let schedule: RewardSchedule = serde_json::from_str("[0, 0, 3.5, 200]").unwrap();
        assert_eq!(schedule.as_slice(), &[0.0, 0.0, 3.5, 200.0]);
    }
}
