use crate::config::{DailyLeaderboardsConfig, RewardBracket};

/// XP earned for finishing at `rank`. The first bracket containing the rank
/// wins and its value is clamped to `[min_xp, max_xp]`. A `max_xp` of zero
/// turns rewards off.
pub fn compute_reward(rank: u32, brackets: &[RewardBracket], min_xp: u32, max_xp: u32) -> u32 {
    if max_xp == 0 {
        return 0;
    }

    brackets
        .iter()
        .find(|bracket| bracket.contains(rank))
        .map_or(0, |bracket| bracket.xp.max(min_xp).min(max_xp))
}

/// Reward annotation for a ranked row: `None` outside the announced places.
pub fn announced_reward(rank: u32, config: &DailyLeaderboardsConfig) -> Option<u32> {
    if rank == 0 || rank > config.top_results_to_announce {
        return None;
    }

    Some(compute_reward(
        rank,
        &config.xp_reward_brackets,
        config.min_xp_reward,
        config.max_xp_reward
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{generate_bracket, generate_config};

    #[test]
    fn test_rank_inside_bracket() {
        let brackets = [generate_bracket(1, 3, 100)];

        assert_eq!(compute_reward(1, &brackets, 0, 1000), 100);
        assert_eq!(compute_reward(3, &brackets, 0, 1000), 100);
    }

    #[test]
    fn test_rank_outside_brackets() {
        let brackets = [generate_bracket(1, 3, 100)];

        assert_eq!(compute_reward(4, &brackets, 0, 1000), 0);
    }

    #[test]
    fn test_clamps_to_max() {
        let brackets = [generate_bracket(1, 3, 150)];

        assert_eq!(compute_reward(2, &brackets, 0, 100), 100);
    }

    #[test]
    fn test_clamps_to_min() {
        let brackets = [generate_bracket(1, 3, 5)];

        assert_eq!(compute_reward(2, &brackets, 20, 100), 20);
    }

    #[test]
    fn test_disabled_when_max_is_zero() {
        let brackets = [generate_bracket(1, 3, 150)];

        assert_eq!(compute_reward(1, &brackets, 0, 0), 0);
    }

    #[test]
    fn test_first_matching_bracket_wins() {
        let brackets = [generate_bracket(1, 1, 500), generate_bracket(1, 10, 50)];

        assert_eq!(compute_reward(1, &brackets, 0, 1000), 500);
        assert_eq!(compute_reward(2, &brackets, 0, 1000), 50);
    }

    #[test]
    fn test_announced_reward() {
        let mut config = generate_config();
        config.max_xp_reward = 1000;
        config.xp_reward_brackets = vec![generate_bracket(1, 10, 50)];

        assert_eq!(announced_reward(1, &config), Some(50));
        assert_eq!(announced_reward(3, &config), Some(50));
        // Only the top 3 are announced even though the bracket covers rank 4
        assert_eq!(announced_reward(4, &config), None);
        assert_eq!(announced_reward(0, &config), None);
    }
}
