use crate::game::action::Move;
use crate::game::state::GameState;
use crate::players::base::{DecisionPolicy, build_candidates};
use crate::random::RandomSource;
use crate::types::AgentId;

/// Chance of holding cards back when a build is possible but not required.
pub const SAVE_PROBABILITY: f64 = 0.3;

/// Picks uniformly from the best available tier.
#[derive(Debug, Clone, Copy)]
pub struct RandomPolicy {
    pub save_probability: f64,
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self {
            save_probability: SAVE_PROBABILITY,
        }
    }
}

impl DecisionPolicy for RandomPolicy {
    fn decide(
        &self,
        state: &GameState,
        agent: AgentId,
        must_build: bool,
        rng: &mut dyn RandomSource,
    ) -> Move {
        let candidates = build_candidates(state, agent);
        if candidates.is_empty() {
            return Move::Pass;
        }
        if !must_build && rng.chance(self.save_probability) {
            return Move::Pass;
        }
        candidates[rng.below(candidates.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::resources::{COST_ROAD, ResourceHand};
    use crate::random::RngSource;

    /// Counts how often `chance` is asked.
    struct Counting {
        inner: RngSource<rand::rngs::StdRng>,
        chance_calls: usize,
        answer: bool,
    }

    impl RandomSource for Counting {
        fn roll_die(&mut self) -> u8 {
            self.inner.roll_die()
        }

        fn below(&mut self, upper: usize) -> usize {
            self.inner.below(upper)
        }

        fn chance(&mut self, _p: f64) -> bool {
            self.chance_calls += 1;
            self.answer
        }
    }

    fn counting(answer: bool) -> Counting {
        Counting {
            inner: RngSource::seeded(11),
            chance_calls: 0,
            answer,
        }
    }

    #[test]
    fn nothing_affordable_means_pass_without_saving_draw() {
        let state = GameState::standard().unwrap();
        let mut rng = counting(false);
        let choice = RandomPolicy::default().decide(&state, 0, false, &mut rng);
        assert_eq!(choice, Move::Pass);
        assert_eq!(rng.chance_calls, 0);
    }

    #[test]
    fn forced_decision_never_saves() {
        let mut state = GameState::standard().unwrap();
        state.agent_mut(0).hand = COST_ROAD;
        let mut rng = counting(true);
        let choice = RandomPolicy::default().decide(&state, 0, true, &mut rng);
        assert!(choice.is_build());
        assert_eq!(rng.chance_calls, 0);
    }

    #[test]
    fn voluntary_decision_may_save() {
        let mut state = GameState::standard().unwrap();
        state.agent_mut(0).hand = ResourceHand::from_counts([4, 4, 0, 0, 0]);
        let mut rng = counting(true);
        let choice = RandomPolicy::default().decide(&state, 0, false, &mut rng);
        assert_eq!(choice, Move::Pass);
        assert_eq!(rng.chance_calls, 1);
    }

    #[test]
    fn saving_rate_is_roughly_thirty_percent() {
        let mut state = GameState::standard().unwrap();
        state.agent_mut(0).hand = COST_ROAD;
        let mut rng = RngSource::seeded(99);
        let passes = (0..2000)
            .filter(|_| RandomPolicy::default().decide(&state, 0, false, &mut rng) == Move::Pass)
            .count();
        assert!((450..750).contains(&passes), "passes = {passes}");
    }
}
