use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use crate::cli::report::player_label;
use crate::game::game::Outcome;
use crate::types::{AgentId, NUM_AGENTS};

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    pub wins: BTreeMap<AgentId, u32>,
    pub scores_by_agent: BTreeMap<AgentId, Vec<u32>>,
    pub games: u32,
    /// Games that hit the round limit.
    pub undecided: u32,
    pub total_rounds: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, outcome: &Outcome, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_rounds += u64::from(outcome.rounds_played);

        match outcome.winner {
            Some(winner) => *self.wins.entry(winner).or_insert(0) += 1,
            None => self.undecided += 1,
        }

        for standing in &outcome.standings {
            self.scores_by_agent
                .entry(standing.agent)
                .or_default()
                .push(standing.score);
        }
    }

    pub fn wins_of(&self, agent: AgentId) -> u32 {
        self.wins.get(&agent).copied().unwrap_or(0)
    }

    pub fn win_rate(&self, agent: AgentId) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins_of(agent) as f64 / self.games as f64
    }

    pub fn get_avg_score(&self, agent: AgentId) -> f64 {
        match self.scores_by_agent.get(&agent) {
            Some(scores) if !scores.is_empty() => {
                scores.iter().sum::<u32>() as f64 / scores.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn get_avg_rounds(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / self.games as f64
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }

    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(60);
        let _ = writeln!(out, "\n{rule}\nSIMULATION SUMMARY\n{rule}");
        let _ = writeln!(out, "\nAgent Summary:");
        let _ = writeln!(
            out,
            "{:<12} {:<8} {:<10} {:<8}",
            "Agent", "Wins", "Win Rate", "Avg VP"
        );
        let _ = writeln!(out, "{}", "-".repeat(40));
        for agent in 0..NUM_AGENTS {
            let _ = writeln!(
                out,
                "{:<12} {:<8} {:<9.1}% {:<8.2}",
                player_label(agent),
                self.wins_of(agent),
                self.win_rate(agent) * 100.0,
                self.get_avg_score(agent)
            );
        }
        let _ = writeln!(out, "\nGame Summary:");
        let _ = writeln!(out, "  Total Games: {}", self.games);
        let _ = writeln!(out, "  Without Winner: {}", self.undecided);
        let _ = writeln!(out, "  Avg Rounds: {:.2}", self.get_avg_rounds());
        let _ = writeln!(out, "  Avg Duration: {:.2?}", self.get_avg_duration());
        out
    }
}

#[derive(Debug, Default)]
pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(&mut self, outcome: &Outcome, duration: Duration) {
        self.stats.record_game(outcome, duration);
    }
}
