use serde::{Deserialize, Serialize};

use crate::game::game::Outcome;
use crate::game::resources::ResourceHand;
use crate::types::AgentId;

/// One line of the action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub round: u32,
    pub agent: AgentId,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub agent: AgentId,
    pub score: u32,
    pub hand: ResourceHand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub agents: Vec<AgentSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    DiceRolled {
        round: u32,
        agent: AgentId,
        dice: (u8, u8),
    },
    Action(ActionEvent),
    RoundSummary(RoundSummary),
    Finished(Outcome),
}

/// Receives events in round and turn order. Formatting is up to the sink.
pub trait EventSink {
    fn action(&mut self, event: &ActionEvent);

    fn dice_rolled(&mut self, _round: u32, _agent: AgentId, _dice: (u8, u8)) {}

    fn round_summary(&mut self, _summary: &RoundSummary) {}

    fn finished(&mut self, _outcome: &Outcome) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn action(&mut self, _event: &ActionEvent) {}
}

/// Keeps only the action log.
impl EventSink for Vec<ActionEvent> {
    fn action(&mut self, event: &ActionEvent) {
        self.push(event.clone());
    }
}

/// Keeps everything.
impl EventSink for Vec<GameEvent> {
    fn action(&mut self, event: &ActionEvent) {
        self.push(GameEvent::Action(event.clone()));
    }

    fn dice_rolled(&mut self, round: u32, agent: AgentId, dice: (u8, u8)) {
        self.push(GameEvent::DiceRolled { round, agent, dice });
    }

    fn round_summary(&mut self, summary: &RoundSummary) {
        self.push(GameEvent::RoundSummary(summary.clone()));
    }

    fn finished(&mut self, outcome: &Outcome) {
        self.push(GameEvent::Finished(outcome.clone()));
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn action(&mut self, event: &ActionEvent) {
        (**self).action(event);
    }

    fn dice_rolled(&mut self, round: u32, agent: AgentId, dice: (u8, u8)) {
        (**self).dice_rolled(round, agent, dice);
    }

    fn round_summary(&mut self, summary: &RoundSummary) {
        (**self).round_summary(summary);
    }

    fn finished(&mut self, outcome: &Outcome) {
        (**self).finished(outcome);
    }
}
