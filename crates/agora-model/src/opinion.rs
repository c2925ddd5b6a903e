//! Opinions - individual votes and their matrix encoding.

use crate::ids::{OpinionId, ParticipantId, StatementId};
use serde::{Deserialize, Serialize};

/// How a participant voted on a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteValue {
    /// Participant agrees with the statement
    Agree,
    /// Participant disagrees with the statement
    Disagree,
    /// Participant saw the statement and declined to take a side
    Pass,
}

impl VoteValue {
    /// Matrix cell encoding: Agree → -1, Disagree → +1, Pass → 0.
    pub const fn cell(&self) -> f64 {
        match self {
            VoteValue::Agree => -1.0,
            VoteValue::Disagree => 1.0,
            VoteValue::Pass => 0.0,
        }
    }

    /// True for an Agree vote.
    pub const fn is_agree(&self) -> bool {
        matches!(self, VoteValue::Agree)
    }

    /// True for a Disagree vote.
    pub const fn is_disagree(&self) -> bool {
        matches!(self, VoteValue::Disagree)
    }
}

/// One participant's vote on one statement.
///
/// `weight` is a multiplier derived from proof-of-work and/or trust signals
/// at creation time (see `agora-weight`). It is always at least 1; a vote
/// with no attached signals counts once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opinion {
    /// Unique opinion id
    pub id: OpinionId,
    /// Statement this vote targets
    pub statement_id: StatementId,
    /// Participant who cast the vote
    pub participant_id: ParticipantId,
    /// The vote itself
    pub value: VoteValue,
    /// Cast time, milliseconds since the Unix epoch
    pub created_at: u64,
    /// Vote multiplier, always >= 1
    pub weight: u32,
}

impl Opinion {
    /// Create an unweighted opinion (weight 1).
    pub fn new(
        id: impl Into<OpinionId>,
        statement_id: impl Into<StatementId>,
        participant_id: impl Into<ParticipantId>,
        value: VoteValue,
        created_at: u64,
    ) -> Self {
        Self {
            id: id.into(),
            statement_id: statement_id.into(),
            participant_id: participant_id.into(),
            value,
            created_at,
            weight: 1,
        }
    }

    /// Attach a vote weight. Clamped to at least 1; a weight of 0 would
    /// erase the vote, which no signal combination is allowed to do.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight.max(1);
        self
    }

    /// Whether this opinion replaces `other` as the participant's logical
    /// vote on a statement. Latest `created_at` wins; ties break by the
    /// greater opinion id so the outcome is order-independent.
    pub fn supersedes(&self, other: &Opinion) -> bool {
        self.created_at > other.created_at
            || (self.created_at == other.created_at && self.id > other.id)
    }
}
