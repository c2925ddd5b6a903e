//! Statements - the propositions participants vote on.

use crate::ids::{ParticipantId, StatementId};
use serde::{Deserialize, Serialize};

/// A single free-text proposition. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Unique statement id
    pub id: StatementId,
    /// Participant who authored the statement
    pub author_id: ParticipantId,
    /// The proposition text
    pub text: String,
    /// Creation time, milliseconds since the Unix epoch
    pub created_at: u64,
}

impl Statement {
    /// Create a new statement.
    pub fn new(
        id: impl Into<StatementId>,
        author_id: impl Into<ParticipantId>,
        text: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            text: text.into(),
            created_at,
        }
    }
}
