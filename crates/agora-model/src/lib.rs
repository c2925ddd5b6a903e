//! Agora data model - statements, opinions, and the vote matrix.
//!
//! Participants cast one logical vote (agree / disagree / pass) per
//! statement. The engine never mutates statements or opinions; everything
//! derived from them (the vote matrix, projections, cluster labels) is
//! recomputed from scratch on each analysis request.
//!
//! # Vote supersession
//!
//! A participant may vote on the same statement more than once. The vote
//! with the latest `created_at` wins; earlier votes are superseded, not
//! deleted. Ties on `created_at` break by the greater opinion id so that
//! deduplication is independent of insertion order.
//!
//! # Missing is not Pass
//!
//! The vote matrix distinguishes "voted Pass" (cell 0) from "never voted"
//! (missing cell). Downstream centering imputes missing cells toward the
//! column mean; Pass is real signal.

mod ids;
mod matrix;
mod opinion;
mod statement;

pub use ids::{OpinionId, ParticipantId, StatementId};
pub use matrix::{dedup_opinions, VoteMatrix, MIN_VOTES_PER_PARTICIPANT};
pub use opinion::{Opinion, VoteValue};
pub use statement::Statement;
