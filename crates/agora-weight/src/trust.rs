//! Trust-based vote weighting.
//!
//! The engine never computes reputation. An external provider hands it a
//! raw score per participant (or nothing), read through the injected
//! [`TrustSource`]; the score is bucketed onto a small ordinal scale used
//! for weight lookup and display. "No score" and "low score" are distinct
//! buckets on purpose: they happen to carry the same weight today, but a
//! caller must be able to tell them apart.

use agora_model::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scores below this bucket as [`TrustLevel::Low`].
pub const LOW_TRUST_MAX: f64 = 0.2;

/// Scores below this (and at least [`LOW_TRUST_MAX`]) bucket as
/// [`TrustLevel::Neutral`].
pub const NEUTRAL_TRUST_MAX: f64 = 0.5;

/// Scores below this (and at least [`NEUTRAL_TRUST_MAX`]) bucket as
/// [`TrustLevel::Moderate`]; anything at or above is [`TrustLevel::High`].
pub const MODERATE_TRUST_MAX: f64 = 0.8;

/// Ordinal trust scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrustLevel {
    /// No score available for this participant
    Unknown,
    /// Score present but low
    Low,
    /// Middling score
    Neutral,
    /// Decent score
    Moderate,
    /// Strong score
    High,
}

impl TrustLevel {
    /// Bucket an optional raw score. `None` maps to [`TrustLevel::Unknown`],
    /// never to [`TrustLevel::Low`].
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => TrustLevel::Unknown,
            Some(s) if s < LOW_TRUST_MAX => TrustLevel::Low,
            Some(s) if s < NEUTRAL_TRUST_MAX => TrustLevel::Neutral,
            Some(s) if s < MODERATE_TRUST_MAX => TrustLevel::Moderate,
            Some(_) => TrustLevel::High,
        }
    }

    /// Votes granted by this trust level.
    pub const fn votes(&self) -> u32 {
        match self {
            TrustLevel::Unknown | TrustLevel::Low | TrustLevel::Neutral => 1,
            TrustLevel::Moderate => 2,
            TrustLevel::High => 3,
        }
    }

    /// Whether a score was present at all.
    pub const fn is_known(&self) -> bool {
        !matches!(self, TrustLevel::Unknown)
    }

    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            TrustLevel::Unknown => "no data",
            TrustLevel::Low => "low",
            TrustLevel::Neutral => "neutral",
            TrustLevel::Moderate => "moderate",
            TrustLevel::High => "high",
        }
    }
}

/// Injected read-through source of trust scores. Implementations may cache
/// however they like; the engine only reads.
pub trait TrustSource {
    /// Raw trust score for a participant, if the provider has one.
    fn trust_score(&self, participant: &ParticipantId) -> Option<f64>;

    /// Bucketed trust level for a participant.
    fn trust_level(&self, participant: &ParticipantId) -> TrustLevel {
        TrustLevel::from_score(self.trust_score(participant))
    }
}

/// Fixed score table - the natural source for tests and offline analysis.
impl TrustSource for HashMap<ParticipantId, f64> {
    fn trust_score(&self, participant: &ParticipantId) -> Option<f64> {
        self.get(participant).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_score_is_unknown_not_low() {
        assert_eq!(TrustLevel::from_score(None), TrustLevel::Unknown);
        assert_eq!(TrustLevel::from_score(Some(0.0)), TrustLevel::Low);
        assert_ne!(TrustLevel::from_score(None), TrustLevel::from_score(Some(0.0)));
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(TrustLevel::from_score(Some(0.19)), TrustLevel::Low);
        assert_eq!(TrustLevel::from_score(Some(0.2)), TrustLevel::Neutral);
        assert_eq!(TrustLevel::from_score(Some(0.49)), TrustLevel::Neutral);
        assert_eq!(TrustLevel::from_score(Some(0.5)), TrustLevel::Moderate);
        assert_eq!(TrustLevel::from_score(Some(0.8)), TrustLevel::High);
        assert_eq!(TrustLevel::from_score(Some(1.0)), TrustLevel::High);
    }

    #[test]
    fn weights_never_below_one() {
        for level in [
            TrustLevel::Unknown,
            TrustLevel::Low,
            TrustLevel::Neutral,
            TrustLevel::Moderate,
            TrustLevel::High,
        ] {
            assert!(level.votes() >= 1, "{} grants zero votes", level.label());
        }
    }

    #[test]
    fn ordinal_ordering() {
        assert!(TrustLevel::Unknown < TrustLevel::Low);
        assert!(TrustLevel::Low < TrustLevel::High);
    }

    #[test]
    fn hashmap_source_reads_through() {
        let mut scores = HashMap::new();
        scores.insert(ParticipantId::from("p1"), 0.9);

        assert_eq!(scores.trust_level(&ParticipantId::from("p1")), TrustLevel::High);
        assert_eq!(
            scores.trust_level(&ParticipantId::from("p2")),
            TrustLevel::Unknown
        );
    }
}
