//! Dense participant × statement vote matrix with explicit missing cells.
//!
//! Rows are participants (sorted by id), columns follow the caller's
//! statement order. A cell is `None` when the participant never voted on
//! that statement - distinct from a Pass, which is `Some(0.0)`.
//!
//! The matrix is a pure function of the opinion set: built from scratch on
//! every analysis request, never incrementally mutated.

use crate::ids::{ParticipantId, StatementId};
use crate::opinion::Opinion;
use crate::statement::Statement;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Minimum non-missing cells a participant row needs to survive the build.
/// A participant with a single vote carries too little signal to place
/// reliably in opinion space.
pub const MIN_VOTES_PER_PARTICIPANT: usize = 2;

/// Reduce an opinion set to one logical vote per (participant, statement)
/// pair. The latest `created_at` wins; ties break by the greater opinion id
/// (see [`Opinion::supersedes`]), so any insertion order yields the same
/// surviving set.
pub fn dedup_opinions(opinions: &[Opinion]) -> Vec<&Opinion> {
    let mut latest: HashMap<(&ParticipantId, &StatementId), &Opinion> = HashMap::new();
    for opinion in opinions {
        let key = (&opinion.participant_id, &opinion.statement_id);
        match latest.get(&key) {
            Some(current) if !opinion.supersedes(current) => {}
            _ => {
                latest.insert(key, opinion);
            }
        }
    }
    latest.into_values().collect()
}

/// The derived vote matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteMatrix {
    participant_ids: Vec<ParticipantId>,
    statement_ids: Vec<StatementId>,
    cells: Vec<Vec<Option<f64>>>,
}

impl VoteMatrix {
    /// Build the matrix from a statement list and the full opinion set.
    ///
    /// Opinions targeting statements outside `statements` are ignored.
    /// Participant rows with fewer than `min_votes_per_participant`
    /// non-missing cells are dropped.
    pub fn build(
        statements: &[Statement],
        opinions: &[Opinion],
        min_votes_per_participant: usize,
    ) -> Self {
        let statement_ids: Vec<StatementId> = statements.iter().map(|s| s.id.clone()).collect();
        let columns: HashMap<&StatementId, usize> = statement_ids
            .iter()
            .enumerate()
            .map(|(j, id)| (id, j))
            .collect();

        // BTreeMap keeps participant rows sorted by id, so identical opinion
        // sets always produce identical matrices.
        let mut rows: BTreeMap<&ParticipantId, Vec<Option<f64>>> = BTreeMap::new();
        for opinion in dedup_opinions(opinions) {
            let Some(&j) = columns.get(&opinion.statement_id) else {
                continue;
            };
            let row = rows
                .entry(&opinion.participant_id)
                .or_insert_with(|| vec![None; statement_ids.len()]);
            row[j] = Some(opinion.value.cell());
        }

        let total_rows = rows.len();
        let (participant_ids, cells): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .filter(|(_, row)| {
                row.iter().filter(|cell| cell.is_some()).count() >= min_votes_per_participant
            })
            .map(|(id, row)| (id.clone(), row))
            .unzip();

        debug!(
            rows = participant_ids.len(),
            cols = statement_ids.len(),
            dropped = total_rows - participant_ids.len(),
            "vote matrix built"
        );

        Self {
            participant_ids,
            statement_ids,
            cells,
        }
    }

    /// Number of participant rows.
    pub fn rows(&self) -> usize {
        self.participant_ids.len()
    }

    /// Number of statement columns.
    pub fn cols(&self) -> usize {
        self.statement_ids.len()
    }

    /// Participant ids indexing the rows.
    pub fn participant_ids(&self) -> &[ParticipantId] {
        &self.participant_ids
    }

    /// Statement ids indexing the columns.
    pub fn statement_ids(&self) -> &[StatementId] {
        &self.statement_ids
    }

    /// One participant row of cells.
    pub fn row(&self, i: usize) -> &[Option<f64>] {
        &self.cells[i]
    }

    /// A single cell. `None` means the participant never voted here.
    pub fn cell(&self, i: usize, j: usize) -> Option<f64> {
        self.cells[i][j]
    }

    /// Iterate over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Option<f64>]> {
        self.cells.iter().map(|row| row.as_slice())
    }
}
