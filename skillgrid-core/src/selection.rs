//! Candidate selection
//!
//! Owns the ordered set of selected people and their fetched details, and
//! derives heatmap rows from them.
//!
//! Global invariants enforced:
//! - Rows follow selection order, never fetch completion order
//! - A detail that arrives for a person no longer selected is discarded
//! - A failed detail fetch excludes that person only; other rows still build

use crate::payload::{DetailPayload, PersonId, PersonSummary};
use crate::skills::{build_row, HeatmapRow};
use crate::source::PeopleSource;
use anyhow::Result;
use rayon::prelude::*;
use std::collections::HashMap;

/// Number of people listed as "most recommended" by default
pub const DEFAULT_RECOMMENDED_COUNT: usize = 4;

/// The first `count` people of the list
pub fn recommended(people: &[PersonSummary], count: usize) -> &[PersonSummary] {
    &people[..count.min(people.len())]
}

/// Result of [`Selection::toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Selected,
    Deselected,
}

/// Selected people, in selection order, with the details fetched so far
#[derive(Debug, Default)]
pub struct Selection {
    order: Vec<PersonId>,
    details: HashMap<PersonId, DetailPayload>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Running count of selected candidates
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_selected(&self, id: &PersonId) -> bool {
        self.order.contains(id)
    }

    pub fn selected(&self) -> &[PersonId] {
        &self.order
    }

    /// Append `id` to the selection; false if it was already selected
    pub fn select(&mut self, id: PersonId) -> bool {
        if self.is_selected(&id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Remove `id` and any detail fetched for it; false if it was not selected
    pub fn deselect(&mut self, id: &PersonId) -> bool {
        let before = self.order.len();
        self.order.retain(|selected| selected != id);
        self.details.remove(id);
        self.order.len() != before
    }

    /// Select if unselected, otherwise deselect
    pub fn toggle(&mut self, id: PersonId) -> Toggled {
        if self.deselect(&id) {
            Toggled::Deselected
        } else {
            self.select(id);
            Toggled::Selected
        }
    }

    /// Selected people without a detail yet, in selection order
    pub fn pending(&self) -> Vec<PersonId> {
        self.order
            .iter()
            .filter(|id| !self.details.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Merge the outcome of a detail fetch
    ///
    /// Returns true only when the detail was stored. Stale results (person no
    /// longer selected) are dropped; failures are logged and leave the person
    /// without a row.
    pub fn accept_detail(&mut self, id: PersonId, detail: Result<DetailPayload>) -> bool {
        if !self.is_selected(&id) {
            tracing::debug!(person = %id, "discarding detail for deselected person");
            return false;
        }
        match detail {
            Ok(payload) => {
                self.details.insert(id, payload);
                true
            }
            Err(e) => {
                tracing::warn!(person = %id, error = %format!("{:#}", e), "excluding person from heatmap");
                false
            }
        }
    }

    /// Fetch every pending detail concurrently and merge in selection order
    ///
    /// `on_fetched` is called from worker threads as each fetch completes.
    /// Returns the number of details stored.
    pub fn fetch_pending<S, F>(&mut self, source: &S, on_fetched: F) -> usize
    where
        S: PeopleSource + ?Sized,
        F: Fn(&PersonId) + Sync,
    {
        let results: Vec<(PersonId, Result<DetailPayload>)> = self
            .pending()
            .into_par_iter()
            .map(|id| {
                let detail = source.person_detail(&id);
                on_fetched(&id);
                (id, detail)
            })
            .collect();

        let mut stored = 0;
        for (id, detail) in results {
            if self.accept_detail(id, detail) {
                stored += 1;
            }
        }
        stored
    }

    /// Heatmap rows for every selected person with a detail, in selection order
    pub fn rows(&self) -> Vec<HeatmapRow> {
        self.order
            .iter()
            .filter_map(|id| self.details.get(id).map(|detail| build_row(id, detail)))
            .collect()
    }
}
