use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, error};

use super::domain::{Listing, ListingId};
use super::filter::{filter_listings, standard_criteria, FilterCriterion};
use super::source::ListingSource;

/// Errors raised when the board is driven with ids it does not know.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("unknown filter criterion '{0}'")]
    UnknownCriterion(String),
    #[error("listing {0} is not part of the filtered view")]
    ListingNotVisible(ListingId),
}

/// State behind a listing page: the full record set, the criteria, and the
/// derived filtered view with its current selection.
///
/// The filtered view is never edited directly. Every change to the record set
/// or to a criterion's selection recomputes it from scratch and moves the
/// selection back to the first visible listing.
#[derive(Debug, Clone)]
pub struct ListingBoard {
    listings: Vec<Listing>,
    criteria: Vec<FilterCriterion>,
    filtered: Vec<Listing>,
    selected: Option<ListingId>,
    revision: u64,
}

impl Default for ListingBoard {
    fn default() -> Self {
        Self::with_criteria(standard_criteria())
    }
}

impl ListingBoard {
    pub fn new(listings: Vec<Listing>) -> Self {
        let mut board = Self::default();
        board.load(listings);
        board
    }

    pub fn with_criteria(criteria: Vec<FilterCriterion>) -> Self {
        Self {
            listings: Vec::new(),
            criteria,
            filtered: Vec::new(),
            selected: None,
            revision: 0,
        }
    }

    /// Replace the record set, rebuilding option sets before refiltering.
    pub fn load(&mut self, listings: Vec<Listing>) {
        for criterion in &mut self.criteria {
            criterion.rebuild_options(&listings);
        }
        self.listings = listings;
        self.recompute();
    }

    /// Pull the case list from `source`. A failed fetch is logged and leaves
    /// the board untouched.
    pub async fn refresh<S>(&mut self, source: &S) -> bool
    where
        S: ListingSource + ?Sized,
    {
        match source.all_cases().await {
            Ok(listings) => {
                debug!(count = listings.len(), "loaded case listings");
                self.load(listings);
                true
            }
            Err(err) => {
                error!(error = %err, "failed to load case listings");
                false
            }
        }
    }

    /// Replace the selection of a single criterion.
    pub fn set_filter<I, S>(&mut self, criterion_id: &str, active: I) -> Result<(), BoardError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let criterion = self.criterion_mut(criterion_id)?;
        criterion.set_active(active.into_iter().map(Into::into).collect());
        self.recompute();
        Ok(())
    }

    /// Flip one option of a criterion, returning whether it is now selected.
    pub fn toggle_option(&mut self, criterion_id: &str, option: &str) -> Result<bool, BoardError> {
        let selected = self.criterion_mut(criterion_id)?.toggle(option);
        self.recompute();
        Ok(selected)
    }

    /// Apply several selections at once with a single recomputation. Criteria
    /// not named in `selections` keep their current selection.
    pub fn apply_filters(
        &mut self,
        selections: BTreeMap<String, BTreeSet<String>>,
    ) -> Result<(), BoardError> {
        if let Some(unknown) = selections
            .keys()
            .find(|id| !self.criteria.iter().any(|criterion| criterion.id == id.as_str()))
        {
            return Err(BoardError::UnknownCriterion(unknown.clone()));
        }

        for criterion in &mut self.criteria {
            if let Some(active) = selections.get(criterion.id) {
                criterion.set_active(active.clone());
            }
        }
        self.recompute();
        Ok(())
    }

    /// Clear every criterion's selection, recomputing the view once.
    pub fn reset_filters(&mut self) {
        for criterion in &mut self.criteria {
            criterion.clear();
        }
        self.recompute();
    }

    /// Explicitly select a visible listing. The choice holds until the next
    /// filter or record-set change.
    pub fn select(&mut self, id: ListingId) -> Result<&Listing, BoardError> {
        let index = self
            .filtered
            .iter()
            .position(|listing| listing.id == id)
            .ok_or(BoardError::ListingNotVisible(id))?;
        self.selected = Some(id);
        Ok(&self.filtered[index])
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn filtered(&self) -> &[Listing] {
        &self.filtered
    }

    pub fn selected(&self) -> Option<&Listing> {
        let id = self.selected?;
        self.filtered.iter().find(|listing| listing.id == id)
    }

    pub fn criteria(&self) -> &[FilterCriterion] {
        &self.criteria
    }

    pub fn criterion(&self, criterion_id: &str) -> Option<&FilterCriterion> {
        self.criteria
            .iter()
            .find(|criterion| criterion.id == criterion_id)
    }

    /// Number of times the filtered view has been recomputed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            listings: self.filtered.clone(),
            selected: self.selected,
            criteria: self.criteria.clone(),
            total: self.listings.len(),
        }
    }

    fn criterion_mut(&mut self, criterion_id: &str) -> Result<&mut FilterCriterion, BoardError> {
        self.criteria
            .iter_mut()
            .find(|criterion| criterion.id == criterion_id)
            .ok_or_else(|| BoardError::UnknownCriterion(criterion_id.to_string()))
    }

    fn recompute(&mut self) {
        self.filtered = filter_listings(&self.listings, &self.criteria);
        self.selected = self.filtered.first().map(|listing| listing.id);
        self.revision += 1;
    }
}

/// Serializable projection of the board for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub listings: Vec<Listing>,
    pub selected: Option<ListingId>,
    pub criteria: Vec<FilterCriterion>,
    pub total: usize,
}
