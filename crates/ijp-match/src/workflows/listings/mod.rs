//! Listing filter engine: the derived, filtered and sorted view over the case
//! board, plus the card presentation and HTTP surface built on it.

pub mod board;
pub mod card;
pub mod domain;
pub mod filter;
pub mod router;
pub mod source;

#[cfg(test)]
mod tests;

pub use board::{BoardError, BoardView, ListingBoard};
pub use card::{card_tags, interpretation_type, remote_label, ListingCard};
pub use domain::{
    AssignmentDetails, CaseDetails, DocumentDetails, InterpretationDetails, Listing,
    ListingDetails, ListingId, ListingType,
};
pub use filter::{
    filter_listings, standard_criteria, FilterCriterion, ListingAttribute, IN_PERSON_OPTION,
    REMOTE_OPTION,
};
pub use router::{listing_router, ListingState, SearchRequest, SearchResponse};
pub use source::{ListingSource, SourceError};
