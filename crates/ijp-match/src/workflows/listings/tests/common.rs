use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use uuid::Uuid;

use crate::workflows::listings::domain::{
    AssignmentDetails, CaseDetails, DocumentDetails, InterpretationDetails, Listing,
    ListingDetails, ListingId,
};
use crate::workflows::listings::router::{listing_router, ListingState};
use crate::workflows::listings::source::{ListingSource, SourceError};

pub(super) fn id(n: u128) -> ListingId {
    ListingId(Uuid::from_u128(n))
}

pub(super) fn case(n: u128) -> Listing {
    Listing {
        id: id(n),
        title: format!("Case {n}"),
        is_remote: None,
        languages: Vec::new(),
        adjudicating_agency: None,
        country: None,
        details: ListingDetails::Case(CaseDetails::default()),
    }
}

pub(super) fn with_country(mut listing: Listing, country: &str) -> Listing {
    listing.country = Some(country.to_string());
    listing
}

pub(super) fn with_languages(mut listing: Listing, languages: &[&str]) -> Listing {
    listing.languages = languages.iter().map(|l| l.to_string()).collect();
    listing
}

pub(super) fn with_agency(mut listing: Listing, agency: &str) -> Listing {
    listing.adjudicating_agency = Some(agency.to_string());
    listing
}

pub(super) fn with_remote(mut listing: Listing, remote: bool) -> Listing {
    listing.is_remote = Some(remote);
    listing
}

pub(super) fn document(n: u128, pages: u32) -> Listing {
    Listing {
        details: ListingDetails::Doc(DocumentDetails {
            num_pages: pages,
            deadline: None,
        }),
        ..case(n)
    }
}

pub(super) fn interpretation(n: u128) -> Listing {
    Listing {
        details: ListingDetails::Int(InterpretationDetails::default()),
        ..case(n)
    }
}

pub(super) fn assignment(n: u128) -> Listing {
    Listing {
        details: ListingDetails::Lca(AssignmentDetails::default()),
        ..case(n)
    }
}

/// The two-record board used across filter tests: a Mexican case with no
/// languages and a Spanish-speaking case with no country.
pub(super) fn mixed_board() -> Vec<Listing> {
    vec![
        with_country(case(1), "MX"),
        with_languages(case(2), &["Spanish"]),
    ]
}

pub(super) fn ids(listings: &[Listing]) -> Vec<ListingId> {
    listings.iter().map(|listing| listing.id).collect()
}

#[derive(Default)]
pub(super) struct StaticSource {
    pub(super) listings: Vec<Listing>,
    pub(super) calls: AtomicUsize,
}

impl StaticSource {
    pub(super) fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ListingSource for StaticSource {
    async fn all_cases(&self) -> Result<Vec<Listing>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.listings.clone())
    }
}

pub(super) struct FailingSource;

#[async_trait]
impl ListingSource for FailingSource {
    async fn all_cases(&self) -> Result<Vec<Listing>, SourceError> {
        Err(SourceError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn router_with<S: ListingSource + 'static>(source: S) -> axum::Router {
    listing_router(Arc::new(ListingState::new(Arc::new(source), 2)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
