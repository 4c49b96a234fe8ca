use serde::Serialize;

use super::domain::{Listing, ListingDetails};
use crate::helpers::format_timestamp;

const FALLBACK_TITLE: &str = "Migrant seeking representation";

/// Label shown above a card on the language-support board.
pub fn interpretation_type(listing: &Listing) -> &'static str {
    match &listing.details {
        ListingDetails::Case(case) if case.needs_interpreter == Some(true) => {
            "Case Interpretation"
        }
        ListingDetails::Doc(_) => "Document Translation",
        ListingDetails::Int(_) => "One-time Interpretation",
        _ => "",
    }
}

/// Short tags summarising a listing. Relief codes are left out on the
/// language-support board.
pub fn card_tags(listing: &Listing, interpretation: bool) -> Vec<String> {
    let mut tags = Vec::new();

    if let ListingDetails::Case(case) = &listing.details {
        if !interpretation && !case.relief_codes.is_empty() {
            tags.push(case.relief_codes.join(", "));
        }
        if let Some(hours) = case.hours_per_week.filter(|hours| *hours > 0) {
            tags.push(format!("{hours} hrs/week"));
        }
    }

    if !listing.languages.is_empty() {
        let mut tag = listing
            .languages
            .iter()
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if listing.languages.len() > 2 {
            tag.push_str(&format!(" + {}", listing.languages.len() - 2));
        }
        tags.push(tag);
    }

    match &listing.details {
        ListingDetails::Lca(_) => {
            if let Some(country) = &listing.country {
                tags.push(country.clone());
            }
        }
        ListingDetails::Doc(doc) => {
            let plural = if doc.num_pages > 1 { "s" } else { "" };
            tags.push(format!("{} page{plural}", doc.num_pages));
        }
        _ => {}
    }

    tags
}

/// Where the work happens. Document and assignment work is asynchronous.
pub fn remote_label(listing: &Listing) -> &'static str {
    match listing.details {
        ListingDetails::Case(_) | ListingDetails::Int(_) => match listing.is_remote {
            Some(true) => "Remote",
            Some(false) => "In Person",
            None => "To Be Determined",
        },
        _ => "Asynchronous",
    }
}

/// Everything a listing card renders, flattened for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingCard {
    pub title: String,
    pub interpretation_type: Option<&'static str>,
    pub tags: Vec<String>,
    pub location: &'static str,
    pub agency: Option<String>,
    pub date_label: Option<&'static str>,
    pub date: Option<String>,
}

impl ListingCard {
    pub fn from_listing(listing: &Listing, interpretation: bool) -> Self {
        let title = if listing.title.trim().is_empty() {
            FALLBACK_TITLE.to_string()
        } else {
            listing.title.clone()
        };

        let (agency, date_label, date) = match &listing.details {
            ListingDetails::Case(case) => (
                (!interpretation).then(|| {
                    listing
                        .adjudicating_agency
                        .clone()
                        .unwrap_or_else(|| "Not Available".to_string())
                }),
                Some("Next Filing/Court Date:"),
                Some(format_timestamp(case.upcoming_date)),
            ),
            ListingDetails::Doc(doc) => (
                None,
                Some("Assignment Deadline:"),
                Some(format_timestamp(doc.deadline)),
            ),
            ListingDetails::Lca(lca) => (
                None,
                Some("Assignment Deadline:"),
                Some(format_timestamp(lca.deadline)),
            ),
            ListingDetails::Int(_) => (None, None, None),
        };

        Self {
            title,
            interpretation_type: interpretation.then(|| interpretation_type(listing)),
            tags: card_tags(listing, interpretation),
            location: remote_label(listing),
            agency,
            date_label,
            date,
        }
    }
}
