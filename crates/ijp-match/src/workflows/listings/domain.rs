use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub Uuid);

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Discriminant of the listing variants shown to volunteers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListingType {
    Case,
    Doc,
    Int,
    Lca,
}

impl ListingType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Case => "Case",
            Self::Doc => "Document Translation",
            Self::Int => "Interpretation",
            Self::Lca => "Limited Case Assignment",
        }
    }
}

/// A case, document, interpretation, or limited assignment record.
///
/// Attributes that do not apply to a record are `None` (or an empty language
/// list); filters treat those as "no opinion" and never exclude on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    #[serde(default)]
    pub is_remote: Option<bool>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub adjudicating_agency: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(flatten)]
    pub details: ListingDetails,
}

impl Listing {
    pub fn listing_type(&self) -> ListingType {
        self.details.listing_type()
    }
}

/// Variant-specific payload, tagged by `listing_type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "listing_type", rename_all = "UPPERCASE")]
pub enum ListingDetails {
    Case(CaseDetails),
    Doc(DocumentDetails),
    Int(InterpretationDetails),
    Lca(AssignmentDetails),
}

impl ListingDetails {
    pub fn listing_type(&self) -> ListingType {
        match self {
            Self::Case(_) => ListingType::Case,
            Self::Doc(_) => ListingType::Doc,
            Self::Int(_) => ListingType::Int,
            Self::Lca(_) => ListingType::Lca,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseDetails {
    #[serde(default)]
    pub relief_codes: Vec<String>,
    #[serde(default)]
    pub hours_per_week: Option<u32>,
    #[serde(default)]
    pub num_weeks: Option<u32>,
    #[serde(default)]
    pub needs_attorney: Option<bool>,
    #[serde(default)]
    pub needs_interpreter: Option<bool>,
    #[serde(default)]
    pub upcoming_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetails {
    pub num_pages: u32,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpretationDetails {
    #[serde(default)]
    pub upcoming_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentDetails {
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}
