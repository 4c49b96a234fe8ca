use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::Listing;

pub const REMOTE_OPTION: &str = "Remote";
pub const IN_PERSON_OPTION: &str = "In Person";

/// Listing attributes that can back a filter criterion.
///
/// The declaration order of [`ListingAttribute::ordered`] is also the order in
/// which filters are applied and in which absent fields break sort ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingAttribute {
    Remote,
    Languages,
    AdjudicatingAgency,
    Country,
}

impl ListingAttribute {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Remote,
            Self::Languages,
            Self::AdjudicatingAgency,
            Self::Country,
        ]
    }

    pub const fn criterion_id(self) -> &'static str {
        match self {
            Self::Remote => "remote/in-person",
            Self::Languages => "languages",
            Self::AdjudicatingAgency => "adjudicating-agency",
            Self::Country => "countries",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Remote => "Remote/In Person",
            Self::Languages => "Languages",
            Self::AdjudicatingAgency => "Adjudicating Agency",
            Self::Country => "Country of Origin",
        }
    }

    const fn full_text(self) -> Option<&'static str> {
        match self {
            Self::Remote => Some("Remote, In Person"),
            _ => None,
        }
    }

    /// True when the listing has no value for this attribute.
    pub fn is_absent(self, listing: &Listing) -> bool {
        match self {
            Self::Remote => listing.is_remote.is_none(),
            Self::Languages => listing.languages.is_empty(),
            Self::AdjudicatingAgency => listing.adjudicating_agency.is_none(),
            Self::Country => listing.country.is_none(),
        }
    }

    /// Whether a listing that has this attribute carries one of the selected options.
    fn intersects(self, listing: &Listing, active: &BTreeSet<String>) -> bool {
        match self {
            Self::Remote => match listing.is_remote {
                Some(true) => active.contains(REMOTE_OPTION),
                Some(false) => active.contains(IN_PERSON_OPTION),
                None => false,
            },
            Self::Languages => listing
                .languages
                .iter()
                .any(|language| active.contains(language)),
            Self::AdjudicatingAgency => listing
                .adjudicating_agency
                .as_ref()
                .is_some_and(|agency| active.contains(agency)),
            Self::Country => listing
                .country
                .as_ref()
                .is_some_and(|country| active.contains(country)),
        }
    }

    /// Option labels contributed by a single listing.
    fn option_values(self, listing: &Listing) -> Vec<&str> {
        match self {
            Self::Remote => Vec::new(),
            Self::Languages => listing.languages.iter().map(String::as_str).collect(),
            Self::AdjudicatingAgency => listing
                .adjudicating_agency
                .as_deref()
                .filter(|agency| !agency.is_empty())
                .into_iter()
                .collect(),
            Self::Country => listing
                .country
                .as_deref()
                .filter(|country| !country.is_empty())
                .into_iter()
                .collect(),
        }
    }
}

/// One filterable attribute with its available and currently selected options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriterion {
    pub id: &'static str,
    pub placeholder: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<&'static str>,
    #[serde(skip)]
    attribute: ListingAttribute,
    options: Vec<String>,
    active: BTreeSet<String>,
}

impl FilterCriterion {
    pub fn new(attribute: ListingAttribute) -> Self {
        let options = match attribute {
            ListingAttribute::Remote => {
                vec![REMOTE_OPTION.to_string(), IN_PERSON_OPTION.to_string()]
            }
            _ => Vec::new(),
        };

        Self {
            id: attribute.criterion_id(),
            placeholder: attribute.placeholder(),
            full_text: attribute.full_text(),
            attribute,
            options,
            active: BTreeSet::new(),
        }
    }

    /// Build a criterion with a preset selection, mostly useful for one-off filtering.
    pub fn with_active<I, S>(attribute: ListingAttribute, active: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut criterion = Self::new(attribute);
        criterion.active = active.into_iter().map(Into::into).collect();
        criterion
    }

    pub fn attribute(&self) -> ListingAttribute {
        self.attribute
    }

    /// Available option labels, in first-seen order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn active(&self) -> &BTreeSet<String> {
        &self.active
    }

    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// A listing passes when the criterion is idle, when the listing has no
    /// value for the attribute, or when its value intersects the selection.
    pub fn admits(&self, listing: &Listing) -> bool {
        !self.is_active()
            || self.attribute.is_absent(listing)
            || self.attribute.intersects(listing, &self.active)
    }

    pub(crate) fn set_active(&mut self, active: BTreeSet<String>) {
        self.active = active;
    }

    pub(crate) fn toggle(&mut self, option: &str) -> bool {
        if self.active.remove(option) {
            false
        } else {
            self.active.insert(option.to_string());
            true
        }
    }

    pub(crate) fn clear(&mut self) {
        self.active.clear();
    }

    /// Derive the option set from the full, unfiltered listing set.
    pub(crate) fn rebuild_options(&mut self, listings: &[Listing]) {
        if self.attribute == ListingAttribute::Remote {
            return;
        }

        let mut seen = BTreeSet::new();
        self.options = listings
            .iter()
            .flat_map(|listing| self.attribute.option_values(listing))
            .filter(|value| seen.insert(*value))
            .map(str::to_string)
            .collect();
    }
}

/// The four criteria offered on the cases board, in filter order.
pub fn standard_criteria() -> Vec<FilterCriterion> {
    ListingAttribute::ordered()
        .into_iter()
        .map(FilterCriterion::new)
        .collect()
}

/// Filter `listings` through every criterion, then push listings lacking a
/// filtered attribute below those that have it.
///
/// The sort only considers active criteria, in declaration order. Listings
/// that tie on every active criterion keep their input order.
pub fn filter_listings(listings: &[Listing], criteria: &[FilterCriterion]) -> Vec<Listing> {
    let mut filtered: Vec<Listing> = listings
        .iter()
        .filter(|listing| criteria.iter().all(|criterion| criterion.admits(listing)))
        .cloned()
        .collect();

    let active: Vec<&FilterCriterion> = criteria
        .iter()
        .filter(|criterion| criterion.is_active())
        .collect();

    if !active.is_empty() {
        // Vec::sort_by is stable.
        filtered.sort_by(|a, b| compare_presence(&active, a, b));
    }

    filtered
}

fn compare_presence(active: &[&FilterCriterion], a: &Listing, b: &Listing) -> Ordering {
    for criterion in active {
        let a_missing = criterion.attribute.is_absent(a);
        let b_missing = criterion.attribute.is_absent(b);
        if a_missing != b_missing {
            return a_missing.cmp(&b_missing);
        }
    }
    Ordering::Equal
}
