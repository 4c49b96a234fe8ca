use super::common::*;

use crate::workflows::listings::filter::{
    filter_listings, standard_criteria, FilterCriterion, ListingAttribute, IN_PERSON_OPTION,
    REMOTE_OPTION,
};

#[test]
fn no_active_criteria_returns_input_unchanged() {
    let listings = vec![
        with_country(case(3), "HN"),
        case(1),
        with_languages(case(2), &["Mam"]),
    ];

    let filtered = filter_listings(&listings, &standard_criteria());

    assert_eq!(filtered, listings);
}

#[test]
fn absent_fields_pass_every_filter() {
    let listings = mixed_board();
    let criteria = vec![FilterCriterion::with_active(
        ListingAttribute::Country,
        ["MX"],
    )];

    let filtered = filter_listings(&listings, &criteria);

    assert_eq!(ids(&filtered), vec![id(1), id(2)]);
}

#[test]
fn language_selection_excludes_listings_with_other_languages() {
    let listings = mixed_board();
    let criteria = vec![
        FilterCriterion::with_active(ListingAttribute::Country, ["MX"]),
        FilterCriterion::with_active(ListingAttribute::Languages, ["French"]),
    ];

    let filtered = filter_listings(&listings, &criteria);

    assert_eq!(ids(&filtered), vec![id(1)]);
}

#[test]
fn options_within_a_criterion_are_alternatives() {
    let listings = vec![
        with_country(case(1), "MX"),
        with_country(case(2), "GT"),
        with_country(case(3), "HN"),
    ];
    let criteria = vec![FilterCriterion::with_active(
        ListingAttribute::Country,
        ["MX", "HN"],
    )];

    let filtered = filter_listings(&listings, &criteria);

    assert_eq!(ids(&filtered), vec![id(1), id(3)]);
}

#[test]
fn remote_labels_map_to_the_remote_flag() {
    let listings = vec![
        with_remote(case(1), true),
        with_remote(case(2), false),
        case(3),
    ];

    let remote_only = vec![FilterCriterion::with_active(
        ListingAttribute::Remote,
        [REMOTE_OPTION],
    )];
    assert_eq!(
        ids(&filter_listings(&listings, &remote_only)),
        vec![id(1), id(3)]
    );

    let in_person = vec![FilterCriterion::with_active(
        ListingAttribute::Remote,
        [IN_PERSON_OPTION],
    )];
    assert_eq!(
        ids(&filter_listings(&listings, &in_person)),
        vec![id(2), id(3)]
    );
}

#[test]
fn listings_missing_an_active_field_sort_last() {
    let listings = vec![
        case(1),
        with_agency(case(2), "EOIR"),
        case(3),
        with_agency(case(4), "USCIS"),
    ];
    let criteria = vec![FilterCriterion::with_active(
        ListingAttribute::AdjudicatingAgency,
        ["EOIR", "USCIS"],
    )];

    let filtered = filter_listings(&listings, &criteria);

    assert_eq!(ids(&filtered), vec![id(2), id(4), id(1), id(3)]);
}

#[test]
fn earlier_criteria_decide_the_sort_before_later_ones() {
    // Languages precede countries, so a listing with languages but no country
    // outranks one with a country but no languages.
    let listings = vec![
        with_country(case(1), "MX"),
        with_languages(case(2), &["Spanish"]),
        with_country(with_languages(case(3), &["Spanish"]), "MX"),
    ];
    let criteria = vec![
        FilterCriterion::with_active(ListingAttribute::Languages, ["Spanish"]),
        FilterCriterion::with_active(ListingAttribute::Country, ["MX"]),
    ];

    let filtered = filter_listings(&listings, &criteria);

    assert_eq!(ids(&filtered), vec![id(3), id(2), id(1)]);
}

#[test]
fn ties_keep_input_order() {
    let listings = vec![case(5), case(4), with_country(case(3), "MX"), case(2)];
    let criteria = vec![FilterCriterion::with_active(
        ListingAttribute::Country,
        ["MX"],
    )];

    let filtered = filter_listings(&listings, &criteria);

    assert_eq!(ids(&filtered), vec![id(3), id(5), id(4), id(2)]);
}

#[test]
fn inactive_criteria_do_not_reorder() {
    let listings = vec![case(1), with_country(case(2), "MX")];
    let filtered = filter_listings(&listings, &standard_criteria());
    assert_eq!(ids(&filtered), vec![id(1), id(2)]);
}

#[test]
fn options_are_deduplicated_in_first_seen_order() {
    let listings = vec![
        with_languages(with_country(case(1), "MX"), &["Spanish", "Mam"]),
        with_languages(with_country(case(2), "GT"), &["Mam", "K'iche'"]),
        with_country(case(3), "MX"),
        with_country(case(4), ""),
    ];
    let mut languages = FilterCriterion::new(ListingAttribute::Languages);
    let mut countries = FilterCriterion::new(ListingAttribute::Country);

    languages.rebuild_options(&listings);
    countries.rebuild_options(&listings);

    assert_eq!(languages.options(), ["Spanish", "Mam", "K'iche'"]);
    assert_eq!(countries.options(), ["MX", "GT"]);
}

#[test]
fn remote_options_are_fixed() {
    let mut remote = FilterCriterion::new(ListingAttribute::Remote);
    remote.rebuild_options(&[with_remote(case(1), true)]);

    assert_eq!(remote.options(), [REMOTE_OPTION, IN_PERSON_OPTION]);
    assert_eq!(remote.full_text, Some("Remote, In Person"));
}

#[test]
fn standard_criteria_follow_declaration_order() {
    let ids: Vec<&str> = standard_criteria().iter().map(|c| c.id).collect();
    assert_eq!(
        ids,
        vec!["remote/in-person", "languages", "adjudicating-agency", "countries"]
    );
}
