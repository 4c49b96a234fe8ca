use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::Ordering;

use super::common::*;

use crate::workflows::listings::board::{BoardError, ListingBoard};

#[test]
fn selects_first_listing_after_load() {
    let board = ListingBoard::new(mixed_board());

    assert_eq!(board.selected().map(|l| l.id), Some(id(1)));
    assert_eq!(board.revision(), 1);
}

#[test]
fn empty_board_has_no_selection() {
    let board = ListingBoard::new(Vec::new());
    assert!(board.selected().is_none());
    assert!(board.filtered().is_empty());
}

#[test]
fn filter_change_resets_selection_to_first_result() {
    let mut board = ListingBoard::new(vec![
        with_country(case(1), "MX"),
        with_country(case(2), "GT"),
    ]);
    board.select(id(2)).expect("visible listing");
    assert_eq!(board.selected().map(|l| l.id), Some(id(2)));

    board.set_filter("countries", ["GT"]).expect("known criterion");

    assert_eq!(board.selected().map(|l| l.id), Some(id(2)));
    board.set_filter("countries", ["MX"]).expect("known criterion");
    assert_eq!(board.selected().map(|l| l.id), Some(id(1)));
}

#[test]
fn cannot_select_hidden_listing() {
    let mut board = ListingBoard::new(vec![
        with_country(case(1), "MX"),
        with_country(case(2), "GT"),
    ]);
    board.set_filter("countries", ["MX"]).expect("known criterion");

    let err = board.select(id(2)).unwrap_err();

    assert_eq!(err, BoardError::ListingNotVisible(id(2)));
    assert_eq!(board.selected().map(|l| l.id), Some(id(1)));
}

#[test]
fn unknown_criterion_is_rejected() {
    let mut board = ListingBoard::new(mixed_board());
    let err = board.set_filter("relief", ["asylum"]).unwrap_err();
    assert_eq!(err, BoardError::UnknownCriterion("relief".to_string()));

    let mut selections = BTreeMap::new();
    selections.insert("nope".to_string(), BTreeSet::from(["x".to_string()]));
    assert!(board.apply_filters(selections).is_err());
}

#[test]
fn reset_is_idempotent_and_recomputes_once() {
    let mut board = ListingBoard::new(mixed_board());
    board.set_filter("countries", ["MX"]).expect("known criterion");
    board
        .set_filter("languages", ["French"])
        .expect("known criterion");
    assert_eq!(board.filtered().len(), 1);

    let before = board.revision();
    board.reset_filters();
    assert_eq!(board.revision(), before + 1);
    let once = board.filtered().to_vec();

    board.reset_filters();
    assert_eq!(board.filtered(), once.as_slice());
    assert_eq!(once, mixed_board());
    assert!(board.criteria().iter().all(|c| !c.is_active()));
}

#[test]
fn apply_filters_recomputes_once() {
    let mut board = ListingBoard::new(mixed_board());
    let before = board.revision();

    let mut selections = BTreeMap::new();
    selections.insert("countries".to_string(), BTreeSet::from(["MX".to_string()]));
    selections.insert(
        "languages".to_string(),
        BTreeSet::from(["French".to_string()]),
    );
    board.apply_filters(selections).expect("known criteria");

    assert_eq!(board.revision(), before + 1);
    assert_eq!(ids(board.filtered()), vec![id(1)]);
}

#[test]
fn toggling_an_option_twice_restores_the_view() {
    let mut board = ListingBoard::new(vec![
        with_country(case(1), "MX"),
        with_country(case(2), "GT"),
    ]);

    assert!(board.toggle_option("countries", "GT").expect("known"));
    assert_eq!(ids(board.filtered()), vec![id(2)]);
    assert!(!board.toggle_option("countries", "GT").expect("known"));
    assert_eq!(ids(board.filtered()), vec![id(1), id(2)]);
}

#[test]
fn options_come_from_the_unfiltered_set() {
    let mut board = ListingBoard::new(vec![
        with_country(case(1), "MX"),
        with_country(case(2), "GT"),
    ]);
    board.set_filter("countries", ["MX"]).expect("known criterion");

    let countries = board.criterion("countries").expect("criterion");
    assert_eq!(countries.options(), ["MX", "GT"]);
}

#[tokio::test]
async fn refresh_replaces_listings_from_source() {
    let source = StaticSource::new(mixed_board());
    let mut board = ListingBoard::default();

    assert!(board.refresh(&source).await);

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(ids(board.filtered()), vec![id(1), id(2)]);
    assert_eq!(
        board.criterion("languages").expect("criterion").options(),
        ["Spanish"]
    );
}

#[tokio::test]
async fn failed_refresh_keeps_prior_state() {
    let mut board = ListingBoard::new(mixed_board());
    let revision = board.revision();

    assert!(!board.refresh(&FailingSource).await);

    assert_eq!(board.revision(), revision);
    assert_eq!(board.listings().len(), 2);
    assert_eq!(board.selected().map(|l| l.id), Some(id(1)));
}
