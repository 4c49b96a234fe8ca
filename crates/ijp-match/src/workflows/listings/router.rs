use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::board::{BoardError, BoardView, ListingBoard};
use super::card::ListingCard;
use super::domain::ListingId;
use super::source::ListingSource;
use crate::helpers::filter_and_paginate;

/// Shared state behind the listing endpoints.
pub struct ListingState<S> {
    source: Arc<S>,
    page_size: usize,
}

impl<S> ListingState<S>
where
    S: ListingSource + 'static,
{
    pub fn new(source: Arc<S>, page_size: usize) -> Self {
        Self { source, page_size }
    }

    /// A fresh board over the current case list. Fetch failures leave it empty.
    async fn board(&self) -> ListingBoard {
        let mut board = ListingBoard::default();
        board.refresh(self.source.as_ref()).await;
        board
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub filters: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub selected: Option<ListingId>,
    #[serde(default)]
    pub interpretation: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub board: BoardView,
    pub cards: Vec<ListingCard>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OptionQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub offset: usize,
}

/// Router exposing the filtered case board and option search.
pub fn listing_router<S>(state: Arc<ListingState<S>>) -> Router
where
    S: ListingSource + 'static,
{
    Router::new()
        .route("/api/v1/cases/search", post(search_handler::<S>))
        .route(
            "/api/v1/cases/options/:criterion",
            get(options_handler::<S>),
        )
        .with_state(state)
}

pub(crate) async fn search_handler<S>(
    State(state): State<Arc<ListingState<S>>>,
    axum::Json(request): axum::Json<SearchRequest>,
) -> Response
where
    S: ListingSource + 'static,
{
    let mut board = state.board().await;

    if let Err(error) = board.apply_filters(request.filters) {
        return board_error_response(error);
    }
    if let Some(id) = request.selected {
        if let Err(error) = board.select(id) {
            return board_error_response(error);
        }
    }

    let cards = board
        .filtered()
        .iter()
        .map(|listing| ListingCard::from_listing(listing, request.interpretation))
        .collect();
    let response = SearchResponse {
        board: board.view(),
        cards,
    };
    (StatusCode::OK, axum::Json(response)).into_response()
}

pub(crate) async fn options_handler<S>(
    State(state): State<Arc<ListingState<S>>>,
    Path(criterion_id): Path<String>,
    Query(query): Query<OptionQuery>,
) -> Response
where
    S: ListingSource + 'static,
{
    let board = state.board().await;
    let Some(criterion) = board.criterion(&criterion_id) else {
        return board_error_response(BoardError::UnknownCriterion(criterion_id));
    };

    let page = filter_and_paginate(
        criterion.options(),
        &query.search,
        query.offset,
        state.page_size,
    );
    (StatusCode::OK, axum::Json(page)).into_response()
}

fn board_error_response(error: BoardError) -> Response {
    let status = match error {
        BoardError::UnknownCriterion(_) => StatusCode::BAD_REQUEST,
        BoardError::ListingNotVisible(_) => StatusCode::NOT_FOUND,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
