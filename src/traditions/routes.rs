use axum::{extract::Query, Json};
use rand::seq::IndexedRandom;
use serde::Deserialize;

use crate::traditions::{Tradition, TRADITIONS};

/// Default sample size for tradition retrieval.
const DEFAULT_LIMIT: usize = 4;

#[derive(Debug, Deserialize)]
pub struct TraditionsQuery {
    pub limit: Option<usize>,
}

/// GET /traditions?limit=N — Uniform random sample of the tradition set.
pub async fn list_traditions(Query(query): Query<TraditionsQuery>) -> Json<Vec<Tradition>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIMIT)
        .min(TRADITIONS.len());

    let mut rng = rand::rng();
    let sample: Vec<Tradition> = TRADITIONS
        .choose_multiple(&mut rng, limit)
        .cloned()
        .collect();

    Json(sample)
}
