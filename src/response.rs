//! Response envelope for form routes: models and guarded errors alike answer `200 { "data": ... }`.

use crate::form::FormOutcome;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

pub fn form_ok(outcome: FormOutcome) -> (StatusCode, Json<Envelope<FormOutcome>>) {
    (StatusCode::OK, Json(Envelope { data: outcome }))
}
