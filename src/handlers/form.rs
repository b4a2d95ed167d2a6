//! Form handlers: create, edit and view models. Both outcome branches are 200 responses.

use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::response::form_ok;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CreateParams {
    /// Master record id, required when creating a slave-entity record.
    pub master: Option<String>,
}

pub async fn create_form(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(params): Query<CreateParams>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .forms
        .build_form(&entity, &user, None, params.master.as_deref())
        .await?;
    Ok(form_ok(outcome))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path((entity, record)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.forms.build_form(&entity, &user, Some(&record), None).await?;
    Ok(form_ok(outcome))
}

pub async fn view_form(
    State(state): State<AppState>,
    Path((entity, record)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.forms.build_view(&entity, &user, &record).await?;
    Ok(form_ok(outcome))
}
