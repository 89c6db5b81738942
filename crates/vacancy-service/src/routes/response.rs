use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use jobboard_core::auth::AuthContext;
use jobboard_core::error::Result;

use crate::{
    dto::vacancy_dto::{ResponseParams, ResponseQuery},
    AppState,
};

pub async fn respond_to_vacancy(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ResponseParams>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state
        .responses
        .respond(identity, params.vacancy_id, params.user_id, ctx.bearer())
        .await?;
    Ok(StatusCode::OK)
}

pub async fn remove_response(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ResponseParams>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state
        .responses
        .remove(identity, params.vacancy_id, params.user_id)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn list_responses(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<ResponseQuery>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    let responses = state.responses.query(identity, query, ctx.bearer()).await?;
    Ok(Json(responses))
}
