use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use jobboard_core::error::Result;
use validator::Validate;

use crate::{
    dto::auth_dto::{LoginPayload, TokenResponse},
    AppState,
};

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let token = state.auth.login(payload).await?;
    Ok(Json(token))
}
