use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use jobboard_core::auth::AuthContext;
use jobboard_core::error::Result;
use jobboard_core::pagination::{self, PageQuery, MAX_PAGE_SIZE};
use validator::Validate;

use crate::{
    dto::vacancy_dto::{VacancyListQuery, VacancyPayload},
    models::vacancy::Vacancy,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/vacancies",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("size" = Option<i64>, Query, description = "Page size, capped at 50"),
        ("organization_id" = Option<i64>, Query, description = "Filter by owning organization")
    ),
    responses(
        (status = 200, description = "Page of vacancies, total count in X-Total-Count")
    )
)]
pub async fn list_vacancies(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<VacancyListQuery>,
) -> Result<impl IntoResponse> {
    ctx.require()?;
    let page = PageQuery::new(query.page.unwrap_or(0), query.size.unwrap_or(MAX_PAGE_SIZE));
    let (items, total) = state.vacancies.list(query.organization_id, page).await?;
    Ok(pagination::paged(total, items))
}

#[utoipa::path(
    get,
    path = "/api/vacancies/{id}",
    params(("id" = i64, Path, description = "Vacancy ID")),
    responses(
        (status = 200, description = "Vacancy found", body = Vacancy),
        (status = 404, description = "Vacancy not found")
    )
)]
pub async fn get_vacancy(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    ctx.require()?;
    let vacancy = state.vacancies.get(id).await?;
    Ok(Json(vacancy))
}

#[utoipa::path(
    post,
    path = "/api/vacancies",
    request_body = VacancyPayload,
    responses(
        (status = 201, description = "Vacancy created", body = Vacancy),
        (status = 403, description = "Caller is not the organization director"),
        (status = 404, description = "Organization not found"),
        (status = 503, description = "Organization service unavailable")
    )
)]
pub async fn create_vacancy(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<VacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let identity = ctx.require()?;
    let vacancy = state
        .vacancies
        .create(identity, payload, ctx.bearer())
        .await?;
    Ok((StatusCode::CREATED, Json(vacancy)))
}

#[utoipa::path(
    put,
    path = "/api/vacancies/{id}",
    params(("id" = i64, Path, description = "Vacancy ID")),
    request_body = VacancyPayload,
    responses(
        (status = 200, description = "Vacancy updated", body = Vacancy),
        (status = 403, description = "Caller is not the organization director"),
        (status = 404, description = "Vacancy or organization not found"),
        (status = 503, description = "Organization service unavailable")
    )
)]
pub async fn update_vacancy(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<VacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let identity = ctx.require()?;
    let vacancy = state
        .vacancies
        .update(identity, id, payload, ctx.bearer())
        .await?;
    Ok(Json(vacancy))
}

#[utoipa::path(
    delete,
    path = "/api/vacancies/{id}",
    params(("id" = i64, Path, description = "Vacancy ID")),
    responses(
        (status = 204, description = "Vacancy deleted"),
        (status = 403, description = "Caller is not the organization director"),
        (status = 404, description = "Vacancy not found")
    )
)]
pub async fn delete_vacancy(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state.vacancies.delete(identity, id, ctx.bearer()).await?;
    Ok(StatusCode::NO_CONTENT)
}
