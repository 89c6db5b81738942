use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use jobboard_core::auth::AuthContext;
use jobboard_core::error::Result;
use jobboard_core::pagination::{self, PageQuery};
use validator::Validate;

use crate::{
    dto::organization_dto::{CreateOrganizationPayload, UpdateOrganizationPayload},
    models::organization::Organization,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/organizations",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("size" = Option<i64>, Query, description = "Page size, capped at 50")
    ),
    responses(
        (status = 200, description = "Page of organizations, total count in X-Total-Count")
    )
)]
pub async fn list_organizations(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    ctx.require()?;
    let (items, total) = state.organizations.list(page).await?;
    Ok(pagination::paged(total, items))
}

#[utoipa::path(
    get,
    path = "/api/organizations/{id}",
    params(("id" = i64, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Organization found", body = Organization),
        (status = 404, description = "Organization not found")
    )
)]
pub async fn get_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    ctx.require()?;
    let organization = state.organizations.get(id).await?;
    Ok(Json(organization))
}

#[utoipa::path(
    post,
    path = "/api/organizations",
    request_body = CreateOrganizationPayload,
    responses(
        (status = 201, description = "Organization created", body = Organization),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<CreateOrganizationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let identity = ctx.require()?;
    let organization = state.organizations.create(identity, payload).await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

#[utoipa::path(
    put,
    path = "/api/organizations/{id}",
    params(("id" = i64, Path, description = "Organization ID")),
    request_body = UpdateOrganizationPayload,
    responses(
        (status = 200, description = "Organization updated", body = Organization),
        (status = 403, description = "Caller is not the director"),
        (status = 404, description = "Organization not found")
    )
)]
pub async fn update_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrganizationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let identity = ctx.require()?;
    let organization = state.organizations.update(identity, id, payload).await?;
    Ok(Json(organization))
}

#[utoipa::path(
    delete,
    path = "/api/organizations/{id}",
    params(("id" = i64, Path, description = "Organization ID")),
    responses(
        (status = 204, description = "Organization deleted"),
        (status = 404, description = "Organization not found")
    )
)]
pub async fn delete_organization(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state.organizations.delete(identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_organization_vacancies(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(org_id): Path<i64>,
) -> Result<impl IntoResponse> {
    ctx.require()?;
    let vacancies = state.organizations.vacancies(org_id, ctx.bearer()).await?;
    Ok(Json(vacancies))
}

pub async fn attach_vacancy(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((org_id, vacancy_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state
        .organizations
        .attach_vacancy(identity, org_id, vacancy_id, ctx.bearer())
        .await?;
    Ok(StatusCode::OK)
}

pub async fn detach_vacancy(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((org_id, vacancy_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state
        .organizations
        .detach_vacancy(identity, org_id, vacancy_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
