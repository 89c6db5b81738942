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
    dto::user_dto::{CreateUserPayload, UpdateUserPayload, UserResponse},
    services::user_service::Relation,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("size" = Option<i64>, Query, description = "Page size, capped at 50")
    ),
    responses(
        (status = 200, description = "Page of users, total count in X-Total-Count")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    ctx.require()?;
    let (items, total) = state.users.list(page).await?;
    let items: Vec<UserResponse> = items.into_iter().map(Into::into).collect();
    Ok(pagination::paged(total, items))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    ctx.require()?;
    let user = state.users.get(id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 403, description = "Requires the SUPERVISOR role"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let identity = ctx.require()?;
    let user = state.users.create(identity, payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Not the profile owner"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let identity = ctx.require()?;
    let user = state.users.update(identity, id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state.users.delete(identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_favorites(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    let vacancies = state
        .users
        .relation_vacancies(identity, id, Relation::Favorites, ctx.bearer())
        .await?;
    Ok(Json(vacancies))
}

pub async fn get_favorite_ids(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    let ids = state
        .users
        .relation_ids(identity, id, Relation::Favorites)
        .await?;
    Ok(Json(ids))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((user_id, vacancy_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state
        .users
        .add_relation(identity, user_id, vacancy_id, Relation::Favorites, ctx.bearer())
        .await?;
    Ok(StatusCode::OK)
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((user_id, vacancy_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state
        .users
        .remove_relation(identity, user_id, vacancy_id, Relation::Favorites)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn get_responses(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    let vacancies = state
        .users
        .relation_vacancies(identity, id, Relation::Responses, ctx.bearer())
        .await?;
    Ok(Json(vacancies))
}

pub async fn get_response_ids(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    let ids = state
        .users
        .relation_ids(identity, id, Relation::Responses)
        .await?;
    Ok(Json(ids))
}

pub async fn add_response(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((user_id, vacancy_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state
        .users
        .add_relation(identity, user_id, vacancy_id, Relation::Responses, ctx.bearer())
        .await?;
    Ok(StatusCode::OK)
}

pub async fn remove_response(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((user_id, vacancy_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let identity = ctx.require()?;
    state
        .users
        .remove_relation(identity, user_id, vacancy_id, Relation::Responses)
        .await?;
    Ok(StatusCode::OK)
}
