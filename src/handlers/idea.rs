use crate::error::{AppError, AppResult};
use crate::models::IdeaView;
use crate::repositories::idea::{IdeaListQuery, IdeaSort, SortOrder, DEFAULT_PAGE_SIZE};
use crate::repositories::MAX_PAGE_SIZE;
use crate::response::PaginatedResponse;
use crate::services::IdeaService;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIdeaRequest {
    /// Idea title (3-120 characters, unique)
    #[validate(length(min = 3, max = 120))]
    pub title: String,
    /// Free-form description (up to 2000 characters)
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateIdeaRequest {
    #[validate(length(min = 3, max = 120))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct VoteRequest {
    /// Omit or send null for an anonymous vote. Any string, including an
    /// empty one, is a named voter and may vote once per idea.
    #[validate(length(max = 120))]
    pub voter: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoteCountResponse {
    pub idea_id: i32,
    pub votes_count: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IdeaListParams {
    /// Page number, starting at 1
    pub page: Option<u64>,
    /// Items per page (1-100)
    pub size: Option<u64>,
    /// Case-insensitive search in title and description
    pub q: Option<String>,
    /// Sort key: created_at, votes
    pub sort: Option<IdeaSort>,
    /// Sort direction: asc, desc
    pub order: Option<SortOrder>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TopIdeasParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

fn page_params(page: Option<u64>, size: Option<u64>) -> AppResult<(u64, u64)> {
    let page = page.unwrap_or(1);
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page < 1 {
        return Err(AppError::Validation("page must be >= 1".to_string()));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        return Err(AppError::Validation(format!(
            "size must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    Ok((page, size))
}

#[utoipa::path(
    get,
    path = "/api/v1/ideas",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("size" = Option<u64>, Query, description = "Items per page"),
        ("q" = Option<String>, Query, description = "Search text"),
        ("sort" = Option<IdeaSort>, Query, description = "Sort key: created_at, votes"),
        ("order" = Option<SortOrder>, Query, description = "Sort direction: asc, desc"),
    ),
    responses(
        (status = 200, description = "List of ideas", body = PaginatedResponse<IdeaView>),
        (status = 400, description = "Invalid query", body = AppError),
    ),
    tag = "ideas"
)]
pub async fn list_ideas(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<IdeaListParams>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = page_params(params.page, params.size)?;
    let query = IdeaListQuery {
        page,
        size,
        q: params.q,
        sort: params.sort.unwrap_or_default(),
        order: params.order.unwrap_or_default(),
    };

    let service = IdeaService::new(db);
    let (items, total) = service.list_ideas(&query).await?;

    Ok(Json(PaginatedResponse::new(items, total, page, size)))
}

#[utoipa::path(
    post,
    path = "/api/v1/ideas",
    request_body = CreateIdeaRequest,
    responses(
        (status = 201, description = "Idea created", body = IdeaView),
        (status = 400, description = "Validation error", body = AppError),
        (status = 409, description = "Title already taken", body = AppError),
    ),
    tag = "ideas"
)]
pub async fn create_idea(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateIdeaRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let service = IdeaService::new(db);
    let idea = service
        .create_idea(&payload.title, &payload.description)
        .await?;

    Ok((StatusCode::CREATED, Json(IdeaView::new(idea, 0))))
}

#[utoipa::path(
    get,
    path = "/api/v1/ideas/top",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("size" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Most voted ideas", body = Vec<IdeaView>),
        (status = 400, description = "Invalid query", body = AppError),
    ),
    tag = "ideas"
)]
pub async fn top_ideas(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<TopIdeasParams>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = page_params(params.page, params.size)?;

    let service = IdeaService::new(db);
    let ideas = service.top_ideas(page, size).await?;
    Ok(Json(ideas))
}

#[utoipa::path(
    get,
    path = "/api/v1/ideas/{id}",
    params(("id" = i32, Path, description = "Idea ID")),
    responses(
        (status = 200, description = "Idea details", body = IdeaView),
        (status = 404, description = "Idea not found", body = AppError),
    ),
    tag = "ideas"
)]
pub async fn get_idea(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = IdeaService::new(db);
    let idea = service.get_idea(id).await?;
    Ok(Json(idea))
}

#[utoipa::path(
    put,
    path = "/api/v1/ideas/{id}",
    params(("id" = i32, Path, description = "Idea ID")),
    request_body = UpdateIdeaRequest,
    responses(
        (status = 200, description = "Idea updated", body = IdeaView),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "Idea not found", body = AppError),
        (status = 409, description = "Title already taken", body = AppError),
    ),
    tag = "ideas"
)]
pub async fn update_idea(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateIdeaRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let service = IdeaService::new(db);
    let idea = service
        .update_idea(id, payload.title.as_deref(), payload.description.as_deref())
        .await?;

    Ok(Json(idea))
}

#[utoipa::path(
    delete,
    path = "/api/v1/ideas/{id}",
    params(("id" = i32, Path, description = "Idea ID")),
    responses(
        (status = 204, description = "Idea and its votes deleted"),
        (status = 404, description = "Idea not found", body = AppError),
    ),
    tag = "ideas"
)]
pub async fn delete_idea(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = IdeaService::new(db);
    service.delete_idea(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/ideas/{id}/vote",
    params(("id" = i32, Path, description = "Idea ID")),
    request_body = VoteRequest,
    responses(
        (status = 204, description = "Vote recorded"),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "Idea not found", body = AppError),
        (status = 409, description = "Voter already voted for this idea", body = AppError),
    ),
    tag = "votes"
)]
pub async fn vote_idea(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<VoteRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let service = IdeaService::new(db);
    service.vote(id, payload.voter.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/ideas/{id}/votes_count",
    params(("id" = i32, Path, description = "Idea ID")),
    responses(
        (status = 200, description = "Current vote count", body = VoteCountResponse),
        (status = 404, description = "Idea not found", body = AppError),
    ),
    tag = "votes"
)]
pub async fn votes_count(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = IdeaService::new(db);
    let votes_count = service.votes_count(id).await?;
    Ok(Json(VoteCountResponse {
        idea_id: id,
        votes_count,
    }))
}
