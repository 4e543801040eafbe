use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::{AppJson, AppPath};
use crate::models::recipe::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Recipes",
    operation_id = "getAll",
    summary = "List every recipe",
    description = "Returns all published recipes with their ingredients, newest first. Public.",
    responses(
        (status = 200, description = "All recipes", body = Vec<RecipeResponse>),
        (status = 500, description = "Store unavailable (PERSISTENCE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let records = state.store.get_all().await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Recipes",
    operation_id = "getSingle",
    summary = "Get a recipe by ID",
    description = "Returns one recipe with its ingredients in submission order. Public.",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 400, description = "Malformed recipe ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<RecipeResponse>, AppError> {
    let record = state
        .store
        .get_single(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))?;

    Ok(Json(record.into()))
}

#[utoipa::path(
    get,
    path = "/mine",
    tag = "Recipes",
    operation_id = "getRecipesByAuthor",
    summary = "List the caller's recipes",
    description = "Returns the recipes published by the authenticated caller. The author is always taken from the bearer token; there is no way to ask for another user's recipes.",
    responses(
        (status = 200, description = "The caller's recipes", body = Vec<RecipeResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_my_recipes(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let records = state.store.get_by_author(&auth_user.user_id).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Recipes",
    operation_id = "create",
    summary = "Publish a new recipe",
    description = "Validates the submission, reporting every invalid field at once, then stores the recipe and its ingredients atomically. The author is the authenticated caller; any `authorId` in the body is ignored.",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut submission = validate_create_recipe(payload)?;

    if submission.image_url.is_none() {
        submission.image_url = state.config.recipe.default_image_url.clone();
    }

    let record = state.store.create(submission, &auth_user.user_id).await?;

    Ok((StatusCode::CREATED, Json(RecipeResponse::from(record))))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Recipes",
    operation_id = "delete",
    summary = "Delete one of the caller's recipes",
    description = "Deletes the recipe and all of its ingredients in one transaction. Only the author may delete a recipe. Deleting a recipe that does not exist succeeds.",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted (or already absent)"),
        (status = 400, description = "Malformed recipe ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not the author (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn delete_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let Some(author_id) = state.store.author_of(id).await? else {
        return Ok(StatusCode::NO_CONTENT);
    };
    auth_user.require_owner(&author_id).inspect_err(|_| {
        tracing::warn!(%author_id, "Refused to delete another user's recipe");
    })?;

    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
