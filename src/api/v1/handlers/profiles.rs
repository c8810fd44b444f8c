/*
 * Responsibility
 * - /profiles 系 handler
 * - AuthCtx/Path/Json を extractor で受け、DTO validation → service 呼び出し
 * - 各 handler の結果は単一の終端 (Ok or AppError)。同一パスで二度
 *   レスポンスを書くことはない
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::profiles::{AddExperienceRequest, ProfileResponse, UpsertProfileRequest},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    services::profile,
    state::AppState,
};

/// GET /profiles/me (auth)
pub async fn get_my_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<ProfileResponse>, AppError> {
    let record = profile::get_profile(state.store.as_ref(), ctx.user_id).await?;

    Ok(Json(record.into()))
}

/// POST /profiles (auth) — create on first write, partial update after.
pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<UpsertProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let fields = req.into_fields().map_err(AppError::Validation)?;

    let record = profile::upsert_profile(state.store.as_ref(), ctx.user_id, fields).await?;

    Ok(Json(record.into()))
}

/// GET /profiles — public, unbounded by design.
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let records = profile::list_profiles(state.store.as_ref()).await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// GET /profiles/user/{user_id} — public lookup by raw owner reference.
/// The raw path segment goes to the service as-is; a malformed id is a 400
/// "not found", never a 500.
pub async fn get_profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let record = profile::get_profile_by_owner_id(state.store.as_ref(), &user_id).await?;

    Ok(Json(record.into()))
}

/// DELETE /profiles (auth) — removes the profile and the account.
pub async fn delete_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<StatusCode, AppError> {
    profile::delete_profile(state.store.as_ref(), ctx.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /profiles/experience (auth)
pub async fn add_experience(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<AddExperienceRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let entry = req.into_entry().map_err(AppError::Validation)?;

    let record = profile::add_experience(state.store.as_ref(), ctx.user_id, entry).await?;

    Ok(Json(record.into()))
}
