use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use cinema_account::avatar::MAX_PICTURE_BYTES;
use cinema_account::{PictureUpload, ProfileEditor, ProfileFields};
use cinema_core::identity::Profile;
use serde::Serialize;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureResponse {
    /// Data URI to send back with the next profile update.
    pub profile_picture: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/profile", get(get_profile).put(update_profile))
        .route("/v1/profile/cancel", post(cancel_edit))
        .route(
            "/v1/profile/picture",
            post(upload_picture).layer(DefaultBodyLimit::max(MAX_PICTURE_BYTES * 2)),
        )
}

/// GET /v1/profile
async fn get_profile(State(state): State<AppState>) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.profiles().load().await?))
}

/// PUT /v1/profile
/// Save the form; the previous version is kept for cancel
async fn update_profile(
    State(state): State<AppState>,
    Json(fields): Json<ProfileFields>,
) -> Result<Json<Profile>, AppError> {
    let mut editor = ProfileEditor::open(state.profiles()).await?;
    Ok(Json(editor.submit(fields).await?))
}

/// POST /v1/profile/cancel
/// Revert the last save of this session, or reload
async fn cancel_edit(State(state): State<AppState>) -> Result<Json<Profile>, AppError> {
    let mut editor = ProfileEditor::open(state.profiles()).await?;
    Ok(Json(editor.cancel().await?))
}

/// POST /v1/profile/picture
/// Raw image body; answers with the data URI to stage
async fn upload_picture(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PictureResponse>, AppError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let mut editor = ProfileEditor::open(state.profiles()).await?;
    let uri = editor.stage_upload(PictureUpload::new(content_type, body.to_vec()))?;

    Ok(Json(PictureResponse {
        profile_picture: uri.to_string(),
    }))
}
