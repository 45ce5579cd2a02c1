use std::path::Path as FsPath;

use anyhow::Context;
use axum::extract::Multipart;
use axum::extract::Path;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Extension;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::access;
use crate::domain::user::access::Actor;
use crate::domain::user::access::Operation;
use crate::inbound::http::router::AppState;

const IMAGE_FIELD: &str = "image";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadImageResponseData {
    pub image_path: String,
}

/// `POST /api/uploads/avatar`: store the `image` field and attach it to the caller.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    mut multipart: Multipart,
) -> Result<ApiSuccess<UploadImageResponseData>, ApiError> {
    access::authorize(Operation::UploadProfileImage, Some(&actor), None)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let image_path = replace_avatar(&state, &actor, &original, &bytes).await?;

        return Ok(ApiSuccess::new(
            StatusCode::OK,
            UploadImageResponseData { image_path },
        ));
    }

    Err(ApiError::UnprocessableEntity(format!(
        "Missing multipart field '{IMAGE_FIELD}'"
    )))
}

/// Store `bytes` as the actor's new image, then drop the file it replaces.
///
/// If the record cannot be updated the new file is removed again, so the
/// directory only holds images some user points at.
async fn replace_avatar(
    state: &AppState,
    actor: &Actor,
    original: &str,
    bytes: &[u8],
) -> Result<String, ApiError> {
    let previous = state.user_service.get_user(&actor.id).await?.profile_image;
    let file_name = stored_file_name(original, Utc::now().timestamp_millis());

    store_image(&state.upload_dir, &file_name, bytes).await?;

    let user = match state
        .user_service
        .update_profile_image(&actor.id, file_name.clone())
        .await
    {
        Ok(user) => user,
        Err(e) => {
            remove_quietly(&state.upload_dir.join(&file_name)).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = %actor.id,
        file_name = %file_name,
        size = bytes.len(),
        "Profile image stored"
    );

    if let Some(previous) = previous.filter(|p| *p != file_name && is_safe_name(p)) {
        remove_quietly(&state.upload_dir.join(previous)).await;
    }

    Ok(user.profile_image.unwrap_or(file_name))
}

/// Write to a hidden temporary name and rename into place.
async fn store_image(dir: &FsPath, file_name: &str, bytes: &[u8]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .context("Failed to create upload directory")?;

    let partial = dir.join(format!(".{file_name}.part"));
    let written = async {
        tokio::fs::write(&partial, bytes)
            .await
            .context("Failed to write uploaded image")?;
        tokio::fs::rename(&partial, dir.join(file_name))
            .await
            .context("Failed to move uploaded image into place")
    }
    .await;

    if written.is_err() {
        remove_quietly(&partial).await;
    }
    written
}

async fn remove_quietly(path: &FsPath) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove image file");
        }
    }
}

/// `GET /api/uploads/avatars/:name`: raw bytes of a stored image.
pub async fn get_avatar(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_safe_name(&name) {
        return Err(ApiError::BadRequest(format!("Invalid file name: {name}")));
    }

    let bytes = match tokio::fs::read(state.upload_dir.join(&name)).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!("Image not found: {name}")));
        }
        Err(e) => return Err(anyhow::Error::from(e).context("Failed to read image").into()),
    };

    Ok(([(header::CONTENT_TYPE, content_type(&name))], bytes))
}

/// Stem stripped to `[A-Za-z0-9_-]`, a millisecond timestamp, then the original extension.
fn stored_file_name(original: &str, millis: i64) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let path = FsPath::new(base);

    let stem: String = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    let stem = if stem.is_empty() { "image".to_string() } else { stem };

    let extension: String = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    if extension.is_empty() {
        format!("{stem}-{millis}")
    } else {
        format!("{stem}-{millis}.{extension}")
    }
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

fn content_type(name: &str) -> &'static str {
    let extension = FsPath::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
