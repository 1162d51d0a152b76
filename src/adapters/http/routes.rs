use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartError},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::adapters::http::state::HttpState;
use crate::application::dto::{DetectResponse, ErrorResponse, OkResponse};
use crate::domain::errors::DomainError;

const IMAGE_FIELD: &str = "image";

pub async fn health() -> impl IntoResponse {
    Json(OkResponse { ok: true })
}

pub async fn detect(State(st): State<HttpState>, mut multipart: Multipart) -> Response {
    let image = match read_image_field(&mut multipart).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("No image uploaded. Use multipart field name '{IMAGE_FIELD}'."),
            )
        }
        Err(e) => return error_response(e.status(), e.body_text()),
    };

    // Inference is blocking; keep it off the async workers.
    let service = st.detection.clone();
    let params = st.params;
    let result = tokio::task::spawn_blocking(move || service.detect(&image, &params)).await;

    match result {
        Ok(Ok(detections)) => Json(DetectResponse::build(detections, &st.labels)).into_response(),
        Ok(Err(e)) => {
            let status = status_for(&e);
            if status.is_server_error() {
                error!("Detection failed: {}", e);
            } else {
                warn!("Rejected upload: {}", e);
            }
            error_response(status, e.to_string())
        }
        Err(e) => {
            error!("Detection worker panicked: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
        }
    }
}

async fn read_image_field(multipart: &mut Multipart) -> Result<Option<Bytes>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            return Ok(Some(field.bytes().await?));
        }
    }
    Ok(None)
}

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        e if e.is_bad_input() => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(
            status_for(&DomainError::InvalidDimension { width: 0, height: 3 }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        let decode = image::load_from_memory(b"nope").unwrap_err();
        assert_eq!(status_for(&DomainError::Decode(decode)), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(&DomainError::NotLoaded), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_for(&DomainError::unexpected_shape(&[1, 2], "expected rank 3")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&DomainError::Inference("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
