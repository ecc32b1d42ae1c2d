pub mod health;
pub mod history;
pub mod playback;

use playmark_model::ContentId;

use crate::infra::errors::AppError;

/// Parse the `{id}` path segment; a non-numeric id is a client error.
pub(crate) fn parse_content_id(raw: &str) -> Result<ContentId, AppError> {
    raw.parse::<ContentId>()
        .map_err(|_| AppError::bad_request(format!("Invalid content id: {raw}")))
}

/// The path id is authoritative; a body id, when sent, has to agree.
pub(crate) fn ensure_body_matches(
    path_id: ContentId,
    body_id: Option<ContentId>,
) -> Result<(), AppError> {
    match body_id {
        Some(body_id) if body_id != path_id => Err(AppError::bad_request(format!(
            "content_id {body_id} in body does not match path id {path_id}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_id_must_agree_with_path() {
        assert!(ensure_body_matches(ContentId(1), None).is_ok());
        assert!(ensure_body_matches(ContentId(1), Some(ContentId(1))).is_ok());
        let err = ensure_body_matches(ContentId(1), Some(ContentId(2))).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn non_numeric_path_id_is_bad_request() {
        assert_eq!(parse_content_id("12").unwrap(), ContentId(12));
        assert_eq!(
            parse_content_id("abc").unwrap_err().status,
            axum::http::StatusCode::BAD_REQUEST
        );
    }
}
