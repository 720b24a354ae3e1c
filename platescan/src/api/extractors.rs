use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::PlateScanError;

/// JSON body extractor whose rejections use the service's error format.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(PlateScanError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for PlateScanError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

impl From<MultipartRejection> for PlateScanError {
    fn from(rejection: MultipartRejection) -> Self {
        PlateScanError::Upload(rejection.body_text())
    }
}

fn map_json_rejection(rejection: JsonRejection) -> PlateScanError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                PlateScanError::Validation(format!("Missing required field: {field}"))
            } else {
                PlateScanError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            PlateScanError::Validation(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => PlateScanError::Validation(
            "Missing `Content-Type: application/json` header".to_string(),
        ),
        JsonRejection::BytesRejection(_) => {
            PlateScanError::Upload("Failed to read request body".to_string())
        }
        _ => PlateScanError::Validation(rejection.body_text()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_missing_field() {
        assert_eq!(
            extract_missing_field("Failed to deserialize: missing field `text` at line 1"),
            Some("text")
        );
        assert_eq!(extract_missing_field("invalid type: integer"), None);
    }
}
