//! Terminal response rendering.
//!
//! Pure functions from a verdict to a wire-level response. Rendering must
//! never panic: a failure to serialize the structured 404 body degrades to a
//! plain-text fallback with a warning, because a rendering failure must not
//! take down request handling.

use rampart_policy::CheckError;

pub const CONTENT_TYPE_TEXT: &str = "text/plain";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A terminal HTTP-style response produced by the filter.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

/// Denial response: 401 with a Basic challenge when the policy demands
/// credentials, plain 403 otherwise. The body is the configured forbidden
/// message in both cases.
pub fn denial(forbidden_message: &str, requires_password: bool) -> Response {
    if requires_password {
        tracing::debug!("sending login prompt header");
        Response {
            status: 401,
            content_type: CONTENT_TYPE_TEXT,
            body: forbidden_message.to_string(),
            headers: vec![("WWW-Authenticate".to_string(), "Basic".to_string())],
        }
    } else {
        Response {
            status: 403,
            content_type: CONTENT_TYPE_TEXT,
            body: forbidden_message.to_string(),
            headers: Vec::new(),
        }
    }
}

/// 404 with a structured JSON error body describing the cause.
pub fn not_found(cause: &CheckError) -> Response {
    let (error_type, resource) = match cause {
        CheckError::ResourceNotFound { resource } => {
            ("resource_not_found", Some(resource.as_str()))
        }
        CheckError::Evaluation(_) => ("evaluation_error", None),
    };
    let body = serde_json::json!({
        "status": 404,
        "error": {
            "type": error_type,
            "reason": cause.to_string(),
            "resource": resource,
        }
    });
    let body = serde_json::to_string(&body).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "cannot render not-found body, falling back to plain text");
        cause.to_string()
    });
    Response {
        status: 404,
        content_type: CONTENT_TYPE_JSON,
        body,
        headers: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_denial_is_403() {
        let resp = denial("Forbidden", false);
        assert_eq!(resp.status, 403);
        assert_eq!(resp.content_type, CONTENT_TYPE_TEXT);
        assert_eq!(resp.body, "Forbidden");
        assert!(resp.headers.is_empty());
    }

    #[test]
    fn test_password_denial_is_401_with_challenge() {
        let resp = denial("Forbidden", true);
        assert_eq!(resp.status, 401);
        assert!(
            resp.headers
                .iter()
                .any(|(name, value)| name == "WWW-Authenticate" && value == "Basic")
        );
    }

    #[test]
    fn test_not_found_carries_cause() {
        let cause = CheckError::ResourceNotFound {
            resource: "index_missing".to_string(),
        };
        let resp = not_found(&cause);
        assert_eq!(resp.status, 404);
        assert_eq!(resp.content_type, CONTENT_TYPE_JSON);

        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(body["error"]["type"], "resource_not_found");
        assert_eq!(body["error"]["resource"], "index_missing");
    }
}
