use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// `{"error": {"message": "..."}}`, the envelope for 400, 404 and production 500s.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
}

impl ErrorResponse {
    pub fn new(msg: &str) -> Self {
        ErrorResponse {
            error: ErrorMessage {
                message: msg.to_owned(),
            },
        }
    }
}

/// The auth gate answers with a flat string rather than the nested envelope.
#[derive(Debug, Serialize)]
pub struct UnauthorizedResponse {
    pub error: &'static str,
}

impl UnauthorizedResponse {
    pub fn new() -> Self {
        UnauthorizedResponse {
            error: "Unauthorized request",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DebugErrorResponse {
    pub message: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new_from_msg(msg: &str) -> Self {
        StatusResponse {
            status: msg.to_owned(),
        }
    }
}
