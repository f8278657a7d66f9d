//! Response body shared by success and failure paths.
//!
//! The external contract is a bare `{"message": "..."}` object, so there is
//! no envelope here.

use serde::{Deserialize, Serialize};

/// Body of every `/api/gemini` response, success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
