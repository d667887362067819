use serde::{Deserialize, Serialize};

/// One turn of the tutoring conversation as the client stores it.
///
/// Unknown fields on incoming JSON are ignored, so clients that attach
/// their own ids or timestamps keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn student(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Student,
            content: content.into(),
        }
    }

    pub fn tutor(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tutor,
            content: content.into(),
        }
    }
}

/// Who spoke. Lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Student,
    Tutor,
}
