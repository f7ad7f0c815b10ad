use crate::constants::{
    CHOKING_FIRST_AID_HINT, CHOKING_KEYWORD, CONNECTION_MESSAGE, RATE_LIMIT_MESSAGE,
    UNAVAILABLE_CONTACT_HINT, UNAVAILABLE_MESSAGE, UNEXPECTED_STRUCTURE_MESSAGE,
};
use thiserror::Error;

/// Failures reported by an `AiProvider`.
///
/// Each kind maps to its own Thai message through [`ProviderError::user_message`],
/// so callers can surface a meaningful reply without inspecting the error.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider '{0}' is disabled because its API key is not configured")]
    Unavailable(String),
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to connect to the AI provider: {0}")]
    Connection(reqwest::Error),
    #[error("AI provider rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("AI provider returned status {code}: {body}")]
    Status { code: u16, body: String },
    #[error("AI provider response did not contain any text content")]
    UnexpectedStructure,
    #[error("Unexpected AI provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// The Thai text returned to an end user in place of guidance.
    ///
    /// `prompt` is the prompt that failed; the disabled-provider message adds a
    /// first-aid hint when it describes a choking scenario.
    pub fn user_message(&self, prompt: &str) -> String {
        match self {
            ProviderError::Unavailable(_) => {
                if prompt.contains(CHOKING_KEYWORD) {
                    format!("{UNAVAILABLE_MESSAGE}{CHOKING_FIRST_AID_HINT}")
                } else {
                    format!("{UNAVAILABLE_MESSAGE}{UNAVAILABLE_CONTACT_HINT}")
                }
            }
            ProviderError::Connection(_) => CONNECTION_MESSAGE.to_string(),
            ProviderError::RateLimited(_) => RATE_LIMIT_MESSAGE.to_string(),
            ProviderError::Status { code, .. } => format!(
                "ขออภัย ระบบ AI ตอบกลับมาพร้อมข้อผิดพลาด (สถานะ: {code}) กรุณาลองอีกครั้งในภายหลัง หากเป็นเหตุฉุกเฉินโปรดโทร 1669"
            ),
            ProviderError::UnexpectedStructure => UNEXPECTED_STRUCTURE_MESSAGE.to_string(),
            ProviderError::ReqwestClientBuild(e) => format!(
                "เกิดข้อผิดพลาดในการสื่อสารกับระบบ AI: {e}. กรุณาลองใหม่อีกครั้งในภายหลังหรือติดต่อ 1669"
            ),
            ProviderError::Other(message) => format!(
                "เกิดข้อผิดพลาดในการสื่อสารกับระบบ AI: {message}. กรุณาลองใหม่อีกครั้งในภายหลังหรือติดต่อ 1669"
            ),
        }
    }
}

/// Errors surfaced by the guidance pipeline and its request-level operations.
#[derive(Error, Debug)]
pub enum GuidanceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The provider call failed. `user_message` is the Thai text for the
    /// failure, built from the prompt that was sent.
    #[error("Provider error: {source}")]
    Provider {
        source: ProviderError,
        user_message: String,
    },
}
