//! Share-link payloads: base64-wrapped JSON carrying a custom question pool,
//! a mode override, or both.
//!
//! Two shapes are accepted:
//!
//! ```text
//! [{"t": "...", "q": "...", "o": ["a", "b", "c", "d"], "c": 1}, ...]
//! {"config": {"mode": "trail"}, "questions": [...]}
//! ```

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::types::{Question, RawQuestion};
use crate::config::Mode;
use crate::error::ContentError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShareConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
}

/// Decoded payload. Questions are still unvalidated here; the question bank
/// decides whether they are usable.
#[derive(Debug, Clone, Default)]
pub struct SharePayload {
    pub mode: Option<Mode>,
    pub questions: Option<Vec<RawQuestion>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Wire {
    Questions(Vec<RawQuestion>),
    Bundle {
        #[serde(default)]
        config: ShareConfig,
        #[serde(default)]
        questions: Option<Vec<RawQuestion>>,
    },
}

#[derive(Serialize)]
struct BundleOut {
    config: ShareConfig,
    questions: Vec<RawQuestion>,
}

pub fn decode_payload(encoded: &str) -> Result<SharePayload, ContentError> {
    let encoded = encoded.trim();
    let bytes = match STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(err) => URL_SAFE.decode(encoded).map_err(|_| err)?,
    };
    let json = String::from_utf8(bytes)?;

    let payload = match serde_json::from_str::<Wire>(&json)? {
        Wire::Questions(questions) => SharePayload {
            mode: None,
            questions: Some(questions),
        },
        Wire::Bundle { config, questions } => SharePayload {
            mode: config.mode,
            questions,
        },
    };
    Ok(payload)
}

/// Builds a share payload. Without a mode the output is the bare question
/// array older links use.
pub fn encode_payload(questions: &[Question], mode: Option<Mode>) -> Result<String, ContentError> {
    let raw: Vec<RawQuestion> = questions.iter().map(RawQuestion::from).collect();
    let json = match mode {
        None => serde_json::to_string(&raw)?,
        Some(mode) => serde_json::to_string(&BundleOut {
            config: ShareConfig { mode: Some(mode) },
            questions: raw,
        })?,
    };
    Ok(STANDARD.encode(json))
}
