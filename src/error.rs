//! Error type shared by the effect and the keepsake helpers.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FxError>;

#[derive(Error, Debug)]
pub enum FxError {
    /// A required DOM element (overlay or canvas) is not in the document.
    #[error("missing DOM element #{id}")]
    MissingElement { id: String },

    /// The element exists but is not the kind we need.
    #[error("DOM element #{id} is not a {expected}")]
    WrongElement { id: String, expected: &'static str },

    /// No window / document / 2d context available.
    #[error("no {0} available")]
    NoContext(&'static str),

    /// A single draw call failed; the frame is skipped.
    #[error("draw failed: {0}")]
    Draw(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Not a `YYYY-MM-DDTHH:MM` local datetime.
    #[error("invalid local datetime {0:?}")]
    InvalidDateTime(String),

    /// localStorage refused a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FxError {
    /// Wrap a thrown JS value as a draw failure.
    pub fn draw(err: JsValue) -> Self {
        FxError::Draw(js_message(&err))
    }

    pub fn storage(err: JsValue) -> Self {
        FxError::Storage(js_message(&err))
    }
}

fn js_message(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl From<FxError> for JsValue {
    fn from(err: FxError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_element_names_the_id() {
        let err = FxError::MissingElement {
            id: "fxOverlay".into(),
        };
        assert_eq!(err.to_string(), "missing DOM element #fxOverlay");
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<Vec<u32>, _> = serde_json::from_str("not json");
        let err: FxError = parse.unwrap_err().into();
        assert!(matches!(err, FxError::Json(_)));
    }
}
