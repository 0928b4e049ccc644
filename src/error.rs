use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors surfaced by the scene engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// The host surface has no 2D drawing context
    #[error("surface does not provide a 2d drawing context")]
    UnsupportedSurface,

    /// A growth continuation referenced a branch that does not exist
    #[error("branch index {index} out of range for {count} branches")]
    BranchIndexOutOfRange { index: usize, count: usize },

    #[error("invalid scene configuration: {0}")]
    Config(String),

    #[error("scene has been destroyed")]
    Destroyed,

    /// The browser refused a frame request or similar host call
    #[error("host call failed: {0}")]
    Host(String),
}

impl From<SceneError> for JsValue {
    fn from(err: SceneError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SceneError::BranchIndexOutOfRange { index: 9, count: 4 }.to_string(),
            "branch index 9 out of range for 4 branches"
        );
        assert_eq!(
            SceneError::Config("fps must be positive".into()).to_string(),
            "invalid scene configuration: fps must be positive"
        );
    }
}
