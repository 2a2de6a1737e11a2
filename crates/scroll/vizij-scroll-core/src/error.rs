//! Error taxonomy for the scroll engine.
//!
//! Scene-level operations never surface these to the page: a missing element,
//! an unknown label or a narrow viewport all degrade to "feature not applied".
//! Only configuration parsing returns them to the caller.

/// Errors produced while resolving page content or parsing configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScrollError {
    /// A selector matched nothing in the document
    #[error("no element matches selector: {selector}")]
    MissingElement { selector: String },

    /// Label text did not match any known numeric notation
    #[error("unrecognized counter notation: {text:?}")]
    UnrecognizedNotation { text: String },

    /// Pin setup attempted below the breakpoint
    #[error("viewport width {width} is below the pin breakpoint {breakpoint}")]
    NarrowViewport { width: f64, breakpoint: f64 },

    /// Scroll position expression could not be parsed
    #[error("invalid scroll position expression: {expr:?}")]
    InvalidPosition { expr: String },

    #[error("unknown ease: {name:?}")]
    InvalidEase { name: String },

    #[error("invalid toggle actions: {expr:?}")]
    InvalidToggleActions { expr: String },

    #[error("config error: {0}")]
    Config(String),
}

impl ScrollError {
    /// Expected page states that are re-evaluated on the next event rather than reported.
    #[inline]
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::MissingElement { .. }
                | Self::UnrecognizedNotation { .. }
                | Self::NarrowViewport { .. }
        )
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingElement { .. } => "missing-element",
            Self::UnrecognizedNotation { .. } => "unrecognized-notation",
            Self::NarrowViewport { .. } => "narrow-viewport",
            Self::InvalidPosition { .. }
            | Self::InvalidEase { .. }
            | Self::InvalidToggleActions { .. }
            | Self::Config(_) => "config",
        }
    }

    pub(crate) fn missing(selector: &str) -> Self {
        Self::MissingElement {
            selector: selector.to_string(),
        }
    }
}

impl From<serde_json::Error> for ScrollError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_is_silent() {
        assert!(ScrollError::missing(".nope").is_silent());
        assert!(ScrollError::NarrowViewport {
            width: 800.0,
            breakpoint: 960.0
        }
        .is_silent());
        assert!(!ScrollError::Config("bad".into()).is_silent());
    }

    #[test]
    fn categories() {
        assert_eq!(ScrollError::missing(".x").category(), "missing-element");
        assert_eq!(
            ScrollError::InvalidEase { name: "x".into() }.category(),
            "config"
        );
    }

    #[test]
    fn json_errors_map_to_config() {
        let err: ScrollError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ScrollError::Config(_)));
    }
}
