#![forbid(unsafe_code)]

//! Unified error type for callers that do not care which layer failed.

use tincture_runtime::{ConfigError, PaletteError};
use tincture_style::{ColorParseError, ThemeParseError};

/// Any error tincture can return.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An accent string could not be parsed.
    #[error(transparent)]
    Color(#[from] ColorParseError),
    /// A theme tag was neither `light` nor `dark`.
    #[error(transparent)]
    Theme(#[from] ThemeParseError),
    /// A provider or consumer rejected its accent or theme.
    #[error(transparent)]
    Palette(#[from] PaletteError),
    /// Provider configuration failed to load or validate.
    #[error("provider configuration: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether the failure came from a bad color or theme value, as opposed
    /// to configuration plumbing.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

/// Standard result type for tincture facade APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_preserve_messages() {
        let color = tincture_style::Rgba::parse("#GG0000").unwrap_err();
        let message = color.to_string();
        let err: Error = PaletteError::from(color).into();
        assert!(err.is_input_error());
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn config_errors_are_prefixed() {
        let err: Error = ConfigError::Validation(vec!["accent: bad".into()]).into();
        assert!(!err.is_input_error());
        assert_eq!(
            err.to_string(),
            "provider configuration: invalid provider config: accent: bad"
        );
    }

    #[test]
    fn question_mark_converts() {
        fn parse(tag: &str) -> Result<tincture_style::Theme> {
            Ok(tag.parse()?)
        }
        assert!(parse("dark").is_ok());
        assert!(matches!(parse("dim"), Err(Error::Theme(_))));
    }
}
