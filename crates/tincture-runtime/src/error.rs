#![forbid(unsafe_code)]

//! Errors raised while deriving or resolving a palette.

use tincture_style::{ColorParseError, ThemeParseError};

/// A provider or consumer was given an accent or theme it cannot use.
///
/// Whenever one of these is returned, the provider or consumer keeps the
/// state it had before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    #[error(transparent)]
    Color(#[from] ColorParseError),
    #[error(transparent)]
    Theme(#[from] ThemeParseError),
}
