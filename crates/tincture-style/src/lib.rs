#![forbid(unsafe_code)]

//! Color and palette primitives for tincture.
//!
//! # Role in tincture
//! `tincture-style` is the pure half of the system: it parses accent colors,
//! performs the lightness and alpha math, and derives the UWP palette for a
//! given accent and [`Theme`]. It holds no state and knows nothing about
//! providers, subscriptions, or components; `tincture-runtime` builds the
//! reactive propagation on top of it.
//!
//! # This crate provides
//! - [`Rgba`] with CSS parsing, [`Rgba::darken`], [`Rgba::lighten`],
//!   [`Rgba::fade`], and the [`TextOn`] contrast test.
//! - [`Theme`] for the light/dark tag.
//! - [`Palette`], [`Role`], and [`derive_palette`].
//! - [`DEFAULT_ACCENT`] and the 48 stock [`DEFAULT_ACCENTS`].

/// Stock accent swatches.
pub mod accents;
/// Color parsing and accent math.
pub mod color;
/// Palette roles and derivation.
pub mod palette;
/// Light/dark theme tag.
pub mod theme;

pub use accents::{DEFAULT_ACCENT, DEFAULT_ACCENTS, default_accents, is_default_accent};
pub use color::{ColorParseError, Hsl, Rgba, TextOn};
pub use palette::{Palette, Role, derive_palette};
pub use theme::{Theme, ThemeParseError};
