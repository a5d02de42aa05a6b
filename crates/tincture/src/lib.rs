#![forbid(unsafe_code)]

//! tincture public facade crate.
//!
//! Re-exports the palette deriver from `tincture-style` and the reactive
//! provider/consumer machinery from `tincture-runtime`, plus a prelude for
//! day-to-day usage.
//!
//! ```rust,ignore
//! use tincture::prelude::*;
//!
//! let provider = PaletteProvider::new(
//!     ProviderProps::new("#E81123", Theme::Dark),
//!     &Ambient::root(),
//! )?;
//! let swatch = with_palette(|state, _| {
//!     Props::new().with("background", state.palette.background())
//! });
//! let mut consumer = swatch.wrap(|props: &Props| println!("{props:?}"), Props::new(), &provider.ambient())?;
//! consumer.mount();
//! ```

pub mod error;

// --- Style re-exports ------------------------------------------------------

pub use tincture_style::{
    ColorParseError, DEFAULT_ACCENT, DEFAULT_ACCENTS, Palette, Rgba, Role, TextOn, Theme,
    ThemeParseError, default_accents, derive_palette, is_default_accent,
};

// --- Runtime re-exports ----------------------------------------------------

pub use tincture_runtime::{
    Ambient, AmbientValue, Component, ConfigError, PaletteCache, PaletteConsumer, PaletteError,
    PaletteProvider, PaletteState, PaletteWrapper, Props, ProviderConfig, ProviderProps, Subject,
    Subscription, Value, with_palette,
};

pub use error::{Error, Result};

/// Everything needed to provide and consume palettes.
pub mod prelude {
    pub use crate::{
        Ambient, Component, Error, PaletteProvider, PaletteState, Props, ProviderProps, Result,
        Role, Theme, with_palette,
    };

    pub use crate::{runtime, style};
}

pub use tincture_runtime as runtime;
pub use tincture_style as style;
