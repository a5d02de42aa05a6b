#![forbid(unsafe_code)]

//! Reactive palette propagation for tincture.
//!
//! # Key Components
//!
//! - [`Subject`] - Observable value container with snapshot-at-publish
//!   notification
//! - [`Memoized`] - One-entry cache with an injected equality predicate
//! - [`PaletteProvider`] - Owns the container its subtree observes
//! - [`with_palette`] - Builds wrappers that project a palette into a
//!   component's props
//! - [`Ambient`] - Explicit channel handed from a provider to its descendants
//!
//! # Role in tincture
//! `tincture-runtime` sits on top of `tincture-style`. The style crate knows
//! how to derive a palette; this crate decides *when* to derive one and who
//! gets told. Everything is single-threaded and synchronous: a publish runs
//! every affected consumer's recomputation before returning.
//!
//! # How it fits in the system
//! A host builds a [`PaletteProvider`] under [`Ambient::root`], then passes
//! [`PaletteProvider::ambient`] to every component it constructs below it.
//! Consumers mount to follow the provider and unmount (or drop) to stop.

pub mod ambient;
pub mod config;
pub mod consumer;
pub mod equality;
pub mod error;
pub mod provider;
pub mod reactive;
pub mod value;

pub use ambient::{Ambient, AmbientValue, PaletteCache};
pub use config::{ConfigError, ConfigValue, ProviderConfig};
pub use consumer::{Component, PaletteConsumer, PaletteState, PaletteWrapper, with_palette};
pub use equality::{map_equal, map_except, seq_equal};
pub use error::PaletteError;
pub use provider::{PaletteProvider, ProviderProps};
pub use reactive::{Memoized, Subject, Subscription};
pub use value::{ACCENT_KEY, CHILDREN_KEY, Fields, PALETTE_KEY, Props, THEME_KEY, Value};
