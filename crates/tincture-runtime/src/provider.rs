#![forbid(unsafe_code)]

//! Palette provider: owns the container its subtree observes.
//!
//! A [`PaletteProvider`] derives a palette from its accent and theme, seeds a
//! [`Subject<AmbientValue>`] with it, and republishes whenever the accent or
//! theme changes. Descendants receive the container through
//! [`PaletteProvider::ambient`].
//!
//! # Nesting
//!
//! A provider built under another provider's [`Ambient`] shares its parent's
//! [`PaletteCache`] and inherits the parent's extra fields. It subscribes to
//! the parent container so that inherited fields stay current, but its own
//! accent and theme always win, and its subtree only ever observes its own
//! container.
//!
//! # Invariants
//!
//! 1. The published palette always matches the published accent and theme.
//! 2. `set_props` with unchanged accent and theme never publishes.
//! 3. A failed `set_props` leaves props and container untouched.

use std::cell::RefCell;
use std::rc::Rc;

use tincture_style::{DEFAULT_ACCENT, Theme};
use tracing::{debug, trace};

use crate::ambient::{Ambient, AmbientValue, PaletteCache};
use crate::equality::map_equal;
use crate::error::PaletteError;
use crate::reactive::subject::{Subject, Subscription};
use crate::value::{Fields, Value};

/// Construction parameters for a [`PaletteProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProps {
    pub accent: String,
    pub theme: Theme,
    /// Extra ambient fields hoisted to every consumer below.
    pub fields: Fields,
}

impl ProviderProps {
    #[must_use]
    pub fn new(accent: impl Into<String>, theme: Theme) -> Self {
        Self {
            accent: accent.into(),
            theme,
            fields: Fields::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

impl Default for ProviderProps {
    fn default() -> Self {
        Self::new(DEFAULT_ACCENT, Theme::Light)
    }
}

struct ProviderState {
    props: ProviderProps,
    /// Fields published by the parent provider, if nested.
    inherited: Fields,
}

impl ProviderState {
    fn merged_fields(&self) -> Fields {
        let mut fields = self.inherited.clone();
        fields.extend(
            self.props
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        fields
    }
}

/// Owner of one ambient container.
pub struct PaletteProvider {
    state: Rc<RefCell<ProviderState>>,
    subject: Subject<AmbientValue>,
    cache: PaletteCache,
    parent_subscription: Option<Subscription>,
}

impl PaletteProvider {
    /// Build a provider beneath `parent` (use [`Ambient::root`] at the top).
    ///
    /// Fails if `props.accent` is not a parseable color.
    pub fn new(props: ProviderProps, parent: &Ambient) -> Result<Self, PaletteError> {
        let cache = parent.cache().clone();
        let palette = cache.derive(&props.accent, props.theme)?;
        let state = ProviderState {
            inherited: parent.value().map(|v| v.fields).unwrap_or_default(),
            props,
        };
        let seed = AmbientValue {
            accent: state.props.accent.clone(),
            theme: state.props.theme,
            palette,
            fields: state.merged_fields(),
        };
        debug!(
            accent = %seed.accent,
            theme = seed.theme.as_str(),
            nested = parent.is_provided(),
            "palette provider created"
        );

        let subject = Subject::new(seed);
        let state = Rc::new(RefCell::new(state));
        let parent_subscription = parent
            .container()
            .map(|container| Self::follow_parent(container, &state, &subject));

        Ok(Self {
            state,
            subject,
            cache,
            parent_subscription,
        })
    }

    fn follow_parent(
        container: &Subject<AmbientValue>,
        state: &Rc<RefCell<ProviderState>>,
        subject: &Subject<AmbientValue>,
    ) -> Subscription {
        let weak_state = Rc::downgrade(state);
        let subject = subject.clone();
        container.subscribe(move |parent_value| {
            let Some(state) = weak_state.upgrade() else {
                return;
            };
            let merged = {
                let mut state = state.borrow_mut();
                state.inherited = parent_value.fields.clone();
                state.merged_fields()
            };
            let current = subject.get();
            if map_equal(Some(&merged), Some(&current.fields)) {
                trace!("parent publish left inherited fields unchanged");
                return;
            }
            subject.publish(AmbientValue {
                fields: merged,
                ..current
            });
        })
    }

    /// Apply new props. Publishes a freshly derived record when the accent
    /// or theme changed; other field changes ride along on the next publish.
    pub fn set_props(&mut self, props: ProviderProps) -> Result<(), PaletteError> {
        let changed = {
            let state = self.state.borrow();
            state.props.accent != props.accent || state.props.theme != props.theme
        };

        if !changed {
            trace!("provider props unchanged; not publishing");
            self.state.borrow_mut().props = props;
            return Ok(());
        }

        let palette = self.cache.derive(&props.accent, props.theme)?;
        let next = {
            let mut state = self.state.borrow_mut();
            state.props = props;
            AmbientValue {
                accent: state.props.accent.clone(),
                theme: state.props.theme,
                palette,
                fields: state.merged_fields(),
            }
        };
        debug!(
            accent = %next.accent,
            theme = next.theme.as_str(),
            "provider publishing palette"
        );
        self.subject.publish(next);
        Ok(())
    }

    /// Convenience for changing only the accent.
    pub fn set_accent(&mut self, accent: impl Into<String>) -> Result<(), PaletteError> {
        let props = ProviderProps {
            accent: accent.into(),
            ..self.props()
        };
        self.set_props(props)
    }

    /// Convenience for changing only the theme.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), PaletteError> {
        let props = ProviderProps {
            theme,
            ..self.props()
        };
        self.set_props(props)
    }

    /// Channel handle for this provider's subtree.
    #[must_use]
    pub fn ambient(&self) -> Ambient {
        Ambient::provided(self.subject.clone(), self.cache.clone())
    }

    #[must_use]
    pub fn props(&self) -> ProviderProps {
        self.state.borrow().props.clone()
    }

    /// The record currently visible to descendants.
    #[must_use]
    pub fn value(&self) -> AmbientValue {
        self.subject.get()
    }

    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.parent_subscription.is_some()
    }
}

impl std::fmt::Debug for PaletteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PaletteProvider")
            .field("accent", &state.props.accent)
            .field("theme", &state.props.theme)
            .field("subscribers", &self.subject.subscriber_count())
            .field("nested", &self.parent_subscription.is_some())
            .finish()
    }
}
