#![forbid(unsafe_code)]

//! Palette consumers: components that re-render when their palette changes.
//!
//! [`with_palette`] takes a projection `(state, local props) -> props` and
//! returns a [`PaletteWrapper`]. Wrapping a [`Component`] yields a
//! [`PaletteConsumer`], which resolves its effective accent and theme,
//! obtains the matching palette, runs the projection, and forwards the result
//! (overridden by the caller's own props) to the target.
//!
//! # Lifecycle
//!
//! ```text
//! wrap ──► constructed (unsubscribed) ──mount──► mounted ──unmount──► unmounted
//!                                         ▲                    │
//!                                         └────────mount───────┘
//! ```
//!
//! Construction always projects and renders once. While mounted under a
//! provider, every publish recomputes through a changed-fields gate: the
//! projection runs only if the effective accent, the effective theme, or a
//! hoisted ambient field differs from the previous recomputation.
//! [`PaletteConsumer::receive_props`] bypasses the gate when the local props
//! or the governing container actually changed.
//!
//! # Resolution
//!
//! For accent and theme, a non-empty local prop wins, then the nearest
//! provider's value, then [`DEFAULT_ACCENT`] and [`Theme::Light`].

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use tincture_style::{DEFAULT_ACCENT, Palette, Theme};
use tracing::{debug, warn};

use crate::ambient::{Ambient, AmbientValue};
use crate::equality::{map_equal, map_except};
use crate::error::PaletteError;
use crate::reactive::subject::Subscription;
use crate::value::{ACCENT_KEY, CHILDREN_KEY, Fields, PALETTE_KEY, Props, THEME_KEY, Value};

/// Something a consumer can render with forwarded props.
pub trait Component {
    /// Name used in [`PaletteConsumer::display_name`].
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    fn render(&mut self, props: &Props);
}

impl<F: FnMut(&Props)> Component for F {
    fn render(&mut self, props: &Props) {
        self(props);
    }
}

/// What a projection sees: the effective accent and theme, their palette,
/// and the ambient fields hoisted from the nearest provider.
#[derive(Debug, Clone)]
pub struct PaletteState {
    pub accent: String,
    pub theme: Theme,
    pub palette: Rc<Palette>,
    /// Provider fields, without the palette or child content.
    pub fields: Fields,
}

impl PaletteState {
    /// Look up a hoisted ambient field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

type Projection = Rc<dyn Fn(&PaletteState, &Props) -> Props>;

/// Build a wrapper factory around `projection`.
pub fn with_palette(
    projection: impl Fn(&PaletteState, &Props) -> Props + 'static,
) -> PaletteWrapper {
    PaletteWrapper {
        projection: Rc::new(projection),
    }
}

/// Factory produced by [`with_palette`]; reusable for any number of targets.
#[derive(Clone)]
pub struct PaletteWrapper {
    projection: Projection,
}

impl PaletteWrapper {
    /// A wrapper that forwards only the effective accent and theme.
    #[must_use]
    pub fn without_projection() -> Self {
        with_palette(|_, _| Props::new())
    }

    /// Wrap `target`, computing its effective state once and rendering it.
    ///
    /// The returned consumer is not subscribed; call
    /// [`PaletteConsumer::mount`] to follow the provider.
    pub fn wrap<C: Component + 'static>(
        &self,
        target: C,
        props: Props,
        ambient: &Ambient,
    ) -> Result<PaletteConsumer<C>, PaletteError> {
        let resolved = resolve(&props, ambient, ambient.value().as_ref(), None)?;
        let mut inner = ConsumerInner {
            target,
            projection: Rc::clone(&self.projection),
            props: Props::new(),
            ambient: ambient.clone(),
            hoisted: None,
            state: None,
            forwarded: Props::new(),
            projections: 0,
        };
        inner.commit(props, ambient, resolved);

        Ok(PaletteConsumer {
            inner: Rc::new(RefCell::new(inner)),
            mounted: false,
            subscription: None,
        })
    }
}

impl std::fmt::Debug for PaletteWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteWrapper").finish_non_exhaustive()
    }
}

/// Outcome of resolving local props against an ambient value.
struct Resolved {
    state: PaletteState,
    /// `state.fields` plus the effective accent and theme; the gate key.
    hoisted: Fields,
}

fn non_empty<'a>(props: &'a Props, key: &str) -> Option<&'a str> {
    props.get_str(key).filter(|s| !s.is_empty())
}

fn resolve(
    props: &Props,
    ambient: &Ambient,
    value: Option<&AmbientValue>,
    previous: Option<&PaletteState>,
) -> Result<Resolved, PaletteError> {
    let accent = non_empty(props, ACCENT_KEY)
        .or_else(|| value.map(|v| v.accent.as_str()))
        .unwrap_or(DEFAULT_ACCENT)
        .to_string();
    let theme = match non_empty(props, THEME_KEY) {
        Some(tag) => tag.parse::<Theme>()?,
        None => value.map_or(Theme::Light, |v| v.theme),
    };

    // Prefer a palette already in hand; the shared cache holds one pair.
    let palette = match (value, previous) {
        (Some(v), _) if v.accent == accent && v.theme == theme => Rc::clone(&v.palette),
        (_, Some(p)) if p.accent == accent && p.theme == theme => Rc::clone(&p.palette),
        _ => ambient.cache().derive(&accent, theme)?,
    };

    let fields = value
        .map(|v| map_except(&v.fields, &[PALETTE_KEY, CHILDREN_KEY]))
        .unwrap_or_default();
    let mut hoisted = fields.clone();
    hoisted.insert(ACCENT_KEY.to_string(), Value::from(accent.as_str()));
    hoisted.insert(THEME_KEY.to_string(), Value::from(theme));

    Ok(Resolved {
        state: PaletteState {
            accent,
            theme,
            palette,
            fields,
        },
        hoisted,
    })
}

struct ConsumerInner<C> {
    target: C,
    projection: Projection,
    props: Props,
    ambient: Ambient,
    hoisted: Option<Fields>,
    state: Option<PaletteState>,
    forwarded: Props,
    projections: u64,
}

impl<C: Component> ConsumerInner<C> {
    /// Recompute against `value`. Returns whether the target re-rendered.
    /// On error nothing is changed.
    fn apply(
        &mut self,
        props: Props,
        ambient: &Ambient,
        value: Option<&AmbientValue>,
        force: bool,
    ) -> Result<bool, PaletteError> {
        let resolved = resolve(&props, ambient, value, self.state.as_ref())?;
        if !force && map_equal(Some(&resolved.hoisted), self.hoisted.as_ref()) {
            debug!(
                target_name = self.target.name(),
                "palette consumer gated: nothing observable changed"
            );
            self.props = props;
            return Ok(false);
        }
        debug!(
            target_name = self.target.name(),
            accent = %resolved.state.accent,
            theme = resolved.state.theme.as_str(),
            force,
            "palette consumer recomputing"
        );
        self.commit(props, ambient, resolved);
        Ok(true)
    }

    fn commit(&mut self, props: Props, ambient: &Ambient, resolved: Resolved) {
        let Resolved { state, hoisted } = resolved;

        let mut projected = (self.projection)(&state, &props);
        projected.set(ACCENT_KEY, state.accent.as_str());
        projected.set(THEME_KEY, state.theme);
        let forwarded = projected.overlaid_with(&props);

        self.props = props;
        self.ambient = ambient.clone();
        self.hoisted = Some(hoisted);
        self.state = Some(state);
        self.forwarded = forwarded;
        self.projections += 1;
        self.target.render(&self.forwarded);
    }
}

/// A wrapped component following its nearest provider.
pub struct PaletteConsumer<C: Component + 'static> {
    inner: Rc<RefCell<ConsumerInner<C>>>,
    mounted: bool,
    subscription: Option<Subscription>,
}

impl<C: Component + 'static> PaletteConsumer<C> {
    fn subscribe(&mut self) {
        let container = self.inner.borrow().ambient.container().cloned();
        let Some(container) = container else {
            self.subscription = None;
            return;
        };
        let weak: Weak<RefCell<ConsumerInner<C>>> = Rc::downgrade(&self.inner);
        self.subscription = Some(container.subscribe(move |value| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let Ok(mut inner) = inner.try_borrow_mut() else {
                warn!("palette consumer busy during publish; update dropped");
                return;
            };
            let props = inner.props.clone();
            let ambient = inner.ambient.clone();
            if let Err(err) = inner.apply(props, &ambient, Some(value), false) {
                warn!(error = %err, "palette consumer failed to recompute");
            }
        }));
    }

    /// Start following the provider and pick up anything it published while
    /// this consumer was not subscribed. Calling this while mounted does
    /// nothing.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.subscribe();
        self.resync();
    }

    /// Catch up with publishes made while unsubscribed. Gated, so an
    /// unchanged container value does not re-render.
    fn resync(&mut self) {
        let current = self.inner.borrow().ambient.value();
        let Some(value) = current else {
            return;
        };
        let mut inner = self.inner.borrow_mut();
        let props = inner.props.clone();
        let ambient = inner.ambient.clone();
        if let Err(err) = inner.apply(props, &ambient, Some(&value), false) {
            warn!(error = %err, "palette consumer failed to resync on mount");
        }
    }

    /// Stop following the provider. Idempotent.
    pub fn unmount(&mut self) {
        self.mounted = false;
        if let Some(mut sub) = self.subscription.take() {
            sub.unsubscribe();
        }
    }

    /// New local props and (possibly different) ambient handle.
    ///
    /// Forces a recompute when the container changed or when `props` differ
    /// from the previous props; otherwise does nothing. On error the consumer
    /// keeps its previous props, state, and subscription.
    pub fn receive_props(&mut self, props: Props, ambient: &Ambient) -> Result<(), PaletteError> {
        let (container_changed, props_changed) = {
            let inner = self.inner.borrow();
            (
                !inner.ambient.same_container(ambient),
                !map_equal(Some(props.as_fields()), Some(inner.props.as_fields())),
            )
        };

        if !container_changed && !props_changed {
            return Ok(());
        }

        let value = ambient.value();
        self.inner
            .borrow_mut()
            .apply(props, ambient, value.as_ref(), true)?;

        if container_changed && self.mounted {
            debug!("palette consumer moved to a different container");
            if let Some(mut old) = self.subscription.take() {
                old.unsubscribe();
            }
            self.subscribe();
        }
        Ok(())
    }

    /// Props last forwarded to the target.
    #[must_use]
    pub fn forwarded_props(&self) -> Props {
        self.inner.borrow().forwarded.clone()
    }

    /// Effective state of the last recomputation.
    #[must_use]
    pub fn state(&self) -> Option<PaletteState> {
        self.inner.borrow().state.clone()
    }

    /// Local props as last received.
    #[must_use]
    pub fn props(&self) -> Props {
        self.inner.borrow().props.clone()
    }

    #[must_use]
    pub fn target(&self) -> Ref<'_, C> {
        Ref::map(self.inner.borrow(), |inner| &inner.target)
    }

    /// How many times the projection has run.
    #[must_use]
    pub fn projection_count(&self) -> u64 {
        self.inner.borrow().projections
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        format!("withPalette({})", self.inner.borrow().target.name())
    }
}

impl<C: Component + 'static> std::fmt::Debug for PaletteConsumer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PaletteConsumer")
            .field("target", &inner.target.name())
            .field("mounted", &self.mounted)
            .field("forwarded", &inner.forwarded)
            .field("projections", &inner.projections)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{PaletteProvider, ProviderProps};
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Swatch {
        renders: Vec<Props>,
    }

    impl Component for Swatch {
        fn render(&mut self, props: &Props) {
            self.renders.push(props.clone());
        }
    }

    fn background_projection() -> PaletteWrapper {
        with_palette(|state, _| Props::new().with("background", state.palette.background()))
    }

    fn provider(accent: &str, theme: Theme) -> PaletteProvider {
        PaletteProvider::new(ProviderProps::new(accent, theme), &Ambient::root()).unwrap()
    }

    #[test]
    fn construction_projects_and_renders_once() {
        let p = provider("#F00", Theme::Light);
        let consumer = background_projection()
            .wrap(Swatch::default(), Props::new(), &p.ambient())
            .unwrap();
        assert_eq!(consumer.projection_count(), 1);
        assert_eq!(consumer.target().renders.len(), 1);
        assert!(!consumer.is_mounted());
        assert!(!consumer.is_subscribed());

        let fwd = consumer.forwarded_props();
        assert_eq!(fwd.get_str("accent"), Some("#F00"));
        assert_eq!(fwd.get_str("theme"), Some("light"));
        assert_eq!(fwd.get_str("background"), Some("#FFF"));
    }

    #[test]
    fn reuses_provider_palette_when_accent_matches() {
        let p = provider("#F00", Theme::Dark);
        let consumer = background_projection()
            .wrap(Swatch::default(), Props::new(), &p.ambient())
            .unwrap();
        let state = consumer.state().unwrap();
        assert!(Rc::ptr_eq(&state.palette, &p.value().palette));
    }

    #[test]
    fn accent_and_theme_are_force_included() {
        let wrapper = with_palette(|_, _| Props::new().with("accent", "#123456").with("x", 1));
        let consumer = wrapper
            .wrap(Swatch::default(), Props::new(), &Ambient::root())
            .unwrap();
        let fwd = consumer.forwarded_props();
        assert_eq!(fwd.get_str("accent"), Some("#0078D7"));
        assert_eq!(fwd.get_str("theme"), Some("light"));
        assert_eq!(fwd.get("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn local_props_win_over_projection() {
        let wrapper = with_palette(|_, _| Props::new().with("label", "projected"));
        let consumer = wrapper
            .wrap(
                Swatch::default(),
                Props::new().with("label", "mine"),
                &Ambient::root(),
            )
            .unwrap();
        assert_eq!(consumer.forwarded_props().get_str("label"), Some("mine"));
    }

    #[test]
    fn empty_local_accent_falls_through() {
        let p = provider("#F00", Theme::Light);
        let consumer = PaletteWrapper::without_projection()
            .wrap(Swatch::default(), Props::new().with("accent", ""), &p.ambient())
            .unwrap();
        assert_eq!(consumer.state().unwrap().accent, "#F00");
    }

    #[test]
    fn invalid_local_theme_is_an_error() {
        let result = PaletteWrapper::without_projection().wrap(
            Swatch::default(),
            Props::new().with("theme", "sepia"),
            &Ambient::root(),
        );
        assert!(matches!(result, Err(PaletteError::Theme(_))));
    }

    #[test]
    fn mount_is_idempotent_and_unmount_releases() {
        let p = provider("#F00", Theme::Light);
        let container = p.ambient().container().cloned().unwrap();
        let mut consumer = background_projection()
            .wrap(Swatch::default(), Props::new(), &p.ambient())
            .unwrap();

        consumer.mount();
        consumer.mount();
        assert!(consumer.is_subscribed());
        assert_eq!(container.subscriber_count(), 1);

        consumer.unmount();
        consumer.unmount();
        assert!(!consumer.is_mounted());
        assert_eq!(container.subscriber_count(), 0);
    }

    #[test]
    fn mount_catches_up_with_publish_before_first_mount() {
        let mut p = provider("#F00", Theme::Light);
        let mut consumer = background_projection()
            .wrap(Swatch::default(), Props::new(), &p.ambient())
            .unwrap();
        p.set_theme(Theme::Dark).unwrap();
        assert_eq!(consumer.forwarded_props().get_str("theme"), Some("light"));

        consumer.mount();
        let fwd = consumer.forwarded_props();
        assert_eq!(fwd.get_str("theme"), Some("dark"));
        assert_eq!(fwd.get_str("background"), Some("#000"));
        assert_eq!(consumer.projection_count(), 2);
    }

    #[test]
    fn remount_without_changes_does_not_reproject() {
        let p = provider("#F00", Theme::Light);
        let mut consumer = background_projection()
            .wrap(Swatch::default(), Props::new(), &p.ambient())
            .unwrap();
        consumer.mount();
        consumer.unmount();
        consumer.mount();
        assert_eq!(consumer.projection_count(), 1);
        assert_eq!(consumer.target().renders.len(), 1);
    }

    #[test]
    fn pinned_accent_does_not_rederive_on_provider_publish() {
        let mut p = provider("#F00", Theme::Light);
        let mut consumer = background_projection()
            .wrap(Swatch::default(), Props::new().with("accent", "#999"), &p.ambient())
            .unwrap();
        consumer.mount();
        let pinned = consumer.state().unwrap().palette;
        let misses = p.ambient().cache().misses();

        p.set_accent("#0F0").unwrap();
        p.set_accent("#00F").unwrap();
        // Only the provider's own derivations miss.
        assert_eq!(p.ambient().cache().misses(), misses + 2);
        assert!(Rc::ptr_eq(&consumer.state().unwrap().palette, &pinned));
    }

    #[test]
    fn mount_without_provider_is_unsubscribed() {
        let mut consumer = PaletteWrapper::without_projection()
            .wrap(Swatch::default(), Props::new(), &Ambient::root())
            .unwrap();
        consumer.mount();
        assert!(consumer.is_mounted());
        assert!(!consumer.is_subscribed());
    }

    #[test]
    fn drop_releases_subscription() {
        let p = provider("#F00", Theme::Light);
        let container = p.ambient().container().cloned().unwrap();
        {
            let mut consumer = PaletteWrapper::without_projection()
                .wrap(Swatch::default(), Props::new(), &p.ambient())
                .unwrap();
            consumer.mount();
            assert_eq!(container.subscriber_count(), 1);
        }
        assert_eq!(container.subscriber_count(), 0);
    }

    #[test]
    fn equal_props_are_ignored() {
        let p = provider("#F00", Theme::Light);
        let props = Props::new().with("label", "a");
        let mut consumer = background_projection()
            .wrap(Swatch::default(), props.clone(), &p.ambient())
            .unwrap();
        consumer.receive_props(props, &p.ambient()).unwrap();
        assert_eq!(consumer.projection_count(), 1);
    }

    #[test]
    fn changed_props_force_recompute() {
        let p = provider("#F00", Theme::Light);
        let mut consumer = background_projection()
            .wrap(Swatch::default(), Props::new().with("label", "a"), &p.ambient())
            .unwrap();
        consumer
            .receive_props(Props::new().with("label", "b"), &p.ambient())
            .unwrap();
        assert_eq!(consumer.projection_count(), 2);
        assert_eq!(consumer.forwarded_props().get_str("label"), Some("b"));
    }

    #[test]
    fn failed_receive_props_keeps_previous_state() {
        let p = provider("#F00", Theme::Light);
        let mut consumer = background_projection()
            .wrap(Swatch::default(), Props::new(), &p.ambient())
            .unwrap();
        let err = consumer
            .receive_props(Props::new().with("accent", "nope"), &p.ambient())
            .unwrap_err();
        assert!(matches!(err, PaletteError::Color(_)));
        assert!(consumer.props().is_empty());
        assert_eq!(consumer.projection_count(), 1);
        assert_eq!(consumer.forwarded_props().get_str("accent"), Some("#F00"));
    }

    #[test]
    fn container_change_resubscribes() {
        let a = provider("#F00", Theme::Light);
        let b = provider("#00F", Theme::Dark);
        let mut consumer = background_projection()
            .wrap(Swatch::default(), Props::new(), &a.ambient())
            .unwrap();
        consumer.mount();

        consumer.receive_props(Props::new(), &b.ambient()).unwrap();
        assert_eq!(consumer.projection_count(), 2);
        assert_eq!(consumer.state().unwrap().accent, "#00F");
        assert_eq!(a.ambient().container().unwrap().subscriber_count(), 0);
        assert_eq!(b.ambient().container().unwrap().subscriber_count(), 1);
    }

    #[test]
    fn closures_are_components() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let consumer = PaletteWrapper::without_projection()
            .wrap(
                move |props: &Props| {
                    sink.borrow_mut()
                        .push(props.get_str("accent").map(str::to_string));
                },
                Props::new().with("accent", "#ABC"),
                &Ambient::root(),
            )
            .unwrap();
        assert_eq!(*seen.borrow(), vec![Some("#ABC".to_string())]);
        assert!(consumer.display_name().starts_with("withPalette("));
    }

    #[test]
    fn display_name_uses_target_name() {
        let consumer = PaletteWrapper::without_projection()
            .wrap(Swatch::default(), Props::new(), &Ambient::root())
            .unwrap();
        assert_eq!(consumer.display_name(), "withPalette(Swatch)");
    }

    #[test]
    #[traced_test]
    fn gated_publish_is_logged() {
        let mut p = provider("#F00", Theme::Light);
        let mut consumer = PaletteWrapper::without_projection()
            .wrap(Swatch::default(), Props::new().with("accent", "#999"), &p.ambient())
            .unwrap();
        consumer.mount();
        p.set_accent("#0F0").unwrap();
        assert_eq!(consumer.projection_count(), 1);
        assert!(logs_contain("gated"));
    }
}
