#![forbid(unsafe_code)]

//! The ambient channel: what a provider hands to its subtree.
//!
//! There is no global lookup. Each [`PaletteProvider`](crate::PaletteProvider)
//! produces an [`Ambient`] handle and callers pass it explicitly to every
//! descendant they construct. A nested provider produces its own handle, which
//! shadows its parent's for the subtree it is passed to.

use std::cell::RefCell;
use std::rc::Rc;

use tincture_style::{ColorParseError, Palette, Theme, derive_palette};

use crate::reactive::memo::Memoized;
use crate::reactive::subject::Subject;
use crate::value::Fields;

/// The record a provider publishes.
///
/// `palette` is always derived from the `accent` and `theme` stored next to
/// it. `fields` never contains the accent, theme, or palette.
#[derive(Debug, Clone)]
pub struct AmbientValue {
    pub accent: String,
    pub theme: Theme,
    pub palette: Rc<Palette>,
    pub fields: Fields,
}

type DeriveFn = fn(&(String, Theme)) -> Result<Rc<Palette>, ColorParseError>;

fn derive_shared((accent, theme): &(String, Theme)) -> Result<Rc<Palette>, ColorParseError> {
    derive_palette(accent, *theme).map(Rc::new)
}

/// Shared single-generation palette deriver.
///
/// Clones share one cache, so a provider and every consumer under it reuse
/// the same `Rc<Palette>` whenever they ask for the pair derived last.
#[derive(Clone)]
pub struct PaletteCache {
    memo: Rc<RefCell<Memoized<(String, Theme), Rc<Palette>, DeriveFn>>>,
}

impl PaletteCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            memo: Rc::new(RefCell::new(Memoized::new(derive_shared as DeriveFn))),
        }
    }

    /// Palette for `(accent, theme)`, pointer-identical to the previous
    /// result when the pair repeats.
    pub fn derive(&self, accent: &str, theme: Theme) -> Result<Rc<Palette>, ColorParseError> {
        self.memo
            .borrow_mut()
            .try_call((accent.to_string(), theme))
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.memo.borrow().hits()
    }

    #[must_use]
    pub fn misses(&self) -> u64 {
        self.memo.borrow().misses()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.memo, &other.memo)
    }
}

impl Default for PaletteCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PaletteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteCache")
            .field("memo", &*self.memo.borrow())
            .finish()
    }
}

/// Handle to the nearest provider's container, or to none.
#[derive(Debug, Clone, Default)]
pub struct Ambient {
    container: Option<Subject<AmbientValue>>,
    cache: PaletteCache,
}

impl Ambient {
    /// No provider above; consumers fall back to props and defaults.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    pub(crate) fn provided(container: Subject<AmbientValue>, cache: PaletteCache) -> Self {
        Self {
            container: Some(container),
            cache,
        }
    }

    #[must_use]
    pub fn container(&self) -> Option<&Subject<AmbientValue>> {
        self.container.as_ref()
    }

    #[must_use]
    pub fn cache(&self) -> &PaletteCache {
        &self.cache
    }

    #[must_use]
    pub fn is_provided(&self) -> bool {
        self.container.is_some()
    }

    /// Current value of the container, if there is one.
    #[must_use]
    pub fn value(&self) -> Option<AmbientValue> {
        self.container.as_ref().map(Subject::get)
    }

    /// Whether both handles point at the same container (or both at none).
    #[must_use]
    pub fn same_container(&self, other: &Ambient) -> bool {
        match (&self.container, &other.container) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}
