#![forbid(unsafe_code)]

//! Field values and property bags.
//!
//! A [`Value`] is one slot of a [`Fields`] map. Equality is shallow: scalar
//! slots compare by value, while [`Value::Palette`] and [`Value::Shared`]
//! compare by pointer identity, so two maps are equal only if they hold the
//! *same* shared objects, not merely equal ones.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tincture_style::{Palette, Theme};

/// Key carrying the accent color in props and hoisted fields.
pub const ACCENT_KEY: &str = "accent";
/// Key carrying the theme tag in props and hoisted fields.
pub const THEME_KEY: &str = "theme";
/// Key carrying the derived palette; never part of a comparison.
pub const PALETTE_KEY: &str = "palette";
/// Key carrying nested child content; never part of a comparison.
pub const CHILDREN_KEY: &str = "children";

/// Ordered field map.
pub type Fields = BTreeMap<String, Value>;

/// A single field slot.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// A derived palette, compared by identity.
    Palette(Rc<Palette>),
    /// Arbitrary shared data (child content, handles), compared by identity.
    Shared(Rc<dyn Any>),
}

impl Value {
    /// Wrap arbitrary data in a [`Value::Shared`] slot.
    #[must_use]
    pub fn shared<T: Any>(value: T) -> Self {
        Self::Shared(Rc::new(value))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_palette(&self) -> Option<&Rc<Palette>> {
        match self {
            Self::Palette(p) => Some(p),
            _ => None,
        }
    }

    /// Borrow the payload of a [`Value::Shared`] slot as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Shared(any) => any.downcast_ref(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Palette(a), Self::Palette(b)) => Rc::ptr_eq(a, b),
            (Self::Shared(a), Self::Shared(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Palette(p) => write!(f, "Palette({}, {})", p.accent(), p.theme()),
            Self::Shared(any) => write!(f, "Shared({:p})", Rc::as_ptr(any)),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<Theme> for Value {
    fn from(value: Theme) -> Self {
        Self::Str(Rc::from(value.as_str()))
    }
}

impl From<Rc<Palette>> for Value {
    fn from(value: Rc<Palette>) -> Self {
        Self::Palette(value)
    }
}

/// Property bag handed to and forwarded by components.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props(Fields);

impl Props {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn as_fields(&self) -> &Fields {
        &self.0
    }

    #[must_use]
    pub fn into_fields(self) -> Fields {
        self.0
    }

    /// A copy of `self` with every entry of `top` written over it.
    #[must_use]
    pub fn overlaid_with(&self, top: &Props) -> Props {
        let mut merged = self.0.clone();
        merged.extend(top.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Props(merged)
    }
}

impl From<Fields> for Props {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tincture_style::derive_palette;

    #[test]
    fn scalars_compare_by_value() {
        assert_eq!(Value::from("abc"), Value::from(String::from("abc")));
        assert_eq!(Value::from(123), Value::Int(123));
        assert_ne!(Value::from(1), Value::from(1.0));
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn shared_slots_compare_by_identity() {
        let data = Rc::new(vec![1, 2, 3]) as Rc<dyn Any>;
        let a = Value::Shared(Rc::clone(&data));
        let b = Value::Shared(Rc::clone(&data));
        assert_eq!(a, b);
        assert_ne!(Value::shared(vec![1, 2, 3]), Value::shared(vec![1, 2, 3]));
    }

    #[test]
    fn palettes_compare_by_identity() {
        let p = Rc::new(derive_palette("#F00", Theme::Light).unwrap());
        let q = Rc::new(derive_palette("#F00", Theme::Light).unwrap());
        assert_eq!(Value::from(Rc::clone(&p)), Value::from(Rc::clone(&p)));
        assert_ne!(Value::from(p), Value::from(q));
    }

    #[test]
    fn downcast_shared_payload() {
        let v = Value::shared(String::from("child"));
        assert_eq!(v.downcast_ref::<String>().map(String::as_str), Some("child"));
        assert!(v.downcast_ref::<i32>().is_none());
        assert!(Value::from(1).downcast_ref::<i32>().is_none());
    }

    #[test]
    fn props_builder_and_overlay() {
        let base = Props::new().with("accent", "#F00").with("size", 4);
        let top = Props::new().with("accent", "#999");
        let merged = base.overlaid_with(&top);
        assert_eq!(merged.get_str("accent"), Some("#999"));
        assert_eq!(merged.get("size").and_then(Value::as_int), Some(4));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn props_from_iter() {
        let props: Props = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(props.len(), 2);
        assert!(props.contains_key("b"));
    }
}
