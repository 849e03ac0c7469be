//! Properties handed to views
//!
//! [`Props`] is an insertion-ordered map from key to [`PropValue`]. Values are
//! compared by identity, never deeply: scalars by value and shared values by
//! pointer. That is what makes [`shallow_equal`] cheap enough to run on every
//! store notification.

use indexmap::IndexMap;
use mini_redux::DispatchResult;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A callback prop, typically produced by a dispatch mapping
pub type Callback<Args> = Rc<dyn Fn(Args) -> DispatchResult>;

/// A single property value
#[derive(Clone)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// Any shared value; compared by pointer
    Shared(Rc<dyn Any>),
}

impl PropValue {
    /// Share an existing `Rc`, keeping its identity
    pub fn shared<T: Any>(value: Rc<T>) -> Self {
        PropValue::Shared(value)
    }

    /// Wrap a callback so it can be stored in props
    pub fn callback<Args, F>(callback: F) -> Self
    where
        Args: 'static,
        F: Fn(Args) -> DispatchResult + 'static,
    {
        let callback: Callback<Args> = Rc::new(callback);
        PropValue::Shared(Rc::new(callback))
    }

    /// Identity comparison with `Object.is` semantics
    ///
    /// `NaN` is identical to itself and `0.0` is not identical to `-0.0`.
    pub fn is(&self, other: &PropValue) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b && a.is_sign_negative() == b.is_sign_negative()
                }
            }
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Shared(a), PropValue::Shared(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(value) => Some(value),
            _ => None,
        }
    }

    /// The shared value, if it has type `T`
    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        match self {
            PropValue::Shared(value) => Rc::clone(value).downcast::<T>().ok(),
            _ => None,
        }
    }

    /// The callback, if this holds one taking `Args`
    pub fn as_callback<Args: 'static>(&self) -> Option<Callback<Args>> {
        self.downcast::<Callback<Args>>().map(|callback| Rc::clone(&*callback))
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => f.write_str("Null"),
            PropValue::Bool(value) => write!(f, "Bool({})", value),
            PropValue::Int(value) => write!(f, "Int({})", value),
            PropValue::Float(value) => write!(f, "Float({})", value),
            PropValue::Str(value) => write!(f, "Str({:?})", value),
            PropValue::Shared(value) => write!(f, "Shared({:p})", Rc::as_ptr(value)),
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(i64::from(value))
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        PropValue::Int(i64::from(value))
    }
}

impl From<u64> for PropValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => PropValue::Int(value),
            Err(_) => PropValue::Float(value as f64),
        }
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(Rc::from(value))
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(Rc::from(value))
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropValue::Null, Into::into)
    }
}

/// An ordered set of named properties
#[derive(Clone, Default)]
pub struct Props {
    entries: IndexMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Props::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`; an existing key keeps its position and takes the new value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(PropValue::as_int)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropValue::as_str)
    }

    pub fn get_shared<T: Any>(&self, key: &str) -> Option<Rc<T>> {
        self.get(key).and_then(PropValue::downcast::<T>)
    }

    pub fn callback<Args: 'static>(&self, key: &str) -> Option<Callback<Args>> {
        self.get(key).and_then(PropValue::as_callback::<Args>)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `other` into `self`, `other` winning on collisions
    pub fn extend_from(&mut self, other: &Props) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Compare two prop sets one level deep
///
/// Equal when both have the same keys and every value is identical
/// ([`PropValue::is`]). Key order does not matter.
pub fn shallow_equal(a: &Props, b: &Props) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    if a.len() != b.len() {
        return false;
    }
    a.entries
        .iter()
        .all(|(key, value)| b.entries.get(key).is_some_and(|other| value.is(other)))
}

/// Combine the three prop sources: own props, then state props, then dispatch props
pub fn merge_props(own_props: &Props, state_props: &Props, dispatch_props: &Props) -> Props {
    let mut merged = own_props.clone();
    merged.extend_from(state_props);
    merged.extend_from(dispatch_props);
    merged
}
