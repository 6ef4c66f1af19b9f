//! Virtual node properties.
//!
//! A property is either a plain value assigned to the live node or an event
//! listener binding. Which one a key denotes is decided by the key alone: keys
//! starting with [`LISTENER_PREFIX`] bind listeners, everything else is an
//! attribute.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dom::Event;

/// Prefix marking a property key as an event-listener binding.
pub const LISTENER_PREFIX: &str = "on";

/// Ordered property map of a virtual node.
pub type Properties = IndexMap<String, Prop>;

/// Return the event name bound by `key`, if `key` is a listener key.
///
/// The prefix is stripped and the remainder lower-cased, so `onClick`
/// binds `click`. A bare `on` is not a listener key.
pub fn listener_event(key: &str) -> Option<String> {
    key.strip_prefix(LISTENER_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(str::to_lowercase)
}

/// A plain attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Bool(bool),
    Number(f64),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(text) => f.write_str(text),
            AttrValue::Bool(value) => write!(f, "{value}"),
            AttrValue::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Number(f64::from(value))
    }
}

/// An event-listener callback.
///
/// Two listeners are equal only if they share the same allocation. This is
/// the reference that gets attached to a live node, and detaching requires
/// presenting the same reference again.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Event)>);

impl Listener {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Event) + 'static,
    {
        Self(Rc::new(callback))
    }

    /// Invoke the callback.
    pub fn call(&self, event: &Event) {
        (self.0)(event);
    }

    /// Whether both handles refer to the same callback.
    pub fn ptr_eq(&self, other: &Listener) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// A single property value on a virtual node.
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    Value(AttrValue),
    Listener(Listener),
}

impl From<Listener> for Prop {
    fn from(listener: Listener) -> Self {
        Prop::Listener(listener)
    }
}

impl From<AttrValue> for Prop {
    fn from(value: AttrValue) -> Self {
        Prop::Value(value)
    }
}

impl From<&str> for Prop {
    fn from(value: &str) -> Self {
        Prop::Value(value.into())
    }
}

impl From<String> for Prop {
    fn from(value: String) -> Self {
        Prop::Value(value.into())
    }
}

impl From<&String> for Prop {
    fn from(value: &String) -> Self {
        Prop::Value(value.as_str().into())
    }
}

impl From<bool> for Prop {
    fn from(value: bool) -> Self {
        Prop::Value(value.into())
    }
}

impl From<f64> for Prop {
    fn from(value: f64) -> Self {
        Prop::Value(value.into())
    }
}

impl From<i32> for Prop {
    fn from(value: i32) -> Self {
        Prop::Value(value.into())
    }
}

/// Build a [`Properties`] map from `key => value` pairs.
///
/// Values go through `Prop::from`, so strings, numbers, booleans and
/// [`Listener`]s can be mixed freely.
#[macro_export]
macro_rules! props {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut properties = $crate::vdom::Properties::new();
        $(
            properties.insert(
                ::std::string::String::from($key),
                $crate::vdom::Prop::from($value),
            );
        )*
        properties
    }};
}
