//! Typed leaf nodes.
//!
//! A leaf holds one machine value, its human rendering, and whether the
//! value has diverged from what the daemon last reported.
//!
//! Two writers touch a leaf:
//!
//! - [`Leaf::absorb_remote`]: the daemon's value. Always wins, clears
//!   `dirty`, and silently drops any unpushed local edit.
//! - [`Leaf::set`]: a local edit. Refused on read-only fields.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use hq_format::{FormatConfig, TypeTag};
use hq_path::Segment;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::spec::{Hooks, Prettifier, ScalarSpec, Transform};
use crate::value::{compare, equivalent};

/// A hook to install on a single leaf, replacing the schema default for that
/// leaf only.
#[derive(Clone)]
pub enum Hook {
    OnUpdate(Transform),
    OnWrite(Transform),
    Prettify(Prettifier),
}

impl Hook {
    pub fn on_update(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Hook::OnUpdate(Arc::new(f))
    }

    pub fn on_write(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Hook::OnWrite(Arc::new(f))
    }

    pub fn prettify(f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        Hook::Prettify(Arc::new(f))
    }
}

#[derive(Debug, Clone)]
pub struct Leaf {
    key: Segment,
    type_tag: TypeTag,
    mutable: bool,
    value: Value,
    /// Last value confirmed by the daemon (received or successfully pushed).
    confirmed: Value,
    pretty: String,
    dirty: bool,
    hooks: Hooks,
    format: Arc<FormatConfig>,
}

impl Leaf {
    /// Build a leaf from a raw daemon value (`Value::Null` when absent).
    pub fn new(
        key: impl Into<Segment>,
        raw: &Value,
        spec: &ScalarSpec,
        format: Arc<FormatConfig>,
    ) -> Self {
        let mut leaf = Self {
            key: key.into(),
            type_tag: spec.type_tag,
            mutable: spec.mutable,
            value: Value::Null,
            confirmed: Value::Null,
            pretty: String::new(),
            dirty: false,
            hooks: spec.hooks.clone(),
            format,
        };
        leaf.value = leaf.apply_on_update(raw);
        leaf.confirmed = leaf.value.clone();
        leaf.refresh();
        leaf
    }

    pub fn key(&self) -> &Segment {
        &self.key
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The machine-readable value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The human-readable rendering of [`Leaf::value`].
    pub fn human(&self) -> &str {
        &self.pretty
    }

    /// The value the daemon last confirmed.
    pub fn confirmed(&self) -> &Value {
        &self.confirmed
    }

    /// Absorb a value reported by the daemon.
    pub fn absorb_remote(&mut self, raw: &Value) {
        let incoming = self.apply_on_update(raw);
        if self.dirty {
            debug!(key = %self.key, "remote value replaces unpushed local edit");
        }
        if !equivalent(&incoming, &self.value) {
            self.value = incoming;
            self.refresh();
        }
        self.confirmed = self.value.clone();
        self.dirty = false;
    }

    /// Apply a local edit. Returns whether the machine value changed.
    ///
    /// Setting a leaf back to the daemon's confirmed value clears `dirty`.
    pub fn set(&mut self, value: impl Into<Value>) -> Result<bool> {
        if !self.mutable {
            return Err(Error::Immutable { path: self.key.to_string() });
        }
        let value = value.into();
        if equivalent(&value, &self.value) {
            return Ok(false);
        }
        self.value = value;
        self.refresh();
        self.dirty = !equivalent(&self.value, &self.confirmed);
        Ok(true)
    }

    /// Replace one hook on this leaf. A new prettifier re-renders at once.
    pub fn install_hook(&mut self, hook: Hook) {
        match hook {
            Hook::OnUpdate(f) => self.hooks.on_update = Some(f),
            Hook::OnWrite(f) => self.hooks.on_write = Some(f),
            Hook::Prettify(f) => {
                self.hooks.prettify = Some(f);
                self.refresh();
            }
        }
    }

    pub fn apply_on_update(&self, raw: &Value) -> Value {
        match &self.hooks.on_update {
            Some(f) => f(raw),
            None => raw.clone(),
        }
    }

    pub fn apply_on_write(&self, value: &Value) -> Value {
        match &self.hooks.on_write {
            Some(f) => f(value),
            None => value.clone(),
        }
    }

    pub fn apply_prettify(&self, value: &Value) -> String {
        match &self.hooks.prettify {
            Some(f) => f(value),
            None => self.type_tag.prettify(value, &self.format),
        }
    }

    /// The machine value as it goes into a patch.
    pub fn outgoing(&self) -> Value {
        self.apply_on_write(&self.value)
    }

    /// Record the current value as confirmed by the daemon.
    pub(crate) fn confirm(&mut self) {
        self.confirmed = self.value.clone();
        self.dirty = false;
    }

    fn refresh(&mut self) {
        self.pretty = self.apply_prettify(&self.value);
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    pub fn as_i64(&self) -> Option<i64> {
        hq_format::human::as_integer(&self.value)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty)
    }
}

// ── Comparisons delegate to the machine value ─────────────────────────────

impl PartialEq for Leaf {
    fn eq(&self, other: &Leaf) -> bool {
        equivalent(&self.value, &other.value)
    }
}

impl PartialOrd for Leaf {
    fn partial_cmp(&self, other: &Leaf) -> Option<Ordering> {
        compare(&self.value, &other.value)
    }
}

impl PartialEq<Value> for Leaf {
    fn eq(&self, other: &Value) -> bool {
        equivalent(&self.value, other)
    }
}

impl PartialOrd<Value> for Leaf {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        compare(&self.value, other)
    }
}

macro_rules! compare_with {
    ($($ty:ty),*) => {$(
        impl PartialEq<$ty> for Leaf {
            fn eq(&self, other: &$ty) -> bool {
                equivalent(&self.value, &Value::from(*other))
            }
        }

        impl PartialOrd<$ty> for Leaf {
            fn partial_cmp(&self, other: &$ty) -> Option<Ordering> {
                compare(&self.value, &Value::from(*other))
            }
        }
    )*};
}

compare_with!(i64, u64, f64, bool, &str);
