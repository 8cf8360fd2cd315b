//! Field specifications: the authored schema shape.
//!
//! A field is either a scalar leaf (type tag, mutability, hooks) or a
//! container whose children share specifications:
//!
//! | variant   | children addressed by | child spec                |
//! |-----------|-----------------------|---------------------------|
//! | `Scalar`  | -                     | -                         |
//! | `Record`  | named key             | per-key entry in `Fields` |
//! | `List`    | position              | one element spec for all  |
//! | `Map`     | arbitrary key         | one element spec for all  |

use std::fmt;
use std::sync::Arc;

use hq_format::TypeTag;
use hq_path::Segment;
use indexmap::IndexMap;
use serde_json::Value;

/// Machine-value transform used for update and write hooks.
pub type Transform = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Machine-value to display-string hook.
pub type Prettifier = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Optional per-field hooks. Unset hooks mean identity (update, write) or the
/// built-in rendering for the type tag (prettify).
#[derive(Clone, Default)]
pub struct Hooks {
    pub on_update: Option<Transform>,
    pub on_write: Option<Transform>,
    pub prettify: Option<Prettifier>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_update", &self.on_update.is_some())
            .field("on_write", &self.on_write.is_some())
            .field("prettify", &self.prettify.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ScalarSpec {
    pub type_tag: TypeTag,
    pub mutable: bool,
    pub hooks: Hooks,
}

impl ScalarSpec {
    pub fn new(type_tag: TypeTag, mutable: bool) -> Self {
        Self { type_tag, mutable, hooks: Hooks::default() }
    }

    /// Transform applied to every raw value arriving from the daemon.
    pub fn on_update(mut self, hook: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.hooks.on_update = Some(Arc::new(hook));
        self
    }

    /// Transform applied to the machine value when it is written into a patch.
    pub fn on_write(mut self, hook: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.hooks.on_write = Some(Arc::new(hook));
        self
    }

    pub fn prettify(mut self, hook: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.hooks.prettify = Some(Arc::new(hook));
        self
    }
}

/// Named children of a record.
pub type Fields = IndexMap<String, FieldSpec>;

#[derive(Debug, Clone)]
pub enum FieldSpec {
    Scalar(ScalarSpec),
    Record(Fields),
    List(Box<FieldSpec>),
    Map(Box<FieldSpec>),
}

impl FieldSpec {
    pub fn scalar(type_tag: TypeTag, mutable: bool) -> Self {
        FieldSpec::Scalar(ScalarSpec::new(type_tag, mutable))
    }

    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, FieldSpec)>) -> Self {
        FieldSpec::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn list(element: impl Into<FieldSpec>) -> Self {
        FieldSpec::List(Box::new(element.into()))
    }

    pub fn map(element: impl Into<FieldSpec>) -> Self {
        FieldSpec::Map(Box::new(element.into()))
    }

    /// The specification of the child at `key`, if this field has one there.
    ///
    /// Records only answer named keys, lists only positions, maps any key.
    pub fn child(&self, key: &Segment) -> Option<&FieldSpec> {
        match (self, key) {
            (FieldSpec::Record(fields), Segment::Key(name)) => fields.get(name),
            (FieldSpec::List(element), Segment::Index(_)) => Some(element),
            (FieldSpec::Map(element), Segment::Key(_)) => Some(element),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarSpec> {
        match self {
            FieldSpec::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        !matches!(self, FieldSpec::Scalar(_))
    }

    /// Whether children are positional.
    pub fn is_sequence(&self) -> bool {
        matches!(self, FieldSpec::List(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FieldSpec::Scalar(_) => "scalar",
            FieldSpec::Record(_) => "record",
            FieldSpec::List(_) => "list",
            FieldSpec::Map(_) => "map",
        }
    }
}

impl From<ScalarSpec> for FieldSpec {
    fn from(spec: ScalarSpec) -> Self {
        FieldSpec::Scalar(spec)
    }
}
