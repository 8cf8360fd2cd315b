use std::sync::Arc;

use hq_format::FormatConfig;

use crate::registry::Schema;
use crate::transmission;

/// Shared, read-only inputs of every node: the schema the tree is built from
/// and the formatter configuration its leaves render with.
#[derive(Debug, Clone)]
pub struct Context {
    schema: Arc<Schema>,
    format: Arc<FormatConfig>,
}

impl Context {
    pub fn new(schema: Arc<Schema>, format: FormatConfig) -> Self {
        Self { schema, format: Arc::new(format) }
    }

    /// The built-in daemon schema with the given formatter settings.
    pub fn transmission(format: FormatConfig) -> Self {
        Self::new(transmission::schema(), format)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn format(&self) -> &Arc<FormatConfig> {
        &self.format
    }
}
