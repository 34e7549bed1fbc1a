//! Entity definitions.

use serde::Serialize;

use super::field::FieldDef;
use super::EntityKind;

/// An entity definition (table schema).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDef {
    /// Kind this definition describes.
    pub kind: EntityKind,
    /// Field definitions, in form order.
    pub fields: Vec<FieldDef>,
    /// Default ordering for listings without explicit order.
    pub default_order: Vec<OrderBy>,
}

/// Order specification for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    /// Field name to order by.
    pub field: String,
    /// Sort direction.
    pub direction: OrderDirection,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
            default_order: Vec::new(),
        }
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the default ordering.
    pub fn with_default_order(mut self, order: impl IntoIterator<Item = OrderBy>) -> Self {
        self.default_order = order.into_iter().collect();
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get all reference fields.
    pub fn reference_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.field_type.is_reference())
    }
}

impl OrderBy {
    /// Create ascending order.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Create descending order.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Desc,
        }
    }

    /// Parse `field` or `-field` (descending).
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        match spec.strip_prefix('-') {
            Some(field) => Self::desc(field),
            None => Self::asc(spec),
        }
    }

    /// Parse a comma-separated list such as `last_name,-first_name`.
    pub fn parse_list(spec: &str) -> Vec<Self> {
        spec.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }
}
