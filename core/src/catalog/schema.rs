use serde::Serialize;

/// One comparable attribute of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpecFieldDescriptor {
    /// Key into [`super::SpecMap`].
    pub key: &'static str,
    pub label: &'static str,
    /// Whether values support magnitude comparison.
    pub is_numeric: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
}

impl SpecFieldDescriptor {
    const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            is_numeric: false,
            unit: None,
        }
    }

    const fn numeric(key: &'static str, label: &'static str, unit: &'static str) -> Self {
        Self {
            key,
            label,
            is_numeric: true,
            unit: Some(unit),
        }
    }
}

/// The comparable spec fields, in display order.
pub const SPEC_FIELDS: &[SpecFieldDescriptor] = &[
    SpecFieldDescriptor::text("cpu", "CPU"),
    SpecFieldDescriptor::text("gpu", "GPU"),
    SpecFieldDescriptor::numeric("display_size", "Screen size", "in"),
    SpecFieldDescriptor::text("display_type", "Display type"),
    SpecFieldDescriptor::numeric("ram", "RAM", "GB"),
    SpecFieldDescriptor::numeric("rom", "ROM", "GB"),
    SpecFieldDescriptor::numeric("battery", "Battery", "mAh"),
];

/// Look up a descriptor by key.
pub fn field(key: &str) -> Option<&'static SpecFieldDescriptor> {
    SPEC_FIELDS.iter().find(|f| f.key == key)
}
