use serde::{Deserialize, Serialize};

/// Attributes of a resource tag in a template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceTagAttributes {
    /// Bundle name, e.g. `lib.js`
    pub name: String,
    /// Path prefix the files are mapped under, e.g. `/js/`
    pub mapping_prefix: String,
    pub files: Vec<String>,
    /// Forces bundled or unbundled output; `None` defers to configuration
    pub bundle: Option<bool>,
}

impl ResourceTagAttributes {
    pub fn new(
        name: impl Into<String>,
        mapping_prefix: impl Into<String>,
        files: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mapping_prefix: mapping_prefix.into(),
            files,
            bundle: None,
        }
    }

    pub fn with_bundle(mut self, bundle: bool) -> Self {
        self.bundle = Some(bundle);
        self
    }
}
