//! Field metadata variants an admin form or list is built from.
//!
//! The set of variants is closed: converting metadata into a request is an
//! exhaustive `match`, so adding a variant here is a compile error until every
//! consumer handles it.

use serde::{Deserialize, Serialize};

use super::dto::PersistencePerspective;

/// A single scalar field, possibly a lookup to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicFieldMetadata {
    pub name: String,
    /// Target entity when the field is a to-one lookup
    pub foreign_key_class: Option<String>,
    pub custom_criteria: Vec<String>,
}

/// A one-to-many collection reached through a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicCollectionMetadata {
    pub name: String,
    pub collection_ceiling_entity: String,
    pub persistence_perspective: PersistencePerspective,
    pub custom_criteria: Vec<String>,
}

/// A collection mediated by a join entity carrying extra fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdornedTargetCollectionMetadata {
    pub name: String,
    pub collection_ceiling_entity: String,
    pub persistence_perspective: PersistencePerspective,
    pub custom_criteria: Vec<String>,
}

/// A key/value map on the owning entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapMetadata {
    pub name: String,
    pub persistence_perspective: PersistencePerspective,
    pub custom_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupMetadata {
    pub group_name: String,
    pub owning_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TabMetadata {
    pub tab_name: String,
    pub owning_class: String,
}

/// Metadata describing one admin field, collection, group or tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum FieldMetadata {
    BasicField(BasicFieldMetadata),
    BasicCollection(BasicCollectionMetadata),
    AdornedTargetCollection(AdornedTargetCollectionMetadata),
    Map(MapMetadata),
    Group(GroupMetadata),
    Tab(TabMetadata),
}

impl FieldMetadata {
    /// Display name of the field, group or tab.
    pub fn name(&self) -> &str {
        match self {
            Self::BasicField(md) => &md.name,
            Self::BasicCollection(md) => &md.name,
            Self::AdornedTargetCollection(md) => &md.name,
            Self::Map(md) => &md.name,
            Self::Group(md) => &md.group_name,
            Self::Tab(md) => &md.tab_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_deserializes_by_variant_tag() {
        let json = r#"{
            "variant": "tab",
            "tab_name": "General",
            "owning_class": "com.shop.Product"
        }"#;
        let md: FieldMetadata = serde_json::from_str(json).unwrap();

        assert!(matches!(md, FieldMetadata::Tab(_)));
        assert_eq!(md.name(), "General");
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let json = r#"{ "variant": "rule_builder", "name": "x" }"#;
        assert!(serde_json::from_str::<FieldMetadata>(json).is_err());
    }
}
