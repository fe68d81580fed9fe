//! Data carried by a persistence package request.
//!
//! These are the admin framework's descriptors for how an entity collection is
//! reached (foreign key, adorned target list, map structure), how it is
//! filtered and sorted, and where in the admin UI the request originates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RequestError;
use crate::types::{
    ForeignKeyRestrictionType, OperationType, PersistencePerspectiveItemType, SortDirection,
};

/// Link from a collection's entities back to the owning entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignKey {
    /// Property on the collection entity pointing at the owner
    pub many_to_field: String,
    pub originating_field: Option<String>,
    /// Classname of the entity the key points at
    pub foreign_key_class: Option<String>,
    pub current_value: Option<String>,
    pub data_source_name: Option<String>,
    pub restriction_type: ForeignKeyRestrictionType,
    pub display_value_property: Option<String>,
    pub mutable: bool,
}

impl ForeignKey {
    pub fn new(many_to_field: impl Into<String>, foreign_key_class: impl Into<String>) -> Self {
        Self {
            many_to_field: many_to_field.into(),
            foreign_key_class: Some(foreign_key_class.into()),
            mutable: true,
            ..Self::default()
        }
    }

    pub fn with_current_value(mut self, value: impl Into<String>) -> Self {
        self.current_value = Some(value.into());
        self
    }
}

/// Collection reached through an intermediate join entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdornedTargetList {
    pub collection_field_name: String,
    pub linked_object_path: String,
    pub linked_id_property: String,
    pub target_object_path: String,
    pub target_id_property: String,
    /// Classname of the join entity
    pub adorned_target_entity_classname: String,
    pub adorned_target_entity_polymorphic_type: Option<String>,
    pub sort_field: Option<String>,
    pub sort_ascending: bool,
    pub ignore_adorned_properties: bool,
    pub mutable: bool,
}

/// Collection modeled as a key/value map on the owning entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStructure {
    pub key_class_name: String,
    pub map_key_value_property: Option<String>,
    pub key_property_name: String,
    pub key_property_friendly_name: String,
    pub value_class_name: String,
    pub map_property: String,
    pub delete_value_entity: bool,
    pub many_to_field: Option<String>,
    pub mutable: bool,
}

/// One filter and/or sort instruction on a property.
///
/// Nulls sort last unless a criterion says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterAndSortCriteria {
    pub property_id: String,
    pub filter_values: Vec<String>,
    pub sort_direction: Option<SortDirection>,
    pub nulls_last: bool,
}

impl Default for FilterAndSortCriteria {
    fn default() -> Self {
        Self {
            property_id: String::new(),
            filter_values: Vec::new(),
            sort_direction: None,
            nulls_last: true,
        }
    }
}

impl FilterAndSortCriteria {
    pub fn new(property_id: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            ..Self::default()
        }
    }

    /// Criterion filtering `property_id` to a single value.
    pub fn filter(property_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(property_id).with_filter_value(value)
    }

    pub fn with_filter_value(mut self, value: impl Into<String>) -> Self {
        self.filter_values.push(value.into());
        self
    }

    pub fn with_sort_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = Some(direction);
        self
    }
}

/// Breadcrumb identifying navigation context within the admin UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionCrumb {
    pub section_identifier: String,
    pub section_id: String,
}

impl SectionCrumb {
    pub fn new(section_identifier: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            section_identifier: section_identifier.into(),
            section_id: section_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    pub name: String,
    pub value: Option<String>,
}

/// Submitted entity state for add/update operations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    /// Classnames, most specific first
    pub entity_types: Vec<String>,
    pub properties: Vec<Property>,
}

impl Entity {
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Per-verb operation strategy for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationTypes {
    pub fetch_type: OperationType,
    pub add_type: OperationType,
    pub remove_type: OperationType,
    pub update_type: OperationType,
    pub inspect_type: OperationType,
}

impl OperationTypes {
    /// The same strategy for every verb.
    pub fn uniform(op: OperationType) -> Self {
        Self {
            fetch_type: op,
            add_type: op,
            remove_type: op,
            update_type: op,
            inspect_type: op,
        }
    }
}

/// Value stored in a persistence perspective item slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum PersistencePerspectiveItem {
    ForeignKey(ForeignKey),
    AdornedTargetList(AdornedTargetList),
    MapStructure(MapStructure),
}

impl PersistencePerspectiveItem {
    /// The slot this item naturally belongs in.
    pub fn natural_slot(&self) -> PersistencePerspectiveItemType {
        match self {
            Self::ForeignKey(_) => PersistencePerspectiveItemType::ForeignKey,
            Self::AdornedTargetList(_) => PersistencePerspectiveItemType::AdornedTargetList,
            Self::MapStructure(_) => PersistencePerspectiveItemType::MapStructure,
        }
    }
}

/// How a collection field is persisted: operation strategies plus the
/// descriptors needed to reach the collection.
///
/// Items are keyed by slot. Metadata is produced elsewhere and is expected to
/// place each item in its natural slot; the typed accessors report a
/// mismatch as an error instead of reinterpreting it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistencePerspective {
    pub operation_types: OperationTypes,
    pub items: BTreeMap<PersistencePerspectiveItemType, PersistencePerspectiveItem>,
}

impl PersistencePerspective {
    pub fn new(operation_types: OperationTypes) -> Self {
        Self {
            operation_types,
            items: BTreeMap::new(),
        }
    }

    /// Store `item` in its natural slot.
    pub fn with_item(mut self, item: PersistencePerspectiveItem) -> Self {
        self.items.insert(item.natural_slot(), item);
        self
    }

    pub fn foreign_key(&self) -> Result<Option<&ForeignKey>, RequestError> {
        match self.items.get(&PersistencePerspectiveItemType::ForeignKey) {
            None => Ok(None),
            Some(PersistencePerspectiveItem::ForeignKey(fk)) => Ok(Some(fk)),
            Some(other) => Err(mismatch(PersistencePerspectiveItemType::ForeignKey, other)),
        }
    }

    pub fn adorned_target_list(&self) -> Result<Option<&AdornedTargetList>, RequestError> {
        match self
            .items
            .get(&PersistencePerspectiveItemType::AdornedTargetList)
        {
            None => Ok(None),
            Some(PersistencePerspectiveItem::AdornedTargetList(list)) => Ok(Some(list)),
            Some(other) => Err(mismatch(
                PersistencePerspectiveItemType::AdornedTargetList,
                other,
            )),
        }
    }

    pub fn map_structure(&self) -> Result<Option<&MapStructure>, RequestError> {
        match self.items.get(&PersistencePerspectiveItemType::MapStructure) {
            None => Ok(None),
            Some(PersistencePerspectiveItem::MapStructure(ms)) => Ok(Some(ms)),
            Some(other) => Err(mismatch(PersistencePerspectiveItemType::MapStructure, other)),
        }
    }
}

fn mismatch(
    slot: PersistencePerspectiveItemType,
    found: &PersistencePerspectiveItem,
) -> RequestError {
    RequestError::PerspectiveItemMismatch {
        slot,
        found: found.natural_slot(),
    }
}
