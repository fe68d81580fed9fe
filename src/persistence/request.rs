//! The persistence package request builder.
//!
//! # Builder semantics
//!
//! | Method family | Behavior |
//! |---------------|----------|
//! | `standard` / `adorned` / `map` | Fixed request type, everything else empty |
//! | `from_metadata` | Exhaustive conversion from [`FieldMetadata`] |
//! | `with_*` | Set one field; criteria variants ignore empty input, filter criteria append |
//! | `add_*` | Append; sub-requests overwrite in place on a duplicate name |
//! | `remove_filter_and_sort_criteria` | Drop every criterion on a property |
//!
//! The builder never validates. Contradictory configuration (an ADORNED
//! request without an adorned list, say) is accepted here and reported by
//! [`PersistencePackageRequest::validate`] when the consumer asks for it.

use serde::{Deserialize, Serialize};

use super::RequestError;
use super::dto::{
    AdornedTargetList, Entity, FilterAndSortCriteria, ForeignKey, MapStructure, OperationTypes,
    SectionCrumb,
};
use super::metadata::FieldMetadata;
use crate::logging::Logger;
use crate::types::{PersistencePerspectiveItemType, RequestType};

/// Seed for one persistence package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistencePackageRequest {
    request_type: RequestType,
    ceiling_entity_classname: Option<String>,
    security_ceiling_entity_classname: Option<String>,
    config_key: Option<String>,
    adorned_list: Option<AdornedTargetList>,
    map_structure: Option<MapStructure>,
    entity: Option<Entity>,
    foreign_key: Option<ForeignKey>,
    start_index: Option<u32>,
    max_index: Option<u32>,
    section_crumbs: Vec<SectionCrumb>,
    section_entity_field: Option<String>,
    requesting_entity_name: Option<String>,
    msg: Option<String>,
    sub_requests: Vec<(String, PersistencePackageRequest)>,
    validate_unsubmitted_properties: bool,
    is_update_lookup_type: bool,
    operation_types_override: Option<OperationTypes>,
    additional_foreign_keys: Vec<ForeignKey>,
    custom_criteria: Vec<String>,
    filter_and_sort_criteria: Vec<FilterAndSortCriteria>,
}

impl Default for PersistencePackageRequest {
    fn default() -> Self {
        Self::new(RequestType::Standard)
    }
}

impl PersistencePackageRequest {
    pub fn new(request_type: RequestType) -> Self {
        Self {
            request_type,
            ceiling_entity_classname: None,
            security_ceiling_entity_classname: None,
            config_key: None,
            adorned_list: None,
            map_structure: None,
            entity: None,
            foreign_key: None,
            start_index: None,
            max_index: None,
            section_crumbs: Vec::new(),
            section_entity_field: None,
            requesting_entity_name: None,
            msg: None,
            sub_requests: Vec::new(),
            validate_unsubmitted_properties: true,
            is_update_lookup_type: false,
            operation_types_override: None,
            additional_foreign_keys: Vec::new(),
            custom_criteria: Vec::new(),
            filter_and_sort_criteria: Vec::new(),
        }
    }

    pub fn standard() -> Self {
        Self::new(RequestType::Standard)
    }

    pub fn adorned() -> Self {
        Self::new(RequestType::Adorned)
    }

    pub fn map() -> Self {
        Self::new(RequestType::Map)
    }

    /// Seed a request from field metadata.
    ///
    /// Copies the persistence perspective items the variant relies on and the
    /// operation types configured for the field. Group and tab metadata only
    /// contribute their owning class as the ceiling entity.
    ///
    /// # Errors
    ///
    /// - `PerspectiveItemMismatch` if a perspective slot the variant reads holds
    ///   the wrong kind of item
    /// - `MissingPerspectiveItem` if map metadata has no foreign key, since the
    ///   map's ceiling entity is read from it
    pub fn from_metadata(
        metadata: &FieldMetadata,
        section_crumbs: &[SectionCrumb],
    ) -> Result<Self, RequestError> {
        Self::from_metadata_logged(metadata, section_crumbs, &Logger::ambient())
    }

    /// [`from_metadata`](Self::from_metadata), tracing through `logger`.
    pub fn from_metadata_logged(
        metadata: &FieldMetadata,
        section_crumbs: &[SectionCrumb],
        logger: &Logger,
    ) -> Result<Self, RequestError> {
        let request = match metadata {
            FieldMetadata::BasicField(md) => Self::standard()
                .with_ceiling_option(md.foreign_key_class.clone())
                .with_custom_criteria_replaced(&md.custom_criteria),

            FieldMetadata::BasicCollection(md) => {
                let perspective = &md.persistence_perspective;
                let foreign_key = perspective.foreign_key()?.cloned();

                let mut request = Self::standard()
                    .with_ceiling_entity_classname(md.collection_ceiling_entity.clone())
                    .with_operation_types_override(perspective.operation_types)
                    .with_custom_criteria_replaced(&md.custom_criteria);
                request.foreign_key = foreign_key;
                request
            }

            FieldMetadata::AdornedTargetCollection(md) => {
                let perspective = &md.persistence_perspective;
                let adorned_list = perspective.adorned_target_list()?.cloned();

                let mut request = Self::adorned()
                    .with_ceiling_entity_classname(md.collection_ceiling_entity.clone())
                    .with_operation_types_override(perspective.operation_types)
                    .with_custom_criteria_replaced(&md.custom_criteria);
                request.adorned_list = adorned_list;
                request
            }

            FieldMetadata::Map(md) => {
                let perspective = &md.persistence_perspective;
                let map_structure = perspective.map_structure()?.cloned();
                let foreign_key = perspective.foreign_key()?.cloned().ok_or(
                    RequestError::MissingPerspectiveItem(PersistencePerspectiveItemType::ForeignKey),
                )?;

                let mut request = Self::map()
                    .with_ceiling_option(foreign_key.foreign_key_class.clone())
                    .with_operation_types_override(perspective.operation_types)
                    .with_custom_criteria_replaced(&md.custom_criteria)
                    .with_foreign_key(foreign_key);
                request.map_structure = map_structure;
                request
            }

            FieldMetadata::Group(md) => {
                Self::standard().with_ceiling_entity_classname(md.owning_class.clone())
            }

            FieldMetadata::Tab(md) => {
                Self::standard().with_ceiling_entity_classname(md.owning_class.clone())
            }
        };

        logger.in_scope(|| {
            tracing::trace!(
                field = metadata.name(),
                request_type = %request.request_type,
                ceiling = request.ceiling_entity_classname.as_deref().unwrap_or(""),
                "seeded persistence package request from metadata"
            );
        });

        Ok(request.with_section_crumbs(section_crumbs.to_vec()))
    }

    // ------------------------------------------------------------------
    // with_* methods
    // ------------------------------------------------------------------

    pub fn with_type(mut self, request_type: RequestType) -> Self {
        self.request_type = request_type;
        self
    }

    pub fn with_ceiling_entity_classname(mut self, classname: impl Into<String>) -> Self {
        self.ceiling_entity_classname = Some(classname.into());
        self
    }

    pub fn with_security_ceiling_entity_classname(mut self, classname: impl Into<String>) -> Self {
        self.security_ceiling_entity_classname = Some(classname.into());
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_key = Some(foreign_key);
        self
    }

    pub fn with_config_key(mut self, config_key: impl Into<String>) -> Self {
        self.config_key = Some(config_key.into());
        self
    }

    /// Append the given criteria. An empty slice leaves the list untouched.
    pub fn with_filter_and_sort_criteria(mut self, criteria: &[FilterAndSortCriteria]) -> Self {
        if !criteria.is_empty() {
            self.filter_and_sort_criteria.extend_from_slice(criteria);
        }
        self
    }

    pub fn with_adorned_list(mut self, adorned_list: AdornedTargetList) -> Self {
        self.adorned_list = Some(adorned_list);
        self
    }

    pub fn with_map_structure(mut self, map_structure: MapStructure) -> Self {
        self.map_structure = Some(map_structure);
        self
    }

    /// Replace the custom criteria. An empty slice leaves the list untouched.
    pub fn with_custom_criteria<S: AsRef<str>>(mut self, criteria: &[S]) -> Self {
        if !criteria.is_empty() {
            self.custom_criteria = criteria.iter().map(|c| c.as_ref().to_string()).collect();
        }
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = Some(start_index);
        self
    }

    pub fn with_max_index(mut self, max_index: u32) -> Self {
        self.max_index = Some(max_index);
        self
    }

    pub fn with_section_crumbs(mut self, section_crumbs: Vec<SectionCrumb>) -> Self {
        self.section_crumbs = section_crumbs;
        self
    }

    pub fn with_section_entity_field(mut self, field: impl Into<String>) -> Self {
        self.section_entity_field = Some(field.into());
        self
    }

    pub fn with_requesting_entity_name(mut self, name: impl Into<String>) -> Self {
        self.requesting_entity_name = Some(name.into());
        self
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn with_is_update_lookup_type(mut self, is_update_lookup_type: bool) -> Self {
        self.is_update_lookup_type = is_update_lookup_type;
        self
    }

    pub fn with_validate_unsubmitted_properties(mut self, validate: bool) -> Self {
        self.validate_unsubmitted_properties = validate;
        self
    }

    pub fn with_operation_types_override(mut self, operation_types: OperationTypes) -> Self {
        self.operation_types_override = Some(operation_types);
        self
    }

    fn with_ceiling_option(mut self, classname: Option<String>) -> Self {
        self.ceiling_entity_classname = classname;
        self
    }

    // Metadata conversion overwrites unconditionally, empty or not.
    fn with_custom_criteria_replaced(mut self, criteria: &[String]) -> Self {
        self.custom_criteria = criteria.to_vec();
        self
    }

    // ------------------------------------------------------------------
    // add_* methods
    // ------------------------------------------------------------------

    pub fn add_additional_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.additional_foreign_keys.push(foreign_key);
        self
    }

    pub fn add_additional_foreign_keys<I>(mut self, foreign_keys: I) -> Self
    where
        I: IntoIterator<Item = ForeignKey>,
    {
        self.additional_foreign_keys.extend(foreign_keys);
        self
    }

    /// Attach a nested request under `info_property_name`.
    ///
    /// A second request under the same name replaces the first but keeps its
    /// position.
    pub fn add_sub_request(
        mut self,
        info_property_name: impl Into<String>,
        sub_request: PersistencePackageRequest,
    ) -> Self {
        let name = info_property_name.into();
        match self.sub_requests.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = sub_request,
            None => self.sub_requests.push((name, sub_request)),
        }
        self
    }

    /// Append one custom criterion. Blank strings are dropped.
    pub fn add_custom_criteria(mut self, criteria: impl Into<String>) -> Self {
        let criteria = criteria.into();
        if !criteria.trim().is_empty() {
            self.custom_criteria.push(criteria);
        }
        self
    }

    pub fn add_filter_and_sort_criteria(mut self, criteria: FilterAndSortCriteria) -> Self {
        self.filter_and_sort_criteria.push(criteria);
        self
    }

    pub fn add_filter_and_sort_criteria_list<I>(mut self, criteria: I) -> Self
    where
        I: IntoIterator<Item = FilterAndSortCriteria>,
    {
        self.filter_and_sort_criteria.extend(criteria);
        self
    }

    // ------------------------------------------------------------------
    // remove_* methods
    // ------------------------------------------------------------------

    /// Drop every criterion whose property id equals `name`.
    pub fn remove_filter_and_sort_criteria(mut self, name: &str) -> Self {
        self.filter_and_sort_criteria
            .retain(|criteria| criteria.property_id != name);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn ceiling_entity_classname(&self) -> Option<&str> {
        self.ceiling_entity_classname.as_deref()
    }

    /// Entity checked for security purposes: the explicit security ceiling
    /// when one was set, otherwise the ceiling entity.
    pub fn security_ceiling_entity_classname(&self) -> Option<&str> {
        self.security_ceiling_entity_classname
            .as_deref()
            .or(self.ceiling_entity_classname.as_deref())
    }

    pub fn config_key(&self) -> Option<&str> {
        self.config_key.as_deref()
    }

    pub fn adorned_list(&self) -> Option<&AdornedTargetList> {
        self.adorned_list.as_ref()
    }

    pub fn map_structure(&self) -> Option<&MapStructure> {
        self.map_structure.as_ref()
    }

    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }

    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        self.foreign_key.as_ref()
    }

    pub fn additional_foreign_keys(&self) -> &[ForeignKey] {
        &self.additional_foreign_keys
    }

    pub fn start_index(&self) -> Option<u32> {
        self.start_index
    }

    pub fn max_index(&self) -> Option<u32> {
        self.max_index
    }

    pub fn section_crumbs(&self) -> &[SectionCrumb] {
        &self.section_crumbs
    }

    pub fn section_entity_field(&self) -> Option<&str> {
        self.section_entity_field.as_deref()
    }

    pub fn requesting_entity_name(&self) -> Option<&str> {
        self.requesting_entity_name.as_deref()
    }

    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    /// Nested requests in insertion order.
    pub fn sub_requests(&self) -> &[(String, PersistencePackageRequest)] {
        &self.sub_requests
    }

    pub fn sub_request(&self, name: &str) -> Option<&PersistencePackageRequest> {
        self.sub_requests
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, request)| request)
    }

    pub fn validate_unsubmitted_properties(&self) -> bool {
        self.validate_unsubmitted_properties
    }

    pub fn is_update_lookup_type(&self) -> bool {
        self.is_update_lookup_type
    }

    pub fn operation_types_override(&self) -> Option<&OperationTypes> {
        self.operation_types_override.as_ref()
    }

    pub fn custom_criteria(&self) -> &[String] {
        &self.custom_criteria
    }

    pub fn filter_and_sort_criteria(&self) -> &[FilterAndSortCriteria] {
        &self.filter_and_sort_criteria
    }

    // ------------------------------------------------------------------
    // Consumer-side checks
    // ------------------------------------------------------------------

    /// Check the collection-descriptor invariant before dispatch.
    ///
    /// STANDARD carries neither an adorned list nor a map structure, ADORNED
    /// carries exactly the adorned list, MAP exactly the map structure. Nested
    /// requests are checked in order and the first failure is reported.
    pub fn validate(&self) -> Result<(), RequestError> {
        match self.request_type {
            RequestType::Standard => {
                if self.adorned_list.is_some() {
                    return Err(RequestError::UnexpectedAdornedList(self.request_type));
                }
                if self.map_structure.is_some() {
                    return Err(RequestError::UnexpectedMapStructure(self.request_type));
                }
            }
            RequestType::Adorned => {
                if self.adorned_list.is_none() {
                    return Err(RequestError::MissingAdornedList);
                }
                if self.map_structure.is_some() {
                    return Err(RequestError::UnexpectedMapStructure(self.request_type));
                }
            }
            RequestType::Map => {
                if self.map_structure.is_none() {
                    return Err(RequestError::MissingMapStructure);
                }
                if self.adorned_list.is_some() {
                    return Err(RequestError::UnexpectedAdornedList(self.request_type));
                }
            }
        }

        for (name, sub_request) in &self.sub_requests {
            sub_request
                .validate()
                .map_err(|source| RequestError::SubRequest {
                    name: name.clone(),
                    source: Box::new(source),
                })?;
        }

        Ok(())
    }
}
