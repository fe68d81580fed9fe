//! Persistence package requests for admin-managed entity collections.
//!
//! A [`PersistencePackageRequest`] describes one CRUD operation (fetch, add,
//! update, remove) against an entity collection: which entity, how the
//! collection is reached, paging, filtering, and the admin section it
//! originates from. Requests are built with chained `with_*` / `add_*` calls
//! or seeded from [`FieldMetadata`] and then handed to the persistence
//! pipeline, which is expected to call [`PersistencePackageRequest::validate`].

pub mod dto;
pub mod metadata;
pub mod request;

use thiserror::Error;

use crate::types::{PersistencePerspectiveItemType, RequestType};

pub use dto::{
    AdornedTargetList, Entity, FilterAndSortCriteria, ForeignKey, MapStructure, OperationTypes,
    PersistencePerspective, PersistencePerspectiveItem, Property, SectionCrumb,
};
pub use metadata::{
    AdornedTargetCollectionMetadata, BasicCollectionMetadata, BasicFieldMetadata, FieldMetadata,
    GroupMetadata, MapMetadata, TabMetadata,
};
pub use request::PersistencePackageRequest;

/// Errors raised while seeding or checking a persistence package request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// A perspective slot holds an item of a different kind
    #[error("persistence perspective slot {slot} holds a {found} item")]
    PerspectiveItemMismatch {
        slot: PersistencePerspectiveItemType,
        found: PersistencePerspectiveItemType,
    },

    /// Metadata lacks an item the conversion cannot do without
    #[error("persistence perspective has no {0} item")]
    MissingPerspectiveItem(PersistencePerspectiveItemType),

    /// ADORNED request without an adorned target list
    #[error("ADORNED request has no adorned target list")]
    MissingAdornedList,

    /// MAP request without a map structure
    #[error("MAP request has no map structure")]
    MissingMapStructure,

    /// Adorned target list on a request of another type
    #[error("{0} request carries an adorned target list")]
    UnexpectedAdornedList(RequestType),

    /// Map structure on a request of another type
    #[error("{0} request carries a map structure")]
    UnexpectedMapStructure(RequestType),

    /// A nested request failed validation
    #[error("sub-request '{name}': {source}")]
    SubRequest {
        name: String,
        #[source]
        source: Box<RequestError>,
    },
}
