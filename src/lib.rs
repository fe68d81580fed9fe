//! admin-kit Library
//!
//! Utilities consumed by an e-commerce admin and content-management layer:
//!
//! - [`persistence`]: the `PersistencePackageRequest` builder seeding CRUD
//!   operations against admin-managed entity collections
//! - [`resources`]: `<link rel="preload">` emission for bundled or unbundled
//!   static assets
//! - [`rules`]: CMS page inclusion rules evaluated against a variable context
//!
//! The three are independent; none depends on another.

pub mod cli;
pub mod commands;
pub mod config_file;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod resources;
pub mod rules;
pub mod types;

// Re-export main types for convenience
pub use config_file::{AdminKitConfig, ResourcesConfig, RulesConfig};
pub use error::AdminError;
pub use logging::Logger;
pub use persistence::{FieldMetadata, PersistencePackageRequest, RequestError};
pub use resources::{
    ResourcePreloadProcessor, ResourceProcessor, ResourceResolver, ResourceTagAttributes,
    TemplateElement, TemplateModel,
};
pub use rules::{PageDto, PageRuleMatcher, RuleError, RuleEvaluator, RuleOutcome, RuleVars};
pub use types::{
    ForeignKeyRestrictionType, OperationType, PersistencePerspectiveItemType, PreloadAs,
    RequestType, RuleEvaluation, SortDirection,
};
