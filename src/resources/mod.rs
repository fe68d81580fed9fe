//! Static resource preloading.
//!
//! Given the files a resource tag names, emits one preload link for the
//! resolved bundle or one per file. Bundle naming and URL resolution go
//! through [`ResourceResolver`]; nothing here performs I/O.

pub mod attributes;
pub mod model;
pub mod preload;
pub mod resolver;

pub use attributes::ResourceTagAttributes;
pub use model::{TemplateElement, TemplateModel};
pub use preload::{preload_attributes, ResourcePreloadProcessor, ResourceProcessor};
pub use resolver::{PrefixResourceResolver, ResourceResolver};
