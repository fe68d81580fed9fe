//! Emits `<link rel="preload">` tags for static resources.
//!
//! Bundles that depend on each other are often injected into the DOM lazily,
//! and the browser does not start downloading a script until it is in the DOM.
//! Preload links tell the browser to fetch those resources up front so they
//! are ready when the dependent bundle executes.

use super::attributes::ResourceTagAttributes;
use super::model::{TemplateElement, TemplateModel};
use super::resolver::{PrefixResourceResolver, ResourceResolver};
use crate::config_file::ResourcesConfig;
use crate::logging::Logger;
use crate::types::PreloadAs;

/// A template processor turning a resource tag into a fragment.
///
/// Implementors supply the bundled and unbundled renderings; `build_model`
/// picks one from the tag's `bundle` attribute, falling back to
/// `bundling_enabled`.
pub trait ResourceProcessor {
    /// Tag name the processor is registered under.
    fn name(&self) -> &'static str;

    /// Ordering among processors; higher runs later.
    fn precedence(&self) -> i32;

    fn bundling_enabled(&self) -> bool;

    fn build_model_bundled(&self, attributes: &ResourceTagAttributes) -> TemplateModel;

    fn build_model_unbundled(&self, attributes: &ResourceTagAttributes) -> TemplateModel;

    fn build_model(&self, attributes: &ResourceTagAttributes) -> TemplateModel {
        if attributes.bundle.unwrap_or_else(|| self.bundling_enabled()) {
            self.build_model_bundled(attributes)
        } else {
            self.build_model_unbundled(attributes)
        }
    }
}

/// Processor for the `bundlepreload` tag.
#[derive(Debug, Clone)]
pub struct ResourcePreloadProcessor<R = PrefixResourceResolver> {
    resolver: R,
    bundling_enabled: bool,
    logger: Logger,
}

impl ResourcePreloadProcessor<PrefixResourceResolver> {
    pub fn from_config(config: &ResourcesConfig) -> Self {
        Self::new(PrefixResourceResolver::new(config), config.bundling_enabled)
    }
}

impl<R: ResourceResolver> ResourcePreloadProcessor<R> {
    pub fn new(resolver: R, bundling_enabled: bool) -> Self {
        Self {
            resolver,
            bundling_enabled,
            logger: Logger::ambient(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Preload link for `href`.
    pub fn build_preload_element(&self, href: &str) -> TemplateElement {
        let preload_as = PreloadAs::from_file_name(href);
        TemplateElement::standalone("link", preload_attributes(href, preload_as))
    }
}

/// Attributes for a preload link; `as` only when a destination is known.
pub fn preload_attributes(href: &str, preload_as: Option<PreloadAs>) -> Vec<(String, String)> {
    let mut attributes = vec![
        ("href".to_string(), href.to_string()),
        ("rel".to_string(), "preload".to_string()),
    ];
    if let Some(preload_as) = preload_as {
        attributes.push(("as".to_string(), preload_as.to_string()));
    }
    attributes
}

impl<R: ResourceResolver> ResourceProcessor for ResourcePreloadProcessor<R> {
    fn name(&self) -> &'static str {
        "bundlepreload"
    }

    fn precedence(&self) -> i32 {
        10000
    }

    fn bundling_enabled(&self) -> bool {
        self.bundling_enabled
    }

    fn build_model_bundled(&self, attributes: &ResourceTagAttributes) -> TemplateModel {
        let bundle_resource_name = self.resolver.resolve_bundle_resource_name(
            &attributes.name,
            &attributes.mapping_prefix,
            &attributes.files,
        );
        let bundle_url = self.resolver.bundle_url(&bundle_resource_name);

        self.logger.in_scope(|| {
            tracing::debug!(
                bundle = %attributes.name,
                files = attributes.files.len(),
                url = %bundle_url,
                "preloading bundle"
            );
        });

        let mut model = TemplateModel::new();
        model.add_element(self.build_preload_element(&bundle_url));
        model
    }

    fn build_model_unbundled(&self, attributes: &ResourceTagAttributes) -> TemplateModel {
        let mut model = TemplateModel::new();
        for file in &attributes.files {
            let full_file_name = self.resolver.unbundled_file_name(file, attributes);
            model.add_element(self.build_preload_element(&full_file_name));
        }

        self.logger.in_scope(|| {
            tracing::debug!(
                bundle = %attributes.name,
                files = model.len(),
                "preloading unbundled files"
            );
        });

        model
    }
}
