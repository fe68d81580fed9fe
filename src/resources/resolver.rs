//! Bundle naming and URL resolution for static assets.
//!
//! The real bundling service lives outside this crate; `ResourceResolver` is
//! the seam it plugs into. `PrefixResourceResolver` is a self-contained
//! implementation driven by [`ResourcesConfig`] that content-versions bundle
//! names and joins URL prefixes.

use sha2::{Digest, Sha256};

use super::attributes::ResourceTagAttributes;
use crate::config_file::ResourcesConfig;

/// Hex characters of the content hash kept in a versioned bundle name
const VERSION_HASH_LEN: usize = 10;

/// Resolves bundle names and asset URLs for a resource tag.
pub trait ResourceResolver: Send + Sync {
    /// Name of the single resource standing in for `files` as a bundle.
    fn resolve_bundle_resource_name(
        &self,
        name: &str,
        mapping_prefix: &str,
        files: &[String],
    ) -> String;

    /// Public URL of a resolved bundle resource.
    fn bundle_url(&self, bundle_resource_name: &str) -> String;

    /// Public URL of one file served on its own.
    fn unbundled_file_name(&self, file: &str, attributes: &ResourceTagAttributes) -> String;
}

/// Resolver that derives everything from configured URL prefixes.
#[derive(Debug, Clone)]
pub struct PrefixResourceResolver {
    bundle_url_prefix: String,
    resource_url_prefix: String,
    version_bundles: bool,
}

impl PrefixResourceResolver {
    pub fn new(config: &ResourcesConfig) -> Self {
        Self {
            bundle_url_prefix: config.bundle_url_prefix.clone(),
            resource_url_prefix: config.resource_url_prefix.clone(),
            version_bundles: config.version_bundles,
        }
    }
}

impl Default for PrefixResourceResolver {
    fn default() -> Self {
        Self::new(&ResourcesConfig::default())
    }
}

impl ResourceResolver for PrefixResourceResolver {
    fn resolve_bundle_resource_name(
        &self,
        name: &str,
        mapping_prefix: &str,
        files: &[String],
    ) -> String {
        if !self.version_bundles {
            return name.to_string();
        }

        let mut hasher = Sha256::new();
        hasher.update(mapping_prefix.as_bytes());
        for file in files {
            hasher.update(b"\n");
            hasher.update(file.as_bytes());
        }
        let digest = format!("{:x}", hasher.finalize());
        let version = &digest[..VERSION_HASH_LEN];

        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{version}.{ext}"),
            _ => format!("{name}-{version}"),
        }
    }

    fn bundle_url(&self, bundle_resource_name: &str) -> String {
        join_url(&self.bundle_url_prefix, bundle_resource_name)
    }

    fn unbundled_file_name(&self, file: &str, attributes: &ResourceTagAttributes) -> String {
        if is_absolute_url(file) {
            return file.to_string();
        }
        let mapped = join_url(&attributes.mapping_prefix, file);
        join_url(&self.resource_url_prefix, &mapped)
    }
}

fn is_absolute_url(file: &str) -> bool {
    file.starts_with("http://") || file.starts_with("https://") || file.starts_with("//")
}

/// Join two URL segments with exactly one `/` between them.
fn join_url(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return prefix.to_string();
    }
    match (prefix.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", prefix, &path[1..]),
        (false, false) => format!("{prefix}/{path}"),
        _ => format!("{prefix}{path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("/", "js/app.js"), "/js/app.js");
        assert_eq!(join_url("/js/", "/app.js"), "/js/app.js");
        assert_eq!(join_url("/js", "app.js"), "/js/app.js");
        assert_eq!(join_url("", "app.js"), "app.js");
        assert_eq!(join_url("/static/", ""), "/static/");
    }

    #[test]
    fn test_versioned_bundle_name_is_stable_and_content_sensitive() {
        let resolver = PrefixResourceResolver::default();
        let a = resolver.resolve_bundle_resource_name("lib.js", "/js/", &files(&["a.js", "b.js"]));
        let again =
            resolver.resolve_bundle_resource_name("lib.js", "/js/", &files(&["a.js", "b.js"]));
        let other =
            resolver.resolve_bundle_resource_name("lib.js", "/js/", &files(&["b.js", "a.js"]));

        assert_eq!(a, again);
        assert_ne!(a, other);
        assert!(a.starts_with("lib-"));
        assert!(a.ends_with(".js"));
        assert_eq!(a.len(), "lib-".len() + VERSION_HASH_LEN + ".js".len());
    }

    #[test]
    fn test_unversioned_bundle_name_passes_through() {
        let config = ResourcesConfig {
            version_bundles: false,
            ..ResourcesConfig::default()
        };
        let resolver = PrefixResourceResolver::new(&config);
        assert_eq!(
            resolver.resolve_bundle_resource_name("global.css", "/css/", &files(&["a.css"])),
            "global.css"
        );
    }

    #[test]
    fn test_extensionless_bundle_name_gets_suffix() {
        let resolver = PrefixResourceResolver::default();
        let name = resolver.resolve_bundle_resource_name("vendor", "", &[]);
        assert!(name.starts_with("vendor-"));
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_urls_use_configured_prefixes() {
        let resolver = PrefixResourceResolver::default();
        assert_eq!(resolver.bundle_url("lib-0123456789.js"), "/bundles/lib-0123456789.js");

        let attributes = ResourceTagAttributes::new("lib.js", "/js/", Vec::new());
        assert_eq!(resolver.unbundled_file_name("app.js", &attributes), "/js/app.js");
        assert_eq!(
            resolver.unbundled_file_name("https://cdn.example.com/x.js", &attributes),
            "https://cdn.example.com/x.js"
        );
    }
}
