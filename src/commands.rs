//! Command handlers behind the `admin-kit` binary.
//!
//! Each handler takes already-read inputs (JSON text, parsed configuration)
//! and returns a value the binary prints, so the behavior is testable without
//! touching the filesystem.

use serde_json::Value;

use crate::config_file::AdminKitConfig;
use crate::error::{AdminError, Result};
use crate::persistence::{FieldMetadata, PersistencePackageRequest, SectionCrumb};
use crate::resources::{ResourcePreloadProcessor, ResourceProcessor, ResourceTagAttributes};
use crate::rules::{PageDto, PageRuleMatcher, RuleOutcome, RuleVars};

/// Render the preload links for a resource tag.
pub fn render_preload(config: &AdminKitConfig, attributes: &ResourceTagAttributes) -> String {
    let processor = ResourcePreloadProcessor::from_config(&config.resources);
    processor.build_model(attributes).to_html()
}

/// Seed a request from metadata JSON and check it is dispatchable.
pub fn build_request(
    metadata_json: &str,
    crumbs_json: Option<&str>,
) -> Result<PersistencePackageRequest> {
    let metadata: FieldMetadata = serde_json::from_str(metadata_json)?;
    let crumbs: Vec<SectionCrumb> = match crumbs_json {
        Some(json) => serde_json::from_str(json)?,
        None => Vec::new(),
    };

    let request = PersistencePackageRequest::from_metadata(&metadata, &crumbs)?;
    request.validate()?;
    Ok(request)
}

/// Evaluate a page's rule against an optional variable object.
pub fn match_page(
    config: &AdminKitConfig,
    page_json: &str,
    vars_json: Option<&str>,
) -> Result<RuleOutcome> {
    let page: PageDto = serde_json::from_str(page_json)?;
    let vars = match vars_json {
        Some(json) => parse_vars(json)?,
        None => RuleVars::new(),
    };

    let matcher = PageRuleMatcher::from_config(&config.rules);
    Ok(matcher.evaluate(&page, &vars))
}

fn parse_vars(json: &str) -> Result<RuleVars> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(map),
        other => Err(AdminError::validation(format!(
            "rule variables must be a JSON object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RequestType, RuleEvaluation};

    #[test]
    fn test_render_preload_unbundled() {
        let attributes = ResourceTagAttributes::new(
            "lib.js",
            "/js/",
            vec!["app.js".to_string(), "logo.png".to_string()],
        )
        .with_bundle(false);

        let html = render_preload(&AdminKitConfig::default(), &attributes);
        assert_eq!(
            html,
            "<link href=\"/js/app.js\" rel=\"preload\" as=\"script\" />\n\
             <link href=\"/js/logo.png\" rel=\"preload\" />"
        );
    }

    #[test]
    fn test_build_request_from_group_metadata() {
        let metadata = r#"{ "variant": "group", "group_name": "Pricing", "owning_class": "com.shop.Sku" }"#;
        let crumbs = r#"[{ "section_identifier": "product", "section_id": "42" }]"#;

        let request = build_request(metadata, Some(crumbs)).unwrap();
        assert_eq!(request.request_type(), RequestType::Standard);
        assert_eq!(request.ceiling_entity_classname(), Some("com.shop.Sku"));
        assert_eq!(request.section_crumbs().len(), 1);
    }

    #[test]
    fn test_build_request_rejects_incomplete_map() {
        let metadata = r#"{
            "variant": "map",
            "name": "attributes",
            "persistence_perspective": {
                "items": {
                    "FOREIGNKEY": { "kind": "FOREIGNKEY", "many_to_field": "product", "foreign_key_class": "com.shop.Product" }
                }
            }
        }"#;
        let err = build_request(metadata, None).unwrap_err();
        assert!(matches!(err, AdminError::Request(_)));
    }

    #[test]
    fn test_match_page_with_vars() {
        let mut config = AdminKitConfig::default();
        config.rules.evaluation = RuleEvaluation::Expression;
        let page = r#"{ "id": 5, "url": "/vip", "rule_expression": "customer.vip == true" }"#;

        let outcome = match_page(&config, page, Some(r#"{ "customer": { "vip": true } }"#)).unwrap();
        assert_eq!(outcome, RuleOutcome::Matched);

        let outcome = match_page(&config, page, None).unwrap();
        assert_eq!(outcome, RuleOutcome::Rejected);
    }

    #[test]
    fn test_match_page_rejects_non_object_vars() {
        let page = r#"{ "id": 5, "url": "/vip" }"#;
        let err = match_page(&AdminKitConfig::default(), page, Some("[1, 2]")).unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
    }
}
