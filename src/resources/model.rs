//! Minimal template model the preload processor emits into.

use std::fmt::Write as _;

/// A single element in a template fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateElement {
    pub tag: String,
    /// Attributes in emission order
    pub attributes: Vec<(String, String)>,
    /// Rendered as `<tag ... />` with no body
    pub standalone: bool,
}

impl TemplateElement {
    pub fn standalone(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            standalone: true,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Render as HTML with attribute values escaped.
    pub fn to_html(&self) -> String {
        let mut html = format!("<{}", self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(html, " {}=\"{}\"", name, escape_attribute(value));
        }
        if self.standalone {
            html.push_str(" />");
        } else {
            let _ = write!(html, "></{}>", self.tag);
        }
        html
    }
}

/// Ordered list of elements making up a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateModel {
    elements: Vec<TemplateElement>,
}

impl TemplateModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: TemplateElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[TemplateElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// One element per line.
    pub fn to_html(&self) -> String {
        self.elements
            .iter()
            .map(TemplateElement::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_standalone_element_html() {
        let element = TemplateElement::standalone(
            "link",
            attrs(&[("href", "/js/app.js"), ("rel", "preload"), ("as", "script")]),
        );
        assert_eq!(
            element.to_html(),
            r#"<link href="/js/app.js" rel="preload" as="script" />"#
        );
        assert_eq!(element.attribute("rel"), Some("preload"));
        assert_eq!(element.attribute("type"), None);
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let element =
            TemplateElement::standalone("link", attrs(&[("href", "/a.js?x=1&y=\"2\"")]));
        assert_eq!(
            element.to_html(),
            r#"<link href="/a.js?x=1&amp;y=&quot;2&quot;" />"#
        );
    }

    #[test]
    fn test_model_joins_elements_by_line() {
        let mut model = TemplateModel::new();
        assert!(model.is_empty());
        model.add_element(TemplateElement::standalone("link", attrs(&[("href", "/a.css")])));
        model.add_element(TemplateElement {
            tag: "script".into(),
            attributes: attrs(&[("src", "/b.js")]),
            standalone: false,
        });

        assert_eq!(model.len(), 2);
        assert_eq!(
            model.to_html(),
            "<link href=\"/a.css\" />\n<script src=\"/b.js\"></script>"
        );
    }
}
