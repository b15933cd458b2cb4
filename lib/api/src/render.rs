//! Template renderer seam
//!
//! Page assembly is an external collaborator behind this trait: handlers
//! produce a template name and a bindings map, the renderer produces the
//! document. The shipped implementation emits the bindings as a JSON page
//! document; an HTML engine can be slotted in without touching handlers.

use serde_json::Value;

/// Renders a named template with its bindings into a page document.
pub trait PageRenderer: Send + Sync {
    fn render(&self, template: &str, bindings: &Value) -> String;

    /// Content type of the documents this renderer produces.
    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

/// Default renderer: the page document is the bindings themselves,
/// tagged with the template name.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer;

impl PageRenderer for JsonRenderer {
    fn render(&self, template: &str, bindings: &Value) -> String {
        serde_json::json!({
            "template": template,
            "bindings": bindings,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_renderer_tags_template() {
        let doc = JsonRenderer.render("home", &json!({"data": [1, 2, 3]}));
        let parsed: Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(parsed["template"], "home");
        assert_eq!(parsed["bindings"]["data"][0], 1);
    }
}
