//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the DocTree model directly. Empty collections and missing
//! descriptions are omitted.

use crate::model::DocTree;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, tree: &DocTree) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(tree).context("failed to serialize documentation")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDoc, FileDoc, MessageDoc};
    use serde_json::{json, Value};

    #[test]
    fn serializes_tree() {
        let tree = DocTree {
            files: vec![FileDoc {
                name: "order.proto".to_string(),
                messages: vec![MessageDoc {
                    name: "Order".to_string(),
                    description: Some("An order.".to_string()),
                    fields: vec![FieldDoc {
                        name: "id".to_string(),
                        number: 1,
                        type_name: "int64".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };

        let out = JsonRenderer.render(&tree).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            json!({
                "files": [{
                    "name": "order.proto",
                    "messages": [{
                        "name": "Order",
                        "description": "An order.",
                        "fields": [{ "name": "id", "number": 1, "type": "int64" }]
                    }]
                }]
            })
        );
    }
}
