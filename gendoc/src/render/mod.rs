//! Renderer module: trait-based format dispatch.

pub mod html;
pub mod json;
pub mod markdown;

use crate::model::{DocTree, EnumDoc, FileDoc, MessageDoc};
use anyhow::{anyhow, Result};

/// Trait for rendering a DocTree into a specific output format.
pub trait Renderer {
    fn render(&self, tree: &DocTree) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "html" => Ok(Box::new(html::HtmlRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use markdown, html, or json",
            format
        )),
    }
}

/// Every message of a file, nested ones included, with dotted display names
/// (`Order`, `Order.Line`), in declaration order.
pub fn qualified_messages(file: &FileDoc) -> Vec<(String, &MessageDoc)> {
    let mut out = Vec::new();
    for message in &file.messages {
        push_message(&mut out, "", message);
    }
    out
}

fn push_message<'a>(
    out: &mut Vec<(String, &'a MessageDoc)>,
    prefix: &str,
    message: &'a MessageDoc,
) {
    let name = format!("{}{}", prefix, message.name);
    let nested_prefix = format!("{}.", name);
    out.push((name, message));
    for nested in &message.messages {
        push_message(out, &nested_prefix, nested);
    }
}

/// Every enum of a file: top-level ones, then those nested in messages.
pub fn qualified_enums(file: &FileDoc) -> Vec<(String, &EnumDoc)> {
    let mut out: Vec<(String, &EnumDoc)> = file
        .enums
        .iter()
        .map(|e| (e.name.clone(), e))
        .collect();
    for (name, message) in qualified_messages(file) {
        for e in &message.enums {
            out.push((format!("{}.{}", name, e.name), e));
        }
    }
    out
}
