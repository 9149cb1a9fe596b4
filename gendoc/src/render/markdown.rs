//! GitHub-flavored markdown renderer.

use crate::model::*;
use crate::render::{qualified_enums, qualified_messages, Renderer};
use crate::toc::{self, Slugger};
use anyhow::Result;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, tree: &DocTree) -> Result<String> {
        // Files share one document, so anchors are numbered across all of them.
        let mut slugger = Slugger::default();
        let docs: Vec<String> = tree
            .files
            .iter()
            .map(|file| render_file(file, &mut slugger))
            .collect();
        Ok(docs.join("\n"))
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// Push a heading and return the anchor GitHub will give it.
fn heading(lines: &mut Vec<String>, slugger: &mut Slugger, level: usize, text: &str) -> String {
    lines.push(format!("{} {}\n", "#".repeat(level), text));
    slugger.slug(text)
}

fn render_file(file: &FileDoc, slugger: &mut Slugger) -> String {
    let messages = qualified_messages(file);
    let enums = qualified_enums(file);
    let mut lines: Vec<String> = Vec::new();

    heading(&mut lines, slugger, 1, &file.name);
    if let Some(ref package) = file.package {
        lines.push(format!("Package: `{}`\n", package));
    }
    if let Some(ref desc) = file.description {
        lines.push(desc.clone());
        lines.push(String::new());
    }

    // The index sits above everything it links to.
    let has_index = !messages.is_empty() || !enums.is_empty() || !file.services.is_empty();
    if has_index {
        slugger.slug("Index");
    }

    let mut imports: Vec<String> = Vec::new();
    if !file.imports.is_empty() {
        heading(&mut imports, slugger, 2, "Imports");
        for import in &file.imports {
            match import.description {
                Some(ref desc) => imports.push(format!("* `{}`: {}", import.path, inline(desc))),
                None => imports.push(format!("* `{}`", import.path)),
            }
        }
        imports.push(String::new());
    }

    let mut body: Vec<String> = Vec::new();
    let mut anchors: Vec<(&str, String)> = Vec::new();

    if !messages.is_empty() {
        heading(&mut body, slugger, 2, "Messages");
        for (name, message) in &messages {
            let anchor = render_message(&mut body, slugger, name, message);
            anchors.push((name.as_str(), anchor));
        }
    }

    if !enums.is_empty() {
        heading(&mut body, slugger, 2, "Enums");
        for (name, e) in &enums {
            let anchor = render_enum(&mut body, slugger, name, e);
            anchors.push((name.as_str(), anchor));
        }
    }

    if !file.services.is_empty() {
        heading(&mut body, slugger, 2, "Services");
        for service in &file.services {
            let anchor = render_service(&mut body, slugger, service);
            anchors.push((service.name.as_str(), anchor));
        }
    }

    if !file.extensions.is_empty() {
        heading(&mut body, slugger, 2, "Extensions");
        render_field_table(&mut body, &file.extensions);
    }

    if has_index {
        lines.push("## Index\n".to_string());
        for (title, anchor) in &anchors {
            lines.push(toc::render_toc_item(title, anchor));
        }
        lines.push(String::new());
    }
    lines.extend(imports);
    lines.extend(body);

    lines.join("\n")
}

fn render_message(
    lines: &mut Vec<String>,
    slugger: &mut Slugger,
    name: &str,
    message: &MessageDoc,
) -> String {
    let anchor = heading(lines, slugger, 3, name);
    push_description(lines, &message.description);

    if !message.fields.is_empty() {
        render_field_table(lines, &message.fields);
    }

    if !message.oneofs.is_empty() {
        heading(lines, slugger, 4, "Oneofs");
        for oneof in &message.oneofs {
            let members: Vec<String> = message
                .fields
                .iter()
                .filter(|f| f.oneof.as_deref() == Some(oneof.name.as_str()))
                .map(|f| format!("`{}`", f.name))
                .collect();
            let mut item = format!("* **{}** ({})", oneof.name, members.join(", "));
            if let Some(ref desc) = oneof.description {
                item.push_str(": ");
                item.push_str(&inline(desc));
            }
            lines.push(item);
        }
        lines.push(String::new());
    }

    if !message.extensions.is_empty() {
        heading(lines, slugger, 4, "Extensions");
        render_field_table(lines, &message.extensions);
    }
    anchor
}

fn render_field_table(lines: &mut Vec<String>, fields: &[FieldDoc]) {
    lines.push("| Field | Type | Number | Description |".to_string());
    lines.push("| --- | --- | --- | --- |".to_string());
    for field in fields {
        let mut ty = match field.label {
            Some(label) => format!("{} `{}`", label, field.type_name),
            None => format!("`{}`", field.type_name),
        };
        if let Some(ref extendee) = field.extendee {
            ty.push_str(&format!(" (extends `{}`)", extendee));
        }
        lines.push(format!(
            "| {} | {} | {} | {} |",
            field.name,
            ty,
            field.number,
            cell(&field.description)
        ));
    }
    lines.push(String::new());
}

fn render_enum(lines: &mut Vec<String>, slugger: &mut Slugger, name: &str, e: &EnumDoc) -> String {
    let anchor = heading(lines, slugger, 3, name);
    push_description(lines, &e.description);

    lines.push("| Name | Number | Description |".to_string());
    lines.push("| --- | --- | --- |".to_string());
    for value in &e.values {
        lines.push(format!(
            "| {} | {} | {} |",
            value.name,
            value.number,
            cell(&value.description)
        ));
    }
    lines.push(String::new());
    anchor
}

fn render_service(lines: &mut Vec<String>, slugger: &mut Slugger, service: &ServiceDoc) -> String {
    let anchor = heading(lines, slugger, 3, &service.name);
    push_description(lines, &service.description);

    lines.push("| Method | Request | Response | Description |".to_string());
    lines.push("| --- | --- | --- | --- |".to_string());
    for method in &service.methods {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            method.name,
            stream_type(&method.request, method.client_streaming),
            stream_type(&method.response, method.server_streaming),
            cell(&method.description)
        ));
    }
    lines.push(String::new());
    anchor
}

fn push_description(lines: &mut Vec<String>, description: &Option<String>) {
    if let Some(ref desc) = description {
        lines.push(desc.clone());
        lines.push(String::new());
    }
}

fn stream_type(name: &str, streaming: bool) -> String {
    if streaming {
        format!("stream `{}`", name)
    } else {
        format!("`{}`", name)
    }
}

/// Description text safe for a table cell.
fn cell(description: &Option<String>) -> String {
    description
        .as_deref()
        .map(|d| d.replace('|', "\\|").replace('\n', "<br>"))
        .unwrap_or_default()
}

/// Description text on a single list line.
fn inline(description: &str) -> String {
    description.replace('\n', " ")
}
