//! HTML renderer: standalone HTML page with semantic markup.

use crate::model::*;
use crate::render::{qualified_enums, qualified_messages, Renderer};
use crate::toc::Slugger;
use anyhow::Result;

const STYLE: &str = "<style>
body { font-family: system-ui, sans-serif; max-width: 56em; margin: 2em auto; padding: 0 1em; }
code { background: #f4f4f4; padding: 0.15em 0.3em; border-radius: 3px; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ddd; padding: 0.3em 0.6em; text-align: left; vertical-align: top; }
.label { font-size: 0.75em; color: #666; margin-right: 0.3em; }
</style>
";

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, tree: &DocTree) -> Result<String> {
        let mut out = String::new();

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        if let Some(file) = tree.files.first() {
            out.push_str(&format!("<title>{}</title>\n", html_escape(&file.name)));
        }
        out.push_str(STYLE);
        out.push_str("</head>\n<body>\n");

        let mut slugger = Slugger::default();
        for file in &tree.files {
            out.push_str(&render_file_html(file, &mut slugger));
        }

        out.push_str("</body>\n</html>\n");
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

fn render_file_html(file: &FileDoc, slugger: &mut Slugger) -> String {
    let messages = qualified_messages(file);
    let enums = qualified_enums(file);
    let mut out = String::new();

    out.push_str(&format!("<h1>{}</h1>\n", html_escape(&file.name)));
    if let Some(ref package) = file.package {
        out.push_str(&format!("<p>Package: <code>{}</code></p>\n", html_escape(package)));
    }
    push_paragraph(&mut out, &file.description);

    let mut body = String::new();
    let mut anchors: Vec<(&str, String)> = Vec::new();

    if !messages.is_empty() {
        body.push_str("<h2>Messages</h2>\n");
        for (name, message) in &messages {
            let anchor = slugger.slug(name);
            body.push_str(&heading(name, &anchor));
            push_paragraph(&mut body, &message.description);
            if !message.fields.is_empty() {
                body.push_str(&render_fields_html(&message.fields));
            }
            if !message.oneofs.is_empty() {
                body.push_str(&render_oneofs_html(message));
            }
            if !message.extensions.is_empty() {
                body.push_str("<h4>Extensions</h4>\n");
                body.push_str(&render_fields_html(&message.extensions));
            }
            anchors.push((name.as_str(), anchor));
        }
    }

    if !enums.is_empty() {
        body.push_str("<h2>Enums</h2>\n");
        for (name, e) in &enums {
            let anchor = slugger.slug(name);
            body.push_str(&heading(name, &anchor));
            push_paragraph(&mut body, &e.description);
            body.push_str("<table>\n<tr><th>Name</th><th>Number</th><th>Description</th></tr>\n");
            for value in &e.values {
                body.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    html_escape(&value.name),
                    value.number,
                    description_html(&value.description)
                ));
            }
            body.push_str("</table>\n");
            anchors.push((name.as_str(), anchor));
        }
    }

    if !file.services.is_empty() {
        body.push_str("<h2>Services</h2>\n");
        for service in &file.services {
            let anchor = slugger.slug(&service.name);
            body.push_str(&heading(&service.name, &anchor));
            push_paragraph(&mut body, &service.description);
            body.push_str(concat!(
                "<table>\n",
                "<tr><th>Method</th><th>Request</th><th>Response</th><th>Description</th></tr>\n",
            ));
            for method in &service.methods {
                body.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    html_escape(&method.name),
                    stream_type_html(&method.request, method.client_streaming),
                    stream_type_html(&method.response, method.server_streaming),
                    description_html(&method.description)
                ));
            }
            body.push_str("</table>\n");
            anchors.push((service.name.as_str(), anchor));
        }
    }

    if !file.extensions.is_empty() {
        body.push_str("<h2>Extensions</h2>\n");
        body.push_str(&render_fields_html(&file.extensions));
    }

    // Index
    if !anchors.is_empty() {
        out.push_str("<h2>Index</h2>\n<ul>\n");
        for (title, anchor) in &anchors {
            out.push_str(&format!(
                "  <li><a href=\"#{}\">{}</a></li>\n",
                html_escape(anchor),
                html_escape(title)
            ));
        }
        out.push_str("</ul>\n");
    }

    if !file.imports.is_empty() {
        out.push_str("<h2>Imports</h2>\n<ul>\n");
        for import in &file.imports {
            out.push_str(&format!("  <li><code>{}</code>", html_escape(&import.path)));
            if import.description.is_some() {
                out.push_str(": ");
                out.push_str(&description_html(&import.description));
            }
            out.push_str("</li>\n");
        }
        out.push_str("</ul>\n");
    }

    out.push_str(&body);
    out
}

fn render_oneofs_html(message: &MessageDoc) -> String {
    let mut out = String::from("<h4>Oneofs</h4>\n<ul>\n");
    for oneof in &message.oneofs {
        let members: Vec<String> = message
            .fields
            .iter()
            .filter(|f| f.oneof.as_deref() == Some(oneof.name.as_str()))
            .map(|f| format!("<code>{}</code>", html_escape(&f.name)))
            .collect();
        out.push_str(&format!(
            "  <li><strong>{}</strong> ({})",
            html_escape(&oneof.name),
            members.join(", ")
        ));
        if oneof.description.is_some() {
            out.push_str(": ");
            out.push_str(&description_html(&oneof.description));
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
    out
}

fn render_fields_html(fields: &[FieldDoc]) -> String {
    let mut out = String::new();
    out.push_str(
        "<table>\n<tr><th>Field</th><th>Type</th><th>Number</th><th>Description</th></tr>\n",
    );
    for field in fields {
        let label = field
            .label
            .map(|l| format!("<span class=\"label\">{}</span>", l))
            .unwrap_or_default();
        let extends = field
            .extendee
            .as_deref()
            .map(|e| format!(" (extends <code>{}</code>)", html_escape(e)))
            .unwrap_or_default();
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}<code>{}</code>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&field.name),
            label,
            html_escape(&field.type_name),
            extends,
            field.number,
            description_html(&field.description)
        ));
    }
    out.push_str("</table>\n");
    out
}

fn heading(name: &str, anchor: &str) -> String {
    format!(
        "<h3 id=\"{}\">{}</h3>\n",
        html_escape(anchor),
        html_escape(name)
    )
}

fn push_paragraph(out: &mut String, description: &Option<String>) {
    if description.is_some() {
        out.push_str(&format!("<p>{}</p>\n", description_html(description)));
    }
}

fn description_html(description: &Option<String>) -> String {
    description
        .as_deref()
        .map(|d| html_escape(d).replace('\n', "<br>\n"))
        .unwrap_or_default()
}

fn stream_type_html(name: &str, streaming: bool) -> String {
    let ty = format!("<code>{}</code>", html_escape(name));
    if streaming {
        format!("stream {}", ty)
    } else {
        ty
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
