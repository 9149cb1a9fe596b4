//! GitHub-flavored markdown anchor/slug generation.

use std::collections::HashSet;

/// Generate a table-of-contents link to a heading anchor.
pub fn render_toc_link(text: &str, anchor: &str) -> String {
    format!("[{}](#{})", text, anchor)
}

/// Generate a TOC list item.
pub fn render_toc_item(title: &str, anchor: &str) -> String {
    format!("* {}", render_toc_link(title, anchor))
}

/// GitHub heading anchor slug generation.
///
/// - lowercase
/// - remove all chars that aren't alphanumeric, space, hyphen or underscore
/// - replace spaces with hyphens
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// Hands out heading anchors in document order, numbering repeats the way
/// GitHub does (`order`, `order-1`, `order-2`).
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashSet<String>,
}

impl Slugger {
    pub fn slug(&mut self, text: &str) -> String {
        let base = github_slug(text);
        let mut slug = base.clone();
        let mut n = 0;
        while self.seen.contains(&slug) {
            n += 1;
            slug = format!("{}-{}", base, n);
        }
        self.seen.insert(slug.clone());
        slug
    }
}
