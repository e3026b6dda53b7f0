//! Canonical text output
//!
//! Output is deterministic: attributes follow schema order, children follow
//! their canonical order, extension blocks come after the schema children and
//! the root element ends with a newline.

use tracing::instrument;

use crate::element::Element;
use crate::error::{Error, ErrorKind, Result};
use crate::extension::{Content, Node};

/// Largest accepted indentation step
pub const MAX_INDENT_SPACES: usize = 8;

/// Configuration options for formatting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatConfig {
    /// Number of spaces for each nesting level
    pub indent_spaces: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent_spaces: 2 }
    }
}

impl FormatConfig {
    pub const fn new(indent_spaces: usize) -> Self {
        Self { indent_spaces }
    }

    pub fn validate(&self) -> Result<()> {
        if self.indent_spaces > MAX_INDENT_SPACES {
            return Err(Error::detached(ErrorKind::InvalidIndentation {
                max: MAX_INDENT_SPACES,
            }));
        }
        Ok(())
    }
}

/// Serialize with two-space indentation
pub fn serialize(element: &Element) -> String {
    let mut writer = Writer::new(FormatConfig::default());
    writer.element(element, 0);
    writer.out
}

/// Serialize with custom formatting
#[instrument(skip(element), fields(type_name = element.type_name()))]
pub fn serialize_with_config(element: &Element, config: &FormatConfig) -> Result<String> {
    config.validate()?;
    let mut writer = Writer::new(*config);
    writer.element(element, 0);
    Ok(writer.out)
}

struct Writer {
    out: String,
    unit: String,
}

impl Writer {
    fn new(config: FormatConfig) -> Self {
        Self {
            out: String::new(),
            unit: " ".repeat(config.indent_spaces),
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(&self.unit);
        }
    }

    fn element(&mut self, element: &Element, depth: usize) {
        self.indent(depth);
        self.out.push('<');
        self.out.push_str(element.tag());
        for spec in element.schema().attributes {
            if let Some(value) = element.attribute(spec.name) {
                self.attribute(spec.name, &spec.kind.render(value));
            }
        }
        if element.is_empty() {
            self.out.push_str("/>\n");
            return;
        }
        self.out.push('>');

        let text = element.text().zip(element.schema().text);
        let extension = element.populated_extension();
        if element.children().is_empty() && extension.is_none() {
            if let Some((value, spec)) = text {
                escape_into(&mut self.out, &spec.kind.render(value));
            }
        } else {
            self.out.push('\n');
            if let Some((value, spec)) = text {
                self.indent(depth + 1);
                escape_into(&mut self.out, &spec.kind.render(value));
                self.out.push('\n');
            }
            for child in element.children() {
                self.element(child, depth + 1);
            }
            for block in extension.map(|ext| ext.blocks()).unwrap_or_default() {
                self.node(block, depth + 1);
            }
            self.indent(depth);
        }
        self.close(element.tag());
    }

    fn node(&mut self, node: &Node, depth: usize) {
        self.indent(depth);
        self.open_node(node);
        if node.is_empty() {
            self.out.push_str("/>\n");
        } else if node.has_text() {
            self.out.push('>');
            self.inline_content(node);
            self.close(&node.name);
        } else {
            self.out.push_str(">\n");
            for child in node.nodes() {
                self.node(child, depth + 1);
            }
            self.indent(depth);
            self.close(&node.name);
        }
    }

    /// Mixed content is written on one line so its text survives verbatim
    fn inline_content(&mut self, node: &Node) {
        for content in &node.children {
            match content {
                // whitespace-only runs are dropped as markup indentation unless wrapped
                Content::Text(text) if text.trim().is_empty() => {
                    self.out.push_str("<![CDATA[");
                    self.out.push_str(text);
                    self.out.push_str("]]>");
                }
                Content::Text(text) => escape_into(&mut self.out, text),
                Content::Node(child) => {
                    self.open_node(child);
                    if child.is_empty() {
                        self.out.push_str("/>");
                    } else {
                        self.out.push('>');
                        self.inline_content(child);
                        self.out.push_str("</");
                        self.out.push_str(&child.name);
                        self.out.push('>');
                    }
                }
            }
        }
    }

    fn open_node(&mut self, node: &Node) {
        self.out.push('<');
        self.out.push_str(&node.name);
        for (name, value) in &node.attributes {
            self.attribute(name, value);
        }
    }

    fn attribute(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        escape_into(&mut self.out, value);
        self.out.push('"');
    }

    fn close(&mut self, tag: &str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }
}

/// Escape markup characters in attribute values and text
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
