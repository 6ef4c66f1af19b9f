//! Serialization of live subtrees.
//!
//! `to_html` produces the markup a browser would show for the subtree, which
//! is what pre-rendered pages are built from. `snapshot` produces a
//! structural copy that serializes with serde, used to compare trees.

use std::fmt::Write;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::node::{LiveKind, LiveNode};
use crate::vdom::{AttrValue, Namespace};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Structural copy of a live subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Snapshot {
    Element {
        namespace: Namespace,
        tag: String,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        properties: IndexMap<String, AttrValue>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        listeners: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Snapshot>,
    },
    Text {
        text: String,
    },
}

/// Whether `name` can be written as a tag or attribute name: an ASCII letter
/// followed by letters, digits, `-`, `_`, `:` or `.`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        }
        _ => false,
    }
}

fn attribute_name(key: &str) -> &str {
    match key {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

impl LiveNode {
    /// Serialize this subtree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, None);
        out
    }

    fn write_html(&self, out: &mut String, parent_namespace: Option<Namespace>) {
        let data = self.0.borrow();
        let (namespace, tag) = match &data.kind {
            LiveKind::Text(text) => {
                escape_into(out, text, false);
                return;
            }
            LiveKind::Element { namespace, tag } => (*namespace, tag.as_str()),
        };

        out.push('<');
        out.push_str(tag);

        if namespace == Namespace::Svg
            && parent_namespace != Some(Namespace::Svg)
            && !data.properties.contains_key("xmlns")
        {
            let _ = write!(out, " xmlns=\"{}\"", namespace.uri());
        }

        for (key, value) in &data.properties {
            if !is_valid_name(key) {
                warn!(%key, %tag, "skipping attribute with invalid name");
                continue;
            }
            match value {
                AttrValue::Bool(false) => {}
                AttrValue::Bool(true) => {
                    out.push(' ');
                    out.push_str(attribute_name(key));
                }
                value => {
                    let _ = write!(out, " {}=\"", attribute_name(key));
                    escape_into(out, &value.to_string(), true);
                    out.push('"');
                }
            }
        }

        if data.children.is_empty() {
            if namespace == Namespace::Svg {
                out.push_str("/>");
                return;
            }
            if VOID_ELEMENTS.contains(&tag) {
                out.push('>');
                return;
            }
        }

        out.push('>');
        for child in &data.children {
            child.write_html(out, Some(namespace));
        }
        let _ = write!(out, "</{tag}>");
    }

    /// Structural copy of this subtree.
    pub fn snapshot(&self) -> Snapshot {
        let data = self.0.borrow();
        match &data.kind {
            LiveKind::Text(text) => Snapshot::Text { text: text.clone() },
            LiveKind::Element { namespace, tag } => Snapshot::Element {
                namespace: *namespace,
                tag: tag.clone(),
                properties: data.properties.clone(),
                listeners: data.listeners.iter().map(|(name, _)| name.clone()).collect(),
                children: data.children.iter().map(LiveNode::snapshot).collect(),
            },
        }
    }
}
