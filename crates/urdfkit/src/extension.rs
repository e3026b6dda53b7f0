//! Simulator extension blocks
//!
//! `<gazebo>` blocks carry simulator-specific content that evolves
//! independently of the robot-description schema. They are kept as opaque
//! [`Node`] trees: parsed, stored and written back verbatim, never validated
//! against the registry.

pub mod plugin;

pub use plugin::{Bumper, FtSensor, P3d, Plugin, RosControl};

use indexmap::IndexMap;

use crate::value::{Value, ValueKind};

/// Opaque markup node
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

/// Content of an opaque node
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Content {
    Node(Node),
    Text(String),
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Node holding a single text value, e.g. `<mu1>0</mu1>`
    pub fn text_element(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    /// Node holding a value rendered under an explicit kind
    pub fn value_element(name: impl Into<String>, kind: ValueKind, value: &Value) -> Self {
        Self::text_element(name, kind.render(value))
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(Content::Node(child));
        self
    }

    /// Append text content; empty text adds nothing
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Content::Text(text));
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child nodes, skipping text
    pub fn nodes(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|content| match content {
            Content::Node(node) => Some(node),
            Content::Text(_) => None,
        })
    }

    /// First child node with a name
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.nodes().find(|node| node.name == name)
    }

    /// Concatenated text content, if any
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        for content in &self.children {
            if let Content::Text(part) = content {
                text.push_str(part);
            }
        }
        (!text.is_empty()).then_some(text)
    }

    pub fn has_text(&self) -> bool {
        self.children
            .iter()
            .any(|content| matches!(content, Content::Text(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Extension payload owned by a host element
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Extension {
    blocks: Vec<Node>,
}

impl Extension {
    /// Tag of an extension block in documents
    pub const TAG: &'static str = "gazebo";

    pub fn new() -> Self {
        Self::default()
    }

    /// Empty `<gazebo>` block, optionally bound to a named element
    pub fn block(reference: Option<&str>) -> Node {
        let node = Node::new(Self::TAG);
        match reference {
            Some(reference) => node.with_attribute("reference", reference),
            None => node,
        }
    }

    pub fn blocks(&self) -> &[Node] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut Vec<Node> {
        &mut self.blocks
    }

    pub fn push(&mut self, block: Node) {
        self.blocks.push(block);
    }

    /// First block bound to a reference
    pub fn for_reference(&self, reference: &str) -> Option<&Node> {
        self.blocks
            .iter()
            .find(|block| block.attribute("reference") == Some(reference))
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl From<Node> for Extension {
    fn from(block: Node) -> Self {
        Self {
            blocks: vec![block],
        }
    }
}

/// Default extension content of the element types that accept one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionProfile {
    Robot,
    Link,
    Joint,
}

impl ExtensionProfile {
    /// Fully populated default block for a host element
    pub fn defaults(self, host_name: Option<&str>) -> Extension {
        match self {
            Self::Robot => {
                let control = RosControl::default().to_plugin().into_node();
                Extension::from(Extension::block(None).with_child(control))
            }
            Self::Link => Extension::from(with_values(
                Extension::block(host_name),
                &[
                    ("mu1", ValueKind::Real, Value::Number(0.0)),
                    ("mu2", ValueKind::Real, Value::Number(0.0)),
                    ("kp", ValueKind::Float, Value::Number(1e12)),
                    ("kd", ValueKind::Real, Value::Number(1.0)),
                    ("maxContacts", ValueKind::Int, Value::Int(20)),
                    ("minDepth", ValueKind::Real, Value::Number(0.0)),
                    ("maxVel", ValueKind::Real, Value::Number(0.01)),
                    ("selfCollide", ValueKind::Int, Value::Int(0)),
                ],
            )),
            Self::Joint => Extension::from(with_values(
                Extension::block(host_name),
                &[
                    ("provideFeedback", ValueKind::Bool, Value::Bool(false)),
                    ("implicitSpringDamper", ValueKind::Bool, Value::Bool(false)),
                    ("stopCfm", ValueKind::Real, Value::Number(0.0)),
                    ("stopErp", ValueKind::Real, Value::Number(0.2)),
                    ("fudgeFactor", ValueKind::Real, Value::Number(0.0)),
                ],
            )),
        }
    }
}

fn with_values(block: Node, values: &[(&str, ValueKind, Value)]) -> Node {
    values.iter().fold(block, |block, (name, kind, value)| {
        block.with_child(Node::value_element(*name, *kind, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_defaults() {
        let extension = ExtensionProfile::Link.defaults(Some("base_link"));
        let block = extension.for_reference("base_link");
        assert!(block.is_some());
        let kp = block.and_then(|b| b.child("kp")).and_then(Node::text);
        assert_eq!(kp.as_deref(), Some("1000000000000.0"));
        let max_vel = block.and_then(|b| b.child("maxVel")).and_then(Node::text);
        assert_eq!(max_vel.as_deref(), Some("0.01"));
    }

    #[test]
    fn test_robot_defaults_hold_control_plugin() {
        let extension = ExtensionProfile::Robot.defaults(Some("robot"));
        let plugin = extension.blocks().first().and_then(|b| b.child("plugin"));
        assert_eq!(
            plugin.and_then(|p| p.attribute("filename")),
            Some("libgazebo_ros_control.so")
        );
        assert_eq!(extension.blocks().first().and_then(|b| b.attribute("reference")), None);
    }

    #[test]
    fn test_empty_text_adds_no_content() {
        let node = Node::text_element("robotNamespace", "");
        assert!(node.is_empty());
        assert_eq!(node.text(), None);
    }
}
