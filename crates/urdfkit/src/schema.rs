//! Element schemas
//!
//! Every element type is described by a static [`ElementSchema`]: the
//! attributes it carries, the children it may hold and how many of each,
//! whether it holds text, and whether it accepts a simulator extension block.
//! The full table lives in [`table`]; [`Registry`] indexes it.

pub mod registry;
pub mod table;

pub use registry::{schema_for, Registry};

use crate::extension::ExtensionProfile;
use crate::value::{Value, ValueKind};

/// Default value of an attribute or text slot
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultValue {
    Int(i64),
    Real(f64),
    Bool(bool),
    Text(&'static str),
    Vector(&'static [f64]),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            Self::Int(i) => Value::Int(i),
            Self::Real(n) => Value::Number(n),
            Self::Bool(b) => Value::Bool(b),
            Self::Text(s) => Value::Text(s.to_string()),
            Self::Vector(v) => Value::Vector(v.to_vec()),
        }
    }
}

/// Declared attribute of an element type
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    pub default: DefaultValue,
    pub required: bool,
    /// Allowed values; empty means unrestricted
    pub choices: &'static [&'static str],
}

impl AttributeSpec {
    pub const fn required(name: &'static str, kind: ValueKind, default: DefaultValue) -> Self {
        Self {
            name,
            kind,
            default,
            required: true,
            choices: &[],
        }
    }

    pub const fn optional(name: &'static str, kind: ValueKind, default: DefaultValue) -> Self {
        Self {
            name,
            kind,
            default,
            required: false,
            choices: &[],
        }
    }

    pub const fn with_choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    /// Whether a value is acceptable for the choice list
    pub fn allows(&self, value: &Value) -> bool {
        self.choices.is_empty() || value.as_str().is_some_and(|s| self.choices.contains(&s))
    }
}

/// How many instances of a child type a parent may hold
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one
    One,
    /// Zero or one
    ZeroOrOne,
    /// Any number, insertion order kept
    ZeroOrMany,
    /// Exactly one among all children sharing the group name
    Choice(&'static str),
}

impl Cardinality {
    /// Whether the slot holds at most one child
    pub const fn is_single(self) -> bool {
        !matches!(self, Self::ZeroOrMany)
    }
}

/// Declared child slot of an element type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildSpec {
    /// Tag the child carries in documents
    pub tag: &'static str,
    /// Registered type of the child
    pub type_name: &'static str,
    pub cardinality: Cardinality,
}

impl ChildSpec {
    pub const fn one(tag: &'static str) -> Self {
        Self::new(tag, Cardinality::One)
    }

    pub const fn optional(tag: &'static str) -> Self {
        Self::new(tag, Cardinality::ZeroOrOne)
    }

    pub const fn many(tag: &'static str) -> Self {
        Self::new(tag, Cardinality::ZeroOrMany)
    }

    pub const fn choice(tag: &'static str, group: &'static str) -> Self {
        Self::new(tag, Cardinality::Choice(group))
    }

    const fn new(tag: &'static str, cardinality: Cardinality) -> Self {
        Self {
            tag,
            type_name: tag,
            cardinality,
        }
    }

    /// Bind the tag to a registered type with a different name
    pub const fn of_type(mut self, type_name: &'static str) -> Self {
        self.type_name = type_name;
        self
    }
}

/// Text content carried by leaf elements
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextSpec {
    pub kind: ValueKind,
    pub default: DefaultValue,
}

/// Declared shape of one element type
#[derive(Debug, PartialEq)]
pub struct ElementSchema {
    pub type_name: &'static str,
    pub tag: &'static str,
    pub summary: &'static str,
    pub attributes: &'static [AttributeSpec],
    pub children: &'static [ChildSpec],
    pub text: Option<TextSpec>,
    pub extension: Option<ExtensionProfile>,
}

impl ElementSchema {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn attributes(&self) -> &'static [AttributeSpec] {
        self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&'static AttributeSpec> {
        self.attributes.iter().find(|spec| spec.name == name)
    }

    pub fn children(&self) -> &'static [ChildSpec] {
        self.children
    }

    /// Child slot for a tag as it appears in documents
    pub fn child_by_tag(&self, tag: &str) -> Option<&'static ChildSpec> {
        self.children.iter().find(|spec| spec.tag == tag)
    }

    /// Declaration index of a child type, which fixes its emission order
    pub fn child_index(&self, type_name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|spec| spec.type_name == type_name)
    }

    pub fn text(&self) -> Option<TextSpec> {
        self.text
    }

    pub fn supports_extension(&self) -> bool {
        self.extension.is_some()
    }

    pub fn extension_profile(&self) -> Option<ExtensionProfile> {
        self.extension
    }

    /// Distinct choice groups in declaration order
    pub fn choice_groups(&self) -> Vec<&'static str> {
        let mut groups: Vec<&'static str> = Vec::new();
        for spec in self.children {
            if let Cardinality::Choice(group) = spec.cardinality {
                if !groups.contains(&group) {
                    groups.push(group);
                }
            }
        }
        groups
    }

    /// Members of a choice group; the first one is the default alternative
    pub fn choice_members<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = &'static ChildSpec> + 'a {
        self.children
            .iter()
            .filter(move |spec| matches!(spec.cardinality, Cardinality::Choice(g) if g == group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn test_choice_groups() -> Result<()> {
        let geometry = schema_for("geometry")?;
        assert_eq!(geometry.choice_groups(), vec!["shape"]);
        let members: Vec<_> = geometry.choice_members("shape").map(|s| s.tag).collect();
        assert_eq!(members, vec!["box", "cylinder", "sphere", "mesh"]);
        Ok(())
    }

    #[test]
    fn test_choice_members_for_borrowed_group() -> Result<()> {
        let geometry = schema_for("geometry")?;
        let group = String::from("shape");
        let first = geometry.choice_members(&group).next();
        drop(group);
        assert_eq!(first.map(|s| s.type_name), Some("box"));
        assert_eq!(geometry.choice_members("size").count(), 0);
        Ok(())
    }

    #[test]
    fn test_child_lookup_by_tag_and_type() -> Result<()> {
        let transmission = schema_for("transmission")?;
        let joint = transmission.child_by_tag("joint");
        assert_eq!(joint.map(|s| s.type_name), Some("transmission_joint"));
        assert_eq!(transmission.child_index("transmission_joint"), Some(1));
        assert_eq!(transmission.child_index("joint"), None);
        Ok(())
    }

    #[test]
    fn test_attribute_choices() -> Result<()> {
        let joint = schema_for("joint")?;
        let kind = joint.attribute("type");
        assert!(kind.is_some_and(|spec| spec.allows(&Value::from("prismatic"))));
        assert!(!kind.is_some_and(|spec| spec.allows(&Value::from("hinge"))));
        Ok(())
    }
}
