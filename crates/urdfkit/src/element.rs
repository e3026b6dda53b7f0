//! Schema-constrained element tree
//!
//! An [`Element`] is bound to a static [`ElementSchema`] for its whole life.
//! Every mutation goes through that schema: attributes are coerced to their
//! declared kind, children must be declared by the parent and are kept in
//! canonical order (schema declaration order, insertion order within one
//! type), and required content cannot be removed.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::extension::Extension;
use crate::factory;
use crate::schema::{Cardinality, ChildSpec, ElementSchema};
use crate::value::Value;

/// Typed node of a robot description
#[derive(Clone)]
pub struct Element {
    schema: &'static ElementSchema,
    attributes: IndexMap<&'static str, Value>,
    children: Vec<Element>,
    text: Option<Value>,
    extension: Option<Extension>,
}

impl Element {
    /// Element without any content; callers fill it before handing it out
    pub(crate) fn bare(schema: &'static ElementSchema) -> Self {
        Self {
            schema,
            attributes: IndexMap::new(),
            children: Vec::new(),
            text: None,
            extension: None,
        }
    }

    pub fn schema(&self) -> &'static ElementSchema {
        self.schema
    }

    pub fn type_name(&self) -> &'static str {
        self.schema.type_name
    }

    /// Tag written in documents
    pub fn tag(&self) -> &'static str {
        self.schema.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Present attributes in schema order
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.schema
            .attributes
            .iter()
            .filter_map(|spec| self.attributes.get(spec.name).map(|value| (spec.name, value)))
    }

    /// Assign an attribute, converting the value to the declared kind
    pub fn set_attribute(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let spec = self
            .schema
            .attribute(name)
            .ok_or_else(|| Error::unknown_attribute(self.tag(), name))?;
        let value = spec
            .kind
            .coerce(value.into())
            .map_err(|m| Error::type_mismatch(self.tag(), spec.name, m.expected, m.found))?;
        if !spec.allows(&value) {
            return Err(Error::type_mismatch(
                self.tag(),
                spec.name,
                format!("one of {}", spec.choices.join(", ")),
                value.describe(),
            ));
        }
        self.attributes.insert(spec.name, value);
        Ok(())
    }

    /// Remove an optional attribute, returning its value
    pub fn remove_attribute(&mut self, name: &str) -> Result<Option<Value>> {
        let spec = self
            .schema
            .attribute(name)
            .ok_or_else(|| Error::unknown_attribute(self.tag(), name))?;
        if spec.required {
            return Err(Error::missing(self.tag(), format!("attribute {name:?}")));
        }
        Ok(self.attributes.shift_remove(name))
    }

    /// Store an already validated attribute value
    pub(crate) fn put_attribute(&mut self, name: &'static str, value: Value) {
        self.attributes.insert(name, value);
    }

    /// Value of the `name` attribute, if the element carries one as text
    pub fn name(&self) -> Option<&str> {
        self.attribute("name").and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.set_attribute("name", name.into())
    }

    pub fn text(&self) -> Option<&Value> {
        self.text.as_ref()
    }

    pub fn set_text(&mut self, value: impl Into<Value>) -> Result<()> {
        let spec = self
            .schema
            .text
            .ok_or_else(|| Error::unexpected_child(self.tag(), "text content"))?;
        let value = spec
            .kind
            .coerce(value.into())
            .map_err(|m| Error::type_mismatch(self.tag(), "text", m.expected, m.found))?;
        // documents trim text content, so padded or blank text would not read back
        let rendered = spec.kind.render(&value);
        if rendered.is_empty() || rendered.trim() != rendered {
            return Err(Error::type_mismatch(
                self.tag(),
                "text",
                "text without surrounding whitespace",
                rendered,
            ));
        }
        self.text = Some(value);
        Ok(())
    }

    pub(crate) fn put_text(&mut self, value: Value) {
        self.text = Some(value);
    }

    /// Children in canonical order
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// First child with a tag (or type name)
    pub fn child(&self, tag: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.answers_to(tag))
    }

    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Self> {
        self.children.iter_mut().find(|child| child.answers_to(tag))
    }

    /// All children with a tag (or type name), in insertion order
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |child| child.answers_to(tag))
    }

    fn answers_to(&self, tag: &str) -> bool {
        self.tag() == tag || self.type_name() == tag
    }

    /// Insert a child at its canonical position
    ///
    /// A child for a single-instance slot replaces the current one; a member
    /// of a choice group replaces whichever member is present.
    pub fn add_child(&mut self, child: Self) -> Result<()> {
        let spec = self
            .child_spec(child.type_name())
            .ok_or_else(|| Error::unexpected_child(self.tag(), child.tag()))?;
        match spec.cardinality {
            Cardinality::ZeroOrMany => {}
            Cardinality::Choice(group) => {
                let schema = self.schema;
                self.children
                    .retain(|existing| !in_group(schema, existing.type_name(), group));
            }
            Cardinality::One | Cardinality::ZeroOrOne => {
                self.children
                    .retain(|existing| existing.type_name() != spec.type_name);
            }
        }
        let index = self.schema.child_index(spec.type_name);
        let position = self
            .children
            .iter()
            .position(|existing| self.schema.child_index(existing.type_name()) > index)
            .unwrap_or(self.children.len());
        self.children.insert(position, child);
        Ok(())
    }

    /// Existing child with a tag, or a freshly created default one
    pub fn ensure_child(&mut self, tag: &str) -> Result<&mut Self> {
        let spec = self
            .schema
            .child_by_tag(tag)
            .or_else(|| self.child_spec(tag))
            .ok_or_else(|| Error::unexpected_child(self.tag(), tag))?;
        if !self.children.iter().any(|c| c.type_name() == spec.type_name) {
            self.add_child(factory::create(spec.type_name)?)?;
        }
        let tag = self.tag();
        self.children
            .iter_mut()
            .find(|c| c.type_name() == spec.type_name)
            .ok_or_else(|| Error::unexpected_child(tag, spec.tag))
    }

    /// Remove every child with a tag; required slots cannot be emptied
    pub fn remove_children(&mut self, tag: &str) -> Result<Vec<Self>> {
        let spec = self
            .schema
            .child_by_tag(tag)
            .or_else(|| self.child_spec(tag))
            .ok_or_else(|| Error::unexpected_child(self.tag(), tag))?;
        let present = self
            .children
            .iter()
            .any(|c| c.type_name() == spec.type_name);
        let required = matches!(spec.cardinality, Cardinality::One | Cardinality::Choice(_));
        if present && required {
            return Err(Error::missing(self.tag(), format!("child <{}>", spec.tag)));
        }
        let (removed, kept): (Vec<Self>, Vec<Self>) = std::mem::take(&mut self.children)
            .into_iter()
            .partition(|c| c.type_name() == spec.type_name);
        self.children = kept;
        Ok(removed)
    }

    fn child_spec(&self, type_name: &str) -> Option<&'static ChildSpec> {
        self.schema
            .children
            .iter()
            .find(|spec| spec.type_name == type_name)
    }

    /// Read an attribute or text value through a dotted path
    ///
    /// `"inertial.mass.value"` walks to the `mass` child of `inertial` and
    /// reads its `value` attribute. A last segment naming a text child
    /// reads that child's text.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let (parents, last) = split_path(path);
        let mut node = self;
        for segment in parents {
            node = node.child(segment)?;
        }
        if node.schema.attribute(last).is_some() {
            node.attribute(last)
        } else {
            node.child(last).and_then(Self::text)
        }
    }

    /// Assign through a dotted path, creating missing children on the way
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let (parents, last) = split_path(path);
        let mut node = self;
        for segment in parents {
            node = node.ensure_child(segment)?;
        }
        if node.schema.attribute(last).is_some() {
            return node.set_attribute(last, value);
        }
        match node.schema.child_by_tag(last) {
            Some(_) => node.ensure_child(last)?.set_text(value),
            None => Err(Error::unknown_attribute(node.tag(), last)),
        }
    }

    pub fn extension(&self) -> Option<&Extension> {
        self.extension.as_ref()
    }

    pub fn extension_mut(&mut self) -> Option<&mut Extension> {
        self.extension.as_mut()
    }

    pub fn set_extension(&mut self, extension: Extension) -> Result<()> {
        if !self.schema.supports_extension() {
            return Err(Error::unexpected_child(self.tag(), Extension::TAG));
        }
        self.extension = Some(extension).filter(|ext| !ext.is_empty());
        Ok(())
    }

    pub fn clear_extension(&mut self) -> Option<Extension> {
        self.extension.take()
    }

    /// Extension payload that is present and holds at least one block
    pub(crate) fn populated_extension(&self) -> Option<&Extension> {
        self.extension.as_ref().filter(|ext| !ext.is_empty())
    }

    /// Whether the element renders as a self-closing tag
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.text.is_none() && self.populated_extension().is_none()
    }

    /// Check that this element's own required content is present
    pub fn check_required(&self) -> Result<()> {
        for spec in self.schema.attributes {
            if spec.required && !self.attributes.contains_key(spec.name) {
                return Err(Error::missing(self.tag(), format!("attribute {:?}", spec.name)));
            }
        }
        if self.schema.text.is_some() && self.text.is_none() {
            return Err(Error::missing(self.tag(), "text"));
        }
        for spec in self.schema.children {
            if spec.cardinality == Cardinality::One
                && !self.children.iter().any(|c| c.type_name() == spec.type_name)
            {
                return Err(Error::missing(self.tag(), format!("child <{}>", spec.tag)));
            }
        }
        for group in self.schema.choice_groups() {
            let filled = self
                .children
                .iter()
                .any(|c| in_group(self.schema, c.type_name(), group));
            if !filled {
                let members: Vec<_> = self.schema.choice_members(group).map(|s| s.tag).collect();
                return Err(Error::missing(
                    self.tag(),
                    format!("one of <{}>", members.join(">, <")),
                ));
            }
        }
        Ok(())
    }

    /// Check required content of the whole subtree
    pub fn validate(&self) -> Result<()> {
        self.check_required()?;
        self.children.iter().try_for_each(Self::validate)
    }
}

fn in_group(schema: &ElementSchema, type_name: &str, group: &str) -> bool {
    schema
        .choice_members(group)
        .any(|member| member.type_name == type_name)
}

fn split_path(path: &str) -> (impl Iterator<Item = &str>, &str) {
    let (parents, last) = path.rsplit_once('.').unwrap_or(("", path));
    (parents.split('.').filter(|s| !s.is_empty()), last)
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.schema.type_name == other.schema.type_name
            && self.attributes == other.attributes
            && self.text == other.text
            && self.children == other.children
            && self.populated_extension() == other.populated_extension()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Element");
        debug.field("type", &self.type_name());
        debug.field("attributes", &self.attributes);
        if let Some(text) = &self.text {
            debug.field("text", text);
        }
        debug.field("children", &self.children);
        if let Some(extension) = &self.extension {
            debug.field("extension", extension);
        }
        debug.finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Element {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let attributes: IndexMap<&str, &Value> = self.attributes().collect();
        let mut state = serializer.serialize_struct("Element", 5)?;
        state.serialize_field("type", self.type_name())?;
        state.serialize_field("attributes", &attributes)?;
        state.serialize_field("text", &self.text)?;
        state.serialize_field("children", &self.children)?;
        state.serialize_field("extension", &self.extension)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::extension::Node;
    use crate::factory::create;

    #[test]
    fn test_set_attribute_coerces_to_kind() -> Result<()> {
        let mut mass = create("mass")?;
        mass.set_attribute("value", 3)?;
        assert_eq!(mass.attribute("value"), Some(&Value::Number(3.0)));
        Ok(())
    }

    #[test]
    fn test_set_attribute_rejects_unknown_and_mismatch() -> Result<()> {
        let mut link = create("link")?;
        let unknown = link.set_attribute("colour", "red").err();
        assert!(matches!(
            unknown.as_ref().map(Error::kind),
            Some(ErrorKind::UnknownAttribute { .. })
        ));
        let mut joint = create("joint")?;
        let mismatch = joint.set_attribute("type", "hinge").err();
        assert!(matches!(
            mismatch.as_ref().map(Error::kind),
            Some(ErrorKind::TypeMismatch { .. })
        ));
        let mut origin = create("origin")?;
        assert!(origin.set_attribute("xyz", [1.0, 2.0]).is_err());
        Ok(())
    }

    #[test]
    fn test_required_attribute_cannot_be_removed() -> Result<()> {
        let mut link = create("link")?;
        let err = link.remove_attribute("name").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::MissingRequiredField { .. })
        ));
        assert_eq!(link.name(), Some("link"));
        Ok(())
    }

    #[test]
    fn test_children_stay_in_canonical_order() -> Result<()> {
        let mut link = create("link")?;
        link.add_child(create("visual")?)?;
        link.add_child(create("collision")?)?;
        link.add_child(create("inertial")?)?;
        link.add_child(create("visual")?)?;
        let tags: Vec<_> = link.children().iter().map(Element::tag).collect();
        assert_eq!(tags, vec!["inertial", "collision", "visual", "visual"]);
        Ok(())
    }

    #[test]
    fn test_single_slot_and_choice_replace() -> Result<()> {
        let mut link = create("link")?;
        let mut first = create("inertial")?;
        first.set("mass.value", 2.0)?;
        link.add_child(first)?;
        link.add_child(create("inertial")?)?;
        assert_eq!(link.children_tagged("inertial").count(), 1);
        assert_eq!(link.get("inertial.mass.value"), Some(&Value::Number(0.0)));

        let mut geometry = create("geometry")?;
        geometry.add_child(create("sphere")?)?;
        let tags: Vec<_> = geometry.children().iter().map(Element::tag).collect();
        assert_eq!(tags, vec!["sphere"]);
        Ok(())
    }

    #[test]
    fn test_undeclared_child_is_rejected() -> Result<()> {
        let mut link = create("link")?;
        let err = link.add_child(create("limit")?).err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::UnexpectedChild { parent, child }) if parent == "link" && child == "limit"
        ));
        Ok(())
    }

    #[test]
    fn test_required_child_cannot_be_removed() -> Result<()> {
        let mut joint = create("joint")?;
        assert!(joint.remove_children("parent").is_err());
        joint.ensure_child("axis")?;
        assert_eq!(joint.remove_children("axis")?.len(), 1);
        assert!(joint.child("axis").is_none());
        Ok(())
    }

    #[test]
    fn test_dotted_paths() -> Result<()> {
        let mut link = create("link")?;
        assert_eq!(link.get("inertial.mass.value"), None);
        link.set("inertial.inertia.ixx", 1.5)?;
        assert_eq!(link.get("inertial.inertia.ixx"), Some(&Value::Number(1.5)));
        assert_eq!(link.get("inertial.mass.value"), Some(&Value::Number(0.0)));

        let mut actuator = create("actuator")?;
        actuator.set("mechanicalReduction", 50)?;
        assert_eq!(actuator.get("mechanicalReduction"), Some(&Value::Number(50.0)));
        assert!(actuator.set("gearRatio", 2).is_err());
        Ok(())
    }

    #[test]
    fn test_extension_only_on_supported_hosts() -> Result<()> {
        let mut link = create("link")?;
        link.set_extension(Extension::new())?;
        assert!(link.is_empty());
        assert!(link.extension().is_none());
        assert_eq!(link, create("link")?);
        let mut mass = create("mass")?;
        assert!(mass.set_extension(Extension::new()).is_err());
        Ok(())
    }

    #[test]
    fn test_emptied_extension_compares_as_absent() -> Result<()> {
        let mut link = create("link")?;
        link.set_extension(Extension::from(Extension::block(None).with_child(Node::new("kp"))))?;
        assert_ne!(link, create("link")?);
        if let Some(extension) = link.extension_mut() {
            extension.blocks_mut().clear();
        }
        assert_eq!(link, create("link")?);
        Ok(())
    }

    #[test]
    fn test_text_must_survive_trimming() -> Result<()> {
        let mut interface = create("hardware_interface")?;
        for text in ["", "   ", " custom ", "custom\n"] {
            let err = interface.set_text(text).err();
            assert!(
                matches!(err.as_ref().map(Error::kind), Some(ErrorKind::TypeMismatch { field, .. }) if field == "text"),
                "{text:?}"
            );
        }
        interface.set_text("custom")?;
        assert_eq!(interface.text(), Some(&Value::Text("custom".to_string())));
        Ok(())
    }

    #[test]
    fn test_check_required_reports_missing_choice() -> Result<()> {
        let schema = crate::schema::schema_for("geometry")?;
        let err = Element::bare(schema).check_required().err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::MissingRequiredField { element, .. }) if element == "geometry"
        ));
        Ok(())
    }
}
