//! Element construction with default population

use tracing::{debug, instrument};

use crate::element::Element;
use crate::error::Result;
use crate::reset::reset;
use crate::schema::{Cardinality, ElementSchema, Registry};

/// Create an element holding only its required content at default values
///
/// Required attributes get their defaults, text elements get their default
/// text, `one` children are created recursively and every choice group gets
/// its first member. Optional content stays absent.
#[instrument]
pub fn create(type_name: &str) -> Result<Element> {
    let registry = Registry::global();
    let element = build(registry.schema_for(type_name)?, registry)?;
    debug!(children = element.children().len(), "element created");
    Ok(element)
}

/// Create an element with every optional attribute, child and extension
/// block populated
#[instrument]
pub fn create_materialized(type_name: &str) -> Result<Element> {
    let mut element = create(type_name)?;
    reset(&mut element, true)?;
    Ok(element)
}

pub(crate) fn build(schema: &'static ElementSchema, registry: &Registry) -> Result<Element> {
    let mut element = Element::bare(schema);
    fill_required(&mut element, registry)?;
    Ok(element)
}

/// Add defaults for every required attribute, text and child that is absent
pub(crate) fn fill_required(element: &mut Element, registry: &Registry) -> Result<()> {
    let schema = element.schema();
    for spec in schema.attributes.iter().filter(|spec| spec.required) {
        if element.attribute(spec.name).is_none() {
            element.put_attribute(spec.name, spec.default.to_value());
        }
    }
    if let Some(text) = schema.text {
        if element.text().is_none() {
            element.put_text(text.default.to_value());
        }
    }
    let mut filled_groups = Vec::new();
    for spec in schema.children {
        let needed = match spec.cardinality {
            Cardinality::One => element.child(spec.tag).is_none(),
            Cardinality::Choice(group) if !filled_groups.contains(&group) => {
                filled_groups.push(group);
                !schema
                    .choice_members(group)
                    .any(|member| element.child(member.type_name).is_some())
            }
            _ => false,
        };
        if needed {
            element.add_child(build(registry.schema_for(spec.type_name)?, registry)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::value::Value;

    #[test]
    fn test_create_link_has_only_name() -> Result<()> {
        let link = create("link")?;
        assert_eq!(link.name(), Some("link"));
        assert!(link.children().is_empty());
        assert!(link.extension().is_none());
        Ok(())
    }

    #[test]
    fn test_create_joint_required_children() -> Result<()> {
        let joint = create("joint")?;
        let tags: Vec<_> = joint.children().iter().map(Element::tag).collect();
        assert_eq!(tags, vec!["parent", "child", "limit"]);
        assert_eq!(joint.attribute("type"), Some(&Value::from("revolute")));
        Ok(())
    }

    #[test]
    fn test_create_picks_first_choice_member() -> Result<()> {
        let geometry = create("geometry")?;
        assert_eq!(geometry.children().len(), 1);
        assert!(geometry.child("box").is_some());
        let sensor = create("sensor")?;
        assert!(sensor.child("camera").is_some());
        assert!(sensor.child("ray").is_none());
        Ok(())
    }

    #[test]
    fn test_create_text_element() -> Result<()> {
        let reduction = create("mechanical_reduction")?;
        assert_eq!(reduction.tag(), "mechanicalReduction");
        assert_eq!(reduction.text(), Some(&Value::Number(1.0)));
        Ok(())
    }

    #[test]
    fn test_create_unknown_type() {
        let err = create("wheel").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::UnknownElementType { .. })
        ));
    }

    #[test]
    fn test_every_registered_type_is_valid_after_create() -> Result<()> {
        for type_name in Registry::global().type_names() {
            create(type_name)?.validate()?;
        }
        Ok(())
    }
}
