//! In-place re-population of elements

use tracing::{instrument, trace};

use crate::element::Element;
use crate::error::Result;
use crate::factory::build;
use crate::schema::{Cardinality, ElementSchema, Registry};

/// Deepest level that still receives optional content during materialization
pub const MAX_MATERIALIZE_DEPTH: usize = 32;

/// Reset an element to the default state of its type
///
/// All prior attributes, children, text and extension content are dropped.
/// Without `with_optional_elements` the result equals a fresh
/// [`create`](crate::create). With it, every optional attribute is set, one
/// materialized child is added per optional or repeated slot (only the first
/// member of a choice group), and the default extension block is attached
/// where the type supports one.
#[instrument(skip(element), fields(type_name = element.type_name()))]
pub fn reset(element: &mut Element, with_optional_elements: bool) -> Result<()> {
    let schema = element.schema();
    let registry = Registry::global();
    *element = if with_optional_elements {
        materialize(schema, &mut Vec::new(), registry)?
    } else {
        build(schema, registry)?
    };
    Ok(())
}

/// Fully populated element; a type already on the current path, or any
/// node past the depth bound, only gets its required content
fn materialize(
    schema: &'static ElementSchema,
    path: &mut Vec<&'static str>,
    registry: &Registry,
) -> Result<Element> {
    if path.contains(&schema.type_name) || path.len() >= MAX_MATERIALIZE_DEPTH {
        trace!(type_name = schema.type_name, depth = path.len(), "materialization stopped");
        return build(schema, registry);
    }
    path.push(schema.type_name);

    let mut element = Element::bare(schema);
    for spec in schema.attributes {
        element.put_attribute(spec.name, spec.default.to_value());
    }
    if let Some(text) = schema.text {
        element.put_text(text.default.to_value());
    }
    let mut seen_groups = Vec::new();
    for spec in schema.children {
        if let Cardinality::Choice(group) = spec.cardinality {
            if seen_groups.contains(&group) {
                continue;
            }
            seen_groups.push(group);
        }
        let child = materialize(registry.schema_for(spec.type_name)?, path, registry)?;
        element.add_child(child)?;
    }
    if let Some(profile) = schema.extension {
        element.set_extension(profile.defaults(element.name()))?;
    }

    path.pop();
    Ok(element)
}
