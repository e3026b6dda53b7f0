//! Process-wide schema registry

use std::sync::OnceLock;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::table::SCHEMAS;
use crate::schema::{Cardinality, ElementSchema};

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Index over the static schema table
///
/// Built once on first use and read-only afterwards, so it can be shared
/// across threads without locking.
#[derive(Debug)]
pub struct Registry {
    by_type: IndexMap<&'static str, &'static ElementSchema>,
}

impl Registry {
    /// The shared registry
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(|| {
            let registry = Self::from_table(SCHEMAS);
            debug!(types = registry.len(), "schema registry initialised");
            registry
        })
    }

    pub(crate) fn from_table(table: &'static [ElementSchema]) -> Self {
        let by_type = table
            .iter()
            .map(|schema| (schema.type_name, schema))
            .collect();
        Self { by_type }
    }

    /// Schema for a registered type name
    pub fn schema_for(&self, type_name: &str) -> Result<&'static ElementSchema> {
        self.by_type
            .get(type_name)
            .copied()
            .ok_or_else(|| Error::unknown_type(type_name))
    }

    /// Schema for a document tag when no parent context is available
    ///
    /// Only tags match. When several types share a tag the one whose type
    /// name equals the tag wins, so `<joint>` resolves to a robot joint
    /// rather than a transmission joint.
    pub fn lookup_tag(&self, tag: &str) -> Option<&'static ElementSchema> {
        self.by_type
            .get(tag)
            .copied()
            .filter(|schema| schema.tag == tag)
            .or_else(|| self.schemas().find(|schema| schema.tag == tag))
    }

    /// Whether any registered type carries the tag
    pub fn knows_tag(&self, tag: &str) -> bool {
        self.lookup_tag(tag).is_some()
    }

    /// Registered type names in table order
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_type.keys().copied()
    }

    pub fn schemas(&self) -> impl Iterator<Item = &'static ElementSchema> + '_ {
        self.by_type.values().copied()
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Check the table for dangling child types, unsatisfiable defaults and
    /// cycles through required children
    pub fn validate(&self) -> Result<()> {
        for schema in self.schemas() {
            for attribute in schema.attributes {
                let default = attribute.default.to_value();
                let fits = attribute.kind.coerce(default.clone()).is_ok() && attribute.allows(&default);
                if !fits {
                    return Err(Error::invalid_value(
                        attribute.name,
                        format!("default does not fit <{}>", schema.type_name),
                    ));
                }
            }
            for child in schema.children {
                self.schema_for(child.type_name)?;
            }
            let mut path = Vec::new();
            self.check_required_cycle(schema, &mut path)?;
        }
        Ok(())
    }

    fn check_required_cycle(
        &self,
        schema: &'static ElementSchema,
        path: &mut Vec<&'static str>,
    ) -> Result<()> {
        if path.contains(&schema.type_name) {
            return Err(Error::invalid_value(
                schema.type_name,
                format!("required children form a cycle: {}", path.join(" -> ")),
            ));
        }
        path.push(schema.type_name);
        let mut seen_groups: Vec<&'static str> = Vec::new();
        for child in schema.children {
            let required = match child.cardinality {
                Cardinality::One => true,
                Cardinality::Choice(group) if !seen_groups.contains(&group) => {
                    seen_groups.push(group);
                    true
                }
                _ => false,
            };
            if required {
                let child_schema = self.schema_for(child.type_name)?;
                self.check_required_cycle(child_schema, path)?;
            }
        }
        path.pop();
        Ok(())
    }
}

/// Schema for a registered type name in the shared registry
pub fn schema_for(type_name: &str) -> Result<&'static ElementSchema> {
    Registry::global().schema_for(type_name)
}
