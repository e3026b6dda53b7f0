//! urdfkit - Schema-driven element tree for URDF robot descriptions
//!
//! Every element type (links, joints, inertial and geometry blocks,
//! transmissions, sensors) is described by a static schema. Elements are
//! created with their required content at default values, can be fully
//! materialized with every optional part, parsed from text with validation,
//! and serialized to a deterministic canonical form.
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), urdfkit::Error> {
//! let mut link = urdfkit::create("link")?;
//! assert_eq!(urdfkit::serialize(&link), "<link name=\"link\"/>\n");
//!
//! link.set_name("base_link")?;
//! link.set("inertial.mass.value", 2.5)?;
//! let text = urdfkit::serialize(&link);
//! assert_eq!(urdfkit::parse(&text)?, link);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use tracing::instrument;

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod value;
pub use value::{Value, ValueKind};

pub mod schema;
pub use schema::{
    AttributeSpec, Cardinality, ChildSpec, DefaultValue, ElementSchema, Registry, TextSpec,
};

pub mod element;
pub use element::Element;

pub mod extension;
pub use extension::{
    Bumper, Content, Extension, ExtensionProfile, FtSensor, Node, P3d, Plugin, RosControl,
};

pub mod factory;
pub use factory::{create, create_materialized};

pub mod reset;
pub use reset::reset;

pub mod serializer;
pub use serializer::{serialize, serialize_with_config, FormatConfig};

pub mod parser;
pub use parser::{Config, Parser};

pub mod views;
pub use views::{Geometry, JointView, Limits, LinkView, RobotView};

/// Schema for a registered element type
pub fn schema_for(type_name: &str) -> Result<&'static ElementSchema> {
    schema::schema_for(type_name)
}

/// Parse a robot-description document with default limits
pub fn parse(text: &str) -> Result<Element> {
    parse_with_config(text, Config::default())
}

/// Parse a document whose root must be of the given element type
pub fn parse_as(text: &str, type_name: &str) -> Result<Element> {
    Parser::new(text.as_bytes()).parse_as(type_name)
}

/// Parse with custom configuration
#[instrument(skip(text), fields(len = text.len()))]
pub fn parse_with_config(text: &str, config: Config) -> Result<Element> {
    Parser::with_config(text.as_bytes(), config).parse()
}
