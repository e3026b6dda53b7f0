//! Read-only typed views over element trees

use std::fmt;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::value::{render_real, Value};

/// Shape of a visual or collision block
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Box { size: [f64; 3] },
    Cylinder { radius: f64, length: f64 },
    Sphere { radius: f64 },
    Mesh { filename: String, scale: [f64; 3] },
}

impl Geometry {
    /// Read the shape held by a `<geometry>` element
    pub fn from_element(geometry: &Element) -> Option<Self> {
        let shape = geometry.children().first()?;
        let number = |name: &str| shape.attribute(name).and_then(Value::as_f64);
        match shape.type_name() {
            "box" => Some(Self::Box {
                size: vector3(shape.attribute("size"))?,
            }),
            "cylinder" => Some(Self::Cylinder {
                radius: number("radius")?,
                length: number("length")?,
            }),
            "sphere" => Some(Self::Sphere {
                radius: number("radius")?,
            }),
            "mesh" => Some(Self::Mesh {
                filename: shape.attribute("filename")?.as_str()?.to_string(),
                scale: vector3(shape.attribute("scale")).unwrap_or([1.0; 3]),
            }),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Cylinder { .. } => "cylinder",
            Self::Sphere { .. } => "sphere",
            Self::Mesh { .. } => "mesh",
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |v: &[f64; 3]| v.map(render_real).join(" ");
        match self {
            Self::Box { size } => write!(f, "box size={}", join(size)),
            Self::Cylinder { radius, length } => write!(
                f,
                "cylinder radius={} length={}",
                render_real(*radius),
                render_real(*length)
            ),
            Self::Sphere { radius } => write!(f, "sphere radius={}", render_real(*radius)),
            Self::Mesh { filename, scale } => {
                write!(f, "mesh filename={filename:?} scale={}", join(scale))
            }
        }
    }
}

fn vector3(value: Option<&Value>) -> Option<[f64; 3]> {
    match value?.as_vector()? {
        [x, y, z] => Some([*x, *y, *z]),
        _ => None,
    }
}

fn expect_type<'a>(element: &'a Element, type_name: &str) -> Result<&'a Element> {
    if element.type_name() == type_name {
        Ok(element)
    } else {
        Err(Error::invalid_value(
            "view",
            format!("expected <{type_name}>, found <{}>", element.tag()),
        ))
    }
}

/// View over a `<robot>` element
#[derive(Clone, Copy, Debug)]
pub struct RobotView<'a> {
    element: &'a Element,
}

impl<'a> RobotView<'a> {
    pub fn new(element: &'a Element) -> Result<Self> {
        Ok(Self {
            element: expect_type(element, "robot")?,
        })
    }

    pub fn name(&self) -> &'a str {
        self.element.name().unwrap_or_default()
    }

    pub fn links(&self) -> impl Iterator<Item = LinkView<'a>> + 'a {
        self.element
            .children_tagged("link")
            .map(|element| LinkView { element })
    }

    pub fn joints(&self) -> impl Iterator<Item = JointView<'a>> + 'a {
        self.element
            .children_tagged("joint")
            .map(|element| JointView { element })
    }

    pub fn link(&self, name: &str) -> Option<LinkView<'a>> {
        self.links().find(|link| link.name() == name)
    }

    /// Link that is never the child of a joint
    pub fn root_link(&self) -> Option<LinkView<'a>> {
        let children: Vec<&str> = self.joints().filter_map(|joint| joint.child()).collect();
        self.links().find(|link| !children.contains(&link.name()))
    }
}

/// View over a `<link>` element
#[derive(Clone, Copy, Debug)]
pub struct LinkView<'a> {
    element: &'a Element,
}

impl<'a> LinkView<'a> {
    pub fn new(element: &'a Element) -> Result<Self> {
        Ok(Self {
            element: expect_type(element, "link")?,
        })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn name(&self) -> &'a str {
        self.element.name().unwrap_or_default()
    }

    pub fn mass(&self) -> Option<f64> {
        self.element.get("inertial.mass.value").and_then(Value::as_f64)
    }

    pub fn visual_geometries(&self) -> impl Iterator<Item = Geometry> + 'a {
        geometries(self.element, "visual")
    }

    pub fn collision_geometries(&self) -> impl Iterator<Item = Geometry> + 'a {
        geometries(self.element, "collision")
    }
}

fn geometries<'a>(link: &'a Element, block: &'a str) -> impl Iterator<Item = Geometry> + 'a {
    link.children_tagged(block)
        .filter_map(|b| b.child("geometry"))
        .filter_map(Geometry::from_element)
}

/// Motion limits of a joint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    pub effort: f64,
    pub lower: f64,
    pub upper: f64,
    pub velocity: f64,
}

/// View over a `<joint>` element
#[derive(Clone, Copy, Debug)]
pub struct JointView<'a> {
    element: &'a Element,
}

impl<'a> JointView<'a> {
    pub fn new(element: &'a Element) -> Result<Self> {
        Ok(Self {
            element: expect_type(element, "joint")?,
        })
    }

    pub fn name(&self) -> &'a str {
        self.element.name().unwrap_or_default()
    }

    pub fn joint_type(&self) -> &'a str {
        self.element
            .attribute("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn parent(&self) -> Option<&'a str> {
        self.element.get("parent.link").and_then(Value::as_str)
    }

    pub fn child(&self) -> Option<&'a str> {
        self.element.get("child.link").and_then(Value::as_str)
    }

    pub fn limits(&self) -> Option<Limits> {
        let limit = self.element.child("limit")?;
        let field = |name: &str| limit.attribute(name).and_then(Value::as_f64);
        Some(Limits {
            effort: field("effort")?,
            lower: field("lower")?,
            upper: field("upper")?,
            velocity: field("velocity")?,
        })
    }
}
