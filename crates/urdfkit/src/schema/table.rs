//! Static schema table for URDF robot descriptions
//!
//! Declaration order matters twice: attributes and children are written in
//! the order listed here, and the first member of a choice group is the one
//! the factory creates.

use crate::extension::ExtensionProfile;
use crate::schema::{AttributeSpec, ChildSpec, DefaultValue, ElementSchema, TextSpec};
use crate::value::ValueKind;

const ZERO: DefaultValue = DefaultValue::Real(0.0);
const ZERO_VEC3: DefaultValue = DefaultValue::Vector(&[0.0, 0.0, 0.0]);

const JOINT_TYPES: &[&str] = &[
    "revolute",
    "continuous",
    "prismatic",
    "fixed",
    "floating",
    "planar",
];

const IMAGE_FORMATS: &[&str] = &[
    "L8",
    "R8G8B8",
    "B8G8R8",
    "BAYER_RGGB8",
    "BAYER_BGGR8",
    "BAYER_GBRG8",
    "BAYER_GRBG8",
];

const fn name(default: &'static str) -> AttributeSpec {
    AttributeSpec::required("name", ValueKind::Text, DefaultValue::Text(default))
}

const fn real(attribute: &'static str) -> AttributeSpec {
    AttributeSpec::required(attribute, ValueKind::Real, ZERO)
}

const fn optional_real(attribute: &'static str, default: f64) -> AttributeSpec {
    AttributeSpec::optional(attribute, ValueKind::Real, DefaultValue::Real(default))
}

const fn link_ref(default: &'static str) -> AttributeSpec {
    AttributeSpec::required("link", ValueKind::Text, DefaultValue::Text(default))
}

const fn leaf(
    type_name: &'static str,
    summary: &'static str,
    attributes: &'static [AttributeSpec],
) -> ElementSchema {
    ElementSchema {
        type_name,
        tag: type_name,
        summary,
        attributes,
        children: &[],
        text: None,
        extension: None,
    }
}

const SCAN_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::optional("samples", ValueKind::Int, DefaultValue::Int(1)),
    optional_real("resolution", 1.0),
    optional_real("min_angle", 0.0),
    optional_real("max_angle", 0.0),
];

// camera hfov keeps the 1.5708 literal that documents carry
#[allow(clippy::approx_constant)]
pub static SCHEMAS: &[ElementSchema] = &[
    ElementSchema {
        type_name: "robot",
        tag: "robot",
        summary: "Root of a robot description",
        attributes: &[name("robot")],
        children: &[
            ChildSpec::many("link"),
            ChildSpec::many("joint"),
            ChildSpec::many("transmission"),
            ChildSpec::many("material"),
            ChildSpec::many("sensor"),
        ],
        text: None,
        extension: Some(ExtensionProfile::Robot),
    },
    ElementSchema {
        type_name: "link",
        tag: "link",
        summary: "Rigid body with inertia, visual and collision blocks",
        attributes: &[name("link")],
        children: &[
            ChildSpec::optional("inertial"),
            ChildSpec::many("collision"),
            ChildSpec::many("visual"),
        ],
        text: None,
        extension: Some(ExtensionProfile::Link),
    },
    ElementSchema {
        type_name: "joint",
        tag: "joint",
        summary: "Kinematic connection between a parent and a child link",
        attributes: &[
            name("joint"),
            AttributeSpec::required("type", ValueKind::Text, DefaultValue::Text("revolute"))
                .with_choices(JOINT_TYPES),
        ],
        children: &[
            ChildSpec::one("parent"),
            ChildSpec::one("child"),
            ChildSpec::optional("origin"),
            ChildSpec::optional("axis"),
            ChildSpec::optional("calibration"),
            ChildSpec::optional("dynamics"),
            ChildSpec::one("limit"),
            ChildSpec::optional("mimic"),
            ChildSpec::optional("safety_controller"),
        ],
        text: None,
        extension: Some(ExtensionProfile::Joint),
    },
    ElementSchema {
        type_name: "inertial",
        tag: "inertial",
        summary: "Mass properties of a link",
        attributes: &[],
        children: &[
            ChildSpec::optional("origin"),
            ChildSpec::one("mass"),
            ChildSpec::one("inertia"),
        ],
        text: None,
        extension: None,
    },
    leaf(
        "origin",
        "Pose offset as translation and roll-pitch-yaw",
        &[
            AttributeSpec::optional("xyz", ValueKind::Vector(3), ZERO_VEC3),
            AttributeSpec::optional("rpy", ValueKind::Vector(3), ZERO_VEC3),
        ],
    ),
    leaf("mass", "Link mass in kilograms", &[real("value")]),
    leaf(
        "inertia",
        "Upper triangle of the rotational inertia tensor",
        &[
            real("ixx"),
            real("ixy"),
            real("ixz"),
            real("iyy"),
            real("iyz"),
            real("izz"),
        ],
    ),
    ElementSchema {
        type_name: "visual",
        tag: "visual",
        summary: "Rendered appearance of a link",
        attributes: &[AttributeSpec::optional(
            "name",
            ValueKind::Text,
            DefaultValue::Text("visual"),
        )],
        children: &[
            ChildSpec::optional("origin"),
            ChildSpec::one("geometry"),
            ChildSpec::optional("material"),
        ],
        text: None,
        extension: None,
    },
    ElementSchema {
        type_name: "collision",
        tag: "collision",
        summary: "Contact shape of a link",
        attributes: &[AttributeSpec::optional(
            "name",
            ValueKind::Text,
            DefaultValue::Text("collision"),
        )],
        children: &[ChildSpec::optional("origin"), ChildSpec::one("geometry")],
        text: None,
        extension: None,
    },
    ElementSchema {
        type_name: "geometry",
        tag: "geometry",
        summary: "Exactly one primitive shape or mesh",
        attributes: &[],
        children: &[
            ChildSpec::choice("box", "shape"),
            ChildSpec::choice("cylinder", "shape"),
            ChildSpec::choice("sphere", "shape"),
            ChildSpec::choice("mesh", "shape"),
        ],
        text: None,
        extension: None,
    },
    leaf(
        "box",
        "Axis-aligned box given by its side lengths",
        &[AttributeSpec::required("size", ValueKind::Vector(3), ZERO_VEC3)],
    ),
    leaf(
        "cylinder",
        "Cylinder along the z axis",
        &[real("radius"), real("length")],
    ),
    leaf("sphere", "Sphere centred on the origin", &[real("radius")]),
    leaf(
        "mesh",
        "External mesh resource",
        &[
            AttributeSpec::required("filename", ValueKind::Text, DefaultValue::Text("")),
            AttributeSpec::optional(
                "scale",
                ValueKind::Vector(3),
                DefaultValue::Vector(&[1.0, 1.0, 1.0]),
            ),
        ],
    ),
    ElementSchema {
        type_name: "material",
        tag: "material",
        summary: "Named colour and texture",
        attributes: &[name("material")],
        children: &[ChildSpec::optional("color"), ChildSpec::optional("texture")],
        text: None,
        extension: None,
    },
    leaf(
        "color",
        "RGBA colour with components in [0, 1]",
        &[AttributeSpec::required(
            "rgba",
            ValueKind::Vector(4),
            DefaultValue::Vector(&[0.0, 0.0, 0.0, 1.0]),
        )],
    ),
    leaf(
        "texture",
        "Texture image resource",
        &[AttributeSpec::required(
            "filename",
            ValueKind::Text,
            DefaultValue::Text(""),
        )],
    ),
    leaf("parent", "Parent link reference", &[link_ref("parent")]),
    leaf("child", "Child link reference", &[link_ref("child")]),
    leaf(
        "axis",
        "Joint axis in the joint frame",
        &[AttributeSpec::required(
            "xyz",
            ValueKind::Vector(3),
            DefaultValue::Vector(&[1.0, 0.0, 0.0]),
        )],
    ),
    leaf(
        "calibration",
        "Reference positions for joint homing",
        &[optional_real("rising", 0.0), optional_real("falling", 0.0)],
    ),
    leaf(
        "dynamics",
        "Joint damping and friction",
        &[optional_real("damping", 0.0), optional_real("friction", 0.0)],
    ),
    leaf(
        "limit",
        "Joint effort, position and velocity limits",
        &[real("effort"), real("lower"), real("upper"), real("velocity")],
    ),
    leaf(
        "mimic",
        "Couples a joint to another joint's position",
        &[
            AttributeSpec::required("joint", ValueKind::Text, DefaultValue::Text("joint")),
            optional_real("multiplier", 1.0),
            optional_real("offset", 0.0),
        ],
    ),
    leaf(
        "safety_controller",
        "Soft limits enforced by the joint controller",
        &[
            optional_real("soft_lower_limit", 0.0),
            optional_real("soft_upper_limit", 0.0),
            optional_real("k_position", 0.0),
            real("k_velocity"),
        ],
    ),
    ElementSchema {
        type_name: "transmission",
        tag: "transmission",
        summary: "Mapping between actuators and joints",
        attributes: &[name("transmission")],
        children: &[
            ChildSpec::one("type").of_type("transmission_type"),
            ChildSpec::many("joint").of_type("transmission_joint"),
            ChildSpec::many("actuator"),
        ],
        text: None,
        extension: None,
    },
    ElementSchema {
        type_name: "transmission_type",
        tag: "type",
        summary: "Transmission implementation class",
        attributes: &[],
        children: &[],
        text: Some(TextSpec {
            kind: ValueKind::Text,
            default: DefaultValue::Text("transmission_interface/SimpleTransmission"),
        }),
        extension: None,
    },
    ElementSchema {
        type_name: "transmission_joint",
        tag: "joint",
        summary: "Joint driven by a transmission",
        attributes: &[name("joint")],
        children: &[ChildSpec::many("hardwareInterface").of_type("hardware_interface")],
        text: None,
        extension: None,
    },
    ElementSchema {
        type_name: "actuator",
        tag: "actuator",
        summary: "Actuator attached to a transmission",
        attributes: &[name("actuator")],
        children: &[
            ChildSpec::many("hardwareInterface").of_type("hardware_interface"),
            ChildSpec::optional("mechanicalReduction").of_type("mechanical_reduction"),
        ],
        text: None,
        extension: None,
    },
    ElementSchema {
        type_name: "hardware_interface",
        tag: "hardwareInterface",
        summary: "Controller hardware interface class",
        attributes: &[],
        children: &[],
        text: Some(TextSpec {
            kind: ValueKind::Text,
            default: DefaultValue::Text("hardware_interface/EffortJointInterface"),
        }),
        extension: None,
    },
    ElementSchema {
        type_name: "mechanical_reduction",
        tag: "mechanicalReduction",
        summary: "Gear ratio between actuator and joint",
        attributes: &[],
        children: &[],
        text: Some(TextSpec {
            kind: ValueKind::Real,
            default: DefaultValue::Real(1.0),
        }),
        extension: None,
    },
    ElementSchema {
        type_name: "sensor",
        tag: "sensor",
        summary: "Camera or ray sensor mounted on a link",
        attributes: &[name("sensor"), optional_real("update_rate", 30.0)],
        children: &[
            ChildSpec::one("parent"),
            ChildSpec::optional("origin"),
            ChildSpec::choice("camera", "sensor_kind"),
            ChildSpec::choice("ray", "sensor_kind"),
        ],
        text: None,
        extension: None,
    },
    ElementSchema {
        type_name: "camera",
        tag: "camera",
        summary: "Camera sensor settings",
        attributes: &[],
        children: &[ChildSpec::one("image")],
        text: None,
        extension: None,
    },
    leaf(
        "image",
        "Camera image geometry and clipping",
        &[
            AttributeSpec::required("width", ValueKind::Int, DefaultValue::Int(100)),
            AttributeSpec::required("height", ValueKind::Int, DefaultValue::Int(100)),
            AttributeSpec::required("format", ValueKind::Text, DefaultValue::Text("R8G8B8"))
                .with_choices(IMAGE_FORMATS),
            AttributeSpec::optional("hfov", ValueKind::Float, DefaultValue::Real(1.5708)),
            AttributeSpec::optional("near", ValueKind::Float, DefaultValue::Real(0.01)),
            AttributeSpec::optional("far", ValueKind::Float, DefaultValue::Real(50.0)),
        ],
    ),
    ElementSchema {
        type_name: "ray",
        tag: "ray",
        summary: "Laser range sensor scan pattern",
        attributes: &[],
        children: &[ChildSpec::optional("horizontal"), ChildSpec::optional("vertical")],
        text: None,
        extension: None,
    },
    leaf("horizontal", "Horizontal scan pattern", SCAN_ATTRIBUTES),
    leaf("vertical", "Vertical scan pattern", SCAN_ATTRIBUTES),
];
