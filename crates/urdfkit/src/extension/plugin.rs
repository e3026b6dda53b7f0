//! Simulator plugin presets
//!
//! Each preset produces a `<plugin name=".." filename="lib*.so">` node whose
//! parameters are plain text children, ready to be placed inside a
//! `<gazebo>` block.

use crate::error::{Error, Result};
use crate::extension::Node;
use crate::value::{Value, ValueKind};

/// Plugin declaration with its parameters
#[derive(Clone, Debug, PartialEq)]
pub struct Plugin {
    name: String,
    filename: String,
    params: Vec<Node>,
}

impl Plugin {
    /// Declare a plugin; the name must be non-empty and the filename must
    /// name a shared object
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let filename = filename.into();
        if name.is_empty() {
            return Err(Error::invalid_value("plugin name", "must not be empty"));
        }
        if !filename.contains(".so") {
            return Err(Error::invalid_value(
                "plugin filename",
                format!("{filename:?} is not a shared object"),
            ));
        }
        Ok(Self {
            name,
            filename,
            params: Vec::new(),
        })
    }

    /// Add a parameter rendered from its value
    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let kind = match &value {
            Value::Int(_) => ValueKind::Int,
            Value::Number(_) => ValueKind::Real,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
            Value::Vector(v) => ValueKind::Vector(v.len()),
        };
        self.params.push(Node::value_element(name, kind, &value));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn into_node(self) -> Node {
        self.params.into_iter().fold(
            Node::new("plugin")
                .with_attribute("name", self.name)
                .with_attribute("filename", self.filename),
            Node::with_child,
        )
    }
}

/// `gazebo_ros_control` hardware interface plugin
#[derive(Clone, Debug, PartialEq)]
pub struct RosControl {
    pub name: String,
    pub robot_namespace: String,
    pub control_period: Option<f64>,
    pub robot_param: String,
    pub robot_sim_type: Option<String>,
}

impl Default for RosControl {
    fn default() -> Self {
        Self {
            name: "gazebo_ros_control".to_string(),
            robot_namespace: String::new(),
            control_period: None,
            robot_param: "/robot_description".to_string(),
            robot_sim_type: None,
        }
    }
}

impl RosControl {
    pub fn build(&self) -> Result<Plugin> {
        let mut plugin = Plugin::new(self.name.as_str(), "libgazebo_ros_control.so")?
            .param("robotNamespace", self.robot_namespace.as_str());
        if let Some(period) = self.control_period {
            if !(period.is_finite() && period > 0.0) {
                return Err(Error::invalid_value(
                    "controlPeriod",
                    "must be a positive number",
                ));
            }
            plugin = plugin.param("controlPeriod", period);
        }
        plugin = plugin.param("robotParam", self.robot_param.as_str());
        if let Some(sim_type) = &self.robot_sim_type {
            plugin = plugin.param("robotSimType", sim_type.as_str());
        }
        Ok(plugin)
    }

    /// Default preset, which always satisfies the plugin rules
    pub(crate) fn to_plugin(&self) -> Plugin {
        self.build().unwrap_or_else(|_| Plugin {
            name: self.name.clone(),
            filename: "libgazebo_ros_control.so".to_string(),
            params: Vec::new(),
        })
    }
}

/// `gazebo_ros_bumper` contact sensor plugin
#[derive(Clone, Debug, PartialEq)]
pub struct Bumper {
    pub name: String,
    pub robot_namespace: String,
    pub bumper_topic_name: String,
    pub frame_name: String,
}

impl Default for Bumper {
    fn default() -> Self {
        Self {
            name: "gazebo_ros_bumper".to_string(),
            robot_namespace: String::new(),
            bumper_topic_name: "bumper_states".to_string(),
            frame_name: "world".to_string(),
        }
    }
}

impl Bumper {
    pub fn build(&self) -> Result<Plugin> {
        Ok(Plugin::new(self.name.as_str(), "libgazebo_ros_bumper.so")?
            .param("robotNamespace", self.robot_namespace.as_str())
            .param("bumperTopicName", self.bumper_topic_name.as_str())
            .param("frameName", self.frame_name.as_str()))
    }
}

/// `gazebo_ros_ft_sensor` force/torque plugin
#[derive(Clone, Debug, PartialEq)]
pub struct FtSensor {
    pub name: String,
    pub robot_namespace: String,
    pub joint_name: String,
    pub topic_name: String,
    pub gaussian_noise: f64,
    pub update_rate: f64,
}

impl FtSensor {
    pub fn new(joint_name: impl Into<String>, topic_name: impl Into<String>) -> Self {
        Self {
            name: "gazebo_ros_ft_sensor".to_string(),
            robot_namespace: String::new(),
            joint_name: joint_name.into(),
            topic_name: topic_name.into(),
            gaussian_noise: 0.0,
            update_rate: 0.0,
        }
    }

    pub fn build(&self) -> Result<Plugin> {
        require("jointName", &self.joint_name)?;
        require("topicName", &self.topic_name)?;
        Ok(Plugin::new(self.name.as_str(), "libgazebo_ros_ft_sensor.so")?
            .param("robotNamespace", self.robot_namespace.as_str())
            .param("topicName", self.topic_name.as_str())
            .param("jointName", self.joint_name.as_str())
            .param("gaussianNoise", self.gaussian_noise)
            .param("updateRate", self.update_rate))
    }
}

/// `gazebo_ros_p3d` ground-truth pose plugin
#[derive(Clone, Debug, PartialEq)]
pub struct P3d {
    pub name: String,
    pub robot_namespace: String,
    pub body_name: String,
    pub topic_name: String,
    pub frame_name: String,
    pub xyz_offset: [f64; 3],
    pub rpy_offset: [f64; 3],
    pub gaussian_noise: f64,
    pub update_rate: f64,
}

impl P3d {
    pub fn new(body_name: impl Into<String>, topic_name: impl Into<String>) -> Self {
        Self {
            name: "gazebo_ros_p3d".to_string(),
            robot_namespace: String::new(),
            body_name: body_name.into(),
            topic_name: topic_name.into(),
            frame_name: "world".to_string(),
            xyz_offset: [0.0; 3],
            rpy_offset: [0.0; 3],
            gaussian_noise: 0.0,
            update_rate: 0.0,
        }
    }

    pub fn build(&self) -> Result<Plugin> {
        require("bodyName", &self.body_name)?;
        require("topicName", &self.topic_name)?;
        Ok(Plugin::new(self.name.as_str(), "libgazebo_ros_p3d.so")?
            .param("robotNamespace", self.robot_namespace.as_str())
            .param("topicName", self.topic_name.as_str())
            .param("bodyName", self.body_name.as_str())
            .param("frameName", self.frame_name.as_str())
            .param("xyzOffset", self.xyz_offset)
            .param("rpyOffset", self.rpy_offset)
            .param("gaussianNoise", self.gaussian_noise)
            .param("updateRate", self.update_rate))
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        Err(Error::invalid_value(field, "is missing"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_plugin_rejects_bad_filename() {
        let err = Plugin::new("camera", "libcamera.dll").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::InvalidValue { .. })
        ));
        assert!(Plugin::new("", "libcamera.so").is_err());
    }

    #[test]
    fn test_ros_control_preset() -> Result<()> {
        let node = RosControl {
            control_period: Some(0.001),
            ..RosControl::default()
        }
        .build()?
        .into_node();
        assert_eq!(node.attribute("name"), Some("gazebo_ros_control"));
        assert!(node.child("robotNamespace").is_some_and(Node::is_empty));
        assert_eq!(
            node.child("controlPeriod").and_then(Node::text).as_deref(),
            Some("0.001")
        );
        assert_eq!(
            node.child("robotParam").and_then(Node::text).as_deref(),
            Some("/robot_description")
        );
        assert!(node.child("robotSimType").is_none());
        Ok(())
    }

    #[test]
    fn test_ros_control_rejects_non_positive_period() {
        let preset = RosControl {
            control_period: Some(0.0),
            ..RosControl::default()
        };
        assert!(preset.build().is_err());
    }

    #[test]
    fn test_p3d_offsets_render_as_vectors() -> Result<()> {
        let node = P3d::new("base_link", "ground_truth").build()?.into_node();
        assert_eq!(
            node.child("xyzOffset").and_then(Node::text).as_deref(),
            Some("0 0 0")
        );
        assert_eq!(
            node.child("frameName").and_then(Node::text).as_deref(),
            Some("world")
        );
        Ok(())
    }

    #[test]
    fn test_ft_sensor_requires_names() {
        assert!(FtSensor::new("", "wrench").build().is_err());
        assert!(FtSensor::new("wrist", "wrench").build().is_ok());
    }

    #[test]
    fn test_bumper_defaults() -> Result<()> {
        let plugin = Bumper::default().build()?;
        assert_eq!(plugin.filename(), "libgazebo_ros_bumper.so");
        let node = plugin.into_node();
        assert_eq!(
            node.child("bumperTopicName").and_then(Node::text).as_deref(),
            Some("bumper_states")
        );
        Ok(())
    }
}
