use urdfkit::{
    create, create_materialized, parse, serialize, ErrorKind, FtSensor, Node, Result, Value,
};

const MATERIALIZED_LINK: &str = r#"<link name="link">
  <inertial>
    <origin xyz="0 0 0" rpy="0 0 0"/>
    <mass value="0"/>
    <inertia ixx="0" ixy="0" ixz="0" iyy="0" iyz="0" izz="0"/>
  </inertial>
  <collision name="collision">
    <origin xyz="0 0 0" rpy="0 0 0"/>
    <geometry>
      <box size="0 0 0"/>
    </geometry>
  </collision>
  <visual name="visual">
    <origin xyz="0 0 0" rpy="0 0 0"/>
    <geometry>
      <box size="0 0 0"/>
    </geometry>
    <material name="material">
      <color rgba="0 0 0 1"/>
      <texture filename=""/>
    </material>
  </visual>
  <gazebo reference="link">
    <mu1>0</mu1>
    <mu2>0</mu2>
    <kp>1000000000000.0</kp>
    <kd>1</kd>
    <maxContacts>20</maxContacts>
    <minDepth>0</minDepth>
    <maxVel>0.01</maxVel>
    <selfCollide>0</selfCollide>
  </gazebo>
</link>
"#;

const DEFAULT_JOINT: &str = r#"<joint name="joint" type="revolute">
  <parent link="parent"/>
  <child link="child"/>
  <limit effort="0" lower="0" upper="0" velocity="0"/>
</joint>
"#;

#[test]
fn test_default_link() -> Result<()> {
    assert_eq!(serialize(&create("link")?), "<link name=\"link\"/>\n");
    Ok(())
}

#[test]
fn test_materialized_link() -> Result<()> {
    assert_eq!(serialize(&create_materialized("link")?), MATERIALIZED_LINK);
    Ok(())
}

#[test]
fn test_default_joint() -> Result<()> {
    assert_eq!(serialize(&create("joint")?), DEFAULT_JOINT);
    Ok(())
}

#[test]
fn test_renaming_only_touches_name() -> Result<()> {
    let mut link = create_materialized("link")?;
    link.set_name("base_link")?;
    let expected = MATERIALIZED_LINK.replacen(
        "<link name=\"link\">",
        "<link name=\"base_link\">",
        1,
    );
    assert_eq!(serialize(&link), expected);
    Ok(())
}

#[test]
fn test_missing_attribute_then_default() -> Result<()> {
    let err = parse("<mass/>").err();
    assert!(matches!(
        err.as_ref().map(urdfkit::Error::kind),
        Some(ErrorKind::MissingRequiredField { element, field }) if element == "mass" && field.contains("value")
    ));
    let mass = parse("<mass value=\"0\"/>")?;
    assert_eq!(mass, create("mass")?);
    Ok(())
}

#[test]
fn test_robot_description_document() -> Result<()> {
    let text = r#"<?xml version="1.0"?>
<robot name="two_link" xmlns:xacro="http://www.ros.org/wiki/xacro">
  <!-- links -->
  <link name="base">
    <inertial>
      <mass value="2.5"/>
      <inertia ixx="0.1" ixy="0" ixz="0" iyy="0.1" iyz="0" izz="0.1"/>
    </inertial>
    <visual>
      <geometry>
        <cylinder radius="0.05" length="0.4"/>
      </geometry>
    </visual>
  </link>
  <joint name="shoulder" type="continuous">
    <limit effort="10" velocity="1.5" lower="0" upper="0"/>
    <child link="arm"/>
    <parent link="base"/>
    <axis xyz="0 0 1"/>
  </joint>
  <link name="arm"/>
  <gazebo reference="base">
    <material>Gazebo/Orange</material>
  </gazebo>
</robot>
"#;
    let robot = parse(text)?;
    let view = urdfkit::RobotView::new(&robot)?;
    assert_eq!(view.name(), "two_link");
    assert_eq!(view.root_link().map(|l| l.name()), Some("base"));
    assert_eq!(view.link("base").and_then(|l| l.mass()), Some(2.5));

    let joint = robot.child("joint");
    let tags: Vec<_> = joint
        .map(|j| j.children().iter().map(urdfkit::Element::tag).collect())
        .unwrap_or_default();
    assert_eq!(tags, vec!["parent", "child", "axis", "limit"]);

    let canonical = serialize(&robot);
    assert!(canonical.contains(
        "  <joint name=\"shoulder\" type=\"continuous\">\n    <parent link=\"base\"/>\n"
    ));
    assert!(canonical.contains("<material>Gazebo/Orange</material>"));
    assert_eq!(serialize(&parse(&canonical)?), canonical);
    Ok(())
}

#[test]
fn test_plugin_attached_to_link_extension() -> Result<()> {
    let mut link = create("link")?;
    link.set_name("wrist")?;
    let plugin = FtSensor::new("wrist_joint", "wrench").build()?.into_node();
    let block = urdfkit::Extension::block(Some("wrist")).with_child(plugin);
    link.set_extension(block.into())?;
    let text = serialize(&link);
    assert!(text.contains("<plugin name=\"gazebo_ros_ft_sensor\" filename=\"libgazebo_ros_ft_sensor.so\">"));
    assert!(text.contains("<jointName>wrist_joint</jointName>"));
    let parsed = parse(&text)?;
    let topic = parsed
        .extension()
        .and_then(|ext| ext.for_reference("wrist"))
        .and_then(|b| b.child("plugin"))
        .and_then(|p| p.child("topicName"))
        .and_then(Node::text);
    assert_eq!(topic.as_deref(), Some("wrench"));
    Ok(())
}

#[test]
#[allow(clippy::approx_constant)]
fn test_float_kind_keeps_fraction() -> Result<()> {
    let camera = create_materialized("camera")?;
    let text = serialize(&camera);
    assert!(text.contains(
        "<image width=\"100\" height=\"100\" format=\"R8G8B8\" hfov=\"1.5708\" near=\"0.01\" far=\"50.0\"/>"
    ));
    let image = camera.child("image");
    assert_eq!(image.and_then(|i| i.attribute("far")), Some(&Value::Number(50.0)));
    assert_eq!(image.and_then(|i| i.attribute("hfov")), Some(&Value::Number(1.5708)));
    Ok(())
}
