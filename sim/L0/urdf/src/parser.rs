//! URDF XML parser.
//!
//! One pass over the event stream. Only elements that sit directly under
//! `<robot>` count, so the `<joint>` references inside `<transmission>` and
//! `<gazebo>` blocks are not mistaken for joints. Geometry, inertia and
//! materials are never read.

use std::collections::BTreeSet;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::{Result, UrdfError};
use crate::types::{UrdfJoint, UrdfJointLimit, UrdfJointType, UrdfRobot};

/// Parse a URDF string into a robot inventory.
///
/// # Errors
///
/// Returns an error if the XML is malformed, a joint lacks its parent or
/// child, or a required attribute is missing or unreadable.
pub fn parse_urdf_str(xml: &str) -> Result<UrdfRobot> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut parser = Parser::default();

    while !parser.done {
        let event = reader
            .read_event()
            .map_err(|e| UrdfError::Xml(format!("at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::Start(e) => parser.open(&e, true)?,
            Event::Empty(e) => parser.open(&e, false)?,
            Event::End(_) => parser.close()?,
            Event::Eof => break,
            _ => {}
        }
    }

    parser.finish()
}

#[derive(Default)]
struct Parser {
    robot: Option<UrdfRobot>,
    joint: Option<JointDraft>,
    /// Open elements below `<robot>`.
    depth: usize,
    skipped: BTreeSet<String>,
    done: bool,
}

impl Parser {
    fn open(&mut self, e: &BytesStart<'_>, has_children: bool) -> Result<()> {
        let Some(robot) = self.robot.as_mut() else {
            if e.name().as_ref() == b"robot" {
                self.robot = Some(UrdfRobot {
                    name: required(e, "name")?,
                    ..UrdfRobot::default()
                });
                self.done = !has_children;
            }
            return Ok(());
        };

        if self.depth == 0 {
            match e.name().as_ref() {
                b"link" => robot.links.push(required(e, "name")?),
                b"joint" => self.joint = Some(JointDraft::open(e)?),
                _ => {
                    self.skipped.insert(tag(e));
                }
            }
        } else if let (1, Some(joint)) = (self.depth, self.joint.as_mut()) {
            joint.read(e)?;
        }

        if has_children {
            self.depth += 1;
        } else if self.depth == 0 {
            self.close_joint()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.robot.is_none() {
            return Ok(());
        }
        if self.depth == 0 {
            self.done = true;
            return Ok(());
        }
        self.depth -= 1;
        if self.depth == 0 {
            self.close_joint()?;
        }
        Ok(())
    }

    fn close_joint(&mut self) -> Result<()> {
        if let (Some(draft), Some(robot)) = (self.joint.take(), self.robot.as_mut()) {
            robot.joints.push(draft.finish()?);
        }
        Ok(())
    }

    fn finish(self) -> Result<UrdfRobot> {
        let robot = self
            .robot
            .ok_or_else(|| UrdfError::missing_element("robot", "URDF document"))?;
        if !self.done {
            return Err(UrdfError::Xml(format!(
                "document ends inside <robot name=\"{}\">",
                robot.name
            )));
        }
        if !self.skipped.is_empty() {
            debug!(
                "URDF '{}': ignored <{}>",
                robot.name,
                self.skipped.into_iter().collect::<Vec<_>>().join(">, <")
            );
        }
        Ok(robot)
    }
}

/// A `<joint>` whose children are still being read.
struct JointDraft {
    name: String,
    kind: UrdfJointType,
    parent: Option<String>,
    child: Option<String>,
    limit: Option<UrdfJointLimit>,
}

impl JointDraft {
    fn open(e: &BytesStart<'_>) -> Result<Self> {
        Ok(Self {
            name: required(e, "name")?,
            kind: required(e, "type")?.parse()?,
            parent: None,
            child: None,
            limit: None,
        })
    }

    fn read(&mut self, e: &BytesStart<'_>) -> Result<()> {
        match e.name().as_ref() {
            b"parent" => self.parent = Some(required(e, "link")?),
            b"child" => self.child = Some(required(e, "link")?),
            b"limit" => {
                self.limit = Some(UrdfJointLimit {
                    lower: number(e, "lower")?,
                    upper: number(e, "upper")?,
                    effort: number(e, "effort")?,
                    velocity: number(e, "velocity")?,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<UrdfJoint> {
        let context = || format!("joint '{}'", self.name);
        let parent = self
            .parent
            .ok_or_else(|| UrdfError::missing_element("parent", context()))?;
        let child = self
            .child
            .ok_or_else(|| UrdfError::missing_element("child", context()))?;
        Ok(UrdfJoint {
            name: self.name,
            kind: self.kind,
            parent,
            child,
            limit: self.limit,
        })
    }
}

fn tag(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, name: &'static str) -> Result<Option<String>> {
    let Some(attr) = e
        .try_get_attribute(name)
        .map_err(|err| UrdfError::invalid_attribute(name, tag(e), err))?
    else {
        return Ok(None);
    };
    let value = attr
        .unescape_value()
        .map_err(|err| UrdfError::invalid_attribute(name, tag(e), err))?;
    Ok(Some(value.into_owned()))
}

fn required(e: &BytesStart<'_>, name: &'static str) -> Result<String> {
    attribute(e, name)?.ok_or_else(|| UrdfError::missing_attribute(name, tag(e)))
}

/// A numeric attribute; absent reads as zero, unparsable is an error.
fn number(e: &BytesStart<'_>, name: &'static str) -> Result<f64> {
    let Some(text) = attribute(e, name)? else {
        return Ok(0.0);
    };
    text.trim().parse().map_err(|_| {
        UrdfError::invalid_attribute(name, tag(e), format!("'{text}' is not a number"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_links_ignore_their_contents() {
        let xml = r#"
            <robot name="go2">
                <link name="base">
                    <inertial>
                        <mass value="6.921"/>
                        <inertia ixx="0.02" iyy="0.1" izz="0.1"/>
                    </inertial>
                    <visual><geometry><box size="0.38 0.09 0.11"/></geometry></visual>
                </link>
                <link name="FL_foot"/>
            </robot>
        "#;
        let robot = parse_urdf_str(xml).unwrap();
        assert_eq!(robot.name, "go2");
        assert_eq!(robot.links, vec!["base", "FL_foot"]);
        assert!(robot.joints.is_empty());
    }

    #[test]
    fn test_joint_with_limit() {
        let xml = r#"
            <robot name="leg">
                <link name="base"/>
                <link name="FL_hip"/>
                <joint name="FL_hip_joint" type="revolute">
                    <origin xyz="0.1934 0.0465 0" rpy="0 0 0"/>
                    <parent link="base"/>
                    <child link="FL_hip"/>
                    <axis xyz="1 0 0"/>
                    <limit lower="-1.0472" upper="1.0472" effort="23.7" velocity="30.1"/>
                    <dynamics damping="0.01" friction="0.2"/>
                </joint>
            </robot>
        "#;
        let robot = parse_urdf_str(xml).unwrap();
        let joint = robot.joint("FL_hip_joint").unwrap();
        assert_eq!(joint.kind, UrdfJointType::Revolute);
        assert_eq!((joint.parent.as_str(), joint.child.as_str()), ("base", "FL_hip"));
        let limit = joint.limit.unwrap();
        assert_relative_eq!(limit.lower, -1.0472);
        assert_relative_eq!(limit.velocity, 30.1);
    }

    #[test]
    fn test_missing_limit_attributes_read_as_zero() {
        let xml = r#"
            <robot name="gripper">
                <link name="link6"/>
                <link name="link7"/>
                <joint name="joint7" type="prismatic">
                    <parent link="link6"/><child link="link7"/>
                    <limit upper="0.044" effort="100"/>
                </joint>
            </robot>
        "#;
        let limit = parse_urdf_str(xml).unwrap().joints[0].limit.unwrap();
        assert_relative_eq!(limit.lower, 0.0);
        assert_relative_eq!(limit.upper, 0.044);
        assert_relative_eq!(limit.velocity, 0.0);
    }

    #[test]
    fn test_nested_joint_references_are_not_joints() {
        let xml = r#"
            <robot name="arm">
                <link name="base"/>
                <link name="link1"/>
                <material name="black"><color rgba="0 0 0 1"/></material>
                <joint name="joint1" type="revolute">
                    <parent link="base"/><child link="link1"/>
                </joint>
                <transmission name="joint1_tran">
                    <joint name="joint1"><hardwareInterface>EffortJointInterface</hardwareInterface></joint>
                    <actuator name="joint1_motor"/>
                </transmission>
                <gazebo reference="link1"><gazebo><mu1>0.2</mu1></gazebo></gazebo>
            </robot>
        "#;
        let robot = parse_urdf_str(xml).unwrap();
        assert_eq!(robot.joints.len(), 1);
        assert_eq!(robot.links, vec!["base", "link1"]);
    }

    #[test]
    fn test_empty_robot() {
        let robot = parse_urdf_str(r#"<robot name="nothing"/>"#).unwrap();
        assert!(robot.links.is_empty());
    }

    #[test]
    fn test_missing_robot() {
        let err = parse_urdf_str("<model name=\"go2\"/>").unwrap_err();
        assert!(matches!(err, UrdfError::MissingElement { element: "robot", .. }));
    }

    #[test]
    fn test_missing_robot_name() {
        let err = parse_urdf_str(r#"<robot><link name="base"/></robot>"#).unwrap_err();
        assert!(matches!(err, UrdfError::MissingAttribute { attribute: "name", .. }));
    }

    #[test]
    fn test_missing_parent() {
        let xml = r#"
            <robot name="test">
                <link name="a"/>
                <joint name="j" type="fixed"><child link="a"/></joint>
            </robot>
        "#;
        let err = parse_urdf_str(xml).unwrap_err();
        assert!(matches!(err, UrdfError::MissingElement { element: "parent", .. }));
        assert!(err.to_string().contains("joint 'j'"));
    }

    #[test]
    fn test_unknown_joint_type() {
        let xml = r#"
            <robot name="test">
                <link name="a"/>
                <joint name="j" type="spherical"><parent link="a"/><child link="a"/></joint>
            </robot>
        "#;
        assert!(matches!(
            parse_urdf_str(xml),
            Err(UrdfError::UnknownJointType(ref t)) if t == "spherical"
        ));
    }

    #[test]
    fn test_unreadable_number() {
        let xml = r#"
            <robot name="test">
                <link name="a"/><link name="b"/>
                <joint name="j" type="revolute">
                    <parent link="a"/><child link="b"/>
                    <limit lower="-1,5" upper="1.5"/>
                </joint>
            </robot>
        "#;
        let err = parse_urdf_str(xml).unwrap_err();
        assert!(matches!(err, UrdfError::InvalidAttribute { attribute: "lower", .. }));
    }

    #[test]
    fn test_truncated_document() {
        let err = parse_urdf_str(r#"<robot name="cut"><link name="base"/>"#).unwrap_err();
        assert!(matches!(err, UrdfError::Xml(_)));
    }
}
