//! Typed records for every message the mod sends or accepts.

mod input;
mod tracking;

pub use input::InputName;
pub use tracking::{TrackingDeviceType, TrackingViveTrackerName};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::Endpoint;

/// A vector with 3 floats, used for positions and euler rotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

/// A parameter or input value, keeping the OSC type tag it travels with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl From<f32> for ParameterValue {
    fn from(v: f32) -> Self {
        ParameterValue::Float(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        ParameterValue::Int(v)
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        ParameterValue::Bool(v)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Float(v) => write!(f, "{v}"),
            ParameterValue::Int(v) => write!(f, "{v}"),
            ParameterValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Parses `true`/`false` as bools, anything with a `.` (or an exponent) as a
/// float and the rest as an int.
impl FromStr for ParameterValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("true") {
            return Ok(ParameterValue::Bool(true));
        }
        if s.eq_ignore_ascii_case("false") {
            return Ok(ParameterValue::Bool(false));
        }
        if s.contains(['.', 'e', 'E']) {
            return s
                .parse::<f32>()
                .map(ParameterValue::Float)
                .map_err(|e| format!("invalid float '{s}': {e}"));
        }
        s.parse::<i32>()
            .map(ParameterValue::Int)
            .map_err(|e| format!("invalid value '{s}': {e}"))
    }
}

/// Avatar change request sent to the mod.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarChangeSend {
    pub avatar_guid: String,
}

/// Avatar change notification sent by the mod.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarChangeReceive {
    pub avatar_guid: String,
    pub avatar_json_config_path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarParameterChange {
    pub parameter_name: String,
    pub parameter_value: ParameterValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub input_name: InputName,
    pub input_value: ParameterValue,
}

/// Prop spawn request. Without a position the mod spawns it in front of the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropCreateSend {
    pub prop_guid: String,
    pub prop_local_position: Option<Vector3>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropCreateReceive {
    pub prop_guid: String,
    pub prop_instance_id: String,
    pub prop_sub_sync_transform_count: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropDelete {
    pub prop_guid: String,
    pub prop_instance_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropAvailability {
    pub prop_guid: String,
    pub prop_instance_id: String,
    pub prop_is_available: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropParameter {
    pub prop_guid: String,
    pub prop_instance_id: String,
    pub prop_sync_name: String,
    pub prop_sync_value: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropLocation {
    pub prop_guid: String,
    pub prop_instance_id: String,
    pub prop_position: Vector3,
    pub prop_euler_rotation: Vector3,
}

/// Location of one sub-sync transform of a prop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropLocationSub {
    pub prop_guid: String,
    pub prop_instance_id: String,
    pub prop_sub_sync_index: i32,
    pub prop_position: Vector3,
    pub prop_euler_rotation: Vector3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackingPlaySpaceData {
    pub play_space_position: Vector3,
    pub play_space_euler_rotation: Vector3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackingDeviceStatus {
    pub device_is_connected: bool,
    pub device_type: TrackingDeviceType,
    pub device_steam_vr_index: i32,
    pub device_steam_vr_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackingDeviceData {
    pub device_type: TrackingDeviceType,
    pub device_steam_vr_index: i32,
    pub device_steam_vr_name: String,
    pub device_position: Vector3,
    pub device_euler_rotation: Vector3,
    pub device_battery_percentage: f32,
}

/// One decoded message, in either direction.
///
/// Endpoints whose outbound and inbound shapes differ (`/avatar/change`,
/// `/prop/create`) get one variant per direction.
#[derive(Clone, Debug, PartialEq)]
pub enum OscEvent {
    AvatarChanged(AvatarChangeReceive),
    AvatarChangeRequest(AvatarChangeSend),
    AvatarParameter(AvatarParameterChange),
    AvatarParameterLegacy(AvatarParameterChange),
    Input(Input),
    PropCreated(PropCreateReceive),
    PropCreateRequest(PropCreateSend),
    PropDeleted(PropDelete),
    PropAvailability(PropAvailability),
    PropParameter(PropParameter),
    PropLocation(PropLocation),
    PropLocationSub(PropLocationSub),
    TrackingPlaySpaceData(TrackingPlaySpaceData),
    TrackingDeviceStatus(TrackingDeviceStatus),
    TrackingDeviceData(TrackingDeviceData),
    ConfigReset,
}

impl OscEvent {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            OscEvent::AvatarChanged(_) | OscEvent::AvatarChangeRequest(_) => Endpoint::AvatarChange,
            OscEvent::AvatarParameter(_) => Endpoint::AvatarParameter,
            OscEvent::AvatarParameterLegacy(_) => Endpoint::AvatarParametersLegacy,
            OscEvent::Input(_) => Endpoint::Input,
            OscEvent::PropCreated(_) | OscEvent::PropCreateRequest(_) => Endpoint::PropCreate,
            OscEvent::PropDeleted(_) => Endpoint::PropDelete,
            OscEvent::PropAvailability(_) => Endpoint::PropAvailable,
            OscEvent::PropParameter(_) => Endpoint::PropParameter,
            OscEvent::PropLocation(_) => Endpoint::PropLocation,
            OscEvent::PropLocationSub(_) => Endpoint::PropLocationSub,
            OscEvent::TrackingPlaySpaceData(_) => Endpoint::TrackingPlaySpaceData,
            OscEvent::TrackingDeviceStatus(_) => Endpoint::TrackingDeviceStatus,
            OscEvent::TrackingDeviceData(_) => Endpoint::TrackingDeviceData,
            OscEvent::ConfigReset => Endpoint::ConfigReset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector3_display_uses_four_decimals() {
        let v = Vector3::new(1.0, -0.5, 0.123456);
        assert_eq!(v.to_string(), "(1.0000, -0.5000, 0.1235)");
    }

    #[test]
    fn parameter_value_parsing() {
        assert_eq!("1.0".parse::<ParameterValue>(), Ok(ParameterValue::Float(1.0)));
        assert_eq!("-3".parse::<ParameterValue>(), Ok(ParameterValue::Int(-3)));
        assert_eq!("True".parse::<ParameterValue>(), Ok(ParameterValue::Bool(true)));
        assert_eq!("false".parse::<ParameterValue>(), Ok(ParameterValue::Bool(false)));
        assert!("abc".parse::<ParameterValue>().is_err());
        assert!("1.2.3".parse::<ParameterValue>().is_err());
    }

    #[test]
    fn parameter_value_serde_is_untagged() {
        let json = serde_json::to_string(&ParameterValue::Float(0.5)).unwrap();
        assert_eq!(json, "0.5");
        let back: ParameterValue = serde_json::from_str("true").unwrap();
        assert_eq!(back, ParameterValue::Bool(true));
        let int: ParameterValue = serde_json::from_str("7").unwrap();
        assert_eq!(int, ParameterValue::Int(7));
    }

    #[test]
    fn events_report_their_endpoint() {
        let changed = OscEvent::AvatarChanged(AvatarChangeReceive {
            avatar_guid: "g".into(),
            avatar_json_config_path: "p".into(),
        });
        let request = OscEvent::AvatarChangeRequest(AvatarChangeSend {
            avatar_guid: "g".into(),
        });
        assert_eq!(changed.endpoint(), Endpoint::AvatarChange);
        assert_eq!(request.endpoint(), Endpoint::AvatarChange);
        assert_eq!(OscEvent::ConfigReset.endpoint(), Endpoint::ConfigReset);
    }
}
