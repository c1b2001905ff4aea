use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingDeviceType {
    Hmd,
    BaseStation,
    LeftController,
    RightController,
    Tracker,
    Unknown,
}

impl TrackingDeviceType {
    pub const fn as_str(self) -> &'static str {
        match self {
            TrackingDeviceType::Hmd => "hmd",
            TrackingDeviceType::BaseStation => "base_station",
            TrackingDeviceType::LeftController => "left_controller",
            TrackingDeviceType::RightController => "right_controller",
            TrackingDeviceType::Tracker => "tracker",
            TrackingDeviceType::Unknown => "unknown",
        }
    }
}

impl FromStr for TrackingDeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hmd" => Ok(TrackingDeviceType::Hmd),
            "base_station" => Ok(TrackingDeviceType::BaseStation),
            "left_controller" => Ok(TrackingDeviceType::LeftController),
            "right_controller" => Ok(TrackingDeviceType::RightController),
            "tracker" => Ok(TrackingDeviceType::Tracker),
            "unknown" => Ok(TrackingDeviceType::Unknown),
            _ => Err(format!("unknown tracking device type '{s}'")),
        }
    }
}

impl fmt::Display for TrackingDeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SteamVR role names reported as `device_steam_vr_name` for vive trackers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingViveTrackerName {
    #[serde(rename = "vive_tracker")]
    Disabled,
    #[serde(rename = "vive_tracker_handed")]
    HeldInHand,
    #[serde(rename = "vive_tracker_camera")]
    Camera,
    #[serde(rename = "vive_tracker_keyboard")]
    Keyboard,
    #[serde(rename = "vive_tracker_left_foot")]
    LeftFoot,
    #[serde(rename = "vive_tracker_right_foot")]
    RightFoot,
    #[serde(rename = "vive_tracker_left_shoulder")]
    LeftShoulder,
    #[serde(rename = "vive_tracker_right_shoulder")]
    RightShoulder,
    #[serde(rename = "vive_tracker_left_elbow")]
    LeftElbow,
    #[serde(rename = "vive_tracker_right_elbow")]
    RightElbow,
    #[serde(rename = "vive_tracker_left_knee")]
    LeftKnee,
    #[serde(rename = "vive_tracker_right_knee")]
    RightKnee,
    #[serde(rename = "vive_tracker_waist")]
    Waist,
    #[serde(rename = "vive_tracker_chest")]
    Chest,
}

impl TrackingViveTrackerName {
    pub const fn as_str(self) -> &'static str {
        match self {
            TrackingViveTrackerName::Disabled => "vive_tracker",
            TrackingViveTrackerName::HeldInHand => "vive_tracker_handed",
            TrackingViveTrackerName::Camera => "vive_tracker_camera",
            TrackingViveTrackerName::Keyboard => "vive_tracker_keyboard",
            TrackingViveTrackerName::LeftFoot => "vive_tracker_left_foot",
            TrackingViveTrackerName::RightFoot => "vive_tracker_right_foot",
            TrackingViveTrackerName::LeftShoulder => "vive_tracker_left_shoulder",
            TrackingViveTrackerName::RightShoulder => "vive_tracker_right_shoulder",
            TrackingViveTrackerName::LeftElbow => "vive_tracker_left_elbow",
            TrackingViveTrackerName::RightElbow => "vive_tracker_right_elbow",
            TrackingViveTrackerName::LeftKnee => "vive_tracker_left_knee",
            TrackingViveTrackerName::RightKnee => "vive_tracker_right_knee",
            TrackingViveTrackerName::Waist => "vive_tracker_waist",
            TrackingViveTrackerName::Chest => "vive_tracker_chest",
        }
    }

    /// Role of a tracker given its SteamVR name, if it is a vive tracker.
    pub fn from_steam_vr_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

impl FromStr for TrackingViveTrackerName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = match s {
            "vive_tracker" => TrackingViveTrackerName::Disabled,
            "vive_tracker_handed" => TrackingViveTrackerName::HeldInHand,
            "vive_tracker_camera" => TrackingViveTrackerName::Camera,
            "vive_tracker_keyboard" => TrackingViveTrackerName::Keyboard,
            "vive_tracker_left_foot" => TrackingViveTrackerName::LeftFoot,
            "vive_tracker_right_foot" => TrackingViveTrackerName::RightFoot,
            "vive_tracker_left_shoulder" => TrackingViveTrackerName::LeftShoulder,
            "vive_tracker_right_shoulder" => TrackingViveTrackerName::RightShoulder,
            "vive_tracker_left_elbow" => TrackingViveTrackerName::LeftElbow,
            "vive_tracker_right_elbow" => TrackingViveTrackerName::RightElbow,
            "vive_tracker_left_knee" => TrackingViveTrackerName::LeftKnee,
            "vive_tracker_right_knee" => TrackingViveTrackerName::RightKnee,
            "vive_tracker_waist" => TrackingViveTrackerName::Waist,
            "vive_tracker_chest" => TrackingViveTrackerName::Chest,
            _ => return Err(format!("unknown vive tracker name '{s}'")),
        };
        Ok(name)
    }
}
