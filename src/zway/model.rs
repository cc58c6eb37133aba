// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Z-Way device data structure definitions for JSON deserialization.
//!
//! The JSON format is the response body of the Z-Way `/ZAutomation/api/v1/devices` request.

use crate::errors::ServiceError;
use derive_more::Constructor;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use strum::EnumString;

/// Z-Way virtual device type.
///
/// Device types not known to this crate are kept in [`DeviceType::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Deserialize)]
#[serde(from = "String")]
pub enum DeviceType {
    #[strum(serialize = "switchBinary")]
    SwitchBinary,
    #[strum(serialize = "switchMultilevel")]
    SwitchMultilevel,
    #[strum(serialize = "switchRGBW")]
    SwitchRgbw,
    #[strum(serialize = "switchControl")]
    SwitchControl,
    #[strum(serialize = "toggleButton")]
    ToggleButton,
    #[strum(serialize = "sensorBinary")]
    SensorBinary,
    #[strum(serialize = "sensorMultilevel")]
    SensorMultilevel,
    #[strum(serialize = "sensorMultiline")]
    SensorMultiline,
    #[strum(serialize = "sensorDiscrete")]
    SensorDiscrete,
    #[strum(serialize = "thermostat")]
    Thermostat,
    #[strum(serialize = "doorlock")]
    Doorlock,
    #[strum(serialize = "battery")]
    Battery,
    #[strum(serialize = "camera")]
    Camera,
    #[strum(serialize = "text")]
    Text,
    #[strum(default)]
    Unknown(String),
}

impl DeviceType {
    /// The Z-Way device type name.
    pub fn as_str(&self) -> &str {
        match self {
            DeviceType::SwitchBinary => "switchBinary",
            DeviceType::SwitchMultilevel => "switchMultilevel",
            DeviceType::SwitchRgbw => "switchRGBW",
            DeviceType::SwitchControl => "switchControl",
            DeviceType::ToggleButton => "toggleButton",
            DeviceType::SensorBinary => "sensorBinary",
            DeviceType::SensorMultilevel => "sensorMultilevel",
            DeviceType::SensorMultiline => "sensorMultiline",
            DeviceType::SensorDiscrete => "sensorDiscrete",
            DeviceType::Thermostat => "thermostat",
            DeviceType::Doorlock => "doorlock",
            DeviceType::Battery => "battery",
            DeviceType::Camera => "camera",
            DeviceType::Text => "text",
            DeviceType::Unknown(v) => v,
        }
    }
}

impl From<String> for DeviceType {
    fn from(value: String) -> Self {
        // infallible: unmatched names end up in the `Unknown` default variant
        DeviceType::from_str(&value).unwrap_or(DeviceType::Unknown(value))
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RGB color triple of a `switchRGBW` device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

impl From<RgbColor> for (u8, u8, u8) {
    fn from(c: RgbColor) -> Self {
        (c.r, c.g, c.b)
    }
}

/// Client side representation of a Z-Way virtual device.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: String,
    pub device_type: DeviceType,
    pub title: String,
    pub tags: Vec<String>,
    pub state: bool,
    pub level: u8,
    pub color: Option<RgbColor>,
}

impl Device {
    pub fn new(id: impl Into<String>, device_type: DeviceType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            device_type,
            title: title.into(),
            tags: Vec::new(),
            state: false,
            level: 0,
            color: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Checks if the device carries the given tag. Always true if no tag is given.
    pub fn is_tagged(&self, tag: Option<&str>) -> bool {
        match tag {
            None => true,
            Some(tag) => self.tags.iter().any(|t| t == tag),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeviceListMsg {
    pub data: DeviceListData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeviceListData {
    pub devices: Vec<DeviceMsg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeviceMsg {
    pub id: String,
    #[serde(rename = "deviceType")]
    pub device_type: DeviceType,
    #[serde(default)]
    pub tags: Vec<String>,
    pub metrics: MetricsMsg,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MetricsMsg {
    #[serde(default)]
    pub title: String,
    pub level: Option<LevelValue>,
    pub color: Option<RgbColor>,
}

/// The `metrics.level` field is either an `on` / `off` string or a numeric level.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LevelValue {
    Number(f64),
    Text(String),
}

impl From<DeviceMsg> for Device {
    fn from(msg: DeviceMsg) -> Self {
        let (state, level) = match msg.metrics.level {
            None => (false, 0),
            Some(LevelValue::Text(v)) => (v == "on", 0),
            Some(LevelValue::Number(v)) => {
                let level = if (0.0..=255.0).contains(&v) {
                    v.round() as u8
                } else {
                    warn!("Adjusted invalid level value {v} of device {}", msg.id);
                    v.clamp(0.0, 255.0) as u8
                };
                (level > 0, level)
            }
        };

        Self {
            id: msg.id,
            device_type: msg.device_type,
            title: msg.metrics.title,
            tags: msg.tags,
            state,
            level,
            color: msg.metrics.color,
        }
    }
}

/// Parse the devices of a Z-Way device list response body.
pub fn parse_device_list(json: &str) -> Result<Vec<Device>, ServiceError> {
    let msg: DeviceListMsg = serde_json::from_str(json)?;
    Ok(msg.data.devices.into_iter().map(Device::from).collect())
}
