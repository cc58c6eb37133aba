// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Light entity specific service call logic.
//! Translates the host's `light` service calls into light entity commands.

use crate::errors::ServiceError;
use crate::light::LightEntity;
use crate::zway::RgbColor;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use strum::{EnumString, VariantNames};

/// Light service names.
#[derive(Debug, PartialEq, strum::Display, EnumString, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum LightCommand {
    TurnOn,
    TurnOff,
    Toggle,
}

/// Parameters of a turn on command.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TurnOnParams {
    /// Brightness 0..255
    pub brightness: Option<u8>,
    #[serde(default, deserialize_with = "deserialize_rgb")]
    pub rgb_color: Option<RgbColor>,
    /// Transition time in seconds. Not supported by Z-Way switches.
    pub transition: Option<f32>,
}

impl TurnOnParams {
    pub fn with_brightness(brightness: u8) -> Self {
        Self {
            brightness: Some(brightness),
            ..Default::default()
        }
    }

    pub fn with_rgb_color(color: impl Into<RgbColor>) -> Self {
        Self {
            rgb_color: Some(color.into()),
            ..Default::default()
        }
    }
}

/// Parameters of a turn off command.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TurnOffParams {
    /// Transition time in seconds. Not supported by Z-Way switches.
    pub transition: Option<f32>,
}

/// The host sends colors as `[r, g, b]` array.
fn deserialize_rgb<'de, D>(deserializer: D) -> Result<Option<RgbColor>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let rgb: Option<(u8, u8, u8)> = Option::deserialize(deserializer)?;
    Ok(rgb.map(RgbColor::from))
}

pub fn cmd_from_str<T: std::str::FromStr + VariantNames>(cmd: &str) -> Result<T, ServiceError> {
    T::from_str(cmd).map_err(|_| {
        ServiceError::BadRequest(format!(
            "Invalid service: {cmd}. Valid services: {}",
            T::VARIANTS.join(",")
        ))
    })
}

fn params_from_data<T>(service_data: Option<&Value>) -> Result<T, ServiceError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    match service_data {
        None | Some(Value::Null) => Ok(T::default()),
        Some(data) => T::deserialize(data)
            .map_err(|e| ServiceError::BadRequest(format!("Invalid service data: {e}"))),
    }
}

/// Execute a host `light` service call on the given light entity.
///
/// # Arguments
///
/// * `light`: Target light entity.
/// * `service`: Service name, see [`LightCommand`].
/// * `service_data`: Optional service data object with the command parameters.
///
/// returns: Result<(), ServiceError>
pub fn handle_light_command<L: LightEntity + ?Sized>(
    light: &mut L,
    service: &str,
    service_data: Option<&Value>,
) -> Result<(), ServiceError> {
    let cmd: LightCommand = cmd_from_str(service)?;
    debug!("[{}] {cmd}: {service_data:?}", light.unique_id());

    match cmd {
        LightCommand::TurnOn => light.turn_on(&params_from_data(service_data)?),
        LightCommand::TurnOff => light.turn_off(&params_from_data(service_data)?),
        LightCommand::Toggle => light.toggle(&params_from_data(service_data)?),
    }
}
