// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Z-Way controller client abstraction.
//!
//! The transport to the Z-Way controller is not part of this crate. A client library exposes its
//! devices through the [`ZWayController`] and [`ZWayDevice`] traits. [`DeviceTable`] is an
//! in-memory client, e.g. seeded from a device list snapshot.

use crate::errors::ServiceError;
use std::fmt::{Display, Formatter};

mod model;
mod table;

pub use model::{Device, DeviceType, RgbColor, parse_device_list};
pub use table::{DeviceTable, TableDevice};

/// A device object of a Z-Way controller client.
///
/// Reads are served from the client side device object. Only [`ZWayDevice::update`] fetches new
/// data from the controller.
pub trait ZWayDevice {
    fn id(&self) -> String;

    fn device_type(&self) -> DeviceType;

    fn title(&self) -> String;

    /// Checks if the device carries the given tag. Returns true if `tag` is `None`.
    fn is_tagged(&self, tag: Option<&str>) -> bool;

    fn state(&self) -> bool;

    fn set_state(&mut self, on: bool) -> Result<(), ServiceError>;

    /// Level of a multilevel switch.
    fn level(&self) -> u8;

    fn set_level(&mut self, level: u8) -> Result<(), ServiceError>;

    /// Color of an RGBW switch, if reported by the controller.
    fn rgb(&self) -> Option<RgbColor>;

    /// Set the color of an RGBW switch.
    ///
    /// A missing color is rejected by the controller client.
    fn set_rgb(&mut self, color: Option<RgbColor>) -> Result<(), ServiceError>;

    /// Fetch the current device data from the controller.
    fn update(&mut self) -> Result<(), ServiceError>;
}

/// A connected Z-Way controller client.
pub trait ZWayController {
    type Device: ZWayDevice;

    /// All device objects of the controller, in controller order.
    fn devices(&self) -> Result<Vec<Self::Device>, ServiceError>;
}

/// Z-Way virtual device command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    On,
    Off,
    Exact { level: u8 },
    ExactColor(RgbColor),
}

impl DeviceCommand {
    /// Apply the command to a device object.
    pub(crate) fn apply(&self, device: &mut Device) {
        match *self {
            DeviceCommand::On => device.state = true,
            DeviceCommand::Off => device.state = false,
            DeviceCommand::Exact { level } => {
                device.level = level;
                device.state = level > 0;
            }
            DeviceCommand::ExactColor(color) => {
                device.color = Some(color);
                device.state = true;
            }
        }
    }
}

/// Renders the Z-Way command path, relative to `/devices/{id}/command/`.
impl Display for DeviceCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceCommand::On => write!(f, "on"),
            DeviceCommand::Off => write!(f, "off"),
            DeviceCommand::Exact { level } => write!(f, "exact?level={level}"),
            DeviceCommand::ExactColor(c) => {
                write!(f, "exact?red={}&green={}&blue={}", c.r, c.g, c.b)
            }
        }
    }
}
