// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Light entity adapter for Z-Way switch devices.

use crate::errors::ServiceError;
use crate::light::{LightKind, LightState, SupportedFeatures, TurnOffParams, TurnOnParams};
use crate::util::color_rgb_to_hs;
use crate::zway::ZWayDevice;
use log::{debug, warn};
use serde_json::{Map, Value, json};

/// Default level if a multilevel switch is turned on without brightness.
pub const DEFAULT_BRIGHTNESS: u8 = 255;

/// The host platform's light entity contract.
pub trait LightEntity {
    /// Stable external identifier.
    fn unique_id(&self) -> String;

    /// Display name.
    fn name(&self) -> String;

    fn supported_features(&self) -> SupportedFeatures;

    fn is_on(&self) -> bool;

    /// Brightness of the light, if dimmable.
    fn brightness(&self) -> Option<u8>;

    /// RGB color of the light, if it supports colors and reports one.
    fn rgb_color(&self) -> Option<(u8, u8, u8)>;

    fn turn_on(&mut self, params: &TurnOnParams) -> Result<(), ServiceError>;

    fn turn_off(&mut self, params: &TurnOffParams) -> Result<(), ServiceError>;

    /// Fetch new state data for this light.
    fn update(&mut self) -> Result<(), ServiceError>;

    fn toggle(&mut self, params: &TurnOnParams) -> Result<(), ServiceError> {
        if self.is_on() {
            self.turn_off(&TurnOffParams {
                transition: params.transition,
            })
        } else {
            self.turn_on(params)
        }
    }

    /// Entity state in the host's attribute format.
    fn state_attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::with_capacity(5);
        let state = if self.is_on() { "on" } else { "off" };
        attributes.insert("state".into(), state.into());
        attributes.insert("friendly_name".into(), self.name().into());
        attributes.insert(
            "supported_features".into(),
            self.supported_features().bits().into(),
        );

        if let Some(brightness) = self.brightness() {
            attributes.insert("brightness".into(), brightness.into());
        }
        if let Some((r, g, b)) = self.rgb_color() {
            attributes.insert("rgb_color".into(), json!([r, g, b]));
            let (hue, saturation) = color_rgb_to_hs((r, g, b).into());
            attributes.insert("hs_color".into(), json!([hue, saturation]));
        }

        attributes
    }
}

/// Representation of a Z-Way switch device as light entity.
///
/// The adapter doesn't keep any device data. All reads are served from the wrapped device object,
/// which only fetches new data in [`LightEntity::update`].
pub struct ZWayLight<D> {
    device: D,
}

impl<D: ZWayDevice> ZWayLight<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    fn state(&self) -> Option<LightState> {
        LightState::read(&self.device)
    }
}

impl<D: ZWayDevice> LightEntity for ZWayLight<D> {
    fn unique_id(&self) -> String {
        self.device.id().to_lowercase()
    }

    fn name(&self) -> String {
        self.device.title()
    }

    fn supported_features(&self) -> SupportedFeatures {
        crate::light::supported_features(&self.device.device_type())
    }

    fn is_on(&self) -> bool {
        self.device.state()
    }

    fn brightness(&self) -> Option<u8> {
        self.state().and_then(|s| s.brightness())
    }

    fn rgb_color(&self) -> Option<(u8, u8, u8)> {
        self.state().and_then(|s| s.rgb_color()).map(Into::into)
    }

    fn turn_on(&mut self, params: &TurnOnParams) -> Result<(), ServiceError> {
        if params.transition.is_some() {
            debug!("[{}] ignoring unsupported transition", self.device.id());
        }

        match LightKind::from_device_type(&self.device.device_type()) {
            Some(LightKind::Multilevel) => self
                .device
                .set_level(params.brightness.unwrap_or(DEFAULT_BRIGHTNESS)),
            Some(LightKind::Rgbw) => self.device.set_rgb(params.rgb_color),
            Some(LightKind::Binary) => self.device.set_state(true),
            None => {
                warn!(
                    "[{}] Turning on unsupported device type {} as switch",
                    self.device.id(),
                    self.device.device_type()
                );
                self.device.set_state(true)
            }
        }
    }

    fn turn_off(&mut self, _params: &TurnOffParams) -> Result<(), ServiceError> {
        self.device.set_state(false)
    }

    fn update(&mut self) -> Result<(), ServiceError> {
        self.device.update()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zway::{Device, DeviceCommand, DeviceTable, DeviceType, RgbColor, ZWayController};
    use rstest::rstest;

    fn new_light(device: Device) -> (DeviceTable, ZWayLight<crate::zway::TableDevice>) {
        let table = DeviceTable::new([device]);
        let device = table.devices().unwrap().remove(0);
        (table, ZWayLight::new(device))
    }

    fn dimmer(level: u8) -> Device {
        let mut device = Device::new(
            "ZWayVDev_zway_3-0-38",
            DeviceType::SwitchMultilevel,
            "Dimmer",
        );
        device.level = level;
        device.state = level > 0;
        device
    }

    fn rgbw(color: Option<RgbColor>) -> Device {
        let mut device =
            Device::new("ZWayVDev_zway_4-0-51-rgb", DeviceType::SwitchRgbw, "Strip");
        device.color = color;
        device
    }

    #[test]
    fn unique_id_is_lower_case_device_id() {
        let (_, light) = new_light(Device::new(
            "ZWayVDev_zway_2-0-37",
            DeviceType::SwitchBinary,
            "Hall Lamp",
        ));
        assert_eq!("zwayvdev_zway_2-0-37", light.unique_id());
        assert_eq!("Hall Lamp", light.name());
    }

    #[rstest]
    #[case(DeviceType::SwitchBinary, 0)]
    #[case(DeviceType::SwitchMultilevel, 1)]
    #[case(DeviceType::SwitchRgbw, 16)]
    #[case(DeviceType::SensorBinary, 0)]
    fn supported_features_of_device(#[case] device_type: DeviceType, #[case] bits: u32) {
        let (_, light) = new_light(Device::new("id", device_type, "Light"));
        assert_eq!(bits, light.supported_features().bits());
    }

    #[rstest]
    #[case(0)]
    #[case(42)]
    #[case(255)]
    fn brightness_of_multilevel_switch_is_level(#[case] level: u8) {
        let (_, light) = new_light(dimmer(level));
        assert_eq!(Some(level), light.brightness());
    }

    #[rstest]
    #[case(DeviceType::SwitchBinary)]
    #[case(DeviceType::SwitchRgbw)]
    fn brightness_of_other_devices_is_none(#[case] device_type: DeviceType) {
        let mut device = Device::new("id", device_type, "Light");
        device.level = 99;
        let (_, light) = new_light(device);
        assert_eq!(None, light.brightness());
    }

    #[test]
    fn rgb_color_of_rgbw_switch() {
        let (_, light) = new_light(rgbw(None));
        assert_eq!(None, light.rgb_color());

        let (_, light) = new_light(rgbw(Some(RgbColor::new(10, 20, 30))));
        assert_eq!(Some((10, 20, 30)), light.rgb_color());
    }

    #[test]
    fn rgb_color_of_other_devices_is_none() {
        let mut device = dimmer(10);
        device.color = Some(RgbColor::new(10, 20, 30));
        let (_, light) = new_light(device);
        assert_eq!(None, light.rgb_color());
    }

    #[test]
    fn turn_on_multilevel_without_brightness_sets_max_level() {
        let (table, mut light) = new_light(dimmer(0));
        light.turn_on(&TurnOnParams::default()).unwrap();

        assert_eq!(Some(255), light.brightness());
        assert!(light.is_on());
        assert_eq!(
            vec![(
                "ZWayVDev_zway_3-0-38".to_string(),
                DeviceCommand::Exact { level: 255 }
            )],
            table.commands()
        );
    }

    #[test]
    fn turn_on_multilevel_with_brightness_sets_level() {
        let (table, mut light) = new_light(dimmer(0));
        light.turn_on(&TurnOnParams::with_brightness(100)).unwrap();

        assert_eq!(Some(100), light.brightness());
        assert_eq!(
            Some(100),
            table
                .controller_device("ZWayVDev_zway_3-0-38")
                .map(|d| d.level)
        );
    }

    #[rstest]
    #[case(TurnOnParams::default())]
    #[case(TurnOnParams::with_brightness(10))]
    #[case(TurnOnParams::with_rgb_color((1, 2, 3)))]
    fn turn_on_binary_switch_sets_state(#[case] params: TurnOnParams) {
        let (table, mut light) = new_light(Device::new("lamp", DeviceType::SwitchBinary, "Lamp"));
        light.turn_on(&params).unwrap();

        assert!(light.is_on());
        assert_eq!(vec![("lamp".to_string(), DeviceCommand::On)], table.commands());
    }

    #[test]
    fn turn_on_rgbw_sets_color() {
        let (table, mut light) = new_light(rgbw(None));
        light
            .turn_on(&TurnOnParams::with_rgb_color((10, 20, 30)))
            .unwrap();

        assert_eq!(Some((10, 20, 30)), light.rgb_color());
        assert_eq!(
            vec![(
                "ZWayVDev_zway_4-0-51-rgb".to_string(),
                DeviceCommand::ExactColor(RgbColor::new(10, 20, 30))
            )],
            table.commands()
        );
    }

    #[test]
    fn turn_on_rgbw_without_color_propagates_client_error() {
        let (table, mut light) = new_light(rgbw(Some(RgbColor::new(1, 1, 1))));
        let result = light.turn_on(&TurnOnParams::with_brightness(10));

        assert!(
            matches!(result, Err(ServiceError::BadRequest(_))),
            "Missing color must be rejected by the controller client"
        );
        assert!(table.commands().is_empty());
    }

    #[rstest]
    #[case(Device::new("lamp", DeviceType::SwitchBinary, "Lamp"))]
    #[case(dimmer(80))]
    #[case(rgbw(Some(RgbColor::new(10, 20, 30))))]
    fn turn_off_only_clears_state(#[case] device: Device) {
        let mut device = device;
        device.state = true;
        let (table, mut light) = new_light(device.clone());
        light.turn_off(&TurnOffParams::default()).unwrap();

        assert!(!light.is_on());
        let controller = table.controller_device(&device.id).unwrap();
        assert!(!controller.state);
        assert_eq!(device.level, controller.level);
        assert_eq!(device.color, controller.color);
        assert_eq!(vec![(device.id.clone(), DeviceCommand::Off)], table.commands());
    }

    #[test]
    fn update_is_the_only_point_fetching_new_data() {
        let (table, mut light) = new_light(dimmer(10));
        table
            .apply_remote("ZWayVDev_zway_3-0-38", |d| d.level = 77)
            .unwrap();
        assert_eq!(Some(10), light.brightness());

        light.update().unwrap();
        assert_eq!(Some(77), light.brightness());
    }

    #[test]
    fn toggle_switches_state() {
        let (_, mut light) = new_light(Device::new("lamp", DeviceType::SwitchBinary, "Lamp"));
        light.toggle(&TurnOnParams::default()).unwrap();
        assert!(light.is_on());
        light.toggle(&TurnOnParams::default()).unwrap();
        assert!(!light.is_on());
    }

    #[test]
    fn state_attributes_of_rgbw_light() {
        let mut device = rgbw(Some(RgbColor::new(255, 0, 0)));
        device.state = true;
        let (_, light) = new_light(device);

        let attributes = light.state_attributes();
        assert_eq!(Some(&json!("on")), attributes.get("state"));
        assert_eq!(Some(&json!("Strip")), attributes.get("friendly_name"));
        assert_eq!(Some(&json!(16)), attributes.get("supported_features"));
        assert_eq!(Some(&json!([255, 0, 0])), attributes.get("rgb_color"));
        assert_eq!(Some(&json!([0.0, 100.0])), attributes.get("hs_color"));
        assert_eq!(None, attributes.get("brightness"));
    }

    #[test]
    fn state_attributes_of_dimmer() {
        let (_, light) = new_light(dimmer(0));

        let attributes = light.state_attributes();
        assert_eq!(Some(&json!("off")), attributes.get("state"));
        assert_eq!(Some(&json!(0)), attributes.get("brightness"));
        assert_eq!(None, attributes.get("rgb_color"));
        assert_eq!(None, attributes.get("hs_color"));
    }
}
