// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Light entity mapping of Z-Way switch devices.

use crate::zway::{DeviceType, RgbColor, ZWayDevice};
use strum::{EnumIter, IntoEnumIterator};

mod entity;
mod service;

pub use entity::*;
pub use service::*;

/// Optional light capabilities, with the host platform's feature flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum LightFeature {
    Brightness = 1,
    RgbColor = 16,
}

/// Set of [`LightFeature`] flags. On/off is always supported and has no flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupportedFeatures(u32);

impl SupportedFeatures {
    pub const NONE: SupportedFeatures = SupportedFeatures(0);

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, feature: LightFeature) -> bool {
        self.0 & feature as u32 != 0
    }

    pub fn features(&self) -> Vec<LightFeature> {
        LightFeature::iter().filter(|f| self.contains(*f)).collect()
    }
}

impl From<LightFeature> for SupportedFeatures {
    fn from(feature: LightFeature) -> Self {
        SupportedFeatures(feature as u32)
    }
}

/// Z-Way device classes which are exposed as lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// `switchBinary`: on / off only.
    Binary,
    /// `switchMultilevel`: dimmable.
    Multilevel,
    /// `switchRGBW`: color.
    Rgbw,
}

impl LightKind {
    pub fn from_device_type(device_type: &DeviceType) -> Option<LightKind> {
        match device_type {
            DeviceType::SwitchBinary => Some(LightKind::Binary),
            DeviceType::SwitchMultilevel => Some(LightKind::Multilevel),
            DeviceType::SwitchRgbw => Some(LightKind::Rgbw),
            _ => None,
        }
    }

    pub fn supported_features(self) -> SupportedFeatures {
        match self {
            LightKind::Binary => SupportedFeatures::NONE,
            LightKind::Multilevel => LightFeature::Brightness.into(),
            LightKind::Rgbw => LightFeature::RgbColor.into(),
        }
    }
}

/// Feature table lookup. Device types which aren't lights have no optional features.
pub fn supported_features(device_type: &DeviceType) -> SupportedFeatures {
    LightKind::from_device_type(device_type)
        .map(LightKind::supported_features)
        .unwrap_or_default()
}

/// Light state of a device object, depending on its device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Binary { on: bool },
    Multilevel { on: bool, level: u8 },
    Rgbw { on: bool, color: Option<RgbColor> },
}

impl LightState {
    /// Read the current state from the device object. Returns `None` if the device isn't a light.
    pub fn read<D: ZWayDevice + ?Sized>(device: &D) -> Option<LightState> {
        let on = device.state();
        let state = match LightKind::from_device_type(&device.device_type())? {
            LightKind::Binary => LightState::Binary { on },
            LightKind::Multilevel => LightState::Multilevel {
                on,
                level: device.level(),
            },
            LightKind::Rgbw => LightState::Rgbw {
                on,
                color: device.rgb(),
            },
        };
        Some(state)
    }

    pub fn is_on(&self) -> bool {
        match *self {
            LightState::Binary { on }
            | LightState::Multilevel { on, .. }
            | LightState::Rgbw { on, .. } => on,
        }
    }

    pub fn brightness(&self) -> Option<u8> {
        match *self {
            LightState::Multilevel { level, .. } => Some(level),
            LightState::Binary { .. } | LightState::Rgbw { .. } => None,
        }
    }

    pub fn rgb_color(&self) -> Option<RgbColor> {
        match *self {
            LightState::Rgbw { color, .. } => color,
            LightState::Binary { .. } | LightState::Multilevel { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DeviceType::SwitchBinary, SupportedFeatures::NONE)]
    #[case(DeviceType::SwitchMultilevel, SupportedFeatures(1))]
    #[case(DeviceType::SwitchRgbw, SupportedFeatures(16))]
    #[case(DeviceType::SensorMultilevel, SupportedFeatures::NONE)]
    #[case(DeviceType::ToggleButton, SupportedFeatures::NONE)]
    #[case(DeviceType::Unknown("switchFancy".into()), SupportedFeatures::NONE)]
    fn supported_features_by_device_type(
        #[case] device_type: DeviceType,
        #[case] expected: SupportedFeatures,
    ) {
        assert_eq!(expected, supported_features(&device_type));
    }

    #[test]
    fn features_lists_contained_flags() {
        assert!(SupportedFeatures::NONE.features().is_empty());
        assert!(SupportedFeatures::NONE.is_empty());

        let features = SupportedFeatures::from(LightFeature::RgbColor);
        assert_eq!(vec![LightFeature::RgbColor], features.features());
        assert!(!features.contains(LightFeature::Brightness));
        assert_eq!("rgb_color", LightFeature::RgbColor.to_string());
    }

    #[test]
    fn light_state_accessors() {
        let state = LightState::Multilevel { on: true, level: 40 };
        assert!(state.is_on());
        assert_eq!(Some(40), state.brightness());
        assert_eq!(None, state.rgb_color());

        let state = LightState::Rgbw {
            on: false,
            color: Some(RgbColor::new(1, 2, 3)),
        };
        assert!(!state.is_on());
        assert_eq!(None, state.brightness());
        assert_eq!(Some(RgbColor::new(1, 2, 3)), state.rgb_color());
    }
}
