// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Z-Way light platform setup: device discovery and light entity registration.

use crate::configuration::PlatformConfig;
use crate::errors::ServiceError;
use crate::light::{LightKind, ZWayLight};
use crate::zway::{ZWayController, ZWayDevice};
use log::{Level, Log, Record, info};
use url::Url;

/// Create the light entities of all supported devices of a controller.
///
/// A device is included if it carries the `include` tag (or no tag filter is set) and it is a
/// binary, multilevel or RGBW switch. Every included device is logged to `logger`.
///
/// # Arguments
///
/// * `controller`: Connected Z-Way controller client.
/// * `include`: Optional tag filter.
/// * `logger`: Log sink for the inclusion records.
///
/// returns: the light entities in controller order.
pub fn discover_lights<C: ZWayController>(
    controller: &C,
    include: Option<&str>,
    logger: &dyn Log,
) -> Result<Vec<ZWayLight<C::Device>>, ServiceError> {
    let lights = controller
        .devices()?
        .into_iter()
        .filter(|dev| dev.is_tagged(include))
        .filter(|dev| LightKind::from_device_type(&dev.device_type()).is_some())
        .inspect(|dev| {
            logger.log(
                &Record::builder()
                    .level(Level::Info)
                    .target(module_path!())
                    .args(format_args!(
                        "Including {} {}: {}",
                        dev.device_type(),
                        dev.id(),
                        dev.title()
                    ))
                    .build(),
            )
        })
        .map(ZWayLight::new)
        .collect();

    Ok(lights)
}

/// Set up the Z-Way light platform.
///
/// Connects to the controller with the configured credentials, discovers the supported devices
/// and registers them with `add_devices`. Connection errors are returned unmodified.
///
/// # Arguments
///
/// * `config`: Platform configuration.
/// * `connect`: Creates the controller client from base URL, username and password.
/// * `add_devices`: Host callback to register the light entities.
pub fn setup_platform<C, F, A>(
    config: &PlatformConfig,
    connect: F,
    add_devices: A,
) -> Result<(), ServiceError>
where
    C: ZWayController,
    F: FnOnce(&Url, &str, Option<&str>) -> Result<C, ServiceError>,
    A: FnOnce(Vec<ZWayLight<C::Device>>),
{
    let controller = connect(&config.url, &config.username, config.password.as_deref())?;

    let lights = discover_lights(&controller, config.include.as_deref(), log::logger())?;
    info!(
        "Adding {} Z-Way lights from {}",
        lights.len(),
        config.url.as_str()
    );
    add_devices(lights);

    Ok(())
}
