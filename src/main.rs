// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Z-Way light platform test tool.
//!
//! Loads the platform configuration, runs the light discovery on a Z-Way device list snapshot and
//! prints the discovered light entities.

#![forbid(non_ascii_idents)]
#![deny(unsafe_code)]

use anyhow::{Context, anyhow};
use clap::Parser;
use log::info;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use zway_light::APP_VERSION;
use zway_light::configuration::{DEF_CONFIG_FILE, get_configuration};
use zway_light::light::{LightEntity, TurnOffParams, TurnOnParams, ZWayLight};
use zway_light::setup_platform;
use zway_light::zway::{DeviceTable, RgbColor, TableDevice};

#[derive(Parser, Debug)]
#[command(version = APP_VERSION, about = "Z-Way light platform test tool", long_about = None)]
pub struct Opt {
    /// Configuration file.
    #[arg(short, long)]
    pub config: Option<String>,
    /// Z-Way device list JSON file (response of `/ZAutomation/api/v1/devices`).
    #[arg(short, long)]
    pub snapshot: PathBuf,
    /// Only include devices with this tag (overrides the configuration file).
    #[arg(short, long)]
    pub include: Option<String>,
    /// Turn on the light with the given id.
    #[arg(long, value_name = "ID")]
    pub turn_on: Option<String>,
    /// Brightness 0..255 for `--turn-on`.
    #[arg(short, long)]
    pub brightness: Option<u8>,
    /// RGB color `r,g,b` for `--turn-on`.
    #[arg(long, value_parser = parse_rgb)]
    pub rgb: Option<RgbColor>,
    /// Turn off the light with the given id.
    #[arg(long, value_name = "ID")]
    pub turn_off: Option<String>,
}

fn parse_rgb(value: &str) -> Result<RgbColor, String> {
    let parts = value
        .split(',')
        .map(|v| v.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Invalid color component: {e}"))?;
    match parts.as_slice() {
        [r, g, b] => Ok(RgbColor::new(*r, *g, *b)),
        _ => Err("Expected color format: r,g,b".into()),
    }
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg_file = match opt.config.as_deref() {
        None if Path::new(DEF_CONFIG_FILE).exists() => Some(DEF_CONFIG_FILE),
        cfg_file => cfg_file,
    };
    let mut cfg = get_configuration(cfg_file).context("Failed to read configuration")?;
    if opt.include.is_some() {
        cfg.include = opt.include.clone();
    }

    let snapshot = fs::read_to_string(&opt.snapshot)
        .with_context(|| format!("Failed to read snapshot {}", opt.snapshot.display()))?;

    let mut lights: Vec<ZWayLight<TableDevice>> = Vec::new();
    setup_platform(
        &cfg,
        |url, username, _| {
            info!(
                "Using device snapshot {} for {url} (user: {username})",
                opt.snapshot.display()
            );
            DeviceTable::from_json(&snapshot)
        },
        |devices| lights = devices,
    )?;

    if let Some(id) = opt.turn_on.as_deref() {
        let params = TurnOnParams {
            brightness: opt.brightness,
            rgb_color: opt.rgb,
            transition: None,
        };
        find_light(&mut lights, id)?.turn_on(&params)?;
    }
    if let Some(id) = opt.turn_off.as_deref() {
        find_light(&mut lights, id)?.turn_off(&TurnOffParams::default())?;
    }

    for light in &lights {
        let features = light.supported_features().features();
        let entity = json!({
            "unique_id": light.unique_id(),
            "name": light.name(),
            "features": features.iter().map(|f| f.to_string()).collect::<Vec<_>>(),
            "attributes": light.state_attributes(),
        });
        println!("{}", serde_json::to_string_pretty(&entity)?);
    }

    Ok(())
}

fn find_light<'a>(
    lights: &'a mut [ZWayLight<TableDevice>],
    id: &str,
) -> anyhow::Result<&'a mut ZWayLight<TableDevice>> {
    let id = id.to_lowercase();
    lights
        .iter_mut()
        .find(|l| l.unique_id() == id)
        .ok_or_else(|| anyhow!("Light not found: {id}"))
}
