// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Z-Way light platform.
//!
//! Exposes binary, multilevel and RGBW switches of a Z-Way controller as light entities.

pub mod light;
pub mod platform;
pub mod util;
pub mod zway;

pub mod configuration;
pub mod errors;
pub mod startup;

pub use platform::*;
pub use startup::*;
