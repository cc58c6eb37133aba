// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! In-memory Z-Way controller client.

use crate::errors::ServiceError;
use crate::zway::{Device, DeviceCommand, DeviceType, RgbColor, ZWayController, ZWayDevice};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, single-threaded device table.
///
/// Each entry holds the controller side device state and the client side device object. Reads
/// of a [`TableDevice`] are served from the client side object, commands are applied to both and
/// [`ZWayDevice::update`] copies the controller state into the client side object.
#[derive(Clone, Default)]
pub struct DeviceTable {
    inner: Rc<RefCell<TableInner>>,
}

#[derive(Default)]
struct TableInner {
    entries: Vec<TableEntry>,
    commands: Vec<(String, DeviceCommand)>,
}

struct TableEntry {
    controller: Device,
    client: Device,
}

impl DeviceTable {
    pub fn new(devices: impl IntoIterator<Item = Device>) -> Self {
        let table = Self::default();
        for device in devices {
            table.insert(device);
        }
        table
    }

    /// Create a table from a Z-Way `/ZAutomation/api/v1/devices` response body.
    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        Ok(Self::new(crate::zway::parse_device_list(json)?))
    }

    /// Add a device or replace an existing device with the same id.
    pub fn insert(&self, device: Device) {
        let mut inner = self.inner.borrow_mut();
        let entry = TableEntry {
            controller: device.clone(),
            client: device,
        };
        match inner
            .entries
            .iter_mut()
            .find(|e| e.controller.id == entry.controller.id)
        {
            Some(existing) => *existing = entry,
            None => inner.entries.push(entry),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Change the device state on the controller side only, as if changed by another client.
    ///
    /// The change becomes visible to device objects after their next update.
    pub fn apply_remote(
        &self,
        id: &str,
        change: impl FnOnce(&mut Device),
    ) -> Result<(), ServiceError> {
        let mut inner = self.inner.borrow_mut();
        let entry = inner
            .entries
            .iter_mut()
            .find(|e| e.controller.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        change(&mut entry.controller);
        Ok(())
    }

    /// Controller side state of a device.
    pub fn controller_device(&self, id: &str) -> Option<Device> {
        self.inner
            .borrow()
            .entries
            .iter()
            .find(|e| e.controller.id == id)
            .map(|e| e.controller.clone())
    }

    /// All commands sent to the controller as `(device id, command)`, in order.
    pub fn commands(&self) -> Vec<(String, DeviceCommand)> {
        self.inner.borrow().commands.clone()
    }

    fn read<T>(&self, index: usize, f: impl FnOnce(&Device) -> T) -> T {
        f(&self.inner.borrow().entries[index].client)
    }

    fn send(&self, index: usize, cmd: DeviceCommand) {
        let mut inner = self.inner.borrow_mut();
        let entry = &mut inner.entries[index];
        cmd.apply(&mut entry.controller);
        cmd.apply(&mut entry.client);
        let id = entry.controller.id.clone();
        debug!("[{id}] command: {cmd}");
        inner.commands.push((id, cmd));
    }
}

impl ZWayController for DeviceTable {
    type Device = TableDevice;

    fn devices(&self) -> Result<Vec<TableDevice>, ServiceError> {
        Ok((0..self.len())
            .map(|index| TableDevice {
                table: self.clone(),
                index,
            })
            .collect())
    }
}

/// Handle of a device in a [`DeviceTable`].
///
/// Entries are never removed from the table, so the handle stays valid for the table lifetime.
pub struct TableDevice {
    table: DeviceTable,
    index: usize,
}

impl ZWayDevice for TableDevice {
    fn id(&self) -> String {
        self.table.read(self.index, |d| d.id.clone())
    }

    fn device_type(&self) -> DeviceType {
        self.table.read(self.index, |d| d.device_type.clone())
    }

    fn title(&self) -> String {
        self.table.read(self.index, |d| d.title.clone())
    }

    fn is_tagged(&self, tag: Option<&str>) -> bool {
        self.table.read(self.index, |d| d.is_tagged(tag))
    }

    fn state(&self) -> bool {
        self.table.read(self.index, |d| d.state)
    }

    fn set_state(&mut self, on: bool) -> Result<(), ServiceError> {
        let cmd = if on {
            DeviceCommand::On
        } else {
            DeviceCommand::Off
        };
        self.table.send(self.index, cmd);
        Ok(())
    }

    fn level(&self) -> u8 {
        self.table.read(self.index, |d| d.level)
    }

    fn set_level(&mut self, level: u8) -> Result<(), ServiceError> {
        self.table.send(self.index, DeviceCommand::Exact { level });
        Ok(())
    }

    fn rgb(&self) -> Option<RgbColor> {
        self.table.read(self.index, |d| d.color)
    }

    fn set_rgb(&mut self, color: Option<RgbColor>) -> Result<(), ServiceError> {
        let color = color.ok_or_else(|| {
            ServiceError::BadRequest(format!("Missing rgb color for device {}", self.id()))
        })?;
        self.table.send(self.index, DeviceCommand::ExactColor(color));
        Ok(())
    }

    fn update(&mut self) -> Result<(), ServiceError> {
        let mut inner = self.table.inner.borrow_mut();
        let entry = &mut inner.entries[self.index];
        debug!("[{}] update", entry.controller.id);
        entry.client = entry.controller.clone();
        Ok(())
    }
}
