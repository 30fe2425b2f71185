// SPDX-License-Identifier: GPL-3.0-only

//! Flash mode and sysfs flash LED control
//!
//! Flash LEDs show up as `/sys/class/leds/*:flash`. Only the `brightness`
//! file is used (torch mode), which is writable by the `feedbackd` group on
//! most phones, unlike the root-only strobe interface.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default sysfs directory holding LED class devices
pub const SYSFS_LEDS_DIR: &str = "/sys/class/leds";

/// Flash mode handed to the capture endpoint when a session is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashMode {
    #[default]
    Off,
    /// Fire the flash for each still capture
    On,
}

impl FlashMode {
    /// Map the screen's flash toggle onto a capture flash mode
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled { FlashMode::On } else { FlashMode::Off }
    }

    pub fn is_on(self) -> bool {
        self == FlashMode::On
    }
}

/// A writable flash LED
#[derive(Debug, Clone)]
pub struct FlashDevice {
    path: PathBuf,
    max_brightness: u32,
    name: String,
}

impl FlashDevice {
    /// Discover writable flash LEDs under [`SYSFS_LEDS_DIR`]
    pub fn discover() -> Vec<FlashDevice> {
        Self::discover_in(Path::new(SYSFS_LEDS_DIR))
    }

    /// Discover writable `*:flash` LEDs in `leds_dir`.
    ///
    /// Entries with an unreadable or zero `max_brightness`, or a
    /// `brightness` file we cannot open for writing, are skipped.
    pub fn discover_in(leds_dir: &Path) -> Vec<FlashDevice> {
        let Ok(entries) = std::fs::read_dir(leds_dir) else {
            debug!(dir = %leds_dir.display(), "No LED class directory, flash disabled");
            return Vec::new();
        };

        let mut devices: Vec<FlashDevice> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                if !name.ends_with(":flash") {
                    return None;
                }
                Self::probe(entry.path(), name)
            })
            .collect();

        // white:flash before yellow:flash
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        devices
    }

    fn probe(path: PathBuf, name: String) -> Option<FlashDevice> {
        let max_path = path.join("max_brightness");
        let max_brightness = match std::fs::read_to_string(&max_path) {
            Ok(s) => match s.trim().parse::<u32>() {
                Ok(v) if v > 0 => v,
                _ => {
                    warn!(path = %max_path.display(), "Invalid max_brightness value");
                    return None;
                }
            },
            Err(e) => {
                warn!(path = %max_path.display(), error = %e, "Cannot read max_brightness");
                return None;
            }
        };

        let brightness_path = path.join("brightness");
        if let Err(e) = std::fs::OpenOptions::new().write(true).open(&brightness_path) {
            warn!(
                path = %brightness_path.display(),
                error = %e,
                "Flash LED found but not writable, user may need to be in 'feedbackd' group"
            );
            return None;
        }

        info!(name = %name, max_brightness, "Discovered flash LED");
        Some(FlashDevice {
            path,
            max_brightness,
            name,
        })
    }

    /// Device name, e.g. `white:flash`
    pub fn name(&self) -> &str {
        &self.name
    }

    fn set_brightness(&self, value: u32) -> io::Result<()> {
        std::fs::write(
            self.path.join("brightness"),
            value.min(self.max_brightness).to_string(),
        )
    }

    /// Full brightness
    pub fn on(&self) -> io::Result<()> {
        self.set_brightness(self.max_brightness)
    }

    pub fn off(&self) -> io::Result<()> {
        self.set_brightness(0)
    }
}

/// Turn on every flash LED at full brightness
pub fn all_on(devices: &[FlashDevice]) {
    for dev in devices {
        if let Err(e) = dev.on() {
            warn!(device = %dev.name, error = %e, "Failed to turn on flash LED");
        }
    }
}

/// Turn off every flash LED
pub fn all_off(devices: &[FlashDevice]) {
    for dev in devices {
        if let Err(e) = dev.off() {
            warn!(device = %dev.name, error = %e, "Failed to turn off flash LED");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_led(root: &Path, name: &str, max: &str) -> PathBuf {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("max_brightness"), max).unwrap();
        std::fs::write(dir.join("brightness"), "0").unwrap();
        dir
    }

    #[test]
    fn test_flash_mode_from_toggle() {
        assert_eq!(FlashMode::from_enabled(false), FlashMode::Off);
        assert_eq!(FlashMode::from_enabled(true), FlashMode::On);
        assert!(!FlashMode::default().is_on());
    }

    #[test]
    fn test_discover_only_flash_leds() {
        let root = tempfile::tempdir().unwrap();
        fake_led(root.path(), "yellow:flash", "255\n");
        fake_led(root.path(), "white:flash", "100\n");
        fake_led(root.path(), "input0::capslock", "1\n");
        fake_led(root.path(), "red:flash", "0\n");

        let devices = FlashDevice::discover_in(root.path());
        let names: Vec<&str> = devices.iter().map(FlashDevice::name).collect();
        assert_eq!(names, vec!["white:flash", "yellow:flash"]);
    }

    #[test]
    fn test_all_on_and_off_write_brightness() {
        let root = tempfile::tempdir().unwrap();
        let led = fake_led(root.path(), "white:flash", "42");
        let devices = FlashDevice::discover_in(root.path());

        all_on(&devices);
        assert_eq!(std::fs::read_to_string(led.join("brightness")).unwrap(), "42");

        all_off(&devices);
        assert_eq!(std::fs::read_to_string(led.join("brightness")).unwrap(), "0");
    }

    #[test]
    fn test_missing_leds_dir_is_empty() {
        let root = tempfile::tempdir().unwrap();
        assert!(FlashDevice::discover_in(&root.path().join("missing")).is_empty());
    }
}
