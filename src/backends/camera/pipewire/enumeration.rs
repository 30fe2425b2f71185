// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration
//!
//! Cameras are discovered from `pw-cli ls Node`. The mounting position is
//! not part of that listing, so each video source is queried once more
//! with `pw-cli info <id>` for `api.libcamera.location`.

use super::super::types::{CameraDevice, CameraFacing};
use tracing::{debug, info, warn};

/// Check whether GStreamer has the `pipewiresrc` element
pub fn is_pipewire_available() -> bool {
    if let Err(e) = gstreamer::init() {
        warn!(error = %e, "GStreamer init failed");
        return false;
    }
    gstreamer::ElementFactory::find("pipewiresrc").is_some()
}

/// Enumerate cameras using PipeWire.
///
/// Falls back to a single "default camera" entry, letting PipeWire pick the
/// device, when `pw-cli` is missing or reports nothing.
pub fn enumerate_pipewire_cameras() -> Option<Vec<CameraDevice>> {
    if !is_pipewire_available() {
        debug!("pipewiresrc not available");
        return None;
    }

    let listing = run_pw_cli(&["ls", "Node"]);
    let mut cameras: Vec<CameraDevice> = listing
        .as_deref()
        .map(parse_video_sources)
        .unwrap_or_default()
        .into_iter()
        .map(|node| {
            let facing = run_pw_cli(&["info", &node.id])
                .as_deref()
                .and_then(parse_location);
            debug!(id = %node.id, name = %node.name, path = %node.path, ?facing, "Found video camera");
            CameraDevice {
                name: node.name,
                path: node.path,
                metadata_path: Some(node.id),
                facing,
            }
        })
        .collect();

    if cameras.is_empty() {
        info!("Using PipeWire auto-selection (default camera)");
        cameras.push(CameraDevice {
            name: "Default Camera (PipeWire)".to_string(),
            // Empty path lets PipeWire auto-select
            path: String::new(),
            metadata_path: None,
            facing: None,
        });
    } else {
        info!(count = cameras.len(), "Enumerated cameras via pw-cli");
    }

    Some(cameras)
}

fn run_pw_cli(args: &[&str]) -> Option<String> {
    let output = std::process::Command::new("pw-cli").args(args).output().ok()?;
    if !output.status.success() {
        debug!(?args, "pw-cli command failed");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// A `Video/Source` node from `pw-cli ls Node`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSourceNode {
    pub id: String,
    pub name: String,
    /// `pipewire-serial-<serial>` or `pipewire-<id>`
    pub path: String,
}

#[derive(Default)]
struct NodeBuilder {
    id: Option<String>,
    serial: Option<String>,
    name: Option<String>,
    is_video_source: bool,
}

impl NodeBuilder {
    fn finish(self) -> Option<VideoSourceNode> {
        if !self.is_video_source {
            return None;
        }
        let id = self.id?;
        let name = self.name?;
        let path = match self.serial {
            Some(serial) => format!("pipewire-serial-{serial}"),
            None => format!("pipewire-{id}"),
        };
        Some(VideoSourceNode { id, name, path })
    }
}

/// Parse the output of `pw-cli ls Node` into its video sources
pub fn parse_video_sources(listing: &str) -> Vec<VideoSourceNode> {
    let mut nodes = Vec::new();
    let mut current = NodeBuilder::default();

    for line in listing.lines() {
        let trimmed = line.trim();

        // id 76, type PipeWire:Interface:Node/3
        if trimmed.starts_with("id ") && trimmed.contains("type PipeWire:Interface:Node") {
            nodes.extend(std::mem::take(&mut current).finish());
            current.id = trimmed
                .strip_prefix("id ")
                .and_then(|rest| rest.split(',').next())
                .map(|id| id.trim().to_string());
            continue;
        }

        let Some((key, value)) = property(trimmed) else {
            continue;
        };
        match key {
            "media.class" => current.is_video_source = value == "Video/Source",
            "object.serial" => current.serial = Some(value.to_string()),
            "node.description" => current.name = Some(value.to_string()),
            _ => {}
        }
    }
    nodes.extend(current.finish());
    nodes
}

/// Facing from the output of `pw-cli info <id>`
pub fn parse_location(info: &str) -> Option<CameraFacing> {
    info.lines()
        .filter_map(|line| property(line.trim()))
        .find(|(key, _)| *key == "api.libcamera.location")
        .and_then(|(_, value)| CameraFacing::from_location(value))
}

/// Split `key = "value"` (optionally prefixed with `*`)
fn property(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once('=')?;
    let key = key.trim().trim_start_matches('*').trim();
    let start = rest.find('"')?;
    let end = rest[start + 1..].find('"')?;
    Some((key, &rest[start + 1..start + 1 + end]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
	id 31, type PipeWire:Interface:Node/3
 		object.serial = "31"
 		factory.id = "10"
 		node.description = "Built-in Audio"
 		media.class = "Audio/Sink"
	id 76, type PipeWire:Interface:Node/3
 		object.serial = "2146"
 		node.description = "Front Camera"
 		media.class = "Video/Source"
	id 80, type PipeWire:Interface:Node/3
 		node.description = "Back Camera"
 		media.class = "Video/Source"
"#;

    #[test]
    fn test_parse_video_sources() {
        let nodes = parse_video_sources(LISTING);
        assert_eq!(
            nodes,
            vec![
                VideoSourceNode {
                    id: "76".to_string(),
                    name: "Front Camera".to_string(),
                    path: "pipewire-serial-2146".to_string(),
                },
                VideoSourceNode {
                    id: "80".to_string(),
                    name: "Back Camera".to_string(),
                    path: "pipewire-80".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_location() {
        let info = "\tid: 76\n\tproperties:\n*\t\tapi.libcamera.location = \"front\"\n";
        assert_eq!(parse_location(info), Some(CameraFacing::Front));
        assert_eq!(parse_location("api.libcamera.location = \"external\""), None);
        assert_eq!(parse_location("node.name = \"x\""), None);
    }
}
