//! Spine skeleton JSON output
//!
//! Paths are written as `path` attachments on the root bone, either one slot
//! per path or all of them in a shared `paths` slot.

use std::collections::BTreeMap;

use serde::Serialize;

use super::emit::SpinePath;
use crate::error::{ConvertError, ConvertResult};

pub const ROOT_BONE: &str = "root";
pub const SHARED_SLOT: &str = "paths";
pub const DEFAULT_SKIN: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bone {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    pub name: String,
    pub bone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathAttachment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub closed: bool,
    pub lengths: Vec<f64>,
    pub vertex_count: usize,
    pub vertices: Vec<f64>,
}

impl From<&SpinePath> for PathAttachment {
    fn from(path: &SpinePath) -> Self {
        Self {
            kind: "path".to_string(),
            color: path.color.clone(),
            closed: path.closed,
            lengths: Vec::new(),
            vertex_count: path.vertex_count,
            vertices: path.vertices.clone(),
        }
    }
}

/// skin name -> slot name -> attachment name -> attachment
pub type Skins = BTreeMap<String, BTreeMap<String, BTreeMap<String, PathAttachment>>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
    pub slots: Vec<Slot>,
    pub skins: Skins,
    #[serde(skip)]
    own_slot: bool,
}

impl Skeleton {
    pub fn new(own_slot: bool) -> Self {
        let mut skeleton = Self {
            bones: vec![Bone {
                name: ROOT_BONE.to_string(),
            }],
            slots: Vec::new(),
            skins: BTreeMap::new(),
            own_slot,
        };
        let default_skin = skeleton.skins.entry(DEFAULT_SKIN.to_string()).or_default();

        if !own_slot {
            default_skin.insert(SHARED_SLOT.to_string(), BTreeMap::new());
            skeleton.slots.push(Slot {
                name: SHARED_SLOT.to_string(),
                bone: ROOT_BONE.to_string(),
                attachment: None,
            });
        }
        skeleton
    }

    pub fn add_path(&mut self, path: &SpinePath) {
        let slot_name = if self.own_slot {
            self.slots.push(Slot {
                name: path.name.clone(),
                bone: ROOT_BONE.to_string(),
                attachment: Some(path.name.clone()),
            });
            path.name.clone()
        } else {
            SHARED_SLOT.to_string()
        };

        self.skins
            .entry(DEFAULT_SKIN.to_string())
            .or_default()
            .entry(slot_name)
            .or_default()
            .insert(path.name.clone(), PathAttachment::from(path));
    }

    pub fn attachment(&self, slot: &str, name: &str) -> Option<&PathAttachment> {
        self.skins.get(DEFAULT_SKIN)?.get(slot)?.get(name)
    }

    /// Pretty-printed JSON with 4-space indentation
    pub fn to_json(&self) -> ConvertResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .map_err(|e| ConvertError::document(format!("failed to serialize skeleton: {}", e)))?;
        String::from_utf8(buf)
            .map_err(|e| ConvertError::document(format!("skeleton is not UTF-8: {}", e)))
    }
}
