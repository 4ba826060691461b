//! Project save payload: the timeline plus the assets its clips reference.

pub mod asset;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::clip::ClipContent;
use crate::core::time::{self, Time};
use crate::core::timeline::{InvalidTimeline, Timeline, TimelineData};
pub use asset::{Asset, AssetId};

pub const PROJECT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed project: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported project version {0}")]
    UnsupportedVersion(u32),
    #[error(transparent)]
    Invalid(#[from] InvalidTimeline),
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub timeline: Timeline,
    pub assets: Vec<Asset>,
}

/// Wire shape read back from disk. The version is checked before the
/// timeline is validated.
#[derive(Deserialize)]
struct ProjectData {
    version: u32,
    name: String,
    timeline: TimelineData,
    #[serde(default)]
    assets: Vec<Asset>,
}

impl Project {
    pub fn new(name: impl Into<String>, duration: Time) -> Self {
        Self {
            version: PROJECT_VERSION,
            name: name.into(),
            timeline: Timeline::new(duration),
            assets: Vec::new(),
        }
    }

    pub fn asset(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| &a.id == id)
    }

    /// Register an asset, replacing any earlier entry with the same id
    pub fn add_asset(&mut self, asset: Asset) {
        match self.assets.iter_mut().find(|a| a.id == asset.id) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
    }

    /// Media clips whose asset is not registered with the project
    pub fn missing_assets(&self) -> Vec<&AssetId> {
        let mut missing: Vec<&AssetId> = self
            .timeline
            .clips()
            .filter_map(|c| match &c.content {
                ClipContent::Media { asset_id, .. } if self.asset(asset_id).is_none() => Some(asset_id),
                _ => None,
            })
            .collect();
        missing.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        missing.dedup();
        missing
    }

    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let data: ProjectData = serde_json::from_str(json)?;
        if data.version != PROJECT_VERSION {
            return Err(ProjectError::UnsupportedVersion(data.version));
        }
        Ok(Self {
            version: data.version,
            name: data.name,
            timeline: Timeline::try_from(data.timeline)?,
            assets: data.assets,
        })
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a project file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let contents = std::fs::read_to_string(path)?;
        let project = Self::from_json(&contents)?;
        for id in project.missing_assets() {
            log::warn!("project {} references unknown asset {}", project.name, id);
        }
        log::info!(
            "loaded project {} ({} tracks, {} clips, {})",
            project.name,
            project.timeline.tracks().len(),
            project.timeline.clip_count(),
            time::format_time(project.timeline.duration())
        );
        Ok(project)
    }

    /// Save atomically: write to a temp file, then rename over the target
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = self.to_json()?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(temp_path, path)?;
        log::info!("saved project {} to {}", self.name, path.display());
        Ok(())
    }
}
