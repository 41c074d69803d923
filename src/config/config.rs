use std::path::{Path, PathBuf};
use anyhow::Error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub temp_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub(crate) fn new() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 6006,
            temp_dir: std::env::temp_dir(),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection settings of the face mesh inference server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaceMeshConfig {
    pub endpoint: String,
    pub model_name: String,
    /// Per-call timeout in seconds.
    pub timeout: i32,
    pub max_faces: u32,
    pub refine_landmarks: bool,
    /// Detection calls allowed in flight against one model instance.
    pub max_concurrent_requests: usize,
}

impl FaceMeshConfig {
    pub(crate) fn new() -> Self {
        FaceMeshConfig {
            endpoint: "http://127.0.0.1:8001".to_string(),
            model_name: "face_mesh".to_string(),
            timeout: 20,
            max_faces: 1,
            refine_landmarks: true,
            max_concurrent_requests: 1,
        }
    }
}

impl Default for FaceMeshConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Jaw width of an average adult, used to derive the pixel scale.
    pub assumed_jaw_width_mm: f64,
    /// Size of the full mesh including the iris refinement points.
    pub expected_landmark_count: usize,
}

impl MeasurementConfig {
    pub(crate) fn new() -> Self {
        MeasurementConfig {
            assumed_jaw_width_mm: 140.0,
            expected_landmark_count: 478,
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub landmark_provider: FaceMeshConfig,
    pub measurement: MeasurementConfig,
}

impl AppConfig {
    /// from_file loads a JSON configuration. Missing sections keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::msg(format!("failed to read config {}: {}", path.as_ref().display(), e)))?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| Error::msg(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.server.max_upload_bytes == 0 {
            return Err(Error::msg("server.max_upload_bytes must be greater than 0"))
        }
        if self.landmark_provider.timeout <= 0 {
            return Err(Error::msg("landmark_provider.timeout must be greater than 0"))
        }
        if self.landmark_provider.max_concurrent_requests == 0 {
            return Err(Error::msg("landmark_provider.max_concurrent_requests must be greater than 0"))
        }
        if self.landmark_provider.max_faces == 0 {
            return Err(Error::msg("landmark_provider.max_faces must be greater than 0"))
        }
        if !(self.measurement.assumed_jaw_width_mm > 0.0) {
            return Err(Error::msg("measurement.assumed_jaw_width_mm must be greater than 0"))
        }
        if self.measurement.expected_landmark_count == 0 {
            return Err(Error::msg("measurement.expected_landmark_count must be greater than 0"))
        }
        Ok(())
    }
}
