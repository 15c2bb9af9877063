//! Caller-owned handle around a person-segmentation backend.
//!
//! Each [`SegmentationSession`] owns its backend and load state, so several
//! sessions can run side by side without sharing a model.

use image::RgbaImage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::{info, warn};

use crate::{
    error::{ContourError, Result},
    grid::ClassificationGrid,
    traits::SegmentationBackend,
};

#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationArchitecture {
    #[default]
    #[strum(serialize = "mobilenet")]
    MobileNetV1,
    #[strum(serialize = "resnet")]
    ResNet50,
}

impl SegmentationArchitecture {
    pub fn from_id(id: &str) -> Result<Self> {
        id.parse().map_err(|_| ContourError::UnknownModel(id.to_string()))
    }

    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn available() -> Vec<Self> {
        Self::iter().collect()
    }

    pub fn config(self) -> SegmentationModelConfig {
        match self {
            Self::MobileNetV1 => SegmentationModelConfig {
                architecture: self,
                output_stride: 16,
                multiplier: Some(0.75),
                quant_bytes: 2,
            },
            Self::ResNet50 => SegmentationModelConfig {
                architecture: self,
                output_stride: 32,
                multiplier: None,
                quant_bytes: 2,
            },
        }
    }
}

/// Load parameters handed to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentationModelConfig {
    pub architecture: SegmentationArchitecture,
    pub output_stride: u32,
    pub multiplier: Option<f32>,
    pub quant_bytes: u32,
}

#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InternalResolution {
    Low,
    #[default]
    Medium,
    High,
    Full,
}

/// Per-call inference options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentOptions {
    pub flip_horizontal: bool,
    pub internal_resolution: InternalResolution,
    #[schemars(range(min = 0.0, max = 1.0))]
    pub segmentation_threshold: f32,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            flip_horizontal: false,
            internal_resolution: InternalResolution::Medium,
            segmentation_threshold: 0.5,
        }
    }
}

pub struct SegmentationSession<B: SegmentationBackend> {
    backend: B,
    loaded: Option<SegmentationModelConfig>,
    options: SegmentOptions,
}

impl<B: SegmentationBackend> SegmentationSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            loaded: None,
            options: SegmentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SegmentOptions) -> Self {
        self.options = options;
        self
    }

    /// Load `architecture`, unloading any different model first. Loading the
    /// architecture that is already loaded does nothing.
    pub fn load(&mut self, architecture: SegmentationArchitecture) -> Result<&SegmentationModelConfig> {
        if self.loaded.is_some_and(|c| c.architecture == architecture) {
            return self.loaded.as_ref().ok_or(ContourError::ModelNotLoaded);
        }
        if self.loaded.is_some() {
            self.unload();
        }

        let config = architecture.config();
        info!(model = architecture.id(), "loading segmentation model");
        self.backend.load(&config).inspect_err(|e| {
            warn!(model = architecture.id(), error = %e, "failed to load segmentation model");
        })?;
        info!(model = architecture.id(), "segmentation model loaded");

        Ok(&*self.loaded.insert(config))
    }

    /// Segment a frame, loading the default architecture first if nothing is loaded.
    pub fn segment(&mut self, frame: &RgbaImage) -> Result<ClassificationGrid> {
        if self.loaded.is_none() {
            self.load(SegmentationArchitecture::default())?;
        }
        self.backend.segment(frame, &self.options)
    }

    /// Release the backend's model. Safe to call when nothing is loaded.
    pub fn unload(&mut self) {
        if let Some(config) = self.loaded.take() {
            self.backend.unload();
            info!(model = config.architecture.id(), "segmentation model unloaded");
        }
    }

    pub fn current_config(&self) -> Option<&SegmentationModelConfig> {
        self.loaded.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: SegmentationBackend> Drop for SegmentationSession<B> {
    fn drop(&mut self) {
        self.unload();
    }
}
