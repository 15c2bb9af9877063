use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EditorCommand {
    /// Restore the base image and paint the boundary overlay
    RenderMask {
        color: String,
        #[schemars(range(min = 0.0, max = 1.0))]
        opacity: f32,
        width: u32,
    },

    /// Resample draggable control points from the grid
    ExtractControlPoints {
        #[schemars(range(min = 1))]
        stride: u32,
    },

    /// Paint control-point markers onto the current surface
    RenderControlPointMarkers { radius: u32 },

    /// Full recompute: base image, boundary overlay, markers
    Redraw,

    /// Recompute without markers
    HideControlPointMarkers,
}

impl EditorCommand {
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(EditorCommand)
    }

    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::RenderMask { .. } => "Restore the base image and paint the boundary overlay with the given colour and opacity",
            Self::ExtractControlPoints { .. } => "Sample boundary cells at a fixed grid stride as draggable control points",
            Self::RenderControlPointMarkers { .. } => "Draw control-point markers onto the current surface",
            Self::Redraw => "Recompose base image, boundary overlay and control-point markers",
            Self::HideControlPointMarkers => "Recompose base image and boundary overlay without markers",
        }
    }
}
