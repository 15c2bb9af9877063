use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    algorithms::sampler::DEFAULT_SAMPLE_STRIDE,
    color::ColorSpec,
    error::Result,
    interaction::DEFAULT_HIT_THRESHOLD,
    types::{MarkerStyle, RenderStyle},
};

/// Editor session settings. Every field has a default, so partial JSON
/// documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EditorConfig {
    /// Boundary colour as six hex digits, `#` optional.
    pub contour_color: String,
    #[schemars(range(min = 0.0, max = 1.0))]
    pub contour_opacity: f32,
    pub contour_width: u32,
    /// Grid step between sampled control points.
    #[schemars(range(min = 1))]
    pub sample_stride: u32,
    /// Maximum pointer distance, in display units, for grabbing a point.
    pub hit_threshold: f32,
    pub marker_radius: u32,
    pub marker_color: String,
    #[schemars(range(min = 0.0, max = 1.0))]
    pub marker_opacity: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            contour_color: "#00FF00".to_string(),
            contour_opacity: 0.5,
            contour_width: 3,
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            hit_threshold: DEFAULT_HIT_THRESHOLD,
            marker_radius: 5,
            marker_color: "#FF0000".to_string(),
            marker_opacity: 0.8,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(EditorConfig)
    }

    pub fn render_style(&self) -> RenderStyle {
        RenderStyle::new(&self.contour_color, self.contour_opacity, self.contour_width)
    }

    pub fn marker_style(&self) -> MarkerStyle {
        MarkerStyle {
            color: ColorSpec::from_hex_or_default(&self.marker_color),
            opacity: self.marker_opacity,
            radius: self.marker_radius,
        }
    }

    pub fn stride(&self) -> u32 {
        self.sample_stride.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.render_style().color, ColorSpec::new(0, 255, 0));
        assert_eq!(config.render_style().alpha(), 127);
        assert_eq!(config.marker_style().alpha(), 204);
        assert_eq!(config.stride(), 5);
        assert_eq!(config.hit_threshold, 15.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json_str(r##"{ "contour_color": "#0000ff", "sample_stride": 0 }"##).unwrap();
        assert_eq!(config.render_style().color, ColorSpec::new(0, 0, 255));
        assert_eq!(config.stride(), 1);
        assert_eq!(config.marker_radius, 5);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(EditorConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("contour-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "hit_threshold": 20.0 }"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.hit_threshold, 20.0);
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = serde_json::to_value(EditorConfig::schema()).unwrap();
        let properties = &schema["properties"];
        assert!(properties.get("contour_color").is_some());
        assert!(properties.get("sample_stride").is_some());
    }
}
