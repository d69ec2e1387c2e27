use std::time::Duration;

use foundation::math::{BASE_PROJECTION_SCALE, ProjectionParams, TARGET_PLOTTING_AREA_M2};
use layers::ExtrudeConfig;
use scene::components::Color;
use serde::Deserialize;

use crate::source::DatasetRef;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Total dataset area (m²) that renders at `base_scale`.
    pub target_plotting_area: f64,
    /// Planar units per radian of longitude at scale factor 1.
    pub base_scale: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            target_plotting_area: TARGET_PLOTTING_AREA_M2,
            base_scale: BASE_PROJECTION_SCALE,
        }
    }
}

impl ProjectionConfig {
    pub fn params(&self) -> ProjectionParams {
        ProjectionParams {
            target_plotting_area: self.target_plotting_area,
            base_scale: self.base_scale,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub volume_color: Color,
    pub volume_emissive: Color,
    pub highlight_color: Color,
    pub top_border_color: Color,
    pub base_border_color: Color,
    /// Height of label anchors above the top face.
    pub label_lift: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            volume_color: Color(0x2a3556),
            volume_emissive: Color::BLACK,
            highlight_color: Color(0xff0000),
            top_border_color: Color(0x438cef),
            base_border_color: Color(0x36b9bc),
            label_lift: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub projection: ProjectionConfig,
    pub extrude: ExtrudeConfig,
    pub style: StyleConfig,
    /// Location of a dataset; `{dataset}` is replaced by the dataset reference.
    pub dataset_url_template: String,
    pub fetch_timeout_ms: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionConfig::default(),
            extrude: ExtrudeConfig::default(),
            style: StyleConfig::default(),
            dataset_url_template: "{dataset}.json".to_string(),
            fetch_timeout_ms: 10_000,
        }
    }
}

impl MapConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn dataset_location(&self, dataset: &DatasetRef) -> String {
        self.dataset_url_template.replace("{dataset}", dataset.as_str())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Elevation of label anchors.
    pub fn label_elevation(&self) -> f64 {
        self.extrude.top_elevation() + self.style.label_lift
    }
}

#[cfg(test)]
mod tests {
    use super::MapConfig;
    use crate::source::DatasetRef;
    use pretty_assertions::assert_eq;
    use scene::components::Color;

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = MapConfig::from_json_str("{}").expect("config");
        assert_eq!(cfg, MapConfig::default());
        assert_eq!(cfg.fetch_timeout().as_millis(), 10_000);
        assert!((cfg.label_elevation() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn partial_overrides_keep_sibling_defaults() {
        let cfg = MapConfig::from_json_str(
            r##"{
                "style": { "highlight_color": "#00ff00" },
                "extrude": { "depth": 2.0 },
                "dataset_url_template": "https://example.test/areas/{dataset}.json"
            }"##,
        )
        .expect("config");
        assert_eq!(cfg.style.highlight_color, Color(0x00ff00));
        assert_eq!(cfg.style.volume_color, Color(0x2a3556));
        assert_eq!(cfg.extrude.depth, 2.0);
        assert_eq!(
            cfg.dataset_location(&DatasetRef::from("100000_full")),
            "https://example.test/areas/100000_full.json"
        );
    }

    #[test]
    fn bad_color_is_rejected() {
        assert!(MapConfig::from_json_str(r#"{"style": {"volume_color": "navy"}}"#).is_err());
    }
}
