//! Engine configuration.
//!
//! Loaded from YAML; every field has a default so a partial file (or none)
//! is valid.
//!
//! ```yaml
//! api_base_url: http://localhost:8000
//! depth: 2
//! canvas_width: 800
//! canvas_height: 600
//! layout:
//!   iterations: 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::api::{GraphQuery, DEFAULT_DEPTH};
use crate::error::ConfigError;
use crate::graph::{ForceConfig, RenderStyle};

/// Environment variable holding the graph service base URL
pub const API_URL_ENV: &str = "TKG_GRAPH_API_URL";

/// Configuration for [`GraphEngine`](crate::graph::GraphEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Graph service base URL; `None` means always use the synthetic graph
    pub api_base_url: Option<String>,
    /// Traversal depth sent with every query
    pub depth: u32,
    pub include_services: bool,
    pub include_events: bool,
    pub include_dependencies: bool,
    /// Logical drawing surface, independent of on-screen size
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Layout constants. `layout.center` is derived from the canvas size.
    pub layout: ForceConfig,
    /// Renderer sizes. `style.surface_size` is derived from the canvas size.
    pub style: RenderStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let layout = ForceConfig::default();
        let style = RenderStyle::default();
        Self {
            api_base_url: None,
            depth: DEFAULT_DEPTH,
            include_services: true,
            include_events: true,
            include_dependencies: true,
            canvas_width: style.surface_size.x,
            canvas_height: style.surface_size.y,
            layout,
            style,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validated()
    }

    /// Read and validate a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "loading engine config");
        Self::from_yaml_str(&text)
    }

    /// Defaults, with the API URL taken from the environment when set
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var(API_URL_ENV)
                .ok()
                .filter(|url| !url.trim().is_empty()),
            ..Self::default()
        }
    }

    /// Check ranges and derive dependent values (layout centre, surface size)
    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.layout.iterations == 0 {
            return Err(ConfigError::Invalid(
                "layout.iterations must be at least 1".into(),
            ));
        }
        if !(self.layout.min_distance > 0.0) {
            return Err(ConfigError::Invalid(
                "layout.min_distance must be positive".into(),
            ));
        }
        if self.depth == 0 {
            return Err(ConfigError::Invalid("depth must be at least 1".into()));
        }

        Ok(self.resolved())
    }

    /// Copy the canvas size into the layout centre and the render surface.
    ///
    /// The canvas size is the only source for both; any value already in
    /// `layout.center` or `style.surface_size` is replaced.
    pub fn resolved(mut self) -> Self {
        self.layout.center = egui::Pos2::new(self.canvas_width / 2.0, self.canvas_height / 2.0);
        self.style.surface_size = egui::Vec2::new(self.canvas_width, self.canvas_height);
        self
    }

    /// Query for `root` with this config's depth and include flags
    pub fn query_for(&self, root: &str) -> GraphQuery {
        GraphQuery {
            root: root.to_string(),
            depth: self.depth,
            include_services: self.include_services,
            include_events: self.include_events,
            include_dependencies: self.include_dependencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default().validated().unwrap());
        assert_eq!(config.layout.center, egui::Pos2::new(400.0, 300.0));
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
api_base_url: http://localhost:8000
canvas_width: 1000
canvas_height: 500
include_events: false
layout:
  iterations: 50
"#;
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.layout.iterations, 50);
        assert_eq!(config.layout.repulsion, ForceConfig::default().repulsion);
        assert_eq!(config.layout.center, egui::Pos2::new(500.0, 250.0));
        assert_eq!(config.style.surface_size, egui::Vec2::new(1000.0, 500.0));

        let query = config.query_for("svc-a");
        assert!(!query.include_events);
        assert!(query.include_services);
        assert_eq!(query.depth, 2);
    }

    #[test]
    fn test_center_follows_canvas_size() {
        let yaml = "canvas_width: 600\ncanvas_height: 600\nlayout:\n  center: {x: 10.0, y: 10.0}";
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.layout.center, egui::Pos2::new(300.0, 300.0));

        let literal = EngineConfig {
            canvas_width: 1000.0,
            canvas_height: 400.0,
            ..EngineConfig::default()
        }
        .resolved();
        assert_eq!(literal.layout.center, egui::Pos2::new(500.0, 200.0));
        assert_eq!(literal.style.surface_size, egui::Vec2::new(1000.0, 400.0));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            EngineConfig::from_yaml_str("canvas_width: 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_yaml_str("layout:\n  iterations: 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_yaml_str("depth: [1, 2]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = EngineConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            EngineConfig::load("/nonexistent/graph-view.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
