use std::path::Path;

use anyhow::{Context, Result};
use graft_core::{Limits, ProjectionConvention, ViewKind};
use serde::{Deserialize, Serialize};
use template_core::SheetOptions;

/// Optional `graft-template.toml`. Every section may be omitted.
///
/// ```toml
/// [limits]
/// diameters_mm = [20, 24, 28, 32, 36]
/// length_mm = { min = 80, max = 200 }
///
/// [render]
/// px_per_mm = 4.0
/// view = "flat_template"
///
/// [convention]
/// template_origin = "bottom"
/// unwrap = { kind = "half_wrap" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub limits: Limits,
    pub render: RenderConfig,
    pub sheet: SheetOptions,
    pub convention: ProjectionConvention,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Raster resolution for PNG output.
    pub px_per_mm: f64,
    pub view: ViewKind,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            px_per_mm: 4.0,
            view: ViewKind::FlatTemplate,
        }
    }
}

impl TemplateConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.render.px_per_mm.is_finite() && self.render.px_per_mm > 0.0,
            "render.px_per_mm must be positive, got {}",
            self.render.px_per_mm
        );
        anyhow::ensure!(
            !self.limits.diameters_mm.is_empty(),
            "limits.diameters_mm must list at least one diameter"
        );
        anyhow::ensure!(
            self.limits.length_mm.min <= self.limits.length_mm.max,
            "limits.length_mm has min above max"
        );
        anyhow::ensure!(
            self.limits.fenestration_diameter_mm.min <= self.limits.fenestration_diameter_mm.max,
            "limits.fenestration_diameter_mm has min above max"
        );
        anyhow::ensure!(
            self.sheet.length_tick_mm >= 1.0,
            "sheet.length_tick_mm must be at least 1 mm, got {}",
            self.sheet.length_tick_mm
        );
        anyhow::ensure!(
            self.sheet.margin_mm.is_finite() && self.sheet.margin_mm >= 0.0,
            "sheet.margin_mm must not be negative, got {}",
            self.sheet.margin_mm
        );
        anyhow::ensure!(
            self.sheet.scale_bar_mm.is_finite() && self.sheet.scale_bar_mm >= 0.0,
            "sheet.scale_bar_mm must not be negative, got {}",
            self.sheet.scale_bar_mm
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_core::{ClockPosition, UnwrapConvention, VerticalOrigin};

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = TemplateConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, TemplateConfig::default());
        assert_eq!(cfg.limits.numbered_tags, 4);
    }

    #[test]
    fn reads_partial_sections() {
        let cfg = TemplateConfig::from_toml_str(
            r#"
            [limits]
            diameters_mm = [22.0, 26.0]

            [render]
            view = "cylindrical_view"

            [sheet]
            margin_mm = 5.0

            [convention]
            template_origin = "bottom"
            unwrap = { kind = "full_wrap", reference = 12 }
            "#,
        )
        .unwrap();
        assert_eq!(cfg.limits.diameters_mm, [22.0, 26.0]);
        assert_eq!(cfg.limits.length_mm, Limits::default().length_mm);
        assert_eq!(cfg.render.view, ViewKind::CylindricalView);
        assert_eq!(cfg.render.px_per_mm, 4.0);
        assert_eq!(cfg.sheet.margin_mm, 5.0);
        assert_eq!(cfg.convention.template_origin, VerticalOrigin::Bottom);
        assert_eq!(
            cfg.convention.unwrap,
            UnwrapConvention::FullWrap {
                reference: ClockPosition::TWELVE
            }
        );
    }

    #[test]
    fn demo_config_parses() {
        let cfg = TemplateConfig::from_toml_str(include_str!("../../demos/graft-template.toml"))
            .unwrap();
        assert_eq!(cfg.limits, Limits::default());
        assert_eq!(cfg.convention, ProjectionConvention::default());
        assert_eq!(cfg.render.px_per_mm, 8.0);
        assert_eq!(cfg.sheet.margin_mm, 12.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(TemplateConfig::from_toml_str("[render]\npx_per_mm = 0.0").is_err());
        let bad_clock = "[convention]\nunwrap = { kind = \"full_wrap\", reference = 13 }";
        assert!(TemplateConfig::from_toml_str(bad_clock).is_err());
    }

    #[test]
    fn rejects_unusable_sheet_layout() {
        assert!(TemplateConfig::from_toml_str("[sheet]\nlength_tick_mm = 0.001").is_err());
        assert!(TemplateConfig::from_toml_str("[sheet]\nmargin_mm = -5.0").is_err());
        assert!(TemplateConfig::from_toml_str("[sheet]\nscale_bar_mm = -1.0").is_err());
        assert!(TemplateConfig::from_toml_str("[sheet]\nlength_tick_mm = 5.0").is_ok());
    }
}
