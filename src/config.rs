//! Engine configuration.
//!
//! Every field has a default matching the stock try-on page, so an empty JSON object is a valid
//! config. A couple of runtime knobs can be overridden from the environment.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{TryOnError, TryOnResult};
use crate::placement::state::PlacementState;
use crate::transform::geometry::SizingRules;

/// Environment variable overriding [`EngineConfig::render_threads`].
pub const ENV_RENDER_THREADS: &str = "TRYON_RENDER_THREADS";
/// Environment variable overriding [`EngineConfig::auto_position_on_load`].
pub const ENV_AUTO_POSITION: &str = "TRYON_AUTO_POSITION";

/// Step sizes used by the button/keyboard controls.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ControlSteps {
    /// Arrow nudge, in percentage points.
    pub nudge_step_pct: f64,
    /// Zoom in/out step added to `scale`.
    pub scale_step: f64,
    /// Rotate step in radians.
    pub rotation_step_rad: f64,
    /// Lower clamp applied by every scale mutation.
    pub min_scale: f64,
}

impl Default for ControlSteps {
    fn default() -> Self {
        Self {
            nudge_step_pct: 2.0,
            scale_step: 0.2,
            rotation_step_rad: 0.1,
            min_scale: PlacementState::MIN_SCALE,
        }
    }
}

impl ControlSteps {
    /// Reject non-finite steps and a non-positive scale floor.
    pub fn validate(&self) -> TryOnResult<()> {
        for (v, what) in [
            (self.nudge_step_pct, "controls nudge_step_pct"),
            (self.scale_step, "controls scale_step"),
            (self.rotation_step_rad, "controls rotation_step_rad"),
            (self.min_scale, "controls min_scale"),
        ] {
            if !v.is_finite() {
                return Err(TryOnError::config(format!("{what} must be finite")));
            }
        }
        if self.min_scale <= 0.0 {
            return Err(TryOnError::config("controls min_scale must be > 0"));
        }
        Ok(())
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Overlay sizing rule shared by preview and export.
    pub sizing: SizingRules,
    /// Control step sizes.
    pub controls: ControlSteps,
    /// Ask the placement source for a pose whenever a photo is loaded.
    pub auto_position_on_load: bool,
    /// Pose used on load when auto-positioning is off.
    pub default_placement: PlacementState,
    /// Compositor worker threads. `None` uses rayon defaults.
    pub render_threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sizing: SizingRules::default(),
            controls: ControlSteps::default(),
            auto_position_on_load: true,
            default_placement: PlacementState::default(),
            render_threads: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> TryOnResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| TryOnError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> TryOnResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Apply `TRYON_RENDER_THREADS` / `TRYON_AUTO_POSITION` when set.
    pub fn with_env_overrides(self) -> TryOnResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> TryOnResult<Self> {
        if let Some(v) = lookup(ENV_RENDER_THREADS) {
            let n = v.trim().parse::<usize>().map_err(|_| {
                TryOnError::config(format!("{ENV_RENDER_THREADS} must be an integer (got '{v}')"))
            })?;
            self.render_threads = Some(n);
        }
        if let Some(v) = lookup(ENV_AUTO_POSITION) {
            self.auto_position_on_load = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(TryOnError::config(format!(
                        "{ENV_AUTO_POSITION} must be a boolean (got '{v}')"
                    )));
                }
            };
        }
        self.validate()?;
        Ok(self)
    }

    /// Check all nested sections.
    pub fn validate(&self) -> TryOnResult<()> {
        self.sizing.validate()?;
        self.controls.validate()?;
        self.default_placement
            .validate()
            .map_err(|e| TryOnError::config(format!("default_placement: {e}")))?;
        if self.default_placement.scale < self.controls.min_scale {
            return Err(TryOnError::config(
                "default_placement scale must be >= controls min_scale",
            ));
        }
        if self.render_threads == Some(0) {
            return Err(TryOnError::config("render_threads must be >= 1 when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
