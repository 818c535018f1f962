use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;

/// Orbit constants for one tier of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Orbit radius of the first sibling.
    pub base_radius: f64,
    /// Radius added per sibling index.
    pub radius_step: f64,
    /// Orbital period (seconds) of the first sibling before jitter.
    pub base_period: f64,
    /// Period added per sibling index.
    pub period_step: f64,
    /// Lower bound on the period after jitter.
    pub period_floor: f64,
    /// Full width of the id-derived period perturbation.
    pub jitter_range: f64,
    /// Half the rendered icon size of a body on this tier.
    pub icon_half_size: f64,
    /// Flip the even/odd direction rule for this tier.
    #[serde(default)]
    pub counter_rotate: bool,
}

impl TierConfig {
    pub const PLANET: Self = Self {
        base_radius: 180.0,
        radius_step: 120.0,
        base_period: 18.0,
        period_step: 6.0,
        period_floor: 8.0,
        jitter_range: 4.0,
        icon_half_size: 30.0,
        counter_rotate: false,
    };

    pub const MOON: Self = Self {
        base_radius: 64.0,
        radius_step: 32.0,
        base_period: 6.0,
        period_step: 2.0,
        period_floor: 3.0,
        jitter_range: 1.4,
        icon_half_size: 20.0,
        counter_rotate: false,
    };

    fn validate(&self) -> Result<(), ConfigError> {
        positive("base_radius", self.base_radius)?;
        positive("radius_step", self.radius_step)?;
        finite("base_period", self.base_period)?;
        finite("period_step", self.period_step)?;
        positive("period_floor", self.period_floor)?;
        non_negative("jitter_range", self.jitter_range)?;
        non_negative("icon_half_size", self.icon_half_size)?;
        Ok(())
    }
}

/// Layout constants shared by orbit evaluation and extent estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub planet: TierConfig,
    pub moon: TierConfig,
    /// Half the rendered size of a system's star icon.
    pub star_icon_half_size: f64,
    /// Clearance added around every system extent.
    pub margin: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            planet: TierConfig::PLANET,
            moon: TierConfig::MOON,
            star_icon_half_size: 64.0,
            margin: 32.0,
        }
    }
}

/// Bounds for one view's pan/zoom state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// World-space rectangle `[min, max]` the visible area must stay inside.
    /// `None` leaves panning unbounded.
    #[serde(default)]
    pub translate_extent: Option<[[f64; 2]; 2]>,
}

impl ViewportConfig {
    /// Full star map: wide zoom range, free panning.
    pub fn map() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 5.0,
            translate_extent: None,
        }
    }

    /// Single-system preview: 900x600 view with a margin to pan into.
    pub fn preview() -> Self {
        Self {
            min_scale: 0.7,
            max_scale: 2.5,
            translate_extent: Some([[-200.0, -150.0], [1100.0, 750.0]]),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("min_scale", self.min_scale)?;
        positive("max_scale", self.max_scale)?;
        if self.min_scale > self.max_scale {
            return Err(ConfigError::InvertedScale {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if let Some([min, max]) = self.translate_extent {
            for v in min.iter().chain(max.iter()) {
                finite("translate_extent", *v)?;
            }
            if min[0] > max[0] || min[1] > max[1] {
                return Err(ConfigError::InvertedExtent { min, max });
            }
        }
        Ok(())
    }
}

/// Overlap resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub max_iterations: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { max_iterations: 8 }
    }
}

/// Configuration for the engine, supplied once by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub orbit: OrbitConfig,
    pub resolver: ResolverConfig,
    pub map_view: ViewportConfig,
    pub preview_view: ViewportConfig,
    /// Clock multiplier for the star map.
    pub map_time_scale: f64,
    /// Clock multiplier for the single-system preview.
    pub preview_time_scale: f64,
    /// Where new systems land before the viewport has been sized.
    pub fallback_center: [f64; 2],
    /// Size of the preview's fixed view box.
    pub preview_size: [f64; 2],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            orbit: OrbitConfig::default(),
            resolver: ResolverConfig::default(),
            map_view: ViewportConfig::map(),
            preview_view: ViewportConfig::preview(),
            map_time_scale: 1.0,
            preview_time_scale: 0.5,
            fallback_center: [480.0, 380.0],
            preview_size: [900.0, 600.0],
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would produce NaN or degenerate layouts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orbit.planet.validate()?;
        self.orbit.moon.validate()?;
        non_negative("star_icon_half_size", self.orbit.star_icon_half_size)?;
        non_negative("margin", self.orbit.margin)?;
        if self.resolver.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        self.map_view.validate()?;
        self.preview_view.validate()?;
        positive("map_time_scale", self.map_time_scale)?;
        positive("preview_time_scale", self.preview_time_scale)?;
        finite("fallback_center", self.fallback_center[0])?;
        finite("fallback_center", self.fallback_center[1])?;
        positive("preview_size", self.preview_size[0])?;
        positive("preview_size", self.preview_size[1])?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
