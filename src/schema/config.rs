//! Configuration types for the fluid solver.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Relaxation coefficient above which diffusion is considered stiff.
///
/// Past this point `a` dominates `c = 1 + 6a` and four sweeps no longer damp
/// the solve well.
pub const STIFF_COEFFICIENT: f32 = 50.0;

/// Update order used by the relaxation sweeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationOrder {
    /// Row-major in-place sweep. Each cell reads neighbours already updated
    /// earlier in the same sweep.
    #[default]
    Sequential,
    /// Even-parity cells first, then odd-parity cells. Rows of one colour are
    /// independent, so they are updated in parallel on native targets.
    RedBlack,
}

/// Top-level solver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidConfig {
    /// Grid side length in cells, boundary ring included.
    pub size: usize,
    /// Time step per tick.
    pub dt: f32,
    /// Dye diffusion rate.
    pub diffusion: f32,
    /// Kinematic viscosity.
    pub viscosity: f32,
    /// Sweep order for the relaxation solver.
    #[serde(default)]
    pub relaxation: RelaxationOrder,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            size: 64,
            dt: 0.1,
            diffusion: 0.0001,
            viscosity: 0.0001,
            relaxation: RelaxationOrder::Sequential,
        }
    }
}

impl FluidConfig {
    /// Config with the given parameters and the default relaxation order.
    pub fn new(size: usize, dt: f32, diffusion: f32, viscosity: f32) -> Self {
        Self {
            size,
            dt,
            diffusion,
            viscosity,
            relaxation: RelaxationOrder::default(),
        }
    }

    /// Total cell count (size * size).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Implicit diffusion coefficient `a = dt * rate * (N - 2)^2`.
    #[inline]
    pub fn relaxation_coefficient(&self, rate: f32) -> f32 {
        let interior = self.size.saturating_sub(2) as f32;
        self.dt * rate * interior * interior
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FluidConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < 3 {
            return Err(ConfigError::GridTooSmall { size: self.size });
        }
        if self.size.checked_mul(self.size).is_none() {
            return Err(ConfigError::GridTooLarge { size: self.size });
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        validate_rate("diffusion", self.diffusion)?;
        validate_rate("viscosity", self.viscosity)?;
        Ok(())
    }

    /// Log a warning for each rate whose coefficient exceeds [`STIFF_COEFFICIENT`].
    pub fn warn_if_stiff(&self) {
        for (name, rate) in [("diffusion", self.diffusion), ("viscosity", self.viscosity)] {
            let a = self.relaxation_coefficient(rate);
            if a > STIFF_COEFFICIENT {
                log::warn!(
                    "{} coefficient {:.3} exceeds {}: large dt/{} relative to grid resolution \
                     risks growing oscillations",
                    name,
                    a,
                    STIFF_COEFFICIENT,
                    name
                );
            }
        }
    }
}

/// Check a diffusion-like rate is finite and non-negative.
pub fn validate_rate(name: &'static str, rate: f32) -> Result<(), ConfigError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(ConfigError::InvalidRate { name, value: rate });
    }
    Ok(())
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid size {size} leaves no interior cells (minimum is 3)")]
    GridTooSmall { size: usize },
    #[error("Grid size {size} overflows the cell count")]
    GridTooLarge { size: usize },
    #[error("Time step must be positive and finite, got {0}")]
    InvalidTimeStep(f32),
    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidRate { name: &'static str, value: f32 },
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        assert!(FluidConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let config = FluidConfig::new(2, 0.1, 0.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooSmall { size: 2 })
        ));
    }

    #[test]
    fn test_rejects_overflowing_grid() {
        let config = FluidConfig::new(usize::MAX, 0.1, 0.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { size: usize::MAX })
        ));

        let json = format!(r#"{{"size": {}, "dt": 0.1, "diffusion": 0.0, "viscosity": 0.0}}"#, u64::MAX);
        assert!(matches!(
            FluidConfig::from_json(&json),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_time_step() {
        for dt in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            let config = FluidConfig::new(16, dt, 0.0, 0.0);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidTimeStep(_))),
                "dt {} should be rejected",
                dt
            );
        }
    }

    #[test]
    fn test_rejects_negative_rates() {
        let config = FluidConfig::new(16, 0.1, -1.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRate { name: "diffusion", .. })
        ));

        let config = FluidConfig::new(16, 0.1, 0.0, -1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRate { name: "viscosity", .. })
        ));
    }

    #[test]
    fn test_relaxation_coefficient() {
        let config = FluidConfig::new(12, 0.5, 0.0, 0.0);
        // 0.5 * 0.2 * 10^2
        assert!((config.relaxation_coefficient(0.2) - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_relaxation_order_defaults_to_sequential() {
        let config = FluidConfig::from_json(
            r#"{"size": 32, "dt": 0.1, "diffusion": 0.0, "viscosity": 0.0}"#,
        )
        .unwrap();
        assert_eq!(config.relaxation, RelaxationOrder::Sequential);

        let config = FluidConfig::from_json(
            r#"{"size": 32, "dt": 0.1, "diffusion": 0.0, "viscosity": 0.0, "relaxation": "red_black"}"#,
        )
        .unwrap();
        assert_eq!(config.relaxation, RelaxationOrder::RedBlack);
    }

    #[test]
    fn test_from_json_validates() {
        let result = FluidConfig::from_json(
            r#"{"size": 1, "dt": 0.1, "diffusion": 0.0, "viscosity": 0.0}"#,
        );
        assert!(matches!(result, Err(ConfigError::GridTooSmall { .. })));

        let result = FluidConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        let config = FluidConfig::new(48, 0.05, 0.001, 0.002);
        write!(file, "{}", serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = FluidConfig::load(file.path()).unwrap();
        assert_eq!(loaded.size, 48);
        assert!((loaded.dt - 0.05).abs() < 1e-7);
        assert!((loaded.diffusion - 0.001).abs() < 1e-7);
        assert!((loaded.viscosity - 0.002).abs() < 1e-7);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FluidConfig::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
