// Simulator Configuration

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::info;
use serde::Deserialize;

use crate::ss_error::SimError;
use crate::ss_source::DurationModel;

// ============================================================================
// Main Configuration
// ============================================================================

/// Main simulation configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Simulation horizon
    pub total_time: f64,

    /// Number of ON/OFF sources
    pub num_sources: usize,

    /// Load contributed by a source while ON
    pub on_rate: f64,

    /// Pareto shape/scale of ON sojourns
    pub alpha_on: f64,
    pub xm_on: f64,

    /// Pareto shape/scale of OFF sojourns
    pub alpha_off: f64,
    pub xm_off: f64,

    pub model: TrafficModelType,

    /// Target Hurst exponent, used by the FGN model
    pub hurst: f64,

    /// Seed basis; source `i` is seeded with `seed + i`
    pub seed: u64,

    pub queue: QueueConfig,

    /// How aggregate-rate samples for Hurst estimation are taken
    pub sampling: SamplingMode,

    pub output: OutputConfig,
}

/// Traffic model selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrafficModelType {
    #[default]
    Pareto,
    FractionalGaussianNoise,
}

/// Congestion model parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueConfig {
    pub capacity: f64,
    pub service_rate: f64,
}

/// Rate sampling for the Hurst estimator input
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SamplingMode {
    /// One sample after every processed source event
    #[default]
    PerEvent,

    /// One sample every `dt` time units, driven by TICK events
    Interval(f64),
}

/// Output configuration
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Echo every processed event through the logger
    pub enable_event_logging: bool,
    pub events_csv: Option<String>,
    pub time_series_csv: Option<String>,
    pub summary_csv: Option<String>,
}

// ============================================================================
// Default Configurations
// ============================================================================

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            total_time: 10_000.0,
            num_sources: 50,
            on_rate: 1.0,
            alpha_on: 1.4,
            xm_on: 1.0,
            alpha_off: 1.2,
            xm_off: 1.0,
            model: TrafficModelType::Pareto,
            hurst: 0.8,
            seed: 1234,
            queue: QueueConfig::default(),
            sampling: SamplingMode::PerEvent,
            output: OutputConfig::default(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 100.0,
            service_rate: 20.0,
        }
    }
}

// ============================================================================
// Model Selector Parsing
// ============================================================================

impl FromStr for TrafficModelType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pareto" => Ok(TrafficModelType::Pareto),
            "fgn" | "fractional_gaussian_noise" | "fractional" => {
                Ok(TrafficModelType::FractionalGaussianNoise)
            }
            other => Err(SimError::UnknownModel(other.to_string())),
        }
    }
}

impl fmt::Display for TrafficModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficModelType::Pareto => f.write_str("PARETO"),
            TrafficModelType::FractionalGaussianNoise => f.write_str("FRACTIONAL_GAUSSIAN_NOISE"),
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SimulatorConfig {
    /// Check every bound; the first violation is returned
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.total_time > 0.0) || !self.total_time.is_finite() {
            return Err(SimError::invalid(
                "total_time",
                format!("must be finite and > 0, got {}", self.total_time),
            ));
        }
        if self.num_sources < 1 {
            return Err(SimError::invalid("num_sources", "must be >= 1"));
        }
        if !(self.on_rate >= 0.0) || !self.on_rate.is_finite() {
            return Err(SimError::invalid(
                "on_rate",
                format!("must be finite and >= 0, got {}", self.on_rate),
            ));
        }
        if !(self.alpha_on > 1.0) {
            return Err(SimError::invalid(
                "alpha_on",
                format!("must be > 1, got {}", self.alpha_on),
            ));
        }
        if !(self.alpha_off > 1.0) {
            return Err(SimError::invalid(
                "alpha_off",
                format!("must be > 1, got {}", self.alpha_off),
            ));
        }
        if !(self.xm_on > 0.0) {
            return Err(SimError::invalid(
                "xm_on",
                format!("must be > 0, got {}", self.xm_on),
            ));
        }
        if !(self.xm_off > 0.0) {
            return Err(SimError::invalid(
                "xm_off",
                format!("must be > 0, got {}", self.xm_off),
            ));
        }
        if !(self.hurst > 0.5 && self.hurst < 1.0) {
            return Err(SimError::invalid(
                "hurst",
                format!("must lie in (0.5, 1.0), got {}", self.hurst),
            ));
        }
        if !(self.queue.capacity >= 0.0) || !self.queue.capacity.is_finite() {
            return Err(SimError::invalid(
                "queue.capacity",
                format!("must be finite and >= 0, got {}", self.queue.capacity),
            ));
        }
        if !(self.queue.service_rate >= 0.0) || !self.queue.service_rate.is_finite() {
            return Err(SimError::invalid(
                "queue.service_rate",
                format!("must be finite and >= 0, got {}", self.queue.service_rate),
            ));
        }
        if let SamplingMode::Interval(dt) = self.sampling {
            if !(dt > 0.0) || !dt.is_finite() {
                return Err(SimError::invalid(
                    "sample_interval",
                    format!("must be finite and > 0, got {}", dt),
                ));
            }
        }
        Ok(())
    }

    /// Duration model shared by every source of this run
    pub fn duration_model(&self) -> Result<DurationModel, SimError> {
        match self.model {
            TrafficModelType::Pareto => {
                DurationModel::pareto(self.alpha_on, self.xm_on, self.alpha_off, self.xm_off)
            }
            TrafficModelType::FractionalGaussianNoise => {
                DurationModel::fgn(self.hurst, self.xm_on, self.xm_off)
            }
        }
    }

    /// Deterministic per-source seed
    pub fn source_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }

    /// Read, parse and validate a YAML scenario file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let scenario = ScenarioFile::load(path.as_ref())?;
        let config = scenario.into_config()?;
        info!("File {} parsed correctly", path.as_ref().display());
        config.log_parameters();
        Ok(config)
    }

    pub fn log_parameters(&self) {
        info!("model={}", self.model);
        info!("total_time={}", self.total_time);
        info!("num_sources={}", self.num_sources);
        info!("alpha_on={} xm_on={}", self.alpha_on, self.xm_on);
        info!("alpha_off={} xm_off={}", self.alpha_off, self.xm_off);
        info!("hurst={}", self.hurst);
    }
}

// ============================================================================
// Scenario Files
// ============================================================================

/// Scenario file format
#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    pub meta: ScenarioMeta,

    pub config: ScenarioConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScenarioMeta {
    pub name: Option<String>,
    pub description: Option<String>,
    pub hypothesis: Option<String>,
}

/// Raw configuration as written in the file
///
/// The model stays a string here so an unknown selector surfaces as
/// `SimError::UnknownModel` rather than a parse error.
#[derive(Debug, Deserialize)]
pub struct ScenarioConfig {
    #[serde(alias = "totalTime")]
    pub total_time: f64,

    #[serde(alias = "numSources")]
    pub num_sources: usize,

    #[serde(default = "default_on_rate", alias = "onRate")]
    pub on_rate: f64,

    #[serde(alias = "alphaOn")]
    pub alpha_on: f64,

    #[serde(alias = "xmOn")]
    pub xm_on: f64,

    #[serde(alias = "alphaOff")]
    pub alpha_off: f64,

    #[serde(alias = "xmOff")]
    pub xm_off: f64,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_hurst")]
    pub hurst: f64,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub queue: Option<QueueOverrides>,

    /// Switches rate sampling to fixed intervals
    #[serde(default)]
    pub sample_interval: Option<f64>,

    #[serde(default)]
    pub output: Option<OutputOverrides>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueueOverrides {
    pub capacity: Option<f64>,
    pub service_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputOverrides {
    pub enable_event_logging: Option<bool>,
    pub events_csv: Option<String>,
    pub time_series_csv: Option<String>,
    pub summary_csv: Option<String>,
}

fn default_on_rate() -> f64 {
    1.0
}

fn default_model() -> String {
    "pareto".to_string()
}

fn default_hurst() -> f64 {
    0.8
}

impl ScenarioFile {
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SimError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply the file on top of the defaults and validate the result
    pub fn into_config(self) -> Result<SimulatorConfig, SimError> {
        let raw = self.config;
        let mut config = SimulatorConfig {
            total_time: raw.total_time,
            num_sources: raw.num_sources,
            on_rate: raw.on_rate,
            alpha_on: raw.alpha_on,
            xm_on: raw.xm_on,
            alpha_off: raw.alpha_off,
            xm_off: raw.xm_off,
            model: raw.model.parse()?,
            hurst: raw.hurst,
            ..SimulatorConfig::default()
        };

        if let Some(seed) = raw.seed {
            config.seed = seed;
        }

        if let Some(queue) = raw.queue {
            if let Some(v) = queue.capacity {
                config.queue.capacity = v;
            }
            if let Some(v) = queue.service_rate {
                config.queue.service_rate = v;
            }
        }

        if let Some(dt) = raw.sample_interval {
            config.sampling = SamplingMode::Interval(dt);
        }

        if let Some(output) = raw.output {
            if let Some(v) = output.enable_event_logging {
                config.output.enable_event_logging = v;
            }
            config.output.events_csv = output.events_csv;
            config.output.time_series_csv = output.time_series_csv;
            config.output.summary_csv = output.summary_csv;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = r#"
meta:
  name: Basic
config:
  total_time: 500.0
  num_sources: 10
  alpha_on: 1.5
  xm_on: 1.0
  alpha_off: 1.3
  xm_off: 2.0
"#;

    #[test]
    fn test_default_config_is_valid() {
        SimulatorConfig::default().validate().unwrap();
    }

    #[test]
    fn test_model_parsing() {
        assert_eq!("pareto".parse::<TrafficModelType>().unwrap(), TrafficModelType::Pareto);
        assert_eq!(
            " FGN ".parse::<TrafficModelType>().unwrap(),
            TrafficModelType::FractionalGaussianNoise
        );
        assert_eq!(
            "Fractional_Gaussian_Noise".parse::<TrafficModelType>().unwrap(),
            TrafficModelType::FractionalGaussianNoise
        );
        assert!(matches!(
            "poisson".parse::<TrafficModelType>(),
            Err(SimError::UnknownModel(m)) if m == "poisson"
        ));
    }

    #[test]
    fn test_validation_bounds() {
        let cases: Vec<(&str, fn(&mut SimulatorConfig))> = vec![
            ("total_time", |c: &mut SimulatorConfig| c.total_time = 0.0),
            ("num_sources", |c: &mut SimulatorConfig| c.num_sources = 0),
            ("alpha_on", |c: &mut SimulatorConfig| c.alpha_on = 1.0),
            ("alpha_off", |c: &mut SimulatorConfig| c.alpha_off = 0.5),
            ("xm_on", |c: &mut SimulatorConfig| c.xm_on = 0.0),
            ("xm_off", |c: &mut SimulatorConfig| c.xm_off = -1.0),
            ("hurst", |c: &mut SimulatorConfig| c.hurst = 0.5),
            ("hurst", |c: &mut SimulatorConfig| c.hurst = 1.0),
            ("on_rate", |c: &mut SimulatorConfig| c.on_rate = -0.1),
            ("queue.capacity", |c: &mut SimulatorConfig| c.queue.capacity = -5.0),
            ("sample_interval", |c: &mut SimulatorConfig| {
                c.sampling = SamplingMode::Interval(0.0)
            }),
        ];

        for (expected, mutate) in cases {
            let mut config = SimulatorConfig::default();
            mutate(&mut config);
            match config.validate() {
                Err(SimError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected {} to be rejected, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_scenario_applies_defaults() {
        let config = ScenarioFile::from_yaml_str(BASIC).unwrap().into_config().unwrap();
        assert_eq!(config.total_time, 500.0);
        assert_eq!(config.num_sources, 10);
        assert_eq!(config.model, TrafficModelType::Pareto);
        assert_eq!(config.on_rate, 1.0);
        assert_eq!(config.hurst, 0.8);
        assert_eq!(config.seed, 1234);
        assert_eq!(config.sampling, SamplingMode::PerEvent);
    }

    #[test]
    fn test_scenario_overrides() {
        let yaml = r#"
config:
  totalTime: 100.0
  numSources: 3
  alphaOn: 1.9
  xmOn: 0.5
  alphaOff: 1.9
  xmOff: 0.5
  model: fgn
  hurst: 0.9
  seed: 77
  queue:
    capacity: 10.0
  sample_interval: 0.5
  output:
    summary_csv: out/summary.csv
"#;
        let config = ScenarioFile::from_yaml_str(yaml).unwrap().into_config().unwrap();
        assert_eq!(config.model, TrafficModelType::FractionalGaussianNoise);
        assert_eq!(config.seed, 77);
        assert_eq!(config.source_seed(2), 79);
        assert_eq!(config.queue.capacity, 10.0);
        assert_eq!(config.queue.service_rate, QueueConfig::default().service_rate);
        assert_eq!(config.sampling, SamplingMode::Interval(0.5));
        assert_eq!(config.output.summary_csv.as_deref(), Some("out/summary.csv"));
        assert!(matches!(
            config.duration_model().unwrap(),
            DurationModel::FractionalGaussianNoise { .. }
        ));
    }

    #[test]
    fn test_unknown_model_rejected_at_configuration() {
        let yaml = BASIC.replace("  xm_off: 2.0", "  xm_off: 2.0\n  model: lognormal");
        let err = ScenarioFile::from_yaml_str(&yaml).unwrap().into_config().unwrap_err();
        assert!(matches!(err, SimError::UnknownModel(_)));
    }

    #[test]
    fn test_invalid_values_rejected_at_configuration() {
        let yaml = BASIC.replace("alpha_on: 1.5", "alpha_on: 0.9");
        let err = ScenarioFile::from_yaml_str(&yaml).unwrap().into_config().unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "alpha_on", .. }));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = ScenarioFile::from_yaml_str("config: [1, 2").unwrap_err();
        assert!(matches!(err, SimError::Yaml(_)));
    }

    #[test]
    fn test_bundled_scenarios_are_valid() {
        let files = [
            include_str!("../scenarios/baseline.yaml"),
            include_str!("../scenarios/light_tails.yaml"),
            include_str!("../scenarios/congested_queue.yaml"),
            include_str!("../scenarios/gaussian_sojourns.yaml"),
        ];
        for content in files {
            let scenario = ScenarioFile::from_yaml_str(content).unwrap();
            assert!(scenario.meta.name.is_some());
            scenario.into_config().unwrap();
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimulatorConfig::load_from_file("/nonexistent/scenario.yaml").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
