//! Object model configuration.
//!
//! Resolved once when the `ObjectSpace` is created. Environment overrides
//! are read through `from_env`; everything else uses `Default`.

use garnet_core::GarnetError;

/// Tunables for an `ObjectSpace`.
///
/// # Example
///
/// ```ignore
/// use garnet_runtime::{ObjectModelConfig, ObjectSpace};
///
/// let config = ObjectModelConfig {
///     trace_mutations: true,
///     ..Default::default()
/// };
/// let space = ObjectSpace::with_config(config, Arc::new(NoopInvalidator))?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectModelConfig {
    /// Freeze a newly materialized singleton class when its object is frozen.
    ///
    /// Default: true
    pub propagate_frozen: bool,

    /// Maintain the counters in `ObjectModelStats`.
    ///
    /// Default: true
    pub track_stats: bool,

    /// Print one stderr line per structural mutation.
    ///
    /// Default: false
    pub trace_mutations: bool,

    /// Initial capacity of the class node arena.
    ///
    /// Default: 256
    pub initial_class_capacity: usize,
}

/// Smallest accepted `initial_class_capacity`: the four roots, the nine
/// boot classes' metaclasses and the five immediate classes.
pub const MIN_CLASS_CAPACITY: usize = 18;

impl Default for ObjectModelConfig {
    fn default() -> Self {
        Self {
            propagate_frozen: true,
            track_stats: true,
            trace_mutations: false,
            initial_class_capacity: 256,
        }
    }
}

impl ObjectModelConfig {
    /// Defaults overridden by `GARNET_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("GARNET_TRACE_MUTATIONS") {
            config.trace_mutations = is_truthy(&value);
        }
        if let Some(value) = lookup("GARNET_TRACK_STATS") {
            config.track_stats = is_truthy(&value);
        }
        if let Some(value) = lookup("GARNET_NO_FROZEN_PROPAGATION") {
            config.propagate_frozen = !is_truthy(&value);
        }
        if let Some(value) = lookup("GARNET_CLASS_CAPACITY") {
            config.initial_class_capacity = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidCapacity(value.clone()))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_class_capacity < MIN_CLASS_CAPACITY {
            return Err(ConfigError::CapacityTooSmall(self.initial_class_capacity));
        }
        Ok(())
    }
}

/// Non-empty and not `0`/`false`/`off`/`no`.
fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !matches!(
            value.to_ascii_lowercase().as_str(),
            "0" | "false" | "off" | "no"
        )
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `initial_class_capacity` below `MIN_CLASS_CAPACITY`.
    CapacityTooSmall(usize),
    /// `GARNET_CLASS_CAPACITY` is not a number.
    InvalidCapacity(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::CapacityTooSmall(got) => write!(
                f,
                "class capacity must be at least {}, got {}",
                MIN_CLASS_CAPACITY, got
            ),
            ConfigError::InvalidCapacity(raw) => {
                write!(f, "GARNET_CLASS_CAPACITY is not a number: '{}'", raw)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for GarnetError {
    fn from(err: ConfigError) -> Self {
        GarnetError::argument_error(err.to_string())
    }
}
