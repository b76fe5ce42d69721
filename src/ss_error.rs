use thiserror::Error;

/// Errors raised while configuring or driving a simulation
#[derive(Debug, Error)]
pub enum SimError {
    /// A parameter is outside its allowed range
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Traffic model selector not recognised
    #[error("unknown model type: {0} (expected: pareto or fgn)")]
    UnknownModel(String),

    /// `run` was already called on this manager
    #[error("simulation has already been run")]
    AlreadyRun,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SimError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = SimError::invalid("alpha", "must be > 0, got -1");
        assert_eq!(
            err.to_string(),
            "invalid parameter `alpha`: must be > 0, got -1"
        );
    }

    #[test]
    fn test_unknown_model_message() {
        let err = SimError::UnknownModel("poisson".to_string());
        assert!(err.to_string().contains("poisson"));
    }
}
