//! Unified error type for labforge.
//!
//! Every crate funnels its failures into [`Error`]. Parsing a job is a pure
//! function of its inputs, so none of these errors are retried: the caller
//! surfaces the message (log line, submission rejection) and gives up.

/// Unified error type covering all failure modes in labforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The job description contains an action key outside deploy/boot/test/command.
    #[error("Unknown action name '{name}'")]
    UnknownAction {
        /// The offending key, exactly as written in the description.
        name: String,
    },

    /// Every registered candidate for a phase rejected the device/parameters.
    #[error("No {phase} strategy matches the device and job parameters: {reasons}")]
    NoStrategyMatch {
        /// The phase being resolved (e.g. "deploy", "boot").
        phase: String,
        /// Per-candidate rejection reasons, joined for display.
        reasons: String,
    },

    /// The declared compatibility value is not an integer.
    #[error("invalid compatibility value: {0}")]
    CompatibilityFormat(String),

    /// The job requires a newer compatibility level than the parser supports.
    #[error(
        "Dispatcher unable to meet job compatibility requirement. {required} > {supported}"
    )]
    CompatibilityVersion {
        /// Compatibility level declared by the job description.
        required: i64,
        /// Compatibility baseline of the assembled job.
        supported: u32,
    },

    /// The job description is structurally invalid.
    #[error("Invalid job: {0}")]
    InvalidJob(String),

    /// The device profile could not be interpreted.
    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    /// A timeout value could not be parsed.
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    /// A configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// A YAML document could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error was caused by the submitted job itself.
    ///
    /// Job errors should be reported back to the submitter as a rejection;
    /// everything else points at the device, the configuration or the host.
    pub fn is_job_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownAction { .. }
                | Error::NoStrategyMatch { .. }
                | Error::CompatibilityFormat(_)
                | Error::CompatibilityVersion { .. }
                | Error::InvalidJob(_)
                | Error::InvalidTimeout(_)
        )
    }

    /// Convenience constructor for [`Error::UnknownAction`].
    pub fn unknown_action(name: impl Into<String>) -> Self {
        Error::UnknownAction { name: name.into() }
    }

    /// Convenience constructor for [`Error::NoStrategyMatch`].
    pub fn no_strategy(phase: impl ToString, reasons: impl Into<String>) -> Self {
        Error::NoStrategyMatch {
            phase: phase.to_string(),
            reasons: reasons.into(),
        }
    }

    /// Convenience constructor for [`Error::InvalidJob`].
    pub fn invalid_job(message: impl Into<String>) -> Self {
        Error::InvalidJob(message.into())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
