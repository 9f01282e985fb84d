//! Error types for the CBAM estimator core.

/// Errors that can occur while loading reference data or estimating emissions.
///
/// Apart from [`Error::DataLoad`], which is fatal at startup, every variant is
/// terminal for the current request only and never touches the shared
/// reference tables. Nothing here is retried internally.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Reference data could not be loaded (missing sheet, missing column,
    /// unparsable factor).
    #[error("Data load error: {message}")]
    DataLoad {
        /// What went wrong
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Inbound request is malformed.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Request field that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// The trade API answered with a non-200 status.
    #[error("Upstream error: {status} => {body}")]
    Upstream {
        /// HTTP status code returned by the trade API
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// The trade API answered 200 with an empty `data` array.
    #[error("No data found for selection")]
    NoData,

    /// Records existed but none matched the TOTAL MOT / TOTAL CPC aggregation filter.
    #[error("No data after filter (TOTAL MOT/CPC)")]
    NoDataAfterFilter,

    /// Network or decoding failure while talking to the trade API.
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

/// Convenience `Result` type alias for estimator operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether the request succeeded but produced nothing to estimate.
    ///
    /// Callers render these as an empty result rather than a failure.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Error::NoData | Error::NoDataAfterFilter)
    }

    /// Creates a new data load error.
    pub fn data_load<S: Into<String>>(message: S) -> Self {
        Error::DataLoad {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data load error with a source error.
    pub fn data_load_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::DataLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new invalid input error.
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Error::InvalidInput {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new invalid input error with a field name.
    pub fn invalid_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::InvalidInput {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new upstream error from a status code and body.
    pub fn upstream<S: Into<String>>(status: u16, body: S) -> Self {
        Error::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Creates a new transport error with a source error.
    pub fn transport_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
