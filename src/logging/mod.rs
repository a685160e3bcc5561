//! Logging and observability
//!
//! Structured logging through `tracing` with:
//! - Human-readable console output
//! - Optional JSON file output with rotation
//! - Configurable log levels
//!
//! Payload data and passwords are never logged; mutations are logged by id.
//!
//! # Example
//!
//! ```no_run
//! use umdf::logging::init_logging;
//! use umdf::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Engine started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a committed container mutation
///
/// # Example
///
/// ```no_run
/// use umdf::log_mutation;
/// use umdf::domain::ModuleId;
///
/// let module_id = ModuleId::generate();
/// log_mutation!("update_module", &module_id, 3u64);
/// ```
#[macro_export]
macro_rules! log_mutation {
    ($operation:expr, $target:expr) => {
        tracing::debug!(
            operation = $operation,
            target_id = %$target,
            "Mutation committed"
        );
    };
    ($operation:expr, $target:expr, $seq:expr) => {
        tracing::debug!(
            operation = $operation,
            target_id = %$target,
            seq = $seq,
            "Mutation committed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use umdf::log_error_with_context;
/// use umdf::domain::UmdfError;
///
/// let error = UmdfError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            kind = ?$error.kind(),
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{ModuleId, UmdfError};

    #[test]
    fn test_macros_expand() {
        let id = ModuleId::generate();
        crate::log_mutation!("add_annotation", &id);
        crate::log_mutation!("update_module", &id, 7u64);

        let error = UmdfError::AccessDenied;
        crate::log_error_with_context!(&error, "open");
    }
}
