//! Result type alias for the UMDF engine

use super::errors::UmdfError;

/// Result type alias for UMDF operations
///
/// # Examples
///
/// ```
/// use umdf::domain::result::Result;
/// use umdf::domain::errors::UmdfError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(UmdfError::InvalidState("container is closed".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, UmdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(UmdfError::AccessDenied);
        assert!(result.is_err());
    }
}
