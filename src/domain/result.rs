//! Result type alias
//!
//! Every fallible operation in the crate returns this alias.

use super::errors::ReviewError;

/// Result type alias using [`ReviewError`]
///
/// # Examples
///
/// ```
/// use donor_review::domain::result::Result;
/// use donor_review::domain::errors::ReviewError;
///
/// fn failing_function() -> Result<()> {
///     Err(ReviewError::Other("boom".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, ReviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i64> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
