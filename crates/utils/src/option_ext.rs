use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Better option outputs
    ///
    /// Generic over anything that implements `Display`, this will either be the
    /// value contained within `Some()` or "none" for the `None` variant.
    ///
    /// For example, an optional differential axis index on a page:
    ///
    /// ```rust
    /// # use mctools_utils::OptionExt;
    /// let axis: Option<u8> = Some(2);
    /// assert_eq!(axis.display(), "2");
    ///
    /// let axis: Option<u8> = None;
    /// assert_eq!(axis.display(), "none");
    /// ```
    fn display(&self) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "none".to_string(),
        }
    }
}
