mod macros;

/// Returns the version of the portfolio backend.
pub fn portfolio_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub trait Apply {
    /// Applies the function `f` only if `value` is `Some(...)` and provides the
    /// contained value to `f`.
    ///
    /// #### Example
    /// ```rust
    /// # use portfolio_utils::Apply;
    /// fn with_port(host: String, port: Option<u16>) -> String {
    ///     host.apply_map(port, |host, port| format!("{host}:{port}"))
    /// }
    /// assert_eq!(with_port("localhost".into(), None), "localhost");
    /// assert_eq!(with_port("localhost".into(), Some(587)), "localhost:587");
    /// ```
    fn apply_map<U>(self, value: Option<U>, f: impl FnOnce(Self, U) -> Self) -> Self
    where
        Self: Sized,
    {
        if let Some(value) = value {
            f(self, value)
        } else {
            self
        }
    }
}

impl<T> Apply for T {}
