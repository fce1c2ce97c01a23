//! Registry configuration.

/// Configuration for building an overload registry.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Register the built-in kernel set (default: true).
    pub include_builtins: bool,
    /// Check that every kernel result has its declared return type (default: true).
    pub verify_return_type: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            include_builtins: true,
            verify_return_type: true,
        }
    }
}

impl DispatchConfig {
    /// Creates a new dispatch configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether built-in kernels are registered.
    #[must_use]
    pub fn with_builtins(mut self, include_builtins: bool) -> Self {
        self.include_builtins = include_builtins;
        self
    }

    /// Sets whether kernel results are checked against their declared return type.
    #[must_use]
    pub fn with_verify_return_type(mut self, verify_return_type: bool) -> Self {
        self.verify_return_type = verify_return_type;
        self
    }
}
