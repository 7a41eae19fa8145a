/// Options for checking constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    trace_precision: usize,
    stop_at_first_failure: bool,
}

impl CheckOptions {
    /// Creates the default options
    ///
    /// Values in traces get six digits after the decimal point and every
    /// constraint is checked.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trace_precision: 6,
            stop_at_first_failure: false,
        }
    }

    /// Sets the number of digits after the decimal point in traces
    #[must_use]
    pub const fn with_trace_precision(self, trace_precision: usize) -> Self {
        Self {
            trace_precision,
            ..self
        }
    }

    /// Stops checking an invariant after the first failed constraint
    #[must_use]
    pub const fn with_stop_at_first_failure(self, stop_at_first_failure: bool) -> Self {
        Self {
            stop_at_first_failure,
            ..self
        }
    }

    /// Returns the number of digits after the decimal point in traces
    #[must_use]
    pub const fn trace_precision(&self) -> usize {
        self.trace_precision
    }

    /// Returns true if checking stops after the first failed constraint
    #[must_use]
    pub const fn stop_at_first_failure(&self) -> bool {
        self.stop_at_first_failure
    }
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self::new()
    }
}
