//! Operator-facing diagnostics
//!
//! The resolver explains why a command line was rejected before the usage
//! banner is printed. Those explanations are only shown with `--debug`; the
//! decision is carried by this handle instead of a process-wide switch.

use depositx_core_types::schema::EVENT_DIAGNOSTIC;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Quiet,
    Debug,
}

/// Verbosity-gated sink for diagnostics and operator prompts
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostics {
    verbosity: Verbosity,
}

impl Diagnostics {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn quiet() -> Self {
        Self::new(Verbosity::Quiet)
    }

    pub fn debug() -> Self {
        Self::new(Verbosity::Debug)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_enabled(&self) -> bool {
        self.verbosity == Verbosity::Debug
    }

    /// Report why a command was rejected; dropped when quiet
    pub fn report(&self, message: &str) {
        if self.is_enabled() {
            tracing::warn!(
                component = "depositx::resolver",
                event = EVENT_DIAGNOSTIC,
                "{}",
                message
            );
        }
    }

    /// Information the operator must act on (e.g. where to send funds)
    ///
    /// Written to stderr regardless of verbosity; stdout is reserved for the
    /// result line.
    pub fn prompt(&self, message: &str) {
        eprintln!("{}", message);
        tracing::info!(component = "depositx::prompt", "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_quiet() {
        let diag = Diagnostics::default();
        assert!(!diag.is_enabled());
        assert_eq!(diag.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_debug_is_enabled() {
        assert!(Diagnostics::debug().is_enabled());
    }
}
