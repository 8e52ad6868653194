mod engine;

use std::{collections::TryReserveError, fmt, sync::Arc};

use crate::request::HttpRequest;

pub use engine::PhaseEngine;

/// Request processing stages, declared in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Rewrite,
    Access,
    Content,
    Log,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Rewrite, Phase::Access, Phase::Content, Phase::Log];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Rewrite => "rewrite",
            Phase::Access => "access",
            Phase::Content => "content",
            Phase::Log => "log",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[allow(dead_code)]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("finalize with status {0}")]
    Status(http::StatusCode),

    #[error("internal handler error: {0}")]
    Internal(String),
}

#[allow(dead_code)]
impl HandlerError {
    pub fn status(&self) -> http::StatusCode {
        match self {
            Self::Status(status) => *status,
            Self::Internal(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Outcome of one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No opinion (or approval); the next handler and phase run.
    Continue,

    /// The response is complete; skip straight to output.
    Stop,

    /// Abort the pipeline and answer with the error's status.
    #[allow(dead_code)]
    Error(HandlerError),
}

pub trait PhaseHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle(&self, request: &mut HttpRequest<'_>) -> Verdict;
}

#[derive(thiserror::Error, Debug)]
#[error("cannot register handler '{handler}' in {phase} phase: {source}")]
pub struct RegistrationError {
    phase: Phase,
    handler: &'static str,
    #[source]
    source: TryReserveError,
}

#[cfg(test)]
impl RegistrationError {
    pub fn new(phase: Phase, handler: &'static str, source: TryReserveError) -> Self {
        Self {
            phase,
            handler,
            source,
        }
    }
}

/// Per-phase handler lists, filled by module post-configuration hooks at
/// startup and frozen into a [`PhaseEngine`] afterwards.
#[derive(Default)]
pub struct PhaseRegistry {
    phases: [Vec<Arc<dyn PhaseHandler>>; 4],
}

impl PhaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        phase: Phase,
        handler: Arc<dyn PhaseHandler>,
    ) -> Result<(), RegistrationError> {
        let handlers = &mut self.phases[phase.index()];

        handlers
            .try_reserve(1)
            .map_err(|source| RegistrationError {
                phase,
                handler: handler.name(),
                source,
            })?;

        handlers.push(handler);

        Ok(())
    }

    pub fn handlers(&self, phase: Phase) -> &[Arc<dyn PhaseHandler>] {
        &self.phases[phase.index()]
    }

    pub fn handler_names(&self, phase: Phase) -> Vec<&'static str> {
        self.handlers(phase).iter().map(|h| h.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl PhaseHandler for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn handle(&self, _request: &mut HttpRequest<'_>) -> Verdict {
            Verdict::Continue
        }
    }

    #[test]
    fn phases_are_declared_in_execution_order() {
        let mut sorted = Phase::ALL;
        sorted.sort();

        assert_eq!(sorted, Phase::ALL);
        assert_eq!(Phase::ALL[0], Phase::Rewrite);
        assert_eq!(Phase::ALL[1], Phase::Access);
    }

    #[test]
    fn handlers_keep_registration_order_per_phase() {
        let mut registry = PhaseRegistry::new();

        registry.push(Phase::Access, Arc::new(Named("first"))).unwrap();
        registry.push(Phase::Rewrite, Arc::new(Named("other"))).unwrap();
        registry.push(Phase::Access, Arc::new(Named("second"))).unwrap();

        assert_eq!(registry.handler_names(Phase::Access), vec!["first", "second"]);
        assert_eq!(registry.handler_names(Phase::Rewrite), vec!["other"]);
        assert!(registry.handlers(Phase::Content).is_empty());
    }

    #[test]
    fn handler_error_status() {
        assert_eq!(
            HandlerError::Status(http::StatusCode::FORBIDDEN).status(),
            http::StatusCode::FORBIDDEN
        );
        assert_eq!(
            HandlerError::Internal("boom".to_string()).status(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
