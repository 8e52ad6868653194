use std::sync::Arc;

use log::debug;

use crate::{
    phases::{Phase, PhaseHandler, Verdict},
    request::HttpRequest,
};

/// Overwrites the query string with a fixed literal. One instance per phase.
pub struct QueryRewriter {
    name: &'static str,
    phase: Phase,
    target: Arc<str>,
}

impl QueryRewriter {
    pub fn new(name: &'static str, phase: Phase, target: &str) -> Self {
        Self {
            name,
            phase,
            target: Arc::from(target),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rewrite(&self, request: &mut HttpRequest<'_>) {
        request.set_args(self.target.to_string());
    }
}

impl PhaseHandler for QueryRewriter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, request: &mut HttpRequest<'_>) -> Verdict {
        debug!(
            "{} {} callback: http args: \"{}\"",
            self.name,
            self.phase,
            request.args()
        );

        self.rewrite(request);

        Verdict::Continue
    }
}
