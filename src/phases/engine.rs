use std::sync::Arc;

use log::{debug, warn};

use crate::{location::Locations, request::HttpRequest};

use super::{Phase, PhaseHandler, PhaseRegistry, Verdict};

const PIPELINE: [Phase; 3] = [Phase::Rewrite, Phase::Access, Phase::Content];

/// Drives each request through the registered phases. Built once at startup
/// and shared read-only by all request tasks.
pub struct PhaseEngine {
    phases: PhaseRegistry,
    locations: Locations,
}

impl PhaseEngine {
    pub fn new(phases: PhaseRegistry, locations: Locations) -> Self {
        Self { phases, locations }
    }

    fn run_handlers(
        phase: Phase,
        handlers: &[Arc<dyn PhaseHandler>],
        request: &mut HttpRequest<'_>,
    ) -> Verdict {
        for handler in handlers {
            let verdict = handler.handle(request);

            debug!(
                "{:?} {} phase handler '{}' verdict {:?}",
                request.request_id(),
                phase,
                handler.name(),
                verdict
            );

            if verdict != Verdict::Continue {
                return verdict;
            }
        }

        Verdict::Continue
    }

    /// Runs rewrite, access and content phases, finalizes the response, then
    /// runs the log phase. On return the response is ready for output.
    pub fn run(&self, request: &mut HttpRequest<'_>) {
        let location = self.locations.find(request.uri());

        let content_handler = location.and_then(|location| location.content_handler());

        for phase in PIPELINE {
            let handlers = match (phase, content_handler) {
                (Phase::Content, Some(handler)) => std::slice::from_ref(handler),
                _ => self.phases.handlers(phase),
            };

            match Self::run_handlers(phase, handlers, request) {
                Verdict::Continue => {}
                Verdict::Stop => break,
                Verdict::Error(err) => {
                    warn!("{:?} {} phase error: {}", request.request_id(), phase, err);
                    request.response_mut().finalize_with_status(err.status());
                    break;
                }
            }
        }

        if !request.response().is_final() {
            request
                .response_mut()
                .finalize_with_status(http::StatusCode::NOT_FOUND);
        }

        // log handlers observe the final response; their verdicts are ignored
        for handler in self.phases.handlers(Phase::Log) {
            handler.handle(request);
        }
    }
}
