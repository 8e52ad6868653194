use std::sync::Arc;

use log::info;

use crate::{
    phases::{Phase, PhaseHandler, PhaseRegistry, RegistrationError, Verdict},
    request::HttpRequest,
};

struct AccessLogHandler {}

impl PhaseHandler for AccessLogHandler {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn handle(&self, request: &mut HttpRequest<'_>) -> Verdict {
        let response = request.response();

        info!(
            "{}:{} \"{} {}?{}\" {} {}",
            request.request_id().connection_id().0,
            request.request_id().request_id(),
            request.method(),
            request.uri(),
            request.args(),
            (*response.status()).map_or(0, |status| status.as_u16()),
            response.body().len(),
        );

        Verdict::Continue
    }
}

pub struct AccessLogModule {
    handler: Arc<AccessLogHandler>,
}

impl AccessLogModule {
    pub fn new() -> Self {
        Self {
            handler: Arc::new(AccessLogHandler {}),
        }
    }
}

impl crate::modules::HttpModule for AccessLogModule {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn postconfiguration(&self, phases: &mut PhaseRegistry) -> Result<(), RegistrationError> {
        phases.push(Phase::Log, Arc::clone(&self.handler) as Arc<dyn PhaseHandler>)
    }
}
