//! The `tree` module.
//!
//! Rewrites the query string in the rewrite and access phases and, for
//! locations carrying the `tree` directive, answers with a fixed
//! `text/plain` body.

mod payload;
mod rewriter;

use std::sync::Arc;

use log::debug;

use crate::{
    location::{ConfigError, Location},
    modules::{Directive, HttpModule},
    phases::{Phase, PhaseHandler, PhaseRegistry, RegistrationError, Verdict},
    request::HttpRequest,
};

pub use payload::StaticPayload;
pub use rewriter::QueryRewriter;

const TEXT_PLAIN: &str = "text/plain";

static DIRECTIVES: [Directive; 1] = [Directive {
    name: "tree",
    args: 0,
}];

pub struct TreeContentHandler {
    payload: StaticPayload,
}

impl TreeContentHandler {
    pub fn new(payload: StaticPayload) -> Self {
        Self { payload }
    }
}

impl PhaseHandler for TreeContentHandler {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn handle(&self, request: &mut HttpRequest<'_>) -> Verdict {
        debug!("tree content handler: http args: \"{}\"", request.args());

        self.payload.write_response(request.response_mut());

        Verdict::Stop
    }
}

pub struct TreeModule {
    content_handler: Arc<TreeContentHandler>,
    rewrite_handler: Arc<QueryRewriter>,
    access_handler: Arc<QueryRewriter>,
}

impl TreeModule {
    pub fn new(tree_configuration: &crate::config::TreeConfiguration) -> Self {
        let payload = StaticPayload::new(tree_configuration.payload(), TEXT_PLAIN);

        Self {
            content_handler: Arc::new(TreeContentHandler::new(payload)),
            rewrite_handler: Arc::new(QueryRewriter::new(
                "tree_rewrite",
                Phase::Rewrite,
                tree_configuration.rewrite_args(),
            )),
            access_handler: Arc::new(QueryRewriter::new(
                "tree_access",
                Phase::Access,
                tree_configuration.access_args(),
            )),
        }
    }
}

impl HttpModule for TreeModule {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn directives(&self) -> &'static [Directive] {
        &DIRECTIVES
    }

    fn set_directive(
        &self,
        _directive: &Directive,
        _args: &[&str],
        location: &mut Location,
    ) -> Result<(), ConfigError> {
        location.set_content_handler(Arc::clone(&self.content_handler) as Arc<dyn PhaseHandler>);

        Ok(())
    }

    fn postconfiguration(&self, phases: &mut PhaseRegistry) -> Result<(), RegistrationError> {
        phases.push(
            self.access_handler.phase(),
            Arc::clone(&self.access_handler) as Arc<dyn PhaseHandler>,
        )?;

        phases.push(
            self.rewrite_handler.phase(),
            Arc::clone(&self.rewrite_handler) as Arc<dyn PhaseHandler>,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TreeConfiguration, connection::FastCGIRequestID};

    #[test]
    fn content_handler_serves_payload_and_stops() {
        let handler =
            TreeContentHandler::new(StaticPayload::new("hello world", TEXT_PLAIN));
        let mut request = HttpRequest::new(FastCGIRequestID::default(), "GET", "/tree", "a=b");

        assert_eq!(handler.handle(&mut request), Verdict::Stop);

        let response = request.response();
        assert_eq!(*response.status(), Some(http::StatusCode::OK));
        assert_eq!(response.content_type().unwrap(), "text/plain");
        assert_eq!(response.body().iter().collect::<Vec<_>>(), vec![&b"hello world"[..]]);
        // the content handler does not consult or alter the query string
        assert_eq!(request.args(), "a=b");
    }

    #[test]
    fn postconfiguration_registers_one_handler_per_phase() {
        let module = TreeModule::new(&TreeConfiguration::default());
        let mut phases = PhaseRegistry::new();

        module.postconfiguration(&mut phases).unwrap();

        assert_eq!(phases.handler_names(Phase::Access), vec!["tree_access"]);
        assert_eq!(phases.handler_names(Phase::Rewrite), vec!["tree_rewrite"]);
        assert!(phases.handlers(Phase::Content).is_empty());
        assert!(phases.handlers(Phase::Log).is_empty());
    }
}
