//! Test doubles shared by the module tests.

use std::cell::RefCell;
use std::rc::Rc;

use dgm_builder::{BuildError, BuildKey, BuildOutcome, BuildRequest, DiagramBuilder};

use crate::diagnostics::DiagnosticSink;

type Respond = fn(&BuildRequest) -> Result<BuildOutcome, BuildError>;

/// Builder that records every request and answers through `respond`.
pub(crate) struct FakeBuilder {
    respond: Respond,
    requests: RefCell<Vec<BuildRequest>>,
}

impl FakeBuilder {
    pub(crate) fn new(respond: Respond) -> Self {
        Self {
            respond,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Always renders `b"PNG"` under the request's content hash.
    pub(crate) fn rendering() -> Self {
        Self::new(|request| {
            Ok(BuildOutcome::Built {
                hash: BuildKey::from_request(request).compute_hash(),
                png: b"PNG".to_vec(),
            })
        })
    }

    pub(crate) fn requests(&self) -> Vec<BuildRequest> {
        self.requests.borrow().clone()
    }
}

impl DiagramBuilder for FakeBuilder {
    fn build(&self, request: &BuildRequest) -> Result<BuildOutcome, BuildError> {
        self.requests.borrow_mut().push(request.clone());
        (self.respond)(request)
    }
}

/// Sink whose clones share one message list.
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingSink {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }
}
