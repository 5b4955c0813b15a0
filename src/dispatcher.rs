//! Coroutine-based request handler dispatch.
//!
//! Each handler runs in its own `may` coroutine and receives requests over an
//! MPSC channel; responses come back over a per-request reply channel. Handler
//! panics are caught and converted into 500 responses so a failing handler
//! cannot take the server down.

use std::collections::HashMap;

use may::coroutine;
use may::sync::mpsc;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::router::RouteMatch;
use crate::server::ParsedRequest;

/// Request data passed to a handler coroutine.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// HTTP method (GET, POST, ...).
    pub method: String,
    /// Request path without the query string.
    pub path: String,
    /// The matched resource collection, e.g. `posts`.
    pub collection: String,
    /// The numeric id segment, when the route carried one.
    pub id: Option<u64>,
    /// Parsed query string parameters.
    pub query_params: HashMap<String, String>,
    /// Request body parsed as JSON, if present.
    pub body: Option<Value>,
    /// Channel for sending the response back to the dispatcher.
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

/// Response data sent back from a handler coroutine.
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, always serialized as JSON.
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }
}

/// Channel sender that feeds requests to a handler coroutine.
pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// Routes matched requests to registered handler coroutines by name.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<String, HandlerSender>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a coroutine that processes requests for the named handler.
    ///
    /// # Safety
    ///
    /// Calls `may::coroutine::Builder::spawn`, which the `may` runtime marks
    /// unsafe. The caller must initialize the may runtime (stack size) before
    /// registering handlers, and the handler must send exactly one response
    /// per request through the reply channel.
    pub unsafe fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(HandlerRequest) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<HandlerRequest>();
        let name = name.to_string();
        let handler_name = name.clone();

        // SAFETY: spawn() is marked unsafe by the may runtime; the handler is
        // Send + 'static and replies through its channel rather than panicking
        // across the coroutine boundary.
        let spawn_result = unsafe {
            coroutine::Builder::new()
                .stack_size(crate::runtime_config::RuntimeConfig::from_env().stack_size)
                .spawn(move || {
                    debug!(handler_name = %handler_name, "handler coroutine start");
                    for req in rx.iter() {
                        let reply_tx = req.reply_tx.clone();
                        if let Err(panic) =
                            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                                handler_fn(req);
                            }))
                        {
                            error!(
                                handler_name = %handler_name,
                                panic = ?panic,
                                "handler panicked"
                            );
                            let _ = reply_tx.send(HandlerResponse::error(500, "handler panicked"));
                        }
                    }
                })
        };

        if let Err(e) = spawn_result {
            error!(handler_name = %name, error = %e, "failed to spawn handler coroutine");
            return;
        }

        info!(handler_name = %name, "handler registered");
        self.handlers.insert(name, tx);
    }

    /// Dispatch a matched request to its handler and wait for the response.
    ///
    /// Returns `None` when no handler is registered under the matched name.
    /// A closed reply channel (crashed handler) yields a 503.
    #[must_use]
    pub fn dispatch(&self, matched: &RouteMatch, parsed: &ParsedRequest) -> Option<HandlerResponse> {
        let tx = match self.handlers.get(matched.handler_name) {
            Some(tx) => tx,
            None => {
                error!(handler_name = matched.handler_name, "handler not registered");
                return None;
            }
        };

        let (reply_tx, reply_rx) = mpsc::channel();
        let request = HandlerRequest {
            method: parsed.method.clone(),
            path: parsed.path.clone(),
            collection: matched.collection.clone(),
            id: matched.id,
            query_params: parsed.query_params.clone(),
            body: parsed.body.clone(),
            reply_tx,
        };

        if let Err(e) = tx.send(request) {
            error!(handler_name = matched.handler_name, error = %e, "failed to send request to handler");
            return None;
        }

        match reply_rx.recv() {
            Ok(response) => Some(response),
            Err(e) => {
                error!(
                    handler_name = matched.handler_name,
                    error = %e,
                    "handler reply channel closed"
                );
                Some(HandlerResponse::error(503, "handler is not responding"))
            }
        }
    }
}
