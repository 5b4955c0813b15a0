use std::io;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use tracing::error;

use super::request::{parse_request, ParsedRequest};
use super::response::write_handler_response;
use crate::dispatcher::{Dispatcher, HandlerResponse};
use crate::graphql::{GraphQLContext, Schema};
use crate::middleware::Middleware;
use crate::router::Router;
use crate::store::Store;

/// Path the GraphQL endpoint is mounted at.
pub const GRAPHQL_PATH: &str = "/graphql";

/// The HTTP service: GraphQL endpoint, middleware chain, and resource router.
pub struct AppService {
    pub router: Router,
    pub dispatcher: Arc<RwLock<Dispatcher>>,
    pub middlewares: Vec<Arc<dyn Middleware>>,
    pub schema: Arc<Schema>,
    pub store: Arc<RwLock<Store>>,
}

impl Clone for AppService {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            dispatcher: Arc::clone(&self.dispatcher),
            middlewares: self.middlewares.clone(),
            schema: Arc::clone(&self.schema),
            store: Arc::clone(&self.store),
        }
    }
}

impl AppService {
    #[must_use]
    pub fn new(
        router: Router,
        dispatcher: Arc<RwLock<Dispatcher>>,
        middlewares: Vec<Arc<dyn Middleware>>,
        schema: Arc<Schema>,
        store: Arc<RwLock<Store>>,
    ) -> Self {
        Self {
            router,
            dispatcher,
            middlewares,
            schema,
            store,
        }
    }

    /// Run the ordered chain for one request and produce the response.
    ///
    /// GraphQL is mounted ahead of the chain: it is neither counted nor does
    /// it trigger a store reset. After that, the first middleware to return a
    /// response terminates the chain; otherwise the resource router decides.
    pub fn respond(&self, parsed: &ParsedRequest) -> HandlerResponse {
        if parsed.path == GRAPHQL_PATH {
            return self.graphql_endpoint(parsed);
        }

        for mw in &self.middlewares {
            if let Some(response) = mw.before(parsed) {
                return response;
            }
        }

        match self.router.route(&parsed.method, &parsed.path) {
            Some(matched) => {
                let dispatcher = self.dispatcher.read().unwrap();
                dispatcher
                    .dispatch(&matched, parsed)
                    .unwrap_or_else(|| HandlerResponse::error(500, "handler not registered"))
            }
            // json-server's not-found body is an empty object
            None => HandlerResponse::json(404, json!({})),
        }
    }

    /// Answer a GraphQL operation from a POST body or GET query parameters.
    fn graphql_endpoint(&self, parsed: &ParsedRequest) -> HandlerResponse {
        let request = match graphql_request(parsed) {
            Ok(request) => request,
            Err(response) => return response,
        };

        let context = GraphQLContext {
            store: Arc::clone(&self.store),
        };
        let response = request.execute_sync(&self.schema, &context);
        let status = if response.is_ok() { 200 } else { 400 };
        match serde_json::to_value(&response) {
            Ok(body) => HandlerResponse::json(status, body),
            Err(e) => {
                error!(error = %e, "failed to serialize graphql response");
                HandlerResponse::error(500, "failed to serialize graphql response")
            }
        }
    }
}

/// Build a GraphQL request from the HTTP request, per the usual transport
/// convention: JSON body for POST, `query`/`operationName`/`variables` query
/// parameters for GET.
fn graphql_request(
    parsed: &ParsedRequest,
) -> Result<juniper::http::GraphQLRequest, HandlerResponse> {
    match parsed.method.as_str() {
        "POST" => {
            let body = parsed
                .body
                .clone()
                .ok_or_else(|| HandlerResponse::error(400, "graphql request body required"))?;
            serde_json::from_value(body)
                .map_err(|e| HandlerResponse::error(400, &format!("invalid graphql request: {e}")))
        }
        "GET" => {
            let query = parsed
                .query_params
                .get("query")
                .cloned()
                .ok_or_else(|| HandlerResponse::error(400, "missing `query` parameter"))?;
            let operation_name = parsed.query_params.get("operationName").cloned();
            let variables = match parsed.query_params.get("variables") {
                Some(raw) => Some(serde_json::from_str(raw).map_err(|e| {
                    HandlerResponse::error(400, &format!("invalid `variables` parameter: {e}"))
                })?),
                None => None,
            };
            Ok(juniper::http::GraphQLRequest::new(
                query,
                operation_name,
                variables,
            ))
        }
        _ => Err(HandlerResponse::error(405, "use GET or POST for graphql")),
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        let start = Instant::now();

        let mut response = self.respond(&parsed);
        for mw in &self.middlewares {
            mw.after(&parsed, &mut response, start.elapsed());
        }

        write_handler_response(res, &response);
        Ok(())
    }
}
