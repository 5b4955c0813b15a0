//! Route matching for the six resource collections.
//!
//! Routes are compiled into a single regex at construction. The collection
//! name and the optional numeric id segment are captured and mapped together
//! with the HTTP method to a handler name.

use regex::Regex;
use tracing::debug;

use crate::fixture::RESOURCES;

/// Result of matching a request against the resource route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Name of the registered handler that should process this request.
    pub handler_name: &'static str,
    /// The matched collection, e.g. `posts`.
    pub collection: String,
    /// The numeric id segment, when present.
    pub id: Option<u64>,
}

/// Matches `/{collection}` and `/{collection}/{id}` for the six known
/// collections and resolves the handler by HTTP method.
#[derive(Debug, Clone)]
pub struct Router {
    pattern: Regex,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        let alternation = RESOURCES.join("|");
        let pattern = format!(r"^/({alternation})(?:/(\d+))?/?$");
        Self {
            // The pattern is assembled from fixed collection names; it cannot
            // fail to compile once the unit tests pass.
            #[allow(clippy::unwrap_used)]
            pattern: Regex::new(&pattern).unwrap(),
        }
    }

    /// Match a request, returning the handler name and extracted parameters.
    #[must_use]
    pub fn route(&self, method: &str, path: &str) -> Option<RouteMatch> {
        let captures = self.pattern.captures(path)?;
        let collection = captures.get(1)?.as_str().to_string();
        // An id segment that does not fit in u64 is not a collection route.
        let id = match captures.get(2) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };

        let handler_name = match (method, id.is_some()) {
            ("GET", false) => "list_records",
            ("GET", true) => "get_record",
            ("POST", false) => "create_record",
            ("PUT", true) => "replace_record",
            ("PATCH", true) => "update_record",
            ("DELETE", true) => "delete_record",
            _ => {
                debug!(method, path, "no route for method/path shape");
                return None;
            }
        };

        Some(RouteMatch {
            handler_name,
            collection,
            id,
        })
    }
}
