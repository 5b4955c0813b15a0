//! The ordered request chain.
//!
//! Middleware runs in registration order. A middleware "handles" a request by
//! returning a response from [`Middleware::before`], which terminates the
//! chain; returning `None` passes control to the next stage. `after` hooks run
//! for every request once the final response is known.

mod access_log;
mod core;
mod count_report;
mod store_reset;
mod visit_count;

pub use access_log::AccessLogMiddleware;
pub use core::Middleware;
pub use count_report::CountReportMiddleware;
pub use store_reset::StoreResetMiddleware;
pub use visit_count::VisitCountMiddleware;
