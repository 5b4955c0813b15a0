//! # jsonstead
//!
//! A JSONPlaceholder-style mock API server built on the `may` coroutine
//! runtime and `may_minihttp`.
//!
//! jsonstead serves a static JSON fixture (`posts`, `comments`, `albums`,
//! `photos`, `todos`, `users`) over two surfaces:
//!
//! - a REST-like CRUD surface (`GET/POST/PUT/PATCH/DELETE /posts` and friends)
//! - a GraphQL endpoint at `/graphql`
//!
//! Every request to one of the six resource prefixes bumps a visit counter
//! persisted as decimal text in a file, reported back at `GET /count`. Before
//! every non-root request the working store is replaced with a fresh snapshot
//! of the fixture, so the API behaves like a stateless mock: writes are
//! visible in their own response but discarded by the next request.
//!
//! ## Architecture
//!
//! - [`fixture`] - fixture loading and snapshotting
//! - [`store`] - the mutable working store with json-server CRUD semantics
//! - [`counter`] - the file-backed visit counter
//! - [`router`] - regex route table for the six resource collections
//! - [`dispatcher`] - coroutine-based handler dispatch over channels
//! - [`handlers`] / [`registry`] - the CRUD handlers and their registration
//! - [`middleware`] - the ordered request chain (count, report, reset, log)
//! - [`graphql`] - juniper schema and resolvers over the working store
//! - [`server`] - HTTP request parsing, response writing, and the service loop
//!
//! ## Request flow
//!
//! The service evaluates an ordered chain per request; the first stage to
//! produce a response terminates the chain. GraphQL is mounted ahead of the
//! chain, then visit counting, the `/count` report, the store reset, access
//! logging, and finally the resource router.

pub mod cli;
pub mod counter;
pub mod dispatcher;
pub mod fixture;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod store;

pub use counter::VisitCounter;
pub use fixture::{Dataset, RESOURCES};
pub use store::Store;
