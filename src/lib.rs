//! An ordered request router with middleware chaining.
//!
//! Routes are tried in the order they were registered. A matched entry runs
//! its handler chain; each handler either calls [`Next`] to pass the request
//! on or completes the response and stops there. Routers can be mounted
//! under a prefix of another router, and a request nothing handles ends in
//! the caller's continuation or a `404 Not found`.
//!
//! Pattern forms:
//!
//! | pattern          | matches                                       |
//! |------------------|-----------------------------------------------|
//! | `/a/b`           | exactly `/a/b`                                |
//! | `/a/*`           | `/a` and anything under `/a/`                 |
//! | `/a*`            | anything starting with `/a`                   |
//! | `/a/`            | `/a` or `/a/`                                 |
//! | `/a/:id`, `(re)` | named or custom captures, see [`Params`]      |

#![forbid(unsafe_code)]

mod app;
mod controller;
mod fast_router;
mod handler;
mod params;
mod pattern;
mod request;
mod response;
mod router;

#[cfg(feature = "hyper-service")]
pub mod hyper_service;

pub use crate::app::App;
pub use crate::controller::Controller;
pub use crate::fast_router::FastRouter;
pub use crate::handler::{handler, BoxHandler, Handler};
pub use crate::params::Params;
pub use crate::request::Request;
pub use crate::response::Response;
pub use crate::router::{MountTarget, Next, Router, RouterError};

pub use http::{Method, StatusCode};
