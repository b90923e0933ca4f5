use crate::handler::{handler, BoxHandler};
use crate::request::Request;
use crate::response::Response;
use crate::router::{MountTarget, Next, Router, RouterError};

use std::fmt;

use http::Method;

/// Collects the routes and middleware of one controller under a base path.
///
/// Registered with [`App::controller`](crate::App::controller), which mounts
/// the controller-wide handlers, then a router holding the middleware, then
/// a router holding the routes, all at the base path.
pub struct Controller {
    path: String,
    wide: Vec<BoxHandler>,
    middlewares: Vec<(String, BoxHandler)>,
    routes: Vec<(String, Option<Method>, BoxHandler)>,
}

impl Controller {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            wide: Vec::new(),
            middlewares: Vec::new(),
            routes: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Adds a handler that runs for every request under the base path.
    pub fn with<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
    {
        self.wide.push(handler(f));
        self
    }

    pub fn middleware<F>(mut self, path: &str, f: F) -> Self
    where
        F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
    {
        self.middlewares.push((path.to_owned(), handler(f)));
        self
    }

    pub fn route<F>(mut self, path: &str, method: Option<Method>, f: F) -> Self
    where
        F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
    {
        self.routes.push((path.to_owned(), method, handler(f)));
        self
    }

    pub fn get<F>(self, path: &str, f: F) -> Self
    where
        F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
    {
        self.route(path, Some(Method::GET), f)
    }

    pub fn post<F>(self, path: &str, f: F) -> Self
    where
        F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
    {
        self.route(path, Some(Method::POST), f)
    }

    pub(crate) fn build(self) -> Result<(String, Vec<MountTarget>), RouterError> {
        if self.routes.is_empty() {
            return Err(RouterError::EmptyController);
        }

        let mut middleware_router = Router::new();
        for (path, h) in self.middlewares {
            middleware_router.try_mount(&path, Some(h.into()))?;
        }

        let mut route_router = Router::new();
        for (path, method, h) in self.routes {
            route_router.try_route(&path, method, Some(h))?;
        }

        let mut targets: Vec<MountTarget> = self.wide.into_iter().map(MountTarget::from).collect();
        targets.push(middleware_router.into());
        targets.push(route_router.into());
        Ok((self.path, targets))
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("path", &self.path)
            .field("middlewares", &self.middlewares.len())
            .field("routes", &self.routes.len())
            .finish()
    }
}
