use crate::controller::Controller;
use crate::handler::BoxHandler;
use crate::request::Request;
use crate::response::Response;
use crate::router::{MountTarget, Router, RouterError};

use http::Method;

/// A pair of routers: everything mounted runs before any route.
///
/// A request first walks the middleware router; whatever falls through it
/// walks the route router, and whatever falls through that gets 404.
#[derive(Debug, Default)]
pub struct App {
    middlewares: Router,
    routes: Router,
}

impl App {
    pub fn new() -> Self {
        Self {
            middlewares: Router::new(),
            routes: Router::new(),
        }
    }

    pub fn route<I>(&mut self, pattern: &str, method: Option<Method>, chain: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        self.routes.route(pattern, method, chain);
        self
    }

    pub fn try_route<I>(
        &mut self,
        pattern: &str,
        method: Option<Method>,
        chain: I,
    ) -> Result<&mut Self, RouterError>
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        self.routes.try_route(pattern, method, chain)?;
        Ok(self)
    }

    pub fn get<I>(&mut self, pattern: &str, chain: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        self.routes.get(pattern, chain);
        self
    }

    pub fn post<I>(&mut self, pattern: &str, chain: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        self.routes.post(pattern, chain);
        self
    }

    pub fn mount<I>(&mut self, prefix: &str, targets: I) -> &mut Self
    where
        I: IntoIterator<Item = MountTarget>,
    {
        self.middlewares.mount(prefix, targets);
        self
    }

    pub fn try_mount<I>(&mut self, prefix: &str, targets: I) -> Result<&mut Self, RouterError>
    where
        I: IntoIterator<Item = MountTarget>,
    {
        self.middlewares.try_mount(prefix, targets)?;
        Ok(self)
    }

    pub fn mount_router(&mut self, prefix: &str, router: impl Into<MountTarget>) -> &mut Self {
        self.middlewares.mount_router(prefix, router);
        self
    }

    pub fn controller(&mut self, ctrl: Controller) -> &mut Self {
        let path = ctrl.path().to_owned();
        if let Err(e) = self.try_controller(ctrl) {
            panic!("{}: pattern = {:?}", e, path);
        }
        self
    }

    pub fn try_controller(&mut self, ctrl: Controller) -> Result<&mut Self, RouterError> {
        let (path, targets) = ctrl.build()?;
        self.middlewares.try_mount(&path, targets)?;
        Ok(self)
    }

    pub fn handle(&self, req: &mut Request, res: &mut Response) {
        let routes = &self.routes;
        let then = |req: &mut Request, res: &mut Response| routes.dispatch(req, res);
        self.middlewares.dispatch_with(req, res, &then)
    }
}
