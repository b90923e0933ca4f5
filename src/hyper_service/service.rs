use crate::app::App;
use crate::request::Request;
use crate::response::Response;

use std::convert::Infallible;
use std::future::{ready, Ready};
use std::sync::Arc;
use std::task::{Context, Poll};

use hyper::service::Service;
use hyper::Body;

/// Serves an [`App`] to hyper. Cloning shares the app.
///
/// Dispatch runs to completion inside `call`; the request body is not read.
#[derive(Debug, Clone)]
pub struct RouterService {
    app: Arc<App>,
}

impl RouterService {
    pub fn new(app: App) -> Self {
        Self::from_shared(Arc::new(app))
    }

    pub fn from_shared(app: Arc<App>) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Service<hyper::Request<Body>> for RouterService {
    type Response = hyper::Response<Body>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: hyper::Request<Body>) -> Self::Future {
        let (parts, _) = req.into_parts();
        let mut req = Request::from_parts(&parts);
        let mut res = Response::new();

        self.app.handle(&mut req, &mut res);
        if !res.is_ended() {
            tracing::debug!(path = req.path(), "dispatch returned with an open response");
        }

        ready(Ok(res.into_http().map(Body::from)))
    }
}
