use crate::handler::BoxHandler;
use crate::pattern::PathPattern;
use crate::request::Request;
use crate::response::Response;
use crate::router::{fallback, Cursor, Layer, Nested, Outer, Resume, RouterError};

use std::collections::HashMap;

use http::Method;

/// A route store keyed by exact path.
///
/// Dispatch is a single hash lookup on the path past the mount prefix, so
/// only plain literal paths are accepted, and method filters are not
/// supported yet: every registration must pass `None`.
#[derive(Debug, Default)]
pub struct FastRouter {
    map: HashMap<Box<str>, Vec<Layer>>,
    base_path: String,
}

impl FastRouter {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            base_path: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn route<I>(&mut self, path: &str, method: Option<Method>, chain: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        if let Err(e) = self.try_route(path, method, chain) {
            panic!("{}: pattern = {:?}", e, path);
        }
        self
    }

    pub fn try_route<I>(
        &mut self,
        path: &str,
        method: Option<Method>,
        chain: I,
    ) -> Result<&mut Self, RouterError>
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        let pattern = PathPattern::compile(path)?;
        if method.is_some() {
            return Err(RouterError::FastMethodFilter);
        }
        let path = pattern.as_literal().ok_or(RouterError::FastNotLiteral)?;

        let chain = chain.into_iter().map(Layer::Callback).collect();
        if self.map.insert(path.into(), chain).is_some() {
            tracing::warn!(path, "fast route registered twice, replacing the earlier one");
        }
        Ok(self)
    }

    pub fn insert<I>(&mut self, path: &str, chain: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        self.route(path, None, chain)
    }

    pub fn dispatch(&self, req: &mut Request, res: &mut Response) {
        self.run(req, res, None)
    }

    pub fn dispatch_with(
        &self,
        req: &mut Request,
        res: &mut Response,
        next: &dyn Fn(&mut Request, &mut Response),
    ) {
        self.run(req, res, Some(next))
    }

    fn run<'a>(&'a self, req: &mut Request, res: &mut Response, outer: Outer<'a>) {
        let chain = req
            .path()
            .get(self.base_path.len()..)
            .and_then(|rest| self.map.get(rest));

        match chain {
            Some(chain) => Cursor::new(chain, Resume::Fallback(outer)).resume(req, res),
            None => fallback(req, res, outer),
        }
    }
}

impl Nested for FastRouter {
    fn rebase(&mut self, base: &str) {
        self.base_path = base.to_owned();
    }

    fn dispatch_nested(&self, req: &mut Request, res: &mut Response, outer: Outer<'_>) {
        self.run(req, res, outer)
    }
}
