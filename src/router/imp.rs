use super::endpoint::{Layer, MountTarget, Target};
use super::error::RouterError;
use super::{Entry, Router};
use crate::handler::BoxHandler;
use crate::pattern::{mount_pattern, trim_trailing_slash, PathPattern};

use std::mem;

use http::Method;

impl Router {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            base_path: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The accumulated mount prefix; empty for a router that is not mounted.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn route<I>(&mut self, pattern: &str, method: Option<Method>, chain: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        if let Err(e) = self.try_route(pattern, method, chain) {
            panic!("{}: pattern = {:?}", e, pattern);
        }
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
        let pattern = PathPattern::compile(pattern)?;
        let chain = chain.into_iter().map(Layer::Callback).collect();
        self.push_entry(pattern, method, chain);
        Ok(self)
    }

    pub fn get<I>(&mut self, pattern: &str, chain: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        self.route(pattern, Some(Method::GET), chain)
    }

    pub fn post<I>(&mut self, pattern: &str, chain: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        self.route(pattern, Some(Method::POST), chain)
    }

    /// Runs handlers and routers for every request under `prefix`.
    ///
    /// Consecutive handlers share one entry; each router gets an entry of its
    /// own. Written order is kept.
    pub fn mount<I>(&mut self, prefix: &str, targets: I) -> &mut Self
    where
        I: IntoIterator<Item = MountTarget>,
    {
        if let Err(e) = self.try_mount(prefix, targets) {
            panic!("{}: pattern = {:?}", e, prefix);
        }
        self
    }

    pub fn try_mount<I>(&mut self, prefix: &str, targets: I) -> Result<&mut Self, RouterError>
    where
        I: IntoIterator<Item = MountTarget>,
    {
        let pattern = PathPattern::compile(&mount_pattern(prefix))?;
        let prefix = trim_trailing_slash(prefix);
        let base = format!("{}{}", self.base_path, prefix);

        let mut pending: Vec<Layer> = Vec::new();
        for target in targets {
            match target.inner {
                Target::Callback(h) => pending.push(Layer::Callback(h)),
                Target::SubRouter(mut router) => {
                    if !pending.is_empty() {
                        self.push_entry(pattern.clone(), None, mem::take(&mut pending));
                    }
                    router.rebase(&base);
                    tracing::debug!(base = %base, "router mounted");
                    let layer = Layer::SubRouter {
                        prefix: prefix.into(),
                        router,
                    };
                    self.push_entry(pattern.clone(), None, vec![layer]);
                }
            }
        }
        if !pending.is_empty() {
            self.push_entry(pattern, None, pending);
        }
        Ok(self)
    }

    pub fn mount_router(&mut self, prefix: &str, router: impl Into<MountTarget>) -> &mut Self {
        self.mount(prefix, Some(router.into()))
    }

    pub fn nest(&mut self, prefix: &str, f: impl FnOnce(&mut Router)) -> &mut Self {
        let mut router = Self::new();
        f(&mut router);
        self.mount_router(prefix, router)
    }

    pub fn try_nest(
        &mut self,
        prefix: &str,
        f: impl FnOnce(&mut Router),
    ) -> Result<&mut Self, RouterError> {
        let mut router = Self::new();
        f(&mut router);
        self.try_mount(prefix, Some(router.into()))
    }

    fn push_entry(&mut self, pattern: PathPattern, method: Option<Method>, chain: Vec<Layer>) {
        self.entries.push(Entry {
            method,
            pattern,
            chain,
        });
    }
}
