use super::dispatch::Next;
use super::Router;
use crate::fast_router::FastRouter;
use crate::handler::{BoxHandler, Handler};
use crate::request::Request;
use crate::response::Response;

use std::fmt;

/// A caller-supplied continuation, run when a router finds nothing more to do.
pub(crate) type Outer<'a> = Option<&'a (dyn Fn(&mut Request, &mut Response) + 'a)>;

/// A router that can be mounted under a prefix of another router.
pub(crate) trait Nested: Send + Sync {
    /// Sets the offset at which this router's own patterns start.
    fn rebase(&mut self, base: &str);

    fn dispatch_nested(&self, req: &mut Request, res: &mut Response, outer: Outer<'_>);
}

pub(crate) enum Layer {
    Callback(BoxHandler),
    SubRouter {
        prefix: Box<str>,
        router: Box<dyn Nested>,
    },
}

impl Layer {
    pub(super) fn call(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        match self {
            Self::Callback(h) => h.call(req, res, next),
            Self::SubRouter { router, .. } => {
                let cursor = next.into_cursor();
                let resume: &dyn Fn(&mut Request, &mut Response) =
                    &move |req: &mut Request, res: &mut Response| cursor.resume(req, res);
                router.dispatch_nested(req, res, Some(resume))
            }
        }
    }

    pub(super) fn rebase(&mut self, base: &str) {
        if let Self::SubRouter { prefix, router } = self {
            router.rebase(&format!("{}{}", base, prefix));
        }
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback"),
            Self::SubRouter { prefix, .. } => {
                f.debug_struct("SubRouter").field("prefix", prefix).finish()
            }
        }
    }
}

/// An argument to [`Router::mount`]: either a plain handler or a router.
pub struct MountTarget {
    pub(super) inner: Target,
}

pub(super) enum Target {
    Callback(BoxHandler),
    SubRouter(Box<dyn Nested>),
}

impl MountTarget {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
    {
        crate::handler::handler(f).into()
    }
}

impl From<BoxHandler> for MountTarget {
    fn from(h: BoxHandler) -> Self {
        Self {
            inner: Target::Callback(h),
        }
    }
}

impl From<Router> for MountTarget {
    fn from(r: Router) -> Self {
        Self {
            inner: Target::SubRouter(Box::new(r)),
        }
    }
}

impl From<FastRouter> for MountTarget {
    fn from(r: FastRouter) -> Self {
        Self {
            inner: Target::SubRouter(Box::new(r)),
        }
    }
}

impl fmt::Debug for MountTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Target::Callback(_) => f.write_str("MountTarget::Callback"),
            Target::SubRouter(_) => f.write_str("MountTarget::SubRouter"),
        }
    }
}
