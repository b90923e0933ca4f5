use super::endpoint::{Layer, Nested, Outer};
use super::{Entry, Router};
use crate::params::Params;
use crate::request::Request;
use crate::response::Response;

use http::{Method, StatusCode};

/// The continuation handed to each handler.
///
/// Calling it runs the next handler of the current chain; past the end of
/// the chain the router resumes scanning after the matched entry. Dropping
/// it without a call ends the dispatch.
pub struct Next<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Next<'a> {
    pub fn call(self, req: &mut Request, res: &mut Response) {
        self.cursor.resume(req, res)
    }

    pub(super) fn into_cursor(self) -> Cursor<'a> {
        self.cursor
    }
}

/// Position inside a handler chain plus what to do once it is exhausted.
#[derive(Clone, Copy)]
pub(crate) struct Cursor<'a> {
    chain: &'a [Layer],
    pos: usize,
    then: Resume<'a>,
}

#[derive(Clone, Copy)]
pub(crate) enum Resume<'a> {
    Scan {
        router: &'a Router,
        from: usize,
        outer: Outer<'a>,
    },
    Fallback(Outer<'a>),
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(chain: &'a [Layer], then: Resume<'a>) -> Self {
        Self {
            chain,
            pos: 0,
            then,
        }
    }

    pub(crate) fn resume(self, req: &mut Request, res: &mut Response) {
        match self.chain.get(self.pos) {
            Some(layer) => {
                let next = Next {
                    cursor: Self {
                        pos: self.pos + 1,
                        ..self
                    },
                };
                layer.call(req, res, next)
            }
            None => match self.then {
                Resume::Scan {
                    router,
                    from,
                    outer,
                } => router.scan(req, res, from, outer),
                Resume::Fallback(outer) => fallback(req, res, outer),
            },
        }
    }
}

/// Hands the request back to the caller, or answers 404 when there is no
/// caller and nothing has completed the response yet.
pub(crate) fn fallback(req: &mut Request, res: &mut Response, outer: Outer<'_>) {
    match outer {
        Some(next) => next(req, res),
        None => {
            if !res.is_ended() {
                tracing::debug!(method = %req.method(), path = req.path(), "no route matched");
                res.status(StatusCode::NOT_FOUND).end("Not found");
            }
        }
    }
}

impl Entry {
    #[inline]
    fn allows(&self, method: &Method) -> bool {
        match &self.method {
            Some(m) => m.as_str().eq_ignore_ascii_case(method.as_str()),
            None => true,
        }
    }
}

impl Router {
    /// Dispatches a request with no continuation: unmatched requests get 404.
    pub fn dispatch(&self, req: &mut Request, res: &mut Response) {
        self.scan(req, res, 0, None)
    }

    /// Dispatches a request, handing it to `next` when this router is done
    /// with it.
    pub fn dispatch_with(
        &self,
        req: &mut Request,
        res: &mut Response,
        next: &dyn Fn(&mut Request, &mut Response),
    ) {
        self.scan(req, res, 0, Some(next))
    }

    pub(crate) fn scan<'a>(
        &'a self,
        req: &mut Request,
        res: &mut Response,
        from: usize,
        outer: Outer<'a>,
    ) {
        let (idx, params) = match self.find_from(req.method(), req.path(), from) {
            Some(found) => found,
            None => return fallback(req, res, outer),
        };

        let entry = &self.entries[idx];
        tracing::trace!(pattern = entry.pattern.as_str(), index = idx, "route matched");
        req.set_params(params);

        let then = Resume::Scan {
            router: self,
            from: idx + 1,
            outer,
        };
        Cursor::new(&entry.chain, then).resume(req, res)
    }

    fn find_from(&self, method: &Method, path: &str, from: usize) -> Option<(usize, Params)> {
        let rest = path.get(self.base_path.len()..).unwrap_or("");
        self.entries
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(i, entry)| {
                if !entry.pattern.prefix_matches(rest) || !entry.allows(method) {
                    return None;
                }
                entry.pattern.match_path(rest).map(|params| (i, params))
            })
    }
}

impl Nested for Router {
    fn rebase(&mut self, base: &str) {
        self.base_path = base.to_owned();
        for layer in self.entries.iter_mut().flat_map(|e| e.chain.iter_mut()) {
            layer.rebase(base);
        }
    }

    fn dispatch_nested(&self, req: &mut Request, res: &mut Response, outer: Outer<'_>) {
        self.scan(req, res, 0, outer)
    }
}
