use crate::request::Request;
use crate::response::Response;
use crate::router::Next;

/// One layer of a route's handler chain.
///
/// A handler either calls `next` to pass control on, or completes the
/// response and returns, which stops the dispatch.
pub trait Handler: Send + Sync {
    fn call(&self, req: &mut Request, res: &mut Response, next: Next<'_>);
}

pub type BoxHandler = Box<dyn Handler>;

impl Handler for BoxHandler {
    fn call(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        Handler::call(&**self, req, res, next)
    }
}

impl<F> Handler for F
where
    F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync,
{
    fn call(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        (self)(req, res, next)
    }
}

/// Boxes a closure as a handler, fixing its signature for inference.
pub fn handler<F>(f: F) -> BoxHandler
where
    F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
{
    Box::new(f)
}

/// Builds a handler chain, in call order.
///
/// ```
/// use nuclear_dispatch::{chain, Request, Response, Router};
///
/// let mut router = Router::new();
/// router.get(
///     "/hello",
///     chain![
///         |req, res, next| {
///             res.write("hello, ");
///             next.call(req, res)
///         },
///         |_, res, _| res.end("world"),
///     ],
/// );
///
/// let mut res = Response::new();
/// router.dispatch(&mut Request::get("/hello"), &mut res);
/// assert_eq!(res.text(), "hello, world");
/// ```
#[macro_export]
macro_rules! chain {
    [$($h:expr),* $(,)?] => {
        ::std::vec![$($crate::handler($h)),*]
    };
}
