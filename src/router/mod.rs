mod dispatch;
mod endpoint;
mod error;
mod imp;

pub use self::dispatch::Next;
pub use self::endpoint::MountTarget;
pub use self::error::RouterError;

pub(crate) use self::dispatch::{fallback, Cursor, Resume};
pub(crate) use self::endpoint::{Layer, Nested, Outer};

use crate::pattern::PathPattern;

use http::Method;

/// An ordered route store. Entries are tried in registration order and the
/// first one whose pattern and method match runs its handler chain.
#[derive(Debug, Default)]
pub struct Router {
    entries: Vec<Entry>,
    base_path: String,
}

#[derive(Debug)]
struct Entry {
    method: Option<Method>,
    pattern: PathPattern,
    chain: Vec<Layer>,
}
