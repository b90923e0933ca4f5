use std::ops::Deref;
use std::str::FromStr;

use smallvec::SmallVec;

/// Values captured from the request path by the last matched entry,
/// in the order the pattern declares them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params {
    buf: SmallVec<[(String, String); 4]>,
}

impl Params {
    pub fn new() -> Self {
        Self {
            buf: SmallVec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.buf
            .iter()
            .find_map(|(k, v)| if name == k { Some(v.as_str()) } else { None })
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    /// Sets `name`, replacing an earlier value with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.buf.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.buf.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.buf.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Deref for Params {
    type Target = [(String, String)];
    fn deref(&self) -> &Self::Target {
        &*self.buf
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = smallvec::IntoIter<[(String, String); 4]>;
    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

#[test]
fn params_overwrite_keeps_position() {
    let mut params = Params::new();
    params.insert("uid", "1");
    params.insert("pid", "2");
    params.insert("uid", "3");

    assert_eq!(params.get("uid"), Some("3"));
    assert_eq!(params.parse::<u32>("pid").unwrap().unwrap(), 2);
    let order: Vec<_> = params.iter().map(|(k, _)| k).collect();
    assert_eq!(order, ["uid", "pid"]);
    assert!(params.get("missing").is_none());
}
