use std::collections::btree_map;
use std::collections::BTreeMap;

/// Params is the parameter set sent with every open platform call.
///
/// Keys are kept in byte-wise ascending order, which is the order both the
/// signature and the encoded form use. Values of a repeated key keep their
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: BTreeMap<String, Vec<String>>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `application/x-www-form-urlencoded` string, like a url query.
    pub fn parse(input: &str) -> Self {
        form_urlencoded::parse(input.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Set the value of key, replacing any existing values.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// Append a value to key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Get the first value of key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|vs| vs.first())
            .map(String::as_str)
    }

    /// Get all values of key.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Remove key and return its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.inner.remove(key)
    }

    /// Check if key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over keys in sorted order with their values.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.inner.iter()
    }

    /// Encode as `application/x-www-form-urlencoded`, sorted by key.
    pub fn encode(&self) -> String {
        let mut s = form_urlencoded::Serializer::new(String::new());
        for (k, vs) in &self.inner {
            for v in vs {
                s.append_pair(k, v);
            }
        }
        s.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
