//! The multiplexer façade over the trie.
//!
//! [`Mux`] owns a [`Trie`], prefixes registrations with its root (empty
//! on a top-level mux), and resolves request paths through a pooled
//! parameter sink. [`SubMux`] is the grouping handle: it borrows the
//! shared trie mutably, so groups are registration-phase values by
//! construction: once dispatching starts nothing can register anymore.

use std::borrow::Cow;
use std::fmt;

use pathmux_trie::{Entry, NodeRef, Params, Trie};

use crate::pool::{ParamsPool, PooledParams};

/// A request path multiplexer.
///
/// Patterns name fixed, rooted paths or dynamic ones like
/// `/profile/:name` or `/files/*file`. The payload attached to a pattern
/// is opaque; dispatching returns it with the captured parameters and
/// leaves invocation to the caller.
///
/// # Example
///
/// ```
/// use pathmux::Mux;
///
/// let mut mux = Mux::new();
/// mux.handle("/", "index");
/// mux.handle("/profile/:name", "profile");
///
/// let hit = mux.dispatch("/profile/kataras").unwrap();
/// assert_eq!(*hit.payload(), "profile");
/// assert_eq!(hit.params().get("name"), Some("kataras"));
/// ```
pub struct Mux<T> {
    routes: Trie<T>,
    root: String,
    path_correction: bool,
    pool: ParamsPool,
}

impl<T> Mux<T> {
    /// Creates an empty multiplexer with no prefix and path correction
    /// disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Trie::new(),
            root: String::new(),
            path_correction: false,
            pool: ParamsPool::default(),
        }
    }

    /// Enables or disables trailing-slash correction, builder style.
    #[must_use]
    pub fn with_path_correction(mut self, enabled: bool) -> Self {
        self.path_correction = enabled;
        self
    }

    /// Enables or disables trailing-slash correction.
    pub fn set_path_correction(&mut self, enabled: bool) {
        self.path_correction = enabled;
    }

    /// True when dispatch normalizes paths with a trailing slash.
    #[must_use]
    pub fn path_correction(&self) -> bool {
        self.path_correction
    }

    /// The registration prefix; empty on a top-level mux.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The underlying trie, for introspection (route listings, prefix
    /// queries, custom searches).
    #[must_use]
    pub fn routes(&self) -> &Trie<T> {
        &self.routes
    }

    /// Registers `pattern` (prefixed by this mux's root) with a payload.
    ///
    /// # Panics
    ///
    /// Panics if the resulting pattern is empty.
    pub fn handle(&mut self, pattern: &str, payload: T) {
        self.handle_entry(pattern, Entry::new(payload));
    }

    /// Registers `pattern` with a payload plus tag/data.
    ///
    /// # Panics
    ///
    /// Panics if the resulting pattern is empty.
    pub fn handle_entry(&mut self, pattern: &str, entry: Entry<T>) {
        let full = format!("{}{}", self.root, pattern);
        self.routes.insert_entry(&full, entry);
    }

    /// Derives a sub-multiplexer that registers under an extended prefix
    /// into this mux's trie.
    ///
    /// `""` and `"/"` (and the current root itself) derive with the
    /// prefix unchanged.
    ///
    /// ```
    /// use pathmux::Mux;
    ///
    /// let mut mux = Mux::new();
    /// let mut v1 = mux.of("/v1");
    /// v1.handle("/users", "v1-users");
    ///
    /// assert!(mux.dispatch("/v1/users").is_some());
    /// ```
    pub fn of(&mut self, prefix: &str) -> SubMux<'_, T> {
        let root = derive_prefix(&self.root, prefix);
        SubMux {
            routes: &mut self.routes,
            root,
        }
    }

    /// Resolves a request path and returns the payload registered for it
    /// together with the captured parameters, or `None` on a miss.
    ///
    /// With path correction enabled, a path that ends in `/` (and is not
    /// just `/`) is normalized first: duplicate slashes collapsed,
    /// trailing slashes dropped. Callers that want to redirect on the
    /// normalized-vs-original difference can compare against
    /// [`normalize_path`] themselves.
    pub fn dispatch(&self, path: &str) -> Option<Matched<'_, T>> {
        let corrected;
        let path = if self.path_correction && path.len() > 1 && path.ends_with('/') {
            corrected = normalize_path(path);
            corrected.as_ref()
        } else {
            path
        };

        let mut params = self.pool.acquire();
        let node = match self.routes.search(path, &mut params) {
            Some(node) => node,
            None => {
                self.pool.release(params);
                return None;
            }
        };
        let payload = match node.payload() {
            Some(payload) => payload,
            None => {
                self.pool.release(params);
                return None;
            }
        };

        Some(Matched {
            node,
            payload,
            params: self.pool.guard(params),
        })
    }
}

impl<T> Default for Mux<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Mux<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mux")
            .field("root", &self.root)
            .field("path_correction", &self.path_correction)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

/// A successful dispatch: the matched terminal and its captures.
///
/// Dropping it returns the parameter sink to the multiplexer's pool.
pub struct Matched<'m, T> {
    node: NodeRef<'m, T>,
    payload: &'m T,
    params: PooledParams<'m>,
}

impl<'m, T> Matched<'m, T> {
    /// The payload registered for the matched pattern.
    #[must_use]
    pub fn payload(&self) -> &'m T {
        self.payload
    }

    /// The matched pattern.
    #[must_use]
    pub fn pattern(&self) -> &'m str {
        self.node.key()
    }

    /// The tag attached at registration, if any.
    #[must_use]
    pub fn tag(&self) -> Option<&'m str> {
        self.node.tag()
    }

    /// The matched terminal node.
    #[must_use]
    pub fn node(&self) -> NodeRef<'m, T> {
        self.node
    }

    /// The captured parameters, in pattern order.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl<T> fmt::Debug for Matched<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matched")
            .field("pattern", &self.pattern())
            .field("params", self.params())
            .finish_non_exhaustive()
    }
}

/// A grouping handle derived from [`Mux::of`].
///
/// Shares the parent's trie and prefixes every registration with its own
/// root. Deriving never fails; overlapping groups simply register into
/// the same trie, where the last insertion of a pattern wins.
pub struct SubMux<'m, T> {
    routes: &'m mut Trie<T>,
    root: String,
}

impl<T> SubMux<'_, T> {
    /// The registration prefix of this group.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Registers `pattern` (prefixed by this group's root) with a
    /// payload.
    ///
    /// # Panics
    ///
    /// Panics if the resulting pattern is empty.
    pub fn handle(&mut self, pattern: &str, payload: T) {
        self.handle_entry(pattern, Entry::new(payload));
    }

    /// Registers `pattern` with a payload plus tag/data.
    ///
    /// # Panics
    ///
    /// Panics if the resulting pattern is empty.
    pub fn handle_entry(&mut self, pattern: &str, entry: Entry<T>) {
        let full = format!("{}{}", self.root, pattern);
        self.routes.insert_entry(&full, entry);
    }

    /// Derives a deeper group.
    pub fn of(&mut self, prefix: &str) -> SubMux<'_, T> {
        let root = derive_prefix(&self.root, prefix);
        SubMux {
            routes: &mut *self.routes,
            root,
        }
    }
}

impl<T> fmt::Debug for SubMux<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubMux")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Computes the root of a derived group from the parent root and the
/// requested subprefix.
fn derive_prefix(root: &str, prefix: &str) -> String {
    if prefix.is_empty() || prefix == "/" || prefix == root {
        return root.to_owned();
    }

    let mut prefix = prefix;
    // A subprefix the parent root already starts with folds back into
    // the portion before its last occurrence there.
    if root.starts_with(prefix) {
        let last = root.rfind(prefix).unwrap_or(0);
        prefix = prefix.get(..last).unwrap_or(prefix);
    }

    let prefix = prefix.strip_suffix('/').unwrap_or(prefix);

    let joined = format!("{root}{prefix}");
    let trimmed = joined.trim_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    format!("/{trimmed}")
}

/// Normalizes a request path: duplicate slashes collapse, trailing
/// slashes drop, and the result always starts with `/`.
///
/// Returns the input unchanged (borrowed) when it is already normal.
#[must_use]
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let already_normal = !path.is_empty()
        && path.starts_with('/')
        && !path.contains("//")
        && (path.len() == 1 || !path.ends_with('/'));
    if already_normal {
        return Cow::Borrowed(path);
    }

    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    Cow::Owned(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_normal_paths_borrowed() {
        assert!(matches!(normalize_path("/a/b"), Cow::Borrowed("/a/b")));
        assert!(matches!(normalize_path("/"), Cow::Borrowed("/")));
    }

    #[test]
    fn normalize_collapses_and_trims() {
        assert_eq!(normalize_path("/a//b/"), "/a/b");
        assert_eq!(normalize_path("//a///b"), "/a/b");
        assert_eq!(normalize_path("a/b"), "/a/b");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn derive_from_empty_root() {
        assert_eq!(derive_prefix("", "/v1"), "/v1");
        assert_eq!(derive_prefix("", "v1"), "/v1");
        assert_eq!(derive_prefix("", "/v1/"), "/v1");
        assert_eq!(derive_prefix("", ""), "");
        assert_eq!(derive_prefix("", "/"), "");
    }

    #[test]
    fn derive_extends_an_existing_root() {
        assert_eq!(derive_prefix("/v1", "/users"), "/v1/users");
        assert_eq!(derive_prefix("/v1", "users"), "/v1users");
        assert_eq!(derive_prefix("/v1", "/users/"), "/v1/users");
    }

    #[test]
    fn derive_identity_cases() {
        assert_eq!(derive_prefix("/v1", "/v1"), "/v1");
        assert_eq!(derive_prefix("/v1", ""), "/v1");
        assert_eq!(derive_prefix("/v1", "/"), "/v1");
    }

    #[test]
    fn derive_contained_subprefix_folds_into_the_root() {
        // The root already begins with the subprefix: the subprefix
        // collapses to the span before its last occurrence in the root.
        assert_eq!(derive_prefix("/v1/users", "/v1"), "/v1/users");
    }
}
