//! The path-segment trie: insertion and search.
//!
//! The trie matches static segments, named parameters (`:name`) and
//! wildcards (`*name`) with a strict priority: static first, then named,
//! then wildcard, and, when a walk dead-ends below a wildcard, a
//! fallback to the closest wildcard of an enclosing pattern. This is what
//! lets `/uploads/totalsize` win over `/uploads/:uploader`, which in turn
//! wins over `/uploads/*file`, while `/second/wild/*p` still covers
//! requests that descended into `/second/wild/:p/static` and failed a
//! later static check.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

use crate::node::{
    Node, NodeId, NodeRef, PARAM_START, PATH_SEP, PATH_SEP_BYTE, WILDCARD_PARAM_START,
};
use crate::params::ParamsSetter;

/// Everything attached to a pattern at registration: the payload plus an
/// optional tag (route names and the like) and optional opaque data.
pub struct Entry<T> {
    payload: T,
    tag: Option<String>,
    data: Option<Box<dyn Any + Send + Sync>>,
}

impl<T> Entry<T> {
    /// Wraps a payload with no tag and no extra data.
    #[must_use]
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            tag: None,
            data: None,
        }
    }

    /// Attaches a tag, readable later via [`NodeRef::tag`].
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Attaches extra data, readable later via [`NodeRef::data`].
    #[must_use]
    pub fn with_data(mut self, data: impl Any + Send + Sync) -> Self {
        self.data = Some(Box::new(data));
        self
    }
}

/// A trie keyed by path segments, carrying one opaque payload per
/// registered pattern.
///
/// Registration requires `&mut self` and searching requires `&self`, so
/// the register-then-serve contract is enforced by the borrow checker:
/// once the trie is shared (behind `&`, an `Arc`, or similar) it can no
/// longer be mutated, and concurrent lookups need no lock.
pub struct Trie<T> {
    nodes: Vec<Node<T>>,
    /// A `/*wildcard` was registered directly under the root; such a trie
    /// resolves every path, so even "not found" is one of its routes.
    has_root_wildcard: bool,
    has_root_slash: bool,
}

const ROOT: NodeId = 0;

impl<T> Trie<T> {
    /// Creates an empty trie.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None)],
            has_root_wildcard: false,
            has_root_slash: false,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id]
    }

    fn node_ref(&self, id: NodeId) -> NodeRef<'_, T> {
        NodeRef { trie: self, id }
    }

    /// Handle to the root node; its [`keys`](NodeRef::keys) enumerate
    /// every registered pattern.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_, T> {
        self.node_ref(ROOT)
    }

    /// Returns the existing child for `segment` or creates one. A second
    /// add with the same segment key keeps the existing child.
    fn child_or_insert(&mut self, parent: NodeId, segment: &str) -> NodeId {
        if let Some(existing) = self.nodes[parent].child(segment) {
            return existing;
        }
        let id = self.nodes.len();
        self.nodes.push(Node::new(Some(parent)));
        self.nodes[parent].children.insert(segment.to_owned(), id);
        id
    }

    /// Walks strictly upward from `id`'s parent and returns the wildcard
    /// child of the first ancestor that has one.
    fn closest_ancestor_wildcard(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.node(id).parent;
        while let Some(ancestor) = current {
            let node = self.node(ancestor);
            if node.child_wildcard_parameter {
                return node.child(WILDCARD_PARAM_START);
            }
            current = node.parent;
        }
        None
    }

    /// Registers `pattern` with a bare payload.
    ///
    /// # Panics
    ///
    /// Panics on an empty pattern; that is a programmer bug, not a
    /// runtime condition.
    pub fn insert(&mut self, pattern: &str, payload: T) {
        self.insert_entry(pattern, Entry::new(payload));
    }

    /// Registers `pattern` with a payload plus optional tag and data.
    ///
    /// Re-inserting a pattern overwrites the terminal's payload, tag,
    /// data and parameter names (last write wins); the tree shape never
    /// changes. `/x/:a` and `/x/:b` share one parameter child; the
    /// names live on the terminals, not on the child.
    ///
    /// # Panics
    ///
    /// Panics on an empty pattern.
    pub fn insert_entry(&mut self, pattern: &str, entry: Entry<T>) {
        assert!(!pattern.is_empty(), "pathmux: empty route pattern");

        if pattern == PATH_SEP {
            self.has_root_slash = true;
        }

        let mut current = ROOT;
        let mut param_keys = Vec::new();

        for segment in pattern_segments(pattern) {
            let child_key = match segment.bytes().next() {
                Some(b':') => {
                    let node = self.node_mut(current);
                    node.has_dynamic_child = true;
                    node.child_named_parameter = true;
                    param_keys.push(segment[1..].to_owned());
                    PARAM_START
                }
                Some(b'*') => {
                    let node = self.node_mut(current);
                    node.has_dynamic_child = true;
                    node.child_wildcard_parameter = true;
                    param_keys.push(segment[1..].to_owned());
                    if current == ROOT {
                        self.has_root_wildcard = true;
                    }
                    WILDCARD_PARAM_START
                }
                _ => segment,
            };

            current = self.child_or_insert(current, child_key);
        }

        let node = self.node_mut(current);
        node.end = true;
        node.key = pattern.to_owned();
        node.static_key = static_part(pattern).to_owned();
        node.param_keys = param_keys;
        node.payload = Some(entry.payload);
        node.tag = entry.tag;
        node.data = entry.data;
    }

    /// Resolves a request path to the responsible terminal node, writing
    /// captured parameters into `params`.
    ///
    /// Resolution order per segment: static child, named-parameter child,
    /// wildcard child (which consumes the whole remainder and stops),
    /// then the closest enclosing wildcard; a trie with a root wildcard
    /// finally absorbs anything left over. A miss is `None`, never an
    /// error.
    pub fn search<'q, P>(&self, q: &'q str, params: &mut P) -> Option<NodeRef<'_, T>>
    where
        P: ParamsSetter<'q> + ?Sized,
    {
        let end = q.len();

        if end == 0 || (end == 1 && q.as_bytes()[0] == PATH_SEP_BYTE) {
            // Root request: a registered "/" wins over a root wildcard,
            // and the root wildcard hit carries no captures.
            if self.has_root_slash {
                return self.node(ROOT).child(PATH_SEP).map(|id| self.node_ref(id));
            }
            if self.has_root_wildcard {
                return self
                    .node(ROOT)
                    .child(WILDCARD_PARAM_START)
                    .map(|id| self.node_ref(id));
            }
            return None;
        }

        if q.as_bytes()[0] != PATH_SEP_BYTE {
            // Out-of-grammar path: no pattern can match it segment-wise,
            // only a root wildcard absorbs it, capturing it whole.
            if self.has_root_wildcard {
                let wildcard = self.node(ROOT).child(WILDCARD_PARAM_START)?;
                let name = self.node(wildcard).param_keys.first()?;
                params.set(name, q);
                return Some(self.node_ref(wildcard));
            }
            return None;
        }

        let bytes = q.as_bytes();
        let mut current = ROOT;
        let mut start = 1;
        let mut i = 1;
        // Values are recorded positionally and bound to names only once
        // the terminal (and with it the name list) is known.
        let mut values: Vec<&'q str> = Vec::new();

        loop {
            if i == end || bytes[i] == PATH_SEP_BYTE {
                let node = self.node(current);

                if let Some(child) = node.child(&q[start..i]) {
                    current = child;
                } else if node.child_named_parameter {
                    current = node.child(PARAM_START)?;
                    values.push(&q[start..i]);
                } else if node.child_wildcard_parameter {
                    current = node.child(WILDCARD_PARAM_START)?;
                    values.push(&q[start..]);
                    break;
                } else {
                    // Dead end mid-path. A named sibling may have eaten a
                    // segment that only a wildcard pattern can finish, so
                    // back out to the closest enclosing wildcard instead
                    // of reporting a miss.
                    let wildcard = self.closest_ancestor_wildcard(current)?;
                    let node = self.node(wildcard);
                    let name = node.param_keys.first()?;
                    params.set(name, &q[node.static_key.len()..]);
                    return Some(self.node_ref(wildcard));
                }

                if i == end {
                    break;
                }
                i += 1;
                start = i;
                continue;
            }

            i += 1;
        }

        let node = self.node(current);
        if !node.end {
            if let Some(wildcard) = self.closest_ancestor_wildcard(current) {
                let node = self.node(wildcard);
                let name = node.param_keys.first()?;
                params.set(name, &q[node.static_key.len()..]);
                return Some(self.node_ref(wildcard));
            }

            if self.has_root_wildcard {
                let wildcard = self.node(ROOT).child(WILDCARD_PARAM_START)?;
                let name = self.node(wildcard).param_keys.first()?;
                params.set(name, &q[1..]);
                return Some(self.node_ref(wildcard));
            }

            return None;
        }

        for (index, value) in values.into_iter().enumerate() {
            if let Some(name) = node.param_keys.get(index) {
                params.set(name, value);
            }
        }

        Some(self.node_ref(current))
    }

    /// Walks literal segments only (no dynamic matching) and returns
    /// the node reached, or `None` if any segment is missing.
    #[must_use]
    pub fn search_prefix(&self, prefix: &str) -> Option<NodeRef<'_, T>> {
        let mut current = ROOT;
        for segment in pattern_segments(prefix) {
            current = self.node(current).child(segment)?;
        }
        Some(self.node_ref(current))
    }

    /// True if `prefix` reaches a node.
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.search_prefix(prefix).is_some()
    }

    /// Terminal keys at or below `prefix`, in [`default_keys_sorter`]
    /// order.
    ///
    /// [`default_keys_sorter`]: crate::default_keys_sorter
    #[must_use]
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        self.search_prefix(prefix)
            .map(|node| node.keys_sorted())
            .unwrap_or_default()
    }

    /// Terminal keys at or below `prefix`, ordered by a caller
    /// comparator.
    #[must_use]
    pub fn autocomplete_by<F>(&self, prefix: &str, compare: F) -> Vec<String>
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        self.search_prefix(prefix)
            .map(|node| node.keys_sorted_by(compare))
            .unwrap_or_default()
    }

    /// Terminal ancestors of the node at `prefix`, nearest first,
    /// excluding that node itself.
    #[must_use]
    pub fn parents(&self, prefix: &str) -> Vec<NodeRef<'_, T>> {
        let mut parents = Vec::new();
        if let Some(node) = self.search_prefix(prefix) {
            let mut current = node.parent();
            while let Some(ancestor) = current {
                if ancestor.is_end() {
                    parents.push(ancestor);
                }
                current = ancestor.parent();
            }
        }
        parents
    }
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Trie<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trie")
            .field("patterns", &self.root().keys_sorted())
            .finish_non_exhaustive()
    }
}

/// Splits a pattern into its segments: `/` stays whole, otherwise at most
/// one trailing separator is dropped and the leading one is skipped.
fn pattern_segments(pattern: &str) -> Vec<&str> {
    if pattern == PATH_SEP {
        return vec![PATH_SEP];
    }

    let pattern = pattern.strip_suffix('/').unwrap_or(pattern);
    let mut parts = pattern.split('/');
    parts.next(); // the span before the leading separator
    parts.collect()
}

/// Prefix of `key` before its first `:` or `*`.
fn static_part(key: &str) -> &str {
    let cut = match (key.find(PARAM_START), key.find(WILDCARD_PARAM_START)) {
        (Some(param), Some(wildcard)) => param.min(wildcard),
        (Some(param), None) => param,
        (None, Some(wildcard)) => wildcard,
        (None, None) => key.len(),
    };
    &key[..cut]
}
