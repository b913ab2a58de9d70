//! Trie vertices and the read-only node handle.
//!
//! Nodes live in an arena owned by the [`Trie`](crate::Trie); parent and
//! child links are plain indices, so the tree stays a pure tree from an
//! ownership standpoint while the closest-wildcard fallback can still walk
//! upward. Dynamic children are keyed by the sentinels [`PARAM_START`] and
//! [`WILDCARD_PARAM_START`], which keeps the children map single-typed;
//! the flags on the parent make the search branch without a map lookup.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// The character, as a string, which starts a named parameter segment.
pub const PARAM_START: &str = ":";
/// The character, as a string, which starts a wildcard parameter segment.
/// A wildcard captures everything after its static prefix; static and
/// named children are still tried first.
pub const WILDCARD_PARAM_START: &str = "*";

/// The path segment separator.
pub(crate) const PATH_SEP: &str = "/";
pub(crate) const PATH_SEP_BYTE: u8 = b'/';

/// Index of a node inside the trie's arena.
pub(crate) type NodeId = usize;

/// A trie vertex.
///
/// Most fields stay at their defaults for interior nodes; terminal
/// metadata (`key`, `static_key`, `param_keys`, payload, tag, data) is
/// filled in only where a registered pattern ends.
pub(crate) struct Node<T> {
    pub(crate) parent: Option<NodeId>,

    pub(crate) children: HashMap<String, NodeId>,
    /// Does one of the children carry a parameter or wildcard?
    pub(crate) has_dynamic_child: bool,
    /// Is there a named-parameter child (single segment)?
    pub(crate) child_named_parameter: bool,
    /// Is there a wildcard child (any number of remaining segments)?
    pub(crate) child_wildcard_parameter: bool,

    /// Parameter names of the pattern ending here, without `:` or `*`.
    pub(crate) param_keys: Vec<String>,
    /// True when a registered pattern ends at this node.
    pub(crate) end: bool,
    /// The original pattern, set on terminal nodes.
    pub(crate) key: String,
    /// Prefix of `key` up to its first `:` or `*`; the closest-wildcard
    /// fallback derives the captured remainder from its length.
    pub(crate) static_key: String,

    pub(crate) payload: Option<T>,
    pub(crate) tag: Option<String>,
    pub(crate) data: Option<Box<dyn Any + Send + Sync>>,
}

impl<T> Node<T> {
    pub(crate) fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: HashMap::new(),
            has_dynamic_child: false,
            child_named_parameter: false,
            child_wildcard_parameter: false,
            param_keys: Vec::new(),
            end: false,
            key: String::new(),
            static_key: String::new(),
            payload: None,
            tag: None,
            data: None,
        }
    }

    pub(crate) fn child(&self, segment: &str) -> Option<NodeId> {
        self.children.get(segment).copied()
    }
}

/// Orders keys with the fewest `/` separators first, ties broken
/// lexicographically so listings are deterministic.
#[must_use]
pub fn default_keys_sorter(a: &str, b: &str) -> Ordering {
    fn depth(key: &str) -> usize {
        key.bytes().filter(|&b| b == PATH_SEP_BYTE).count()
    }

    depth(a).cmp(&depth(b)).then_with(|| a.cmp(b))
}

/// Read-only handle to a node, valid for the lifetime of the trie borrow.
///
/// Returned by [`Trie::search`](crate::Trie::search) and the prefix
/// operations. All accessors borrow from the trie, not from the handle,
/// so the results outlive the handle itself.
pub struct NodeRef<'t, T> {
    pub(crate) trie: &'t crate::Trie<T>,
    pub(crate) id: NodeId,
}

impl<'t, T> NodeRef<'t, T> {
    fn node(&self) -> &'t Node<T> {
        self.trie.node(self.id)
    }

    /// True if a registered pattern ends at this node.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node().end
    }

    /// True when one of the children is a parameter or wildcard.
    #[must_use]
    pub fn has_dynamic_child(&self) -> bool {
        self.node().has_dynamic_child
    }

    /// The registered pattern, empty for interior nodes.
    #[must_use]
    pub fn key(&self) -> &'t str {
        &self.node().key
    }

    /// Prefix of [`key`](Self::key) before its first `:` or `*`.
    #[must_use]
    pub fn static_key(&self) -> &'t str {
        &self.node().static_key
    }

    /// The payload attached at registration, if this node is terminal.
    #[must_use]
    pub fn payload(&self) -> Option<&'t T> {
        self.node().payload.as_ref()
    }

    /// The tag attached at registration, if any.
    #[must_use]
    pub fn tag(&self) -> Option<&'t str> {
        self.node().tag.as_deref()
    }

    /// Extra registration data, downcast to the requested type.
    #[must_use]
    pub fn data<D: Any>(&self) -> Option<&'t D> {
        self.node()
            .data
            .as_deref()
            .and_then(|data| data.downcast_ref::<D>())
    }

    /// Parameter names of the pattern ending here, in segment order.
    #[must_use]
    pub fn param_keys(&self) -> &'t [String] {
        &self.node().param_keys
    }

    /// The owning node, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'t, T>> {
        self.node().parent.map(|id| NodeRef {
            trie: self.trie,
            id,
        })
    }

    /// This node's key (if terminal) plus every descendant terminal key,
    /// in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut list = Vec::new();
        self.collect_keys(&mut list);
        list
    }

    /// Like [`keys`](Self::keys), ordered by [`default_keys_sorter`].
    #[must_use]
    pub fn keys_sorted(&self) -> Vec<String> {
        self.keys_sorted_by(default_keys_sorter)
    }

    /// Like [`keys`](Self::keys), ordered by a caller comparator.
    #[must_use]
    pub fn keys_sorted_by<F>(&self, mut compare: F) -> Vec<String>
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        let mut list = self.keys();
        list.sort_by(|a, b| compare(a, b));
        list
    }

    fn collect_keys(&self, list: &mut Vec<String>) {
        let node = self.node();
        if node.end {
            list.push(node.key.clone());
        }
        for &child in node.children.values() {
            NodeRef {
                trie: self.trie,
                id: child,
            }
            .collect_keys(list);
        }
    }
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

/// Prints the registered pattern.
impl<T> fmt::Display for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl<T> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.key())
            .field("end", &self.is_end())
            .field("param_keys", &self.param_keys())
            .finish_non_exhaustive()
    }
}
