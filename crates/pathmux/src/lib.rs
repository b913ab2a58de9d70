//! Trie-based request path multiplexer.
//!
//! pathmux matches request paths against registered patterns with a
//! strict priority (static segments first, then named parameters
//! (`:name`), then wildcards (`*name`)) and falls back to the closest
//! enclosing wildcard when a walk dead-ends. Payloads are opaque: store
//! handlers, indices, closures, whatever the embedding system dispatches
//! on.
//!
//! # Quick start
//!
//! ```
//! use pathmux::Mux;
//!
//! let mut mux = Mux::new();
//! mux.handle("/", "index");
//! mux.handle("/profile/:name", "profile");
//! mux.handle("/files/*file", "files");
//!
//! let mut v1 = mux.of("/v1");
//! v1.handle("/users", "v1-users");
//!
//! let hit = mux.dispatch("/files/a/b/c.txt").unwrap();
//! assert_eq!(*hit.payload(), "files");
//! assert_eq!(hit.params().get("file"), Some("a/b/c.txt"));
//!
//! assert_eq!(*mux.dispatch("/v1/users").unwrap().payload(), "v1-users");
//! assert!(mux.dispatch("/nope").is_none());
//! ```
//!
//! # Phases
//!
//! Registration (`handle`, `of`) takes `&mut Mux`; dispatch takes
//! `&Mux`. Register everything during initialization, then share the
//! mux; the serving phase is read-only and lock-free apart from the
//! parameter-sink pool, which recycles capture buffers across
//! dispatches.
//!
//! # Crate structure
//!
//! - [`pathmux_trie`] (re-exported as [`trie`]): the matching core
//! - this crate: the multiplexer façade, grouping and sink pooling

#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]

mod mux;
mod pool;

pub use mux::{Matched, Mux, SubMux, normalize_path};
pub use pool::PooledParams;

// Re-export the matching core.
pub use pathmux_trie as trie;
pub use pathmux_trie::{
    Entry, NodeRef, ParamEntry, Params, ParamsSetter, Trie, default_keys_sorter,
};
