//! Path-segment trie for request routing.
//!
//! This crate provides the matching core used by the `pathmux`
//! multiplexer: a trie keyed by path segments that supports
//!
//! - static segments, matched byte-for-byte,
//! - named parameters (`/profile/:name`), binding one whole segment,
//! - wildcards (`/files/*path`), binding the entire remainder,
//!
//! with a strict priority (static, then named, then wildcard) and a
//! closest-wildcard fallback for walks that dead-end below an enclosing
//! wildcard pattern. The payload stored per pattern is an opaque type
//! parameter; nothing here assumes HTTP.
//!
//! # Example
//!
//! ```
//! use pathmux_trie::{Params, Trie};
//!
//! let mut trie = Trie::new();
//! trie.insert("/profile/:name", "profile");
//! trie.insert("/files/*path", "files");
//!
//! let mut params = Params::new();
//! let node = trie.search("/profile/kataras", &mut params).unwrap();
//! assert_eq!(node.payload(), Some(&"profile"));
//! assert_eq!(params.get("name"), Some("kataras"));
//!
//! params.reset();
//! let node = trie.search("/files/docs/intro.md", &mut params).unwrap();
//! assert_eq!(node.key(), "/files/*path");
//! assert_eq!(params.get("path"), Some("docs/intro.md"));
//! ```
//!
//! Registration takes `&mut Trie`, lookups take `&Trie`: finish all
//! insertions before sharing the trie and the serving phase is lock-free
//! by construction.

#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]

mod node;
mod params;
mod trie;

pub use node::{NodeRef, PARAM_START, WILDCARD_PARAM_START, default_keys_sorter};
pub use params::{ParamEntry, Params, ParamsSetter};
pub use trie::{Entry, Trie};
