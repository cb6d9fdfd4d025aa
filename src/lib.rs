//! Van Emde Boas trees for Rust.
//!
//! This crate provides [`VebTree`], an ordered set of integers drawn from a fixed universe
//! `[0, U)`, where `U` is a power of two. Every query and update runs in O(log log U) time:
//!
//! - [`insert`](VebTree::insert) / [`remove`](VebTree::remove) / [`contains`](VebTree::contains)
//! - [`predecessor`](VebTree::predecessor) / [`successor`](VebTree::successor)
//! - [`minimum`](VebTree::minimum) / [`maximum`](VebTree::maximum) in O(1)
//!
//! # Example
//!
//! ```
//! use veb_tree::VebTree;
//!
//! let mut ports = VebTree::new(1 << 16)?;
//! ports.insert(22)?;
//! ports.insert(80)?;
//! ports.insert(443)?;
//!
//! // Next open port after 80, and the one before it.
//! assert_eq!(ports.successor(80), Some(443));
//! assert_eq!(ports.predecessor(80), Some(22));
//!
//! ports.remove(443);
//! assert_eq!(ports.maximum(), Some(80));
//! # Ok::<(), veb_tree::Error>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **`tracing`** - Emits construction and mutation events through the `tracing` crate
//!
//! # Implementation
//!
//! A node of universe `U` caches its minimum and maximum, and splits the rest of its values
//! across `2^ceil(lg U / 2)` clusters of universe `2^floor(lg U / 2)`, plus a summary node
//! recording which clusters are non-empty. The cached minimum is never stored in a cluster, so
//! each update recurses into a single child. All nodes live in one arena, allocated when the
//! tree is created.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

#[macro_use]
mod tracing_helpers;

mod error;
mod raw;
mod universe;

pub mod veb_tree;

pub use error::{Error, OutOfRange};
pub use universe::Universe;
pub use veb_tree::{Shape, VebTree};
