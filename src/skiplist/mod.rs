// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! An arena-backed skiplist, which allows faster random access than a
//! standard linked list.
//!
//! SkipLists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level `n > 0` will contain a random subset of the nodes on level `n - 1`.
//!
//! ```text
//! <sentinel> ----------> [2] ------------------------------------> [9] ----> <sentinel>
//! <sentinel> ----------> [2] ----------------------------> [7] --> [9] ----> <sentinel>
//! <sentinel> ----------> [2] --------> [4] --------------> [7] --> [9] ----> <sentinel>
//! <sentinel> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> <sentinel>
//! ```
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level `n` is `p` times the chance of occupying level `n-1`
//! (with `0 < p < 1`).
//!
//! Nodes are stored in an arena and refer to each other by [`NodeId`]. The
//! sentinel is a reserved handle that starts and terminates every lane, so
//! traversals never need a separate tail.
//!
//! It is very unlikely that this will need to be changed as the default should
//! suffice, but if need be custom level generators can be implemented.

mod iter;
mod level_generator;
mod list;
mod node;

pub use iter::{
    IntoIter,
    Iter,
    Keys,
    Values,
};
pub use level_generator::{
    GeometricalLevelGenerator,
    LevelGenerator,
};
pub use list::SkipList;
pub use node::{
    Node,
    NodeId,
};
