// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! `lanemap` is an ordered associative container built on a [`skip list`].
//!
//! ```
//! use lanemap::SkipList;
//!
//! let mut list: SkipList<u32, &str, 4> = SkipList::new(0.5).unwrap();
//! list.insert("e", 5);
//! list.insert("a", 1);
//! list.insert("c", 3);
//!
//! let node = list.find_first(&3).unwrap();
//! assert_eq!(list.value(node), Some(&"c"));
//!
//! let before = list.find_last_less_than(&3);
//! list.remove_next(before).unwrap();
//! assert!(list.find_first(&3).is_none());
//! ```
//!
//! [`skip list`]: https://en.wikipedia.org/wiki/Skip_list

/// Construction parameters and defaults.
pub mod config;
pub mod errs;
/// The skip list, its nodes and its level generators.
pub mod skiplist;
pub mod stats;

pub use config::Config;
pub use errs::{
    Result,
    SkipListError,
};
pub use skiplist::{
    GeometricalLevelGenerator,
    LevelGenerator,
    Node,
    NodeId,
    SkipList,
};
pub use stats::Stats;
