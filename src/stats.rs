// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use getset::{
    CopyGetters,
    Getters,
};

/// Running counters for one skip list.
#[derive(Debug, Clone, PartialEq, Eq, CopyGetters, Getters)]
pub struct Stats<const LEVELS: usize> {
    #[getset(get_copy = "pub")]
    inserts: u64,
    #[getset(get_copy = "pub")]
    removals: u64,
    #[getset(get_copy = "pub")]
    rejected_removals: u64,
    /// `level_histogram[i]` is the number of live nodes whose highest lane
    /// is `i`.
    #[getset(get = "pub")]
    level_histogram: [usize; LEVELS],
}

impl<const LEVELS: usize> Default for Stats<LEVELS> {
    fn default() -> Self {
        Stats {
            inserts: 0,
            removals: 0,
            rejected_removals: 0,
            level_histogram: [0; LEVELS],
        }
    }
}

impl<const LEVELS: usize> Stats<LEVELS> {
    /// Number of live nodes taking part in the lane at `level`.
    pub fn lane_population(&self, level: usize) -> usize {
        self.level_histogram.iter().skip(level).sum()
    }

    /// Highest lane any live node occupies.
    pub fn tallest(&self) -> Option<usize> {
        self.level_histogram.iter().rposition(|&n| n > 0)
    }

    pub(crate) fn record_insert(&mut self, level: usize) {
        self.inserts += 1;
        self.level_histogram[level] += 1;
    }

    pub(crate) fn record_removal(&mut self, level: usize) {
        self.removals += 1;
        self.level_histogram[level] = self.level_histogram[level].saturating_sub(1);
    }

    pub(crate) fn record_rejection(&mut self) {
        self.rejected_removals += 1;
    }

    pub(crate) fn reset_population(&mut self) {
        self.level_histogram = [0; LEVELS];
    }
}
