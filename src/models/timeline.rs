//! Timeline merger: union of several same-period sources onto one
//! monotonic global timeline with per-source index alignment.

use anyhow::{Result, bail};
use itertools::Itertools;

use crate::models::DataSource;

/// Local-index marker for "this source has no sample at this global step".
pub const ABSENT: i64 = -1;

/// Union timeline over N sources of identical period.
///
/// `times` is strictly increasing. Each row of `index_maps` is aligned
/// one-to-one with `times`: entry `g` holds the source's local index whose
/// timestamp equals `times[g]`, or [`ABSENT`].
///
/// Rebuilt in full whenever a source is added; sources are wired up before
/// heavy plotting begins, so there is no incremental patching.
#[derive(Debug, Clone)]
pub struct MergedTimeline {
    times: Vec<i64>,
    index_maps: Vec<Vec<i64>>,
}

impl MergedTimeline {
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[inline]
    pub fn source_count(&self) -> usize {
        self.index_maps.len()
    }

    pub fn time_at(&self, global: usize) -> Option<i64> {
        self.times.get(global).copied()
    }

    pub fn times(&self) -> &[i64] {
        &self.times
    }

    /// Full index row for one source (for handing to a plot pass).
    pub fn index_map(&self, slot: usize) -> &[i64] {
        &self.index_maps[slot]
    }

    /// Translates a global index to one source's local index, or `None`
    /// when that source has no sample at this global step.
    pub fn local_index(&self, slot: usize, global: usize) -> Option<usize> {
        match self.index_maps.get(slot)?.get(global).copied()? {
            ABSENT => None,
            local => Some(local as usize),
        }
    }
}

/// Merges sources sharing one period into a [`MergedTimeline`].
///
/// Sources must be non-empty: a zero-length source has no first timestamp
/// to anchor the union walk, so it is rejected up front rather than left
/// as an undefined precondition.
///
/// Tie-break: sources sharing a timestamp all advance in the same global
/// step (union/outer-join, not an interleave).
pub fn merge(sources: &[&dyn DataSource]) -> Result<MergedTimeline> {
    if sources.is_empty() {
        bail!("merge requires at least one data source");
    }
    for source in sources {
        if source.is_empty() {
            bail!("cannot merge empty data source '{}'", source.meta().id);
        }
    }
    if !sources.iter().map(|s| s.meta().period).all_equal() {
        let periods = sources.iter().map(|s| s.meta().period.to_string()).join(", ");
        bail!("sources must share one period, got: {}", periods);
    }

    let total: usize = sources.iter().map(|s| s.len()).sum();
    let mut times = Vec::with_capacity(total);
    let mut index_maps: Vec<Vec<i64>> = sources.iter().map(|_| Vec::with_capacity(total)).collect();
    let mut cursors = vec![0usize; sources.len()];

    crate::trace_time!("timeline merge", 2000, {
        loop {
            // Next global step = earliest unconsumed time across sources.
            let mut next_time = i64::MAX;
            let mut any_left = false;
            for (i, source) in sources.iter().enumerate() {
                if cursors[i] < source.len() {
                    any_left = true;
                    next_time = next_time.min(source.time_at(cursors[i])?);
                }
            }
            if !any_left {
                break;
            }

            times.push(next_time);
            for (i, source) in sources.iter().enumerate() {
                if cursors[i] < source.len() && source.time_at(cursors[i])? == next_time {
                    index_maps[i].push(cursors[i] as i64);
                    cursors[i] += 1;
                } else {
                    index_maps[i].push(ABSENT);
                }
            }
        }
    });

    if crate::config::DEBUG_FLAGS.log_merge {
        log::debug!(
            "merged {} sources ({} local points) into {} global steps",
            sources.len(),
            total,
            times.len()
        );
    }

    Ok(MergedTimeline { times, index_maps })
}
