//! Incremental grantee feed.
//!
//! The whole roster is already fetched; the feed reveals it in batches as the
//! viewport sentinel comes into view, keeps flow rates in sync with the latest
//! pool snapshot and orders the visible set by the selected method.

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::debug;

use crate::{
    config::FeedSettings,
    session::SessionState,
    types::{CouncilGrantee, FlowStateProfile, GdaPool},
};

mod flow_rate;
mod sorting;

pub use flow_rate::{derive_grantee, member_flow_rate, refresh, Grantee};
pub use sorting::{sort_grantees, SortingMethod};

/// Outcome of [`GranteeFeed::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedUpdate {
    /// Upstream data missing, nothing done.
    Deferred,
    /// Only flow rates of visible grantees were recomputed.
    Refreshed,
    /// Roster entries were scanned. `new` counts grantees not visible before.
    Revealed { scanned: usize, new: usize, reset: bool },
}

pub struct GranteeFeed<R = StdRng> {
    batch_size: usize,
    /// Roster entries consumed so far.
    skip: usize,
    /// Batch multiplier, scan limit is `batch_size * batch`.
    batch: usize,
    has_next: bool,
    /// Set by `reset`, consumed by the next merge.
    pending_reset: bool,
    sorting: SortingMethod,
    grantees: Vec<Grantee>,
    rng: R,
}

impl GranteeFeed<StdRng> {
    pub fn new(settings: &FeedSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }
}

impl<R: Rng> GranteeFeed<R> {
    pub fn with_rng(settings: &FeedSettings, rng: R) -> Self {
        GranteeFeed {
            batch_size: settings.batch_size.max(1),
            skip: 0,
            batch: 1,
            has_next: true,
            pending_reset: false,
            sorting: SortingMethod::default(),
            grantees: Vec::new(),
            rng,
        }
    }

    pub fn grantees(&self) -> &[Grantee] {
        &self.grantees
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn sorting_method(&self) -> SortingMethod {
        self.sorting
    }

    /// Rewinds the cursor. The next scan re-derives the roster from the start;
    /// already visible grantees stay and are matched by identity.
    pub fn reset(&mut self) {
        self.skip = 0;
        self.batch = 1;
        self.has_next = true;
        self.pending_reset = true;
    }

    /// Switches the order and re-sorts the whole visible set.
    pub fn set_sorting_method(&mut self, method: SortingMethod) {
        debug!(%method, visible = self.grantees.len(), "feed sorting changed");
        self.sorting = method;
        sort_grantees(&mut self.grantees, self.sorting, &mut self.rng);
    }

    /// Reacts to new upstream data or to a sentinel visibility change.
    pub fn update(&mut self, session: &SessionState, in_view: bool) -> FeedUpdate {
        let (council, profiles, pool) = match (session.council(), session.profiles(), session.pool()) {
            (Some(council), Some(profiles), Some(pool)) => (council, profiles, pool),
            _ => return FeedUpdate::Deferred,
        };
        let roster = council.grantees.as_slice();

        // Roster grew after pagination was exhausted.
        if !self.has_next && roster.len() > self.skip {
            debug!(skip = self.skip, roster = roster.len(), "feed roster grew, resetting");
            self.reset();
        }

        for grantee in self.grantees.iter_mut() {
            refresh(grantee, pool);
        }

        if !(in_view && self.has_next) {
            return FeedUpdate::Refreshed;
        }

        let revealed = self.scan(roster, profiles, pool);
        let scanned = revealed.len();
        let reset = std::mem::take(&mut self.pending_reset);
        let new = self.merge(revealed, reset);
        debug!(
            scanned,
            new,
            skip = self.skip,
            has_next = self.has_next,
            "feed batch merged"
        );

        FeedUpdate::Revealed { scanned, new, reset }
    }

    /// Derives roster entries from `skip` up to the current batch limit.
    /// Stops at an entry whose profile is not loaded yet, leaving it for the next scan.
    fn scan(
        &mut self,
        roster: &[CouncilGrantee],
        profiles: &[FlowStateProfile],
        pool: &GdaPool,
    ) -> Vec<Grantee> {
        let limit = self.batch_size * self.batch;
        let mut revealed = Vec::new();

        if self.skip >= roster.len() {
            self.has_next = false;
            return revealed;
        }

        while self.skip < limit {
            let entry = &roster[self.skip];
            let profile = match profiles.iter().find(|p| p.id == entry.name) {
                Some(profile) => profile,
                None => break,
            };
            revealed.push(derive_grantee(entry, profile, pool));
            self.skip += 1;

            if self.skip == roster.len() {
                self.has_next = false;
                break;
            }
        }

        // Batch filled, possibly across several scans.
        if self.skip == limit {
            self.batch += 1;
        }

        revealed
    }

    /// Unions `revealed` into the visible set by identity.
    /// Returns the count of grantees that were not visible before.
    fn merge(&mut self, revealed: Vec<Grantee>, full_sort: bool) -> usize {
        let was_empty = self.grantees.is_empty();
        let mut fresh = Vec::new();

        for grantee in revealed {
            match self.grantees.iter_mut().find(|g| g.same_identity(&grantee)) {
                Some(visible) => *visible = grantee,
                None => fresh.push(grantee),
            }
        }
        let new = fresh.len();

        if full_sort || was_empty || self.sorting != SortingMethod::Random {
            self.grantees.extend(fresh);
            sort_grantees(&mut self.grantees, self.sorting, &mut self.rng);
        } else {
            // Keep the order the user already scanned, only the new tail is random.
            fresh.shuffle(&mut self.rng);
            self.grantees.extend(fresh);
        }

        new
    }
}
