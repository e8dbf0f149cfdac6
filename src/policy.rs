//! Splay-frequency policy.
//!
//! A splay tree pays for its self-adjusting behavior with pointer rewrites on
//! every access. The policy lets a map trade adjustment strength against that
//! cost: each operation class (insert, find) asks its decider whether to splay
//! on this particular call, and the decider answers from a per-map counter.

/// How often nodes are splayed to the root for one class of operations.
///
/// # Examples
///
/// ```
/// use splay_map::{Map, SplayMode, SplayPolicy};
///
/// let policy = SplayPolicy { insert: SplayMode::Always, find: SplayMode::Never };
/// let mut map = Map::with_policy(policy);
///
/// map.insert(1, "a");
/// assert_eq!(map.policy().find, SplayMode::Never);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplayMode {
    /// Splay on every operation.
    Always,
    /// Splay on every second operation.
    Half,
    /// Splay on every third operation.
    Third,
    /// Splay on every fourth operation.
    Fourth,
    /// Never splay.
    Never,
}

/// Per-operation-class splay modes of a map.
///
/// The default damps the cache-hostile effect of rotating on every access
/// while keeping most of the locality benefit: inserts splay every fourth
/// call, finds every third.
///
/// # Examples
///
/// ```
/// use splay_map::{SplayMode, SplayPolicy};
///
/// let policy = SplayPolicy::default();
/// assert_eq!(policy.insert, SplayMode::Fourth);
/// assert_eq!(policy.find, SplayMode::Third);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SplayPolicy {
    /// Mode consulted by insertions.
    pub insert: SplayMode,
    /// Mode consulted by lookups, including bound queries.
    pub find: SplayMode,
}

impl Default for SplayPolicy {
    fn default() -> Self {
        SplayPolicy { insert: SplayMode::Fourth, find: SplayMode::Third }
    }
}

/// Counter state answering "splay on this call?" for one operation class.
#[derive(Clone, Debug)]
pub(crate) struct Decider {
    mode: SplayMode,
    counter: u32,
}

impl Decider {
    pub fn new(mode: SplayMode) -> Self {
        Decider { mode, counter: 0 }
    }

    pub fn mode(&self) -> SplayMode {
        self.mode
    }

    /// Advances the counter and reports whether this call should splay.
    pub fn splay_hint(&mut self) -> bool {
        match self.mode {
            SplayMode::Always => true,
            SplayMode::Half => {
                self.counter = self.counter.wrapping_add(1);
                self.counter & 1 != 0
            }
            SplayMode::Third => {
                self.counter = self.counter.wrapping_add(1);
                self.counter % 3 == 0
            }
            SplayMode::Fourth => {
                self.counter = self.counter.wrapping_add(1);
                self.counter % 4 == 0
            }
            SplayMode::Never => false,
        }
    }
}
