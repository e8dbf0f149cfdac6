//! An ordered map based on a self-adjusting splay tree.

use compare::{Compare, Natural};
use std::cmp::Ordering;
use std::cmp::Ordering::*;
use std::fmt::{self, Debug};
use std::hash::{self, Hash};
use std::iter;
use std::mem;
use std::ops::{self, Bound};

use super::error::Error;
use super::node::{self, NodeId, Place, SENTINEL};
use super::policy::{Decider, SplayPolicy};

/// An ordered map based on a self-adjusting splay tree.
///
/// Every key-directed operation may lift the touched node toward the root, so
/// frequently accessed keys drift close to the top of the tree while rarely
/// accessed keys sink. How often that happens is controlled per map by a
/// [`SplayPolicy`]. Because even lookups reshape the tree and advance the
/// policy counters, all lookup methods take `&mut self`.
///
/// The behavior of this map is undefined if a key's ordering relative to any
/// other key changes while the key is in the map. This is normally only
/// possible through `Cell`, `RefCell`, or unsafe code.
#[derive(Clone)]
pub struct Map<K, V, C = Natural<K>> where C: Compare<K> {
    arena: node::Arena<K, V>,
    len: usize,
    cmp: C,
    insert_decider: Decider,
    find_decider: Decider,
}

impl<K, V> Map<K, V> where K: Ord {
    /// Creates an empty map ordered according to the natural order of its
    /// keys, with the default splay policy.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self {
        Map::with_cmp(::compare::natural())
    }

    /// Creates an empty map ordered according to the natural order of its
    /// keys, splaying as often as the given policy dictates.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::{Map, SplayMode, SplayPolicy};
    ///
    /// let mut map = Map::with_policy(SplayPolicy {
    ///     insert: SplayMode::Never,
    ///     find: SplayMode::Always,
    /// });
    ///
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn with_policy(policy: SplayPolicy) -> Self {
        Map::with_cmp_and_policy(::compare::natural(), policy)
    }
}

impl<K, V, C> Map<K, V, C> where C: Compare<K> {
    /// Creates an empty map ordered according to the given comparator, with
    /// the default splay policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let mut map = splay_map::Map::with_cmp(natural().rev());
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        Map::with_cmp_and_policy(cmp, SplayPolicy::default())
    }

    /// Creates an empty map ordered according to the given comparator,
    /// splaying as often as the given policy dictates.
    pub fn with_cmp_and_policy(cmp: C, policy: SplayPolicy) -> Self {
        Map {
            arena: node::Arena::new(),
            len: 0,
            cmp,
            insert_decider: Decider::new(policy.insert),
            find_decider: Decider::new(policy.find),
        }
    }

    /// Checks if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// assert!(map.is_empty());
    ///
    /// map.insert(2, "b");
    /// assert!(!map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// assert_eq!(map.len(), 0);
    ///
    /// map.insert(2, "b");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the largest number of entries the map can hold: node slots are
    /// addressed by 32-bit index, one of which is reserved for the sentinel.
    pub fn max_size(&self) -> usize {
        u32::MAX as usize
    }

    /// Returns a reference to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    /// use splay_map::Map;
    ///
    /// let map: Map<i32, &str> = Map::new();
    /// assert!(map.cmp().compares_lt(&1, &2));
    ///
    /// let map: Map<i32, &str, _> = Map::with_cmp(natural().rev());
    /// assert!(map.cmp().compares_gt(&1, &2));
    /// ```
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Returns the map's splay policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::{Map, SplayMode};
    ///
    /// let map: Map<i32, &str> = Map::new();
    /// assert_eq!(map.policy().insert, SplayMode::Fourth);
    /// assert_eq!(map.policy().find, SplayMode::Third);
    /// ```
    pub fn policy(&self) -> SplayPolicy {
        SplayPolicy { insert: self.insert_decider.mode(), find: self.find_decider.mode() }
    }

    /// Returns the size in bytes of an empty map, including the sentinel
    /// slot.
    pub fn memory_consumption_empty() -> usize {
        mem::size_of::<Self>() + Self::memory_consumption_item()
    }

    /// Returns the size in bytes of a single node slot.
    pub fn memory_consumption_item() -> usize {
        node::Arena::<K, V>::slot_size()
    }

    /// Estimates the map's overall memory consumption, charging every entry
    /// `extra_per_item` additional bytes for storage the entries own
    /// themselves.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::Map;
    ///
    /// let mut map = Map::new();
    /// map.insert(1, "a");
    ///
    /// assert_eq!(
    ///     map.memory_consumption(0),
    ///     Map::<i32, &str>::memory_consumption_empty() + Map::<i32, &str>::memory_consumption_item(),
    /// );
    /// ```
    pub fn memory_consumption(&self, extra_per_item: usize) -> usize {
        Self::memory_consumption_empty() + self.len * (Self::memory_consumption_item() + extra_per_item)
    }

    /// Removes all entries from the map.
    ///
    /// Destruction is flat over the node arena, so clearing a fully
    /// degenerate tree still runs in constant stack space.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.len(), 3);
    ///
    /// map.clear();
    ///
    /// assert_eq!(map.len(), 0);
    /// assert_eq!(map.iter().next(), None);
    /// ```
    pub fn clear(&mut self) {
        self.arena.clear();
        self.len = 0;
    }

    /// Advances the find counter and, when it fires, splays the node that a
    /// lookup landed on. The counter advances even when the lookup missed.
    fn splay_on_find(&mut self, node: NodeId) {
        let hint = self.find_decider.splay_hint();
        if hint && node != SENTINEL {
            node::splay(&mut self.arena, node);
        }
    }

    /// Advances the insert counter and, when it fires, splays a freshly
    /// attached node.
    fn splay_on_insert(&mut self, node: NodeId) {
        let hint = self.insert_decider.splay_hint();
        if hint {
            node::splay(&mut self.arena, node);
        }
    }

    /// Full insertion protocol: descend, then either overwrite the value of
    /// the matching node (splaying per the find policy, since that is what
    /// the descent amounted to) or attach a new node (splaying per the
    /// insert policy).
    fn insert_node(&mut self, key: K, value: V) -> (NodeId, Option<V>) {
        match node::locate(&self.arena, &self.cmp, &key) {
            Place::Found(node) => {
                let old = mem::replace(self.arena.value_mut(node), value);
                self.splay_on_find(node);
                (node, Some(old))
            }
            Place::Vacant { parent, left } => {
                let node = self.arena.alloc(key, value);
                node::attach(&mut self.arena, node, parent, left);
                self.len += 1;
                self.splay_on_insert(node);
                (node, None)
            }
        }
    }

    fn locate_splay<Q: ?Sized>(&mut self, key: &Q) -> NodeId where C: Compare<Q, K> {
        let node = node::find(&self.arena, &self.cmp, key);
        self.splay_on_find(node);
        node
    }

    /// Inserts an entry into the map, returning the previous value, if any,
    /// associated with the key. On a collision the key already present is
    /// kept; only the value is overwritten.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// assert_eq!(map.insert(1, "a"), None);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.insert(1, "b"), Some("a"));
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_node(key, value).1
    }

    /// Removes and returns the entry whose key is equal to the given key,
    /// returning `None` if the map does not contain the key.
    ///
    /// The removed node is splayed to the root before it is unlinked, so the
    /// path it was found along is flattened on the way out.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.remove(&1), Some((1, "a")));
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(&1), None);
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
        where C: Compare<Q, K> {

        let node = node::find(&self.arena, &self.cmp, key);
        if node == SENTINEL {
            return None;
        }

        node::remove(&mut self.arena, node);
        self.len -= 1;
        Some(self.arena.free(node))
    }

    /// Removes every entry whose key lies in the given range and returns how
    /// many were removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound::{Excluded, Included};
    ///
    /// let mut map = splay_map::Map::new();
    ///
    /// for key in 1..7 {
    ///     map.insert(key, key * 10);
    /// }
    ///
    /// assert_eq!(map.remove_range(Included(&3), Excluded(&6)), 3);
    /// assert_eq!(map.iter().map(|e| *e.0).collect::<Vec<_>>(), [1, 2, 6]);
    /// ```
    pub fn remove_range<Min: ?Sized, Max: ?Sized>(&mut self, min: Bound<&Min>, max: Bound<&Max>)
        -> usize where C: Compare<Min, K> + Compare<Max, K> {

        let (mut cur, stop) = self.range_endpoints(min, max);
        let mut removed = 0;

        while cur != stop {
            let next = node::remove(&mut self.arena, cur);
            self.arena.free(cur);
            self.len -= 1;
            removed += 1;
            cur = next;
        }

        removed
    }

    /// Removes the map's minimum key and returns it and its associated value,
    /// or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// assert_eq!(map.remove_min(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.remove_min(), Some((1, "a")));
    /// ```
    pub fn remove_min(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }

        let node = self.arena.min();
        node::remove(&mut self.arena, node);
        self.len -= 1;
        Some(self.arena.free(node))
    }

    /// Removes the map's maximum key and returns it and its associated value,
    /// or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// assert_eq!(map.remove_max(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.remove_max(), Some((3, "c")));
    /// ```
    pub fn remove_max(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }

        let node = self.arena.max();
        node::remove(&mut self.arena, node);
        self.len -= 1;
        Some(self.arena.free(node))
    }

    /// Returns the map's entry corresponding to the given key.
    ///
    /// A vacant entry constructs its value only when the insertion actually
    /// happens, so `entry(k).or_insert_with(f)` never runs `f` for a key that
    /// is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut counts = splay_map::Map::new();
    ///
    /// for s in vec!["a", "b", "a", "c", "a", "b"] {
    ///     *counts.entry(s).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(counts[&"a"], 3);
    /// assert_eq!(counts[&"b"], 2);
    /// assert_eq!(counts[&"c"], 1);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<K, V, C> {
        match node::locate(&self.arena, &self.cmp, &key) {
            Place::Found(node) => Entry::Occupied(OccupiedEntry { map: self, node }),
            Place::Vacant { parent, left } => {
                Entry::Vacant(VacantEntry { map: self, key, parent, left })
            }
        }
    }

    /// Checks if the map contains the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// assert!(!map.contains_key(&1));
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<Q: ?Sized>(&mut self, key: &Q) -> bool where C: Compare<Q, K> {
        self.get(key).is_some()
    }

    /// Returns the number of entries whose key is equal to the given key,
    /// which is 0 or 1 since keys are unique.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.count(&1), 1);
    /// assert_eq!(map.count(&2), 0);
    /// ```
    pub fn count<Q: ?Sized>(&mut self, key: &Q) -> usize where C: Compare<Q, K> {
        if self.contains_key(key) { 1 } else { 0 }
    }

    /// Returns a reference to the value associated with the given key, or
    /// `None` if the map does not contain the key.
    ///
    /// Like every lookup on a splay tree, this may reshape the tree, which is
    /// why it takes `&mut self`.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// assert_eq!(map.get(&1), None);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn get<Q: ?Sized>(&mut self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        let node = self.locate_splay(key);
        if node == SENTINEL { None } else { Some(self.arena.value(node)) }
    }

    /// Returns a mutable reference to the value associated with the given
    /// key, or `None` if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// map.insert(1, "a");
    ///
    /// {
    ///     let value = map.get_mut(&1).unwrap();
    ///     assert_eq!(*value, "a");
    ///     *value = "b";
    /// }
    ///
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
        where C: Compare<Q, K> {

        let node = self.locate_splay(key);
        if node == SENTINEL { None } else { Some(self.arena.value_mut(node)) }
    }

    /// Returns a reference to the value associated with the given key, or
    /// [`Error::KeyNotFound`] if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::Error;
    ///
    /// let mut map = splay_map::Map::new();
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn at<Q: ?Sized>(&mut self, key: &Q) -> Result<&V, Error> where C: Compare<Q, K> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with the given
    /// key, or [`Error::KeyNotFound`] if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// map.insert(1, "a");
    ///
    /// *map.at_mut(&1).unwrap() = "b";
    /// assert_eq!(map.at(&1), Ok(&"b"));
    /// ```
    pub fn at_mut<Q: ?Sized>(&mut self, key: &Q) -> Result<&mut V, Error>
        where C: Compare<Q, K> {

        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a copy of the value associated with the given key, or the
    /// given default if the map does not contain the key. Never inserts.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// map.insert(1, 'a');
    ///
    /// assert_eq!(map.value(&1, 'z'), 'a');
    /// assert_eq!(map.value(&2, 'z'), 'z');
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn value<Q: ?Sized>(&mut self, key: &Q, default: V) -> V
        where V: Clone, C: Compare<Q, K> {

        match self.get(key) {
            Some(value) => value.clone(),
            None => default,
        }
    }

    /// Returns a reference to the map's minimum key and a reference to its
    /// associated value, or `None` if the map is empty. Constant time via the
    /// sentinel's minimum shortcut.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// assert_eq!(splay_map::Map::min(&map), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(splay_map::Map::min(&map), Some((&1, &"a")));
    /// ```
    pub fn min(&self) -> Option<(&K, &V)> {
        if self.is_empty() { None } else { Some(self.arena.key_value(self.arena.min())) }
    }

    /// Returns a reference to the map's minimum key and a mutable reference
    /// to its associated value, or `None` if the map is empty.
    pub fn min_mut(&mut self) -> Option<(&K, &mut V)> {
        if self.is_empty() {
            None
        } else {
            let node = self.arena.min();
            Some(self.arena.key_value_mut(node))
        }
    }

    /// Returns a reference to the map's maximum key and a reference to its
    /// associated value, or `None` if the map is empty. Constant time via the
    /// sentinel's maximum shortcut.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    /// assert_eq!(splay_map::Map::max(&map), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(splay_map::Map::max(&map), Some((&3, &"c")));
    /// ```
    pub fn max(&self) -> Option<(&K, &V)> {
        if self.is_empty() { None } else { Some(self.arena.key_value(self.arena.max())) }
    }

    /// Returns a reference to the map's maximum key and a mutable reference
    /// to its associated value, or `None` if the map is empty.
    pub fn max_mut(&mut self) -> Option<(&K, &mut V)> {
        if self.is_empty() {
            None
        } else {
            let node = self.arena.max();
            Some(self.arena.key_value_mut(node))
        }
    }

    /// Returns a read-only cursor at the entry whose key is equal to the
    /// given key, or at the past-the-end position if the map does not contain
    /// the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let cursor = map.find(&2);
    /// assert_eq!(cursor.key_value(), Some((&2, &"b")));
    ///
    /// assert!(map.find(&7).is_end());
    /// ```
    pub fn find<Q: ?Sized>(&mut self, key: &Q) -> Cursor<K, V> where C: Compare<Q, K> {
        let node = self.locate_splay(key);
        Cursor { arena: &self.arena, node }
    }

    /// Returns a read-write cursor at the entry whose key is equal to the
    /// given key, or at the past-the-end position if the map does not contain
    /// the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut cursor = map.find_mut(&1);
    /// *cursor.value_mut().unwrap() = "z";
    ///
    /// assert_eq!(map.get(&1), Some(&"z"));
    /// ```
    pub fn find_mut<Q: ?Sized>(&mut self, key: &Q) -> CursorMut<K, V, C>
        where C: Compare<Q, K> {

        let node = self.locate_splay(key);
        CursorMut { map: self, node }
    }

    /// Returns a read-only cursor at the first entry whose key is not less
    /// than the given key, or at the past-the-end position if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(10, "a");
    /// map.insert(20, "b");
    ///
    /// assert_eq!(map.lower_bound(&10).key(), Some(&10));
    /// assert_eq!(map.lower_bound(&11).key(), Some(&20));
    /// assert!(map.lower_bound(&21).is_end());
    /// ```
    pub fn lower_bound<Q: ?Sized>(&mut self, key: &Q) -> Cursor<K, V>
        where C: Compare<Q, K> {

        let node = node::lower_bound(&self.arena, &self.cmp, key);
        self.splay_on_find(node);
        Cursor { arena: &self.arena, node }
    }

    /// Returns a read-write cursor at the first entry whose key is not less
    /// than the given key, or at the past-the-end position if there is none.
    pub fn lower_bound_mut<Q: ?Sized>(&mut self, key: &Q) -> CursorMut<K, V, C>
        where C: Compare<Q, K> {

        let node = node::lower_bound(&self.arena, &self.cmp, key);
        self.splay_on_find(node);
        CursorMut { map: self, node }
    }

    /// Returns a read-only cursor at the first entry whose key is greater
    /// than the given key, or at the past-the-end position if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(10, "a");
    /// map.insert(20, "b");
    ///
    /// assert_eq!(map.upper_bound(&10).key(), Some(&20));
    /// assert!(map.upper_bound(&20).is_end());
    /// ```
    pub fn upper_bound<Q: ?Sized>(&mut self, key: &Q) -> Cursor<K, V>
        where C: Compare<Q, K> {

        let node = node::upper_bound(&self.arena, &self.cmp, key);
        self.splay_on_find(node);
        Cursor { arena: &self.arena, node }
    }

    /// Returns a read-write cursor at the first entry whose key is greater
    /// than the given key, or at the past-the-end position if there is none.
    pub fn upper_bound_mut<Q: ?Sized>(&mut self, key: &Q) -> CursorMut<K, V, C>
        where C: Compare<Q, K> {

        let node = node::upper_bound(&self.arena, &self.cmp, key);
        self.splay_on_find(node);
        CursorMut { map: self, node }
    }

    /// Returns the pair `(lower_bound(key), upper_bound(key))` as read-only
    /// cursors. The range between them contains zero or one entry, since keys
    /// are unique.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(10, "a");
    /// map.insert(20, "b");
    ///
    /// let (first, last) = map.equal_range(&10);
    /// assert_eq!(first.key(), Some(&10));
    /// assert_eq!(last.key(), Some(&20));
    ///
    /// let (first, last) = map.equal_range(&15);
    /// assert_eq!(first, last);
    /// ```
    pub fn equal_range<Q: ?Sized>(&mut self, key: &Q) -> (Cursor<K, V>, Cursor<K, V>)
        where C: Compare<Q, K> {

        let lower = node::lower_bound(&self.arena, &self.cmp, key);
        let upper = node::upper_bound(&self.arena, &self.cmp, key);
        self.splay_on_find(lower);
        (Cursor { arena: &self.arena, node: lower }, Cursor { arena: &self.arena, node: upper })
    }

    /// Returns an iterator that consumes the map.
    ///
    /// The iterator yields the entries in ascending order according to the
    /// map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.into_iter();
    /// assert_eq!(it.next(), Some((1, "a")));
    /// assert_eq!(it.next(), Some((2, "b")));
    /// assert_eq!(it.next(), Some((3, "c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn into_iter(self) -> IntoIter<K, V> {
        IntoIter(node::IntoIter::new(self.arena, self.len))
    }

    /// Returns an iterator over the map's entries with immutable references
    /// to the values.
    ///
    /// The iterator yields the entries in ascending order according to the
    /// map's comparator. Iteration is a pure read: it never splays and never
    /// advances the policy counters.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<K, V> {
        Iter(node::Iter::new(&self.arena, self.len))
    }

    /// Returns an iterator over the map's entries with mutable references to
    /// the values.
    ///
    /// The iterator yields the entries in ascending order according to the
    /// map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// map.insert("c", 3);
    ///
    /// let mut i = 1;
    ///
    /// for (_, value) in map.iter_mut() {
    ///     assert_eq!(i, *value);
    ///     *value *= 2;
    ///     i += 1;
    /// }
    ///
    /// assert_eq!(map[&"a"], 2);
    /// assert_eq!(map[&"b"], 4);
    /// assert_eq!(map[&"c"], 6);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<K, V> {
        let len = self.len;
        IterMut(node::IterMut::new(&mut self.arena, len))
    }

    /// Returns an iterator over the map's entries whose keys lie in the given
    /// range with immutable references to the values.
    ///
    /// The iterator yields the entries in ascending order according to the
    /// map's comparator. Like `iter`, constructing and driving the iterator
    /// never splays.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound::{Excluded, Included, Unbounded};
    ///
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// map.insert("c", 3);
    ///
    /// assert_eq!(map.range(Unbounded, Unbounded).collect::<Vec<_>>(),
    ///     [(&"a", &1), (&"b", &2), (&"c", &3)]);
    /// assert_eq!(map.range(Excluded(&"a"), Included(&"f")).collect::<Vec<_>>(),
    ///     [(&"b", &2), (&"c", &3)]);
    /// assert_eq!(map.range(Included(&"a"), Excluded(&"b")).collect::<Vec<_>>(),
    ///     [(&"a", &1)]);
    /// ```
    pub fn range<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> Range<K, V> where C: Compare<Min, K> + Compare<Max, K> {

        let (first, stop) = self.range_endpoints(min, max);
        Range(node::Range::new(&self.arena, first, stop, self.len))
    }

    /// Returns an iterator over the map's entries whose keys lie in the given
    /// range with mutable references to the values.
    ///
    /// The iterator yields the entries in ascending order according to the
    /// map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound;
    ///
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// map.insert("c", 3);
    ///
    /// for (_, value) in map.range_mut(Bound::Unbounded, Bound::Excluded(&"c")) {
    ///     *value *= 2;
    /// }
    ///
    /// assert_eq!(map[&"a"], 2);
    /// assert_eq!(map[&"b"], 4);
    /// assert_eq!(map[&"c"], 3);
    /// ```
    pub fn range_mut<Min: ?Sized, Max: ?Sized>(&mut self, min: Bound<&Min>, max: Bound<&Max>)
        -> RangeMut<K, V> where C: Compare<Min, K> + Compare<Max, K> {

        let (first, stop) = self.range_endpoints(min, max);
        let len = self.len;
        RangeMut(node::RangeMut::new(&mut self.arena, first, stop, len))
    }

    /// Resolves a pair of bounds to `(first, stop)` node ids, where `stop` is
    /// the first node past the range. A crossed or out-of-tree range
    /// normalizes to `first == stop`.
    fn range_endpoints<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> (NodeId, NodeId) where C: Compare<Min, K> + Compare<Max, K> {

        let a = &self.arena;

        let first = match min {
            Bound::Included(key) => node::lower_bound(a, &self.cmp, key),
            Bound::Excluded(key) => node::upper_bound(a, &self.cmp, key),
            Bound::Unbounded => a.min(),
        };

        let stop = match max {
            Bound::Included(key) => node::upper_bound(a, &self.cmp, key),
            Bound::Excluded(key) => node::lower_bound(a, &self.cmp, key),
            Bound::Unbounded => SENTINEL,
        };

        if first == SENTINEL || first == stop {
            return (first, first);
        }
        if stop != SENTINEL && !self.cmp.compares_lt(a.key(first), a.key(stop)) {
            return (first, first);
        }

        (first, stop)
    }
}

impl<K, V, C> Debug for Map<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;

        let mut it = self.iter();

        if let Some((k, v)) = it.next() {
            write!(f, "{:?}: {:?}", k, v)?;
            for (k, v) in it {
                write!(f, ", {:?}: {:?}", k, v)?;
            }
        }

        write!(f, "}}")
    }
}

impl<K, V, C> Default for Map<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self {
        Map::with_cmp(Default::default())
    }
}

impl<K, V, C> Extend<(K, V)> for Map<K, V, C> where C: Compare<K> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, it: I) {
        for (k, v) in it {
            self.insert(k, v);
        }
    }
}

impl<K, V, C> iter::FromIterator<(K, V)> for Map<K, V, C>
    where C: Compare<K> + Default {

    fn from_iter<I: IntoIterator<Item = (K, V)>>(it: I) -> Self {
        let mut map: Self = Default::default();
        map.extend(it);
        map
    }
}

impl<K, V, C> Hash for Map<K, V, C> where K: Hash, V: Hash, C: Compare<K> {
    fn hash<H: hash::Hasher>(&self, h: &mut H) {
        for e in self.iter() {
            e.hash(h);
        }
    }
}

impl<'a, K, V, C, Q: ?Sized> ops::Index<&'a Q> for Map<K, V, C>
    where C: Compare<K> + Compare<Q, K> {

    type Output = V;

    /// Indexing is a plain descent without splaying, since `Index` only hands
    /// out a shared borrow.
    fn index(&self, key: &Q) -> &V {
        let node = node::find(&self.arena, &self.cmp, key);
        if node == SENTINEL {
            panic!("key not found");
        }
        self.arena.value(node)
    }
}

impl<'a, K, V, C> IntoIterator for &'a Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for Map<K, V, C> where C: Compare<K> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> {
        self.into_iter()
    }
}

impl<K, V, C> PartialEq for Map<K, V, C> where V: PartialEq, C: Compare<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(l, r)| {
            self.cmp.compares_eq(l.0, r.0) && l.1 == r.1
        })
    }
}

impl<K, V, C> Eq for Map<K, V, C> where V: Eq, C: Compare<K> {}

impl<K, V, C> PartialOrd for Map<K, V, C> where V: PartialOrd, C: Compare<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Some(Equal),
                (None, Some(_)) => return Some(Less),
                (Some(_), None) => return Some(Greater),
                (Some(l), Some(r)) => match self.cmp.compare(l.0, r.0) {
                    Equal => match l.1.partial_cmp(r.1) {
                        Some(Equal) => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return Some(non_eq),
                },
            }
        }
    }
}

impl<K, V, C> Ord for Map<K, V, C> where V: Ord, C: Compare<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Equal,
                (None, Some(_)) => return Less,
                (Some(_), None) => return Greater,
                (Some(l), Some(r)) => match self.cmp.compare(l.0, r.0) {
                    Equal => match l.1.cmp(r.1) {
                        Equal => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return non_eq,
                },
            }
        }
    }
}

/// An iterator that consumes the map.
///
/// The iterator yields the entries in ascending order according to the map's
/// comparator.
///
/// # Examples
///
/// Acquire through [`Map::into_iter`](struct.Map.html#method.into_iter) or the
/// `IntoIterator` trait:
///
/// ```
/// let mut map = splay_map::Map::new();
///
/// map.insert(2, "b");
/// map.insert(1, "a");
///
/// for (key, value) in map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
#[derive(Clone)]
pub struct IntoIter<K, V>(node::IntoIter<K, V>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<(K, V)> {
        self.0.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.0.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// An iterator over the map's entries with immutable references to the
/// values.
///
/// The iterator yields the entries in ascending order according to the map's
/// comparator.
///
/// # Examples
///
/// Acquire through [`Map::iter`](struct.Map.html#method.iter) or the
/// `IntoIterator` trait:
///
/// ```
/// let mut map = splay_map::Map::new();
///
/// map.insert(2, "b");
/// map.insert(1, "a");
///
/// for (key, value) in &map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
pub struct Iter<'a, K: 'a, V: 'a>(node::Iter<'a, K, V>);

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Iter<'a, K, V> {
        Iter(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.0.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.0.next_back()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// An iterator over the map's entries with mutable references to the values.
///
/// The iterator yields the entries in ascending order according to the map's
/// comparator.
///
/// # Examples
///
/// Acquire through [`Map::iter_mut`](struct.Map.html#method.iter_mut) or the
/// `IntoIterator` trait:
///
/// ```
/// let mut map = splay_map::Map::new();
///
/// map.insert(2, "b");
/// map.insert(1, "a");
///
/// for (key, value) in &mut map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
pub struct IterMut<'a, K: 'a, V: 'a>(node::IterMut<'a, K, V>);

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.0.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.0.next_back()
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

/// An iterator over the map's entries whose keys lie in a given range with
/// immutable references to the values.
///
/// The iterator yields the entries in ascending order according to the map's
/// comparator.
///
/// Acquire through [`Map::range`](struct.Map.html#method.range).
pub struct Range<'a, K: 'a, V: 'a>(node::Range<'a, K, V>);

impl<'a, K, V> Clone for Range<'a, K, V> {
    fn clone(&self) -> Range<'a, K, V> {
        Range(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.0.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Range<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.0.next_back()
    }
}

/// An iterator over the map's entries whose keys lie in a given range with
/// mutable references to the values.
///
/// The iterator yields the entries in ascending order according to the map's
/// comparator.
///
/// Acquire through [`Map::range_mut`](struct.Map.html#method.range_mut).
pub struct RangeMut<'a, K: 'a, V: 'a>(node::RangeMut<'a, K, V>);

impl<'a, K, V> Iterator for RangeMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.0.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for RangeMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.0.next_back()
    }
}

/// A read-only bidirectional cursor into the map.
///
/// A cursor points either at an entry or at the uniform past-the-end
/// position. Cursor equality is node identity, so two cursors at the
/// past-the-end position of the same map always compare equal. Stepping is
/// cyclic through the past-the-end position: advancing from the last entry
/// parks the cursor there, advancing once more wraps to the first entry, and
/// stepping backwards from the past-the-end position lands on the last entry.
///
/// A cursor stays valid across lookups even though they may splay: splaying
/// rearranges links, never nodes, so the cursor keeps pointing at the same
/// entry.
///
/// # Examples
///
/// ```
/// let mut map = splay_map::Map::new();
///
/// map.insert(2, "b");
/// map.insert(1, "a");
///
/// let mut cursor = map.find(&1);
/// assert_eq!(cursor.key(), Some(&1));
///
/// cursor.move_next();
/// assert_eq!(cursor.key(), Some(&2));
///
/// cursor.move_next();
/// assert!(cursor.is_end());
///
/// cursor.move_prev();
/// assert_eq!(cursor.key(), Some(&2));
/// ```
pub struct Cursor<'a, K: 'a, V: 'a> {
    arena: &'a node::Arena<K, V>,
    node: NodeId,
}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for Cursor<'a, K, V> {}

impl<'a, K, V> PartialEq for Cursor<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<'a, K, V> Eq for Cursor<'a, K, V> {}

impl<'a, K, V> Debug for Cursor<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Cursor").field("node", &self.node).finish()
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Checks if the cursor is at the past-the-end position.
    pub fn is_end(&self) -> bool {
        self.node == SENTINEL
    }

    /// Returns the entry the cursor points at, or `None` at the past-the-end
    /// position.
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        if self.node == SENTINEL { None } else { Some(self.arena.key_value(self.node)) }
    }

    /// Returns the key the cursor points at, or `None` at the past-the-end
    /// position.
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|e| e.0)
    }

    /// Returns the value the cursor points at, or `None` at the past-the-end
    /// position.
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|e| e.1)
    }

    /// Moves the cursor to the next entry in key order.
    pub fn move_next(&mut self) {
        self.node = node::successor(self.arena, self.node);
    }

    /// Moves the cursor to the previous entry in key order.
    pub fn move_prev(&mut self) {
        self.node = node::predecessor(self.arena, self.node);
    }
}

/// A read-write bidirectional cursor into the map.
///
/// Navigation follows the same rules as [`Cursor`]. In addition the cursor
/// can edit the value under it, remove the entry under it, and insert new
/// entries using its position as a hint.
///
/// # Examples
///
/// Removing a run of entries by position:
///
/// ```
/// let mut map = splay_map::Map::new();
///
/// for key in 1..7 {
///     map.insert(key, ());
/// }
///
/// let mut cursor = map.find_mut(&3);
/// while cursor.key().map_or(false, |k| *k < 6) {
///     cursor.remove();
/// }
///
/// assert_eq!(map.iter().map(|e| *e.0).collect::<Vec<_>>(), [1, 2, 6]);
/// ```
pub struct CursorMut<'a, K: 'a, V: 'a, C: 'a = Natural<K>> where C: Compare<K> {
    map: &'a mut Map<K, V, C>,
    node: NodeId,
}

impl<'a, K, V, C> CursorMut<'a, K, V, C> where C: Compare<K> {
    /// Checks if the cursor is at the past-the-end position.
    pub fn is_end(&self) -> bool {
        self.node == SENTINEL
    }

    /// Returns the entry the cursor points at, or `None` at the past-the-end
    /// position.
    pub fn key_value(&self) -> Option<(&K, &V)> {
        if self.node == SENTINEL { None } else { Some(self.map.arena.key_value(self.node)) }
    }

    /// Returns the key the cursor points at, or `None` at the past-the-end
    /// position.
    pub fn key(&self) -> Option<&K> {
        self.key_value().map(|e| e.0)
    }

    /// Returns the value the cursor points at, or `None` at the past-the-end
    /// position.
    pub fn value(&self) -> Option<&V> {
        self.key_value().map(|e| e.1)
    }

    /// Returns a mutable reference to the value the cursor points at, or
    /// `None` at the past-the-end position.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        if self.node == SENTINEL { None } else { Some(self.map.arena.value_mut(self.node)) }
    }

    /// Returns a read-only cursor at the same position. The conversion only
    /// goes this way; a read-only cursor can never become a read-write one.
    pub fn as_cursor(&self) -> Cursor<K, V> {
        Cursor { arena: &self.map.arena, node: self.node }
    }

    /// Moves the cursor to the next entry in key order.
    pub fn move_next(&mut self) {
        self.node = node::successor(&self.map.arena, self.node);
    }

    /// Moves the cursor to the previous entry in key order.
    pub fn move_prev(&mut self) {
        self.node = node::predecessor(&self.map.arena, self.node);
    }

    /// Removes the entry under the cursor and returns it, advancing the
    /// cursor to the successor. Returns `None` at the past-the-end position.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut cursor = map.find_mut(&1);
    /// assert_eq!(cursor.remove(), Some((1, "a")));
    /// assert_eq!(cursor.key(), Some(&2));
    ///
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove(&mut self) -> Option<(K, V)> {
        if self.node == SENTINEL {
            return None;
        }

        let node = self.node;
        self.node = node::remove(&mut self.map.arena, node);
        self.map.len -= 1;
        Some(self.map.arena.free(node))
    }

    /// Inserts an entry using the cursor position as a hint for where the key
    /// belongs: directly before the entry under the cursor. A correct hint
    /// finds the attachment slot in constant time instead of descending from
    /// the root; a wrong hint falls back to the full insertion protocol. In
    /// both cases the result is exactly the state [`Map::insert`] would have
    /// produced, and the cursor ends up at the affected entry.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = splay_map::Map::new();
    ///
    /// map.insert(10, "a");
    /// map.insert(30, "c");
    ///
    /// // Correct hint: 20 belongs directly before 30.
    /// let mut cursor = map.find_mut(&30);
    /// assert_eq!(cursor.insert(20, "b"), None);
    /// assert_eq!(cursor.key(), Some(&20));
    ///
    /// // Wrong hint: the cursor is nowhere near where 5 belongs.
    /// assert_eq!(cursor.insert(5, "e"), None);
    ///
    /// assert_eq!(map.iter().map(|e| *e.0).collect::<Vec<_>>(), [5, 10, 20, 30]);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let arena = &self.map.arena;
        let hint = self.node;
        let pred = node::predecessor(arena, hint);

        let after_pred = pred == SENTINEL || self.map.cmp.compares_lt(arena.key(pred), &key);
        let before_hint = hint == SENTINEL || self.map.cmp.compares_lt(&key, arena.key(hint));

        if after_pred && before_hint {
            // The key goes between pred and hint. One of the two adjacent
            // slots is necessarily open: the hint's left slot unless the hint
            // has a left subtree, in which case pred is that subtree's
            // maximum and its right slot is open.
            let (parent, left) = if hint != SENTINEL && arena.left(hint) == SENTINEL {
                (hint, true)
            } else if pred != SENTINEL {
                (pred, false)
            } else {
                (SENTINEL, false)
            };

            let node = self.map.arena.alloc(key, value);
            node::attach(&mut self.map.arena, node, parent, left);
            self.map.len += 1;
            self.map.splay_on_insert(node);
            self.node = node;
            None
        } else {
            let (node, old) = self.map.insert_node(key, value);
            self.node = node;
            old
        }
    }
}

/// An entry in the map.
///
/// See [`Map::entry`](struct.Map.html#method.entry) for an example.
pub enum Entry<'a, K: 'a, V: 'a, C: 'a = Natural<K>> where C: Compare<K> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, C>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, C>),
}

impl<'a, K, V, C> Entry<'a, K, V, C> where C: Compare<K> {
    /// Returns the entry's value, inserting the given default if the entry is
    /// vacant.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(default),
        }
    }

    /// Returns the entry's value, inserting the given function's result if
    /// the entry is vacant. The function is not called for an occupied entry.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V where F: FnOnce() -> V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(default()),
        }
    }
}

/// An occupied entry in the map.
pub struct OccupiedEntry<'a, K: 'a, V: 'a, C: 'a = Natural<K>> where C: Compare<K> {
    map: &'a mut Map<K, V, C>,
    node: NodeId,
}

impl<'a, K, V, C> OccupiedEntry<'a, K, V, C> where C: Compare<K> {
    /// Returns a reference to the entry's key.
    pub fn key(&self) -> &K {
        self.map.arena.key(self.node)
    }

    /// Returns a reference to the entry's value.
    pub fn get(&self) -> &V {
        self.map.arena.value(self.node)
    }

    /// Returns a mutable reference to the entry's value.
    pub fn get_mut(&mut self) -> &mut V {
        self.map.arena.value_mut(self.node)
    }

    /// Converts the entry into a mutable reference to its value whose
    /// lifetime is bound to the map.
    pub fn into_mut(self) -> &'a mut V {
        self.map.arena.value_mut(self.node)
    }

    /// Replaces the entry's value, returning the old one. The key is left
    /// untouched.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the map, returning its key and value.
    pub fn remove(self) -> (K, V) {
        node::remove(&mut self.map.arena, self.node);
        self.map.len -= 1;
        self.map.arena.free(self.node)
    }
}

/// A vacant entry in the map.
pub struct VacantEntry<'a, K: 'a, V: 'a, C: 'a = Natural<K>> where C: Compare<K> {
    map: &'a mut Map<K, V, C>,
    key: K,
    parent: NodeId,
    left: bool,
}

impl<'a, K, V, C> VacantEntry<'a, K, V, C> where C: Compare<K> {
    /// Returns a reference to the key that would be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Inserts the key with the given value, returning a mutable reference to
    /// the value. The insertion reuses the slot located by `entry`, so no
    /// second descent happens.
    pub fn insert(self, value: V) -> &'a mut V {
        let VacantEntry { map, key, parent, left } = self;
        let node = map.arena.alloc(key, value);
        node::attach(&mut map.arena, node, parent, left);
        map.len += 1;
        map.splay_on_insert(node);
        map.arena.value_mut(node)
    }
}
