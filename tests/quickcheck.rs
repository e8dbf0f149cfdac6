use compare::Compare;
use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;
use rand::seq::SliceRandom;
use splay_map::{Map, Set, SplayMode, SplayPolicy};
use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound as StdBound;
use std::rc::Rc;

type K = u32;
type V = u16;
type M = Map<K, V>;

fn map_from(entries: &[(K, V)]) -> M {
    entries.iter().cloned().collect()
}

fn splay_heavy(entries: &[(K, V)]) -> M {
    let mut map = Map::with_policy(SplayPolicy {
        insert: SplayMode::Always,
        find: SplayMode::Always,
    });
    map.extend(entries.iter().cloned());
    map
}

#[quickcheck]
fn insert_incs_len(entries: Vec<(K, V)>, k: K, v: V) -> TestResult {
    let mut m = map_from(&entries);
    let old_len = m.len();
    if m.insert(k, v).is_some() { return TestResult::discard(); }
    TestResult::from_bool(m.len() == old_len + 1)
}

#[quickcheck]
fn insert_returns_none(entries: Vec<(K, V)>, k: K, v: V) -> TestResult {
    let mut m = map_from(&entries);
    if m.get(&k).is_some() { return TestResult::discard(); }
    TestResult::from_bool(m.insert(k, v).is_none())
}

#[quickcheck]
fn insert_sets_val(entries: Vec<(K, V)>, k: K, v: V) -> bool {
    let mut m = map_from(&entries);
    m.insert(k, v);
    m[&k] == v
}

#[quickcheck]
fn reinsert_changes_val(entries: Vec<(K, V)>, k: K, v1: V, v2: V) -> bool {
    let mut m = map_from(&entries);
    m.insert(k, v1);
    m.insert(k, v2);
    m[&k] == v2
}

#[quickcheck]
fn reinsert_keeps_len(entries: Vec<(K, V)>, k: K, v1: V, v2: V) -> bool {
    let mut m = map_from(&entries);
    m.insert(k, v1);
    let old_len = m.len();
    m.insert(k, v2);
    m.len() == old_len
}

#[quickcheck]
fn reinsert_returns_old_val(entries: Vec<(K, V)>, k: K, v1: V, v2: V) -> bool {
    let mut m = map_from(&entries);
    m.insert(k, v1);
    m.insert(k, v2) == Some(v1)
}

#[quickcheck]
fn entry_never_overwrites(entries: Vec<(K, V)>, k: K, v1: V, v2: V) -> bool {
    let mut m = map_from(&entries);
    m.insert(k, v1);
    let old_len = m.len();
    m.entry(k).or_insert(v2);
    m[&k] == v1 && m.len() == old_len
}

#[quickcheck]
fn entry_inserts_when_vacant(entries: Vec<(K, V)>, k: K, v: V) -> TestResult {
    let mut m = map_from(&entries);
    if m.get(&k).is_some() { return TestResult::discard(); }
    let old_len = m.len();
    m.entry(k).or_insert(v);
    TestResult::from_bool(m[&k] == v && m.len() == old_len + 1)
}

#[quickcheck]
fn entry_or_insert_with_is_lazy(entries: Vec<(K, V)>, k: K, v1: V) -> bool {
    let mut m = map_from(&entries);
    m.insert(k, v1);
    m.entry(k).or_insert_with(|| panic!("value constructed for an occupied entry"));
    m[&k] == v1
}

#[quickcheck]
fn remove_returns_entry(entries: Vec<(K, V)>, k: K, v: V) -> bool {
    let mut m = map_from(&entries);
    m.insert(k, v);
    m.remove(&k) == Some((k, v))
}

#[quickcheck]
fn remove_decs_len(entries: Vec<(K, V)>, k: K, v: V) -> bool {
    let mut m = map_from(&entries);
    m.insert(k, v);
    let old_len = m.len();
    m.remove(&k);
    m.len() == old_len - 1
}

#[quickcheck]
fn remove_removes(entries: Vec<(K, V)>, k: K, v: V) -> bool {
    let mut m = map_from(&entries);
    m.insert(k, v);
    m.remove(&k);
    m.get(&k).is_none()
}

#[quickcheck]
fn max_consistent_with_iter(entries: Vec<(K, V)>) -> bool {
    let m = map_from(&entries);
    splay_map::Map::max(&m) == m.iter().next_back()
}

#[quickcheck]
fn min_consistent_with_iter(entries: Vec<(K, V)>) -> bool {
    let m = map_from(&entries);
    splay_map::Map::min(&m) == m.iter().next()
}

#[quickcheck]
fn iter_ascends(entries: Vec<(K, V)>) -> bool {
    let m = map_from(&entries);
    m.iter().zip(m.iter().skip(1)).all(|(e1, e2)| m.cmp().compares_lt(e1.0, e2.0))
}

#[quickcheck]
fn iter_rev_descends(entries: Vec<(K, V)>) -> bool {
    let m = map_from(&entries);
    m.iter().rev().zip(m.iter().rev().skip(1)).all(|(e2, e1)| m.cmp().compares_gt(e2.0, e1.0))
}

#[quickcheck]
fn clear_empties(entries: Vec<(K, V)>) -> bool {
    let mut m = map_from(&entries);
    m.clear();
    m.is_empty() && m.len() == 0 && m.iter().next().is_none()
}

#[quickcheck]
fn clear_then_reinsert(entries: Vec<(K, V)>) -> bool {
    let mut m = map_from(&entries);
    let keys: Vec<K> = m.iter().map(|e| *e.0).collect();
    m.clear();
    for &k in &keys {
        m.insert(k, 0);
    }
    m.len() == keys.len()
}

/// An operation applicable to both the splay map and the oracle.
#[derive(Clone, Debug)]
enum Op {
    Insert(K, V),
    Remove(K),
    Get(K),
    EntryOrInsert(K, V),
    RemoveMin,
    RemoveMax,
}

impl Arbitrary for Op {
    fn arbitrary(gen: &mut Gen) -> Op {
        // A small key domain keeps collisions and hits frequent.
        let k = K::arbitrary(gen) % 32;
        let v = V::arbitrary(gen);
        match u8::arbitrary(gen) % 6 {
            0 => Op::Insert(k, v),
            1 => Op::Remove(k),
            2 => Op::Get(k),
            3 => Op::EntryOrInsert(k, v),
            4 => Op::RemoveMin,
            _ => Op::RemoveMax,
        }
    }
}

impl Op {
    /// Applies the operation to both containers and checks that every
    /// returned value agrees.
    fn exec(self, map: &mut M, oracle: &mut BTreeMap<K, V>) -> bool {
        match self {
            Op::Insert(k, v) => map.insert(k, v) == oracle.insert(k, v),
            Op::Remove(k) => map.remove(&k) == oracle.remove(&k).map(|v| (k, v)),
            Op::Get(k) => map.get(&k) == oracle.get(&k),
            Op::EntryOrInsert(k, v) => *map.entry(k).or_insert(v) == *oracle.entry(k).or_insert(v),
            Op::RemoveMin => map.remove_min() == oracle.pop_first(),
            Op::RemoveMax => map.remove_max() == oracle.pop_last(),
        }
    }
}

fn matches_oracle(mut map: M, ops: Vec<Op>) -> bool {
    let mut oracle = BTreeMap::new();

    for op in ops {
        if !op.exec(&mut map, &mut oracle) {
            return false;
        }
        if map.len() != oracle.len() {
            return false;
        }
    }

    map.iter().eq(oracle.iter())
}

#[quickcheck]
fn default_policy_matches_oracle(ops: Vec<Op>) -> bool {
    matches_oracle(Map::new(), ops)
}

#[quickcheck]
fn always_splay_matches_oracle(ops: Vec<Op>) -> bool {
    let policy = SplayPolicy { insert: SplayMode::Always, find: SplayMode::Always };
    matches_oracle(Map::with_policy(policy), ops)
}

#[quickcheck]
fn never_splay_matches_oracle(ops: Vec<Op>) -> bool {
    let policy = SplayPolicy { insert: SplayMode::Never, find: SplayMode::Never };
    matches_oracle(Map::with_policy(policy), ops)
}

#[quickcheck]
fn half_splay_matches_oracle(ops: Vec<Op>) -> bool {
    let policy = SplayPolicy { insert: SplayMode::Half, find: SplayMode::Half };
    matches_oracle(Map::with_policy(policy), ops)
}

#[quickcheck]
fn lower_bound_matches_oracle(entries: Vec<(K, V)>, probe: K) -> bool {
    let mut m = splay_heavy(&entries);
    let oracle: BTreeMap<K, V> = entries.iter().cloned().collect();

    let expected = oracle.range(probe..).next().map(|e| *e.0);
    m.lower_bound(&probe).key().copied() == expected
}

#[quickcheck]
fn upper_bound_matches_oracle(entries: Vec<(K, V)>, probe: K) -> bool {
    let mut m = splay_heavy(&entries);
    let oracle: BTreeMap<K, V> = entries.iter().cloned().collect();

    let expected = oracle
        .range((StdBound::Excluded(probe), StdBound::Unbounded))
        .next()
        .map(|e| *e.0);
    m.upper_bound(&probe).key().copied() == expected
}

#[quickcheck]
fn equal_range_spans_at_most_one(entries: Vec<(K, V)>, probe: K) -> bool {
    let mut m = map_from(&entries);
    let present = entries.iter().any(|e| e.0 == probe);

    let (mut first, last) = m.equal_range(&probe);
    if present {
        if first.key() != Some(&probe) {
            return false;
        }
        first.move_next();
    }
    first == last
}

#[quickcheck]
fn count_is_membership(entries: Vec<(K, V)>, probe: K) -> bool {
    let mut m = map_from(&entries);
    let expected = if entries.iter().any(|e| e.0 == probe) { 1 } else { 0 };
    m.count(&probe) == expected
}

#[derive(Clone, Debug)]
enum Bound<T> {
    Included(T),
    Excluded(T),
    Unbounded,
}

impl<T> Bound<T> {
    fn as_ref(&self) -> Bound<&T> {
        match *self {
            Bound::Included(ref t) => Bound::Included(t),
            Bound::Excluded(ref t) => Bound::Excluded(t),
            Bound::Unbounded => Bound::Unbounded,
        }
    }

    fn to_std_bound(self) -> StdBound<T> {
        match self {
            Bound::Included(t) => StdBound::Included(t),
            Bound::Excluded(t) => StdBound::Excluded(t),
            Bound::Unbounded => StdBound::Unbounded,
        }
    }
}

impl<T> Arbitrary for Bound<T> where T: Arbitrary {
    fn arbitrary(gen: &mut Gen) -> Bound<T> {
        match u8::arbitrary(gen) % 3 {
            0 => Bound::Included(Arbitrary::arbitrary(gen)),
            1 => Bound::Excluded(Arbitrary::arbitrary(gen)),
            _ => Bound::Unbounded,
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Bound<T>>> {
        match *self {
            Bound::Included(ref t) => Box::new(t.shrink().map(Bound::Included)),
            Bound::Excluded(ref t) => Box::new(t.shrink().map(Bound::Excluded)),
            Bound::Unbounded => Box::new(None.into_iter()),
        }
    }
}

#[quickcheck]
fn range(entries: Vec<(K, V)>, min: Bound<K>, max: Bound<K>) -> bool {
    let m = map_from(&entries);
    let r = m.range(min.as_ref().to_std_bound(), max.as_ref().to_std_bound());

    let i = m.iter()
        .skip_while(|e| match min {
            Bound::Included(ref t) => e.0 < t,
            Bound::Excluded(ref t) => e.0 <= t,
            Bound::Unbounded => false,
        })
        .take_while(|e| match max {
            Bound::Included(ref t) => e.0 <= t,
            Bound::Excluded(ref t) => e.0 < t,
            Bound::Unbounded => true,
        });

    r.eq(i)
}

#[quickcheck]
fn range_rev(entries: Vec<(K, V)>, min: Bound<K>, max: Bound<K>) -> bool {
    let m = map_from(&entries);
    let r = m.range(min.as_ref().to_std_bound(), max.as_ref().to_std_bound()).rev();

    let i = m.iter().rev()
        .skip_while(|e| match max {
            Bound::Included(ref t) => e.0 > t,
            Bound::Excluded(ref t) => e.0 >= t,
            Bound::Unbounded => false,
        })
        .take_while(|e| match min {
            Bound::Included(ref t) => e.0 >= t,
            Bound::Excluded(ref t) => e.0 > t,
            Bound::Unbounded => true,
        });

    r.eq(i)
}

#[quickcheck]
fn remove_range_removes_exactly_the_range(entries: Vec<(K, V)>, min: Bound<K>, max: Bound<K>)
    -> bool {

    let mut m = map_from(&entries);
    let in_range: BTreeSet<K> = m
        .range(min.as_ref().to_std_bound(), max.as_ref().to_std_bound())
        .map(|e| *e.0)
        .collect();
    let kept: Vec<(K, V)> =
        m.iter().filter(|e| !in_range.contains(e.0)).map(|e| (*e.0, *e.1)).collect();

    let removed = m.remove_range(min.as_ref().to_std_bound(), max.as_ref().to_std_bound());

    removed == in_range.len() && m.iter().map(|e| (*e.0, *e.1)).eq(kept)
}

#[quickcheck]
fn hinted_insert_matches_unhinted(entries: Vec<(K, V)>, probe: K, k: K, v: V) -> bool {
    let mut hinted = map_from(&entries);
    let mut plain = hinted.clone();

    // The cursor lands anywhere from the first entry to past-the-end, so the
    // hint is sometimes right, sometimes wrong, and sometimes the key is
    // already present.
    let mut cursor = hinted.lower_bound_mut(&probe);
    let hinted_old = cursor.insert(k, v);
    let at_key = cursor.key() == Some(&k);

    let plain_old = plain.insert(k, v);

    at_key && hinted_old == plain_old && hinted == plain && hinted.iter().eq(plain.iter())
}

#[quickcheck]
fn reads_do_not_disturb_iteration(entries: Vec<(K, V)>, probes: Vec<K>) -> bool {
    let mut m = splay_heavy(&entries);
    let before: Vec<(K, V)> = m.iter().map(|e| (*e.0, *e.1)).collect();

    for p in &probes {
        m.get(p);
        m.lower_bound(p);
        m.upper_bound(p);
        m.contains_key(p);
    }

    m.iter().map(|e| (*e.0, *e.1)).eq(before)
}

#[quickcheck]
fn cursor_walk_agrees_with_iter(entries: Vec<(K, V)>) -> bool {
    let mut m = map_from(&entries);
    let expected: Vec<K> = m.iter().map(|e| *e.0).collect();

    let mut walked = Vec::with_capacity(expected.len());
    let mut cursor = m.lower_bound(&0);
    while let Some(&k) = cursor.key() {
        walked.push(k);
        cursor.move_next();
    }

    // The end cursor steps back onto the maximum.
    cursor.move_prev();
    let back_onto_max = cursor.key() == expected.last();

    walked == expected && back_onto_max
}

#[quickcheck]
fn set_matches_oracle(items: Vec<u32>, probe: u32) -> bool {
    let mut set: Set<u32> = items.iter().cloned().collect();
    let oracle: BTreeSet<u32> = items.iter().cloned().collect();

    set.len() == oracle.len()
        && set.iter().eq(oracle.iter())
        && set.contains(&probe) == oracle.contains(&probe)
}

#[quickcheck]
fn set_remove_min_drains_in_order(items: Vec<u32>) -> bool {
    let mut set: Set<u32> = items.iter().cloned().collect();
    let expected: Vec<u32> = set.iter().cloned().collect();

    let mut drained = Vec::with_capacity(expected.len());
    while let Some(item) = set.remove_min() {
        drained.push(item);
    }

    set.is_empty() && drained == expected
}

#[test]
fn empty_map() {
    let mut map: M = Map::new();

    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.iter().next(), None);
    assert!(map.find(&5).is_end());
    assert!(map.lower_bound(&5).is_end());
    assert_eq!(map.get(&5), None);
}

#[test]
fn three_element_insert_and_iterate() {
    let mut map = Map::new();
    map.insert(3, 'c');
    map.insert(1, 'a');
    map.insert(2, 'b');

    assert_eq!(
        map.iter().map(|e| (*e.0, *e.1)).collect::<Vec<_>>(),
        [(1, 'a'), (2, 'b'), (3, 'c')]
    );
    assert_eq!(
        map.iter().rev().map(|e| (*e.0, *e.1)).collect::<Vec<_>>(),
        [(3, 'c'), (2, 'b'), (1, 'a')]
    );
    assert_eq!(map.find(&2).value(), Some(&'b'));
}

#[test]
fn replace_keeps_other_entries() {
    let mut map = Map::new();
    map.insert(3, 'c');
    map.insert(1, 'a');
    map.insert(2, 'b');

    assert_eq!(map.insert(2, 'x'), Some('b'));
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&2), Some(&'x'));
    assert_eq!(map.get(&1), Some(&'a'));
    assert_eq!(map.get(&3), Some(&'c'));
}

#[test]
fn assignment_through_insert_creates_two_entries() {
    let mut map = Map::new();
    map.insert(50, 'a');
    map.insert(52, 'b');
    map.insert(50, 'c');

    assert_eq!(map.len(), 2);
    assert_eq!(map[&50], 'c');
    assert_eq!(map[&52], 'b');
}

#[test]
fn range_erase_leaves_flanks() {
    let mut map = Map::new();
    for key in 1..7 {
        map.insert(key, ());
    }

    assert_eq!(map.remove_range(StdBound::Included(&3), StdBound::Excluded(&6)), 3);
    assert_eq!(map.iter().map(|e| *e.0).collect::<Vec<_>>(), [1, 2, 6]);
}

#[test]
fn sorted_build_through_end_cursor() {
    let mut map = Map::new();

    {
        let mut cursor = map.lower_bound_mut(&0);
        assert!(cursor.is_end());
        for key in 0..100u32 {
            cursor.insert(key, key);
            cursor.move_next();
            assert!(cursor.is_end());
        }
    }

    assert_eq!(map.len(), 100);
    assert!(map.iter().map(|e| *e.0).eq(0..100));
}

#[test]
fn large_shuffle_matches_oracle() {
    let mut rng = rand::thread_rng();
    let n: u32 = 1000;

    let mut keys: Vec<u32> = (0..n).collect();
    keys.shuffle(&mut rng);

    let mut map = Map::new();
    let mut oracle = BTreeMap::new();

    for &k in &keys {
        assert_eq!(map.insert(k, k * 2), oracle.insert(k, k * 2));
        assert_eq!(map.len(), oracle.len());
    }
    assert!(map.iter().eq(oracle.iter()));

    let mut victims = keys.clone();
    victims.shuffle(&mut rng);

    for &k in &victims {
        assert_eq!(map.remove(&k), oracle.remove(&k).map(|v| (k, v)));
        assert_eq!(map.len(), oracle.len());
    }

    assert!(map.is_empty());
    assert_eq!(map.iter().next(), None);
}

/// A natural ordering that counts how many times it is consulted.
#[derive(Clone, Default)]
struct CountingCmp(Rc<Cell<u64>>);

impl Compare<u32> for CountingCmp {
    fn compare(&self, l: &u32, r: &u32) -> Ordering {
        self.0.set(self.0.get() + 1);
        l.cmp(r)
    }
}

#[test]
fn comparison_count_stays_amortized_logarithmic() {
    let mut rng = rand::thread_rng();
    let n: u64 = 1024;

    let counter = Rc::new(Cell::new(0u64));
    let policy = SplayPolicy { insert: SplayMode::Always, find: SplayMode::Always };
    let mut map = Map::with_cmp_and_policy(CountingCmp(counter.clone()), policy);

    // Sequential inserts build the adversarial spine shape.
    for k in 0..n as u32 {
        map.insert(k, k);
    }

    // Sequential and shuffled probes.
    for k in 0..n as u32 {
        map.get(&k);
    }
    let mut probes: Vec<u32> = (0..n as u32).collect();
    probes.shuffle(&mut rng);
    for k in &probes {
        map.get(k);
    }

    let ops = 3 * n;
    let log = 64 - n.leading_zeros() as u64;
    let bound = 10 * (ops + n) * (log + 1);
    let total = counter.get();

    assert!(
        total <= bound,
        "{} comparisons over {} operations exceeds the amortized bound {}",
        total,
        ops,
        bound
    );
}
