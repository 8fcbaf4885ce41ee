//! Property-based tests for the skip list against a sorted `Vec` model.

use proptest::prelude::*;
use rankskip::IntegrityCheck;
use rankskip::Natural;
use rankskip::Options;
use rankskip::SkipList;

// =============================================================================
// Test helpers
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Insert(i32),
    Remove(i32),
    RemoveAt(f64),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        // Narrow range so duplicates and hits on remove are common
        3 => (-50..50i32).prop_map(Op::Insert),
        1 => (-50..50i32).prop_map(Op::Remove),
        1 => (0.0..1.0f64).prop_map(Op::RemoveAt),
    ]
}

fn seeded(seed: u64) -> SkipList<i32> {
    SkipList::with_options(Natural, Options::default().with_seed(seed)).unwrap()
}

/// Apply `op` to both the list and the model.
fn apply(list: &mut SkipList<i32>, model: &mut Vec<i32>, op: &Op) {
    match op {
        Op::Insert(v) => {
            list.insert(*v).unwrap();
            let at = model.partition_point(|x| x <= v);
            model.insert(at, *v);
        }
        Op::Remove(v) => match model.binary_search(v) {
            Ok(_) => {
                assert_eq!(list.remove(v), Ok(*v));
                let at = model.partition_point(|x| x < v);
                model.remove(at);
            }
            Err(_) => assert!(list.remove(v).is_err()),
        },
        Op::RemoveAt(pct) => {
            if model.is_empty() {
                return;
            }
            let rank = ((*pct * model.len() as f64) as usize).min(model.len() - 1);
            let v = *list.at(rank as i64).unwrap();
            assert_eq!(v, model[rank]);
            list.remove(&v).unwrap();
            let at = model.partition_point(|x| *x < v);
            model.remove(at);
        }
    }
}

/// Sum of the widths along every level, head included.
fn level_sums(list: &SkipList<i32>) -> Vec<usize> {
    let mut sums = vec![0usize; list.height()];
    for rank in 0..list.len() {
        let rank = rank as i64;
        for level in 0..list.node_height(rank).unwrap() {
            sums[level] += list.node_width(rank, level).unwrap();
        }
    }
    sums
}

// =============================================================================
// Model equivalence
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Contents always match a sorted vector
    #[test]
    fn matches_sorted_vec(
        ops in prop::collection::vec(arbitrary_op(), 1..200),
        seed in any::<u64>(),
    ) {
        let mut list = seeded(seed);
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut list, &mut model, op);
            prop_assert_eq!(list.len(), model.len());
        }
        let contents: Vec<i32> = list.iter().copied().collect();
        prop_assert_eq!(contents, model);
        prop_assert_eq!(list.lacks_integrity(), IntegrityCheck::Success);
    }

    /// at(index(v)) == v, and index finds the first of a run of equal values
    #[test]
    fn rank_value_duality(values in prop::collection::vec(-20..20i32, 0..150)) {
        let mut list = SkipList::new();
        for v in &values {
            list.insert(*v).unwrap();
        }
        let mut sorted = values.clone();
        sorted.sort();
        for v in &values {
            let rank = list.index(v).unwrap();
            prop_assert_eq!(list.at(rank as i64).unwrap(), v);
            prop_assert_eq!(rank, sorted.partition_point(|x| x < v));
        }
        for i in 0..sorted.len() {
            prop_assert_eq!(list.at(i as i64).unwrap(), &sorted[i]);
            let back = -((sorted.len() - i) as i64);
            prop_assert_eq!(list.at(back).unwrap(), &sorted[i]);
        }
    }

    /// Adjacent values never descend
    #[test]
    fn sorted_order(values in prop::collection::vec(any::<i32>(), 0..300)) {
        let mut list = SkipList::new();
        for v in &values {
            list.insert(*v).unwrap();
        }
        for i in 1..list.len() as i64 {
            prop_assert!(list.at(i - 1).unwrap() <= list.at(i).unwrap());
        }
    }

    /// at_seq agrees with slicing the model
    #[test]
    fn at_seq_matches_slice(
        values in prop::collection::vec(any::<i32>(), 0..100),
        start in 0..120usize,
        length in 0..40usize,
    ) {
        let mut list = SkipList::new();
        for v in &values {
            list.insert(*v).unwrap();
        }
        let mut sorted = values.clone();
        sorted.sort();
        let result = list.at_seq(start, length);
        if length == 0 {
            prop_assert_eq!(result.unwrap(), Vec::<&i32>::new());
        } else if start + length <= sorted.len() {
            let expected: Vec<&i32> = sorted[start..start + length].iter().collect();
            prop_assert_eq!(result.unwrap(), expected);
        } else {
            prop_assert!(result.is_err());
        }
    }
}

// =============================================================================
// Structural properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Level 0 widths sum to the size, and every level sums to the same total
    #[test]
    fn widths_are_conserved(
        ops in prop::collection::vec(arbitrary_op(), 1..300),
        seed in any::<u64>(),
    ) {
        let mut list = seeded(seed);
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut list, &mut model, op);
        }
        let sums = level_sums(&list);
        if !list.is_empty() {
            prop_assert_eq!(sums[0], list.len());
        }
        // Node widths plus the head's width reach the end, one past the last rank.
        let head_widths: Vec<usize> = (0..list.height())
            .map(|level| {
                let first_at_level = (0..list.len())
                    .find(|&rank| list.node_height(rank as i64).unwrap() > level);
                first_at_level.map_or(list.len() + 1, |rank| rank + 1)
            })
            .collect();
        for level in 0..list.height() {
            prop_assert_eq!(sums[level] + head_widths[level], list.len() + 1);
        }
    }

    /// Inserting then removing everything, in any order, leaves an empty list
    #[test]
    fn insert_then_remove_all(
        values in prop::collection::vec(-100..100i32, 0..200),
        order in any::<u64>(),
    ) {
        let mut list = seeded(order);
        for v in &values {
            list.insert(*v).unwrap();
        }
        let mut removal = values.clone();
        let rotate = if removal.is_empty() { 0 } else { (order as usize) % removal.len() };
        removal.rotate_left(rotate);
        removal.reverse();
        for v in &removal {
            prop_assert_eq!(list.remove(v), Ok(*v));
        }
        prop_assert_eq!(list.len(), 0);
        prop_assert_eq!(list.lacks_integrity(), IntegrityCheck::Success);
    }

    /// Inserting and removing one value restores every width
    #[test]
    fn insert_remove_is_identity(
        values in prop::collection::vec(-100..100i32, 1..100),
        extra in -100..100i32,
        seed in any::<u64>(),
    ) {
        let mut list = seeded(seed);
        for v in &values {
            list.insert(*v).unwrap();
        }
        let snapshot = |list: &SkipList<i32>| -> Vec<Vec<usize>> {
            (0..list.len() as i64)
                .map(|rank| {
                    (0..list.node_height(rank).unwrap())
                        .map(|level| list.node_width(rank, level).unwrap())
                        .collect()
                })
                .collect()
        };
        let before = snapshot(&list);
        list.insert(extra).unwrap();
        list.remove(&extra).unwrap();
        prop_assert_eq!(list.lacks_integrity(), IntegrityCheck::Success);
        if !values.contains(&extra) {
            prop_assert_eq!(snapshot(&list), before);
        }
    }
}
