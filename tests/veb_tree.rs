use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use veb_tree::{Error, OutOfRange, Shape, Universe, VebTree};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Universe used by the randomized tests. Large enough for three levels of recursion, small
/// enough that values collide often.
const UNIVERSE: u64 = 1 << 12;

/// Values mostly inside the universe, with a tail of out-of-range ones.
fn value_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        9 => 0..UNIVERSE,
        1 => UNIVERSE..UNIVERSE * 2,
    ]
}

/// The values of CLRS Figure 20.6.
const CLRS_VALUES: [u64; 7] = [2, 3, 4, 5, 7, 14, 15];

fn clrs_tree() -> VebTree {
    VebTree::with_values(16, CLRS_VALUES).unwrap()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(u64),
    Remove(u64),
    Contains(u64),
    Predecessor(u64),
    Successor(u64),
    PopMinimum,
    PopMaximum,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::Contains),
        2 => value_strategy().prop_map(SetOp::Predecessor),
        2 => value_strategy().prop_map(SetOp::Successor),
        1 => Just(SetOp::PopMinimum),
        1 => Just(SetOp::PopMaximum),
    ]
}

// ─── Core operations ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both VebTree and BTreeSet and asserts
    /// identical results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut tree = VebTree::new(UNIVERSE).unwrap();
        let mut model: BTreeSet<u64> = BTreeSet::new();

        for op in &ops {
            match *op {
                SetOp::Insert(v) => {
                    if v < UNIVERSE {
                        prop_assert_eq!(tree.insert(v), Ok(model.insert(v)), "insert({})", v);
                    } else {
                        let expected = Err(Error::ValueOutOfRange(OutOfRange { value: v, universe: UNIVERSE }));
                        prop_assert_eq!(tree.insert(v), expected, "insert({})", v);
                    }
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(tree.remove(v), model.remove(&v), "remove({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(tree.contains(v), model.contains(&v), "contains({})", v);
                }
                SetOp::Predecessor(v) => {
                    let expected = model.range(..v).next_back().copied();
                    prop_assert_eq!(tree.predecessor(v), expected, "predecessor({})", v);
                }
                SetOp::Successor(v) => {
                    let expected = model.range(v + 1..).next().copied();
                    prop_assert_eq!(tree.successor(v), expected, "successor({})", v);
                }
                SetOp::PopMinimum => {
                    prop_assert_eq!(tree.pop_minimum(), model.pop_first(), "pop_minimum()");
                }
                SetOp::PopMaximum => {
                    prop_assert_eq!(tree.pop_maximum(), model.pop_last(), "pop_maximum()");
                }
            }
            prop_assert_eq!(tree.len(), model.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(tree.minimum(), model.first().copied(), "minimum mismatch after {:?}", op);
            prop_assert_eq!(tree.maximum(), model.last().copied(), "maximum mismatch after {:?}", op);
        }

        prop_assert_eq!(tree.iter().collect::<Vec<_>>(), model.iter().copied().collect::<Vec<_>>());
    }

    /// Tests that iteration order matches BTreeSet after random insertions.
    #[test]
    fn iter_matches_btreeset(values in proptest::collection::vec(0..UNIVERSE, 0..TEST_SIZE)) {
        let tree = VebTree::with_values(UNIVERSE, values.iter().copied()).unwrap();
        let model: BTreeSet<u64> = values.iter().copied().collect();

        let forward: Vec<_> = tree.iter().collect();
        prop_assert_eq!(&forward, &model.iter().copied().collect::<Vec<_>>(), "iter() mismatch");

        let backward: Vec<_> = tree.iter().rev().collect();
        prop_assert_eq!(&backward, &model.iter().rev().copied().collect::<Vec<_>>(), "iter().rev() mismatch");

        prop_assert_eq!(tree.iter().len(), model.len(), "ExactSizeIterator len mismatch");
    }

    /// Every universe size, including odd bit counts where clusters outnumber their size.
    #[test]
    fn every_universe_matches_btreeset(
        (bits, values) in (1u32..=14).prop_flat_map(|bits| {
            (Just(bits), proptest::collection::vec(0..(1u64 << bits), 0..300))
        })
    ) {
        let universe = Universe::from_bits(bits).unwrap();
        let mut tree = VebTree::from_universe(universe).unwrap();
        let mut model = BTreeSet::new();

        for (i, &value) in values.iter().enumerate() {
            // Insert the first half, then remove every third value seen.
            if i < values.len() / 2 {
                prop_assert_eq!(tree.insert(value), Ok(model.insert(value)));
            } else if i % 3 == 0 {
                prop_assert_eq!(tree.remove(value), model.remove(&value));
            } else {
                prop_assert_eq!(tree.insert(value), Ok(model.insert(value)));
            }
        }

        for &probe in &values {
            prop_assert_eq!(tree.contains(probe), model.contains(&probe));
            prop_assert_eq!(tree.predecessor(probe), model.range(..probe).next_back().copied());
            prop_assert_eq!(tree.successor(probe), model.range(probe + 1..).next().copied());
        }
        prop_assert_eq!(tree.iter().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
    }

    /// Inserting a present value or removing an absent one changes nothing observable.
    #[test]
    fn duplicate_insert_and_absent_remove_are_idempotent(
        values in proptest::collection::vec(0..UNIVERSE, 1..500),
        absent in UNIVERSE / 2..UNIVERSE,
    ) {
        let values: Vec<u64> = values.into_iter().map(|v| v % (UNIVERSE / 2)).collect();
        let mut tree = VebTree::with_values(UNIVERSE, values.iter().copied()).unwrap();
        let before = tree.clone();

        for &value in &values {
            prop_assert_eq!(tree.insert(value), Ok(false));
        }
        prop_assert!(!tree.remove(absent));
        prop_assert!(!tree.remove(UNIVERSE + absent));
        prop_assert_eq!(&tree, &before);
        prop_assert_eq!(tree.shape(), before.shape());
    }

    /// Removing everything in random order empties the tree and leaves every node empty.
    #[test]
    fn remove_all_leaves_empty_shape(values in proptest::collection::vec(0..UNIVERSE, 0..500)) {
        let mut tree = VebTree::with_values(UNIVERSE, values.iter().copied()).unwrap();
        let empty = VebTree::new(UNIVERSE).unwrap();

        for value in values.iter().rev() {
            tree.remove(*value);
        }
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.minimum(), None);
        prop_assert_eq!(tree.maximum(), None);
        prop_assert_eq!(tree.shape(), empty.shape());
    }
}

// ─── CLRS Figure 20.6 ────────────────────────────────────────────────────────

#[test]
fn clrs_minimum_and_maximum() {
    let tree = clrs_tree();
    assert_eq!(tree.minimum(), Some(2));
    assert_eq!(tree.maximum(), Some(15));
    assert_eq!(tree.len(), CLRS_VALUES.len());
}

#[test]
fn clrs_membership() {
    let tree = clrs_tree();
    for i in 0..=16 {
        assert_eq!(tree.contains(i), CLRS_VALUES.contains(&i), "contains({i})");
    }
}

#[test]
fn clrs_predecessor() {
    let tree = clrs_tree();
    assert_eq!(tree.predecessor(2), None);
    for pair in CLRS_VALUES.windows(2) {
        assert_eq!(tree.predecessor(pair[1]), Some(pair[0]), "predecessor({})", pair[1]);
    }
    assert_eq!(tree.predecessor(14), Some(7));
}

#[test]
fn clrs_successor() {
    let tree = clrs_tree();
    assert_eq!(tree.successor(15), None);
    for pair in CLRS_VALUES.windows(2) {
        assert_eq!(tree.successor(pair[0]), Some(pair[1]), "successor({})", pair[0]);
    }
    assert_eq!(tree.successor(14), Some(15));
    assert_eq!(tree.successor(2), Some(3));
}

#[test]
fn clrs_insertion_order_does_not_matter() {
    let expected = clrs_tree();
    let mut reversed = CLRS_VALUES;
    reversed.reverse();
    let tree = VebTree::with_values(16, reversed).unwrap();
    assert_eq!(tree, expected);
    assert_eq!(tree.shape(), expected.shape());
}

#[test]
fn clrs_remove_minimum() {
    let mut tree = clrs_tree();
    assert!(tree.remove(2));
    assert_eq!(tree.minimum(), Some(3));
    assert!(!tree.contains(2));
    assert_eq!(tree.predecessor(3), None);
    assert_eq!(tree.iter().collect::<Vec<_>>(), [3, 4, 5, 7, 14, 15]);
}

fn node(universe: u64, minimum: Option<u64>, maximum: Option<u64>, children: Option<(Shape, Vec<Shape>)>) -> Shape {
    let (summary, clusters) = match children {
        Some((summary, clusters)) => (Some(Box::new(summary)), clusters),
        None => (None, Vec::new()),
    };
    Shape {
        universe,
        minimum,
        maximum,
        summary,
        clusters,
    }
}

fn leaf(minimum: Option<u64>, maximum: Option<u64>) -> Shape {
    node(2, minimum, maximum, None)
}

fn empty_vebtree4() -> Shape {
    node(4, None, None, Some((leaf(None, None), vec![leaf(None, None), leaf(None, None)])))
}

#[test]
fn clrs_tree_structure() {
    let expected = node(
        16,
        Some(2),
        Some(15),
        Some((
            node(4, Some(0), Some(3), Some((leaf(Some(0), Some(1)), vec![leaf(Some(1), Some(1)), leaf(Some(1), Some(1))]))),
            vec![
                node(4, Some(3), Some(3), Some((leaf(None, None), vec![leaf(None, None), leaf(None, None)]))),
                node(4, Some(0), Some(3), Some((leaf(Some(0), Some(1)), vec![leaf(Some(1), Some(1)), leaf(Some(1), Some(1))]))),
                empty_vebtree4(),
                node(4, Some(2), Some(3), Some((leaf(Some(1), Some(1)), vec![leaf(None, None), leaf(Some(1), Some(1))]))),
            ],
        )),
    );

    assert_eq!(clrs_tree().shape(), expected);
}

// ─── Construction and errors ─────────────────────────────────────────────────

#[test]
fn invalid_universes_are_rejected() {
    for universe in [0, 1, 3, 5, 12, 1000, u64::MAX] {
        assert_eq!(VebTree::new(universe).unwrap_err(), Error::InvalidUniverse { universe });
        assert_eq!(
            VebTree::with_values(universe, [0]).unwrap_err(),
            Error::InvalidUniverse { universe }
        );
    }
}

#[test]
fn universes_past_handle_space_are_rejected() {
    for bits in [32, 48, 63] {
        let size = 1u64 << bits;
        let err = VebTree::new(size).unwrap_err();
        assert!(matches!(err, Error::UniverseTooLarge { universe, .. } if universe == size), "universe 2^{bits}");

        let universe = Universe::from_bits(bits).unwrap();
        assert_eq!(VebTree::from_universe(universe).unwrap_err(), err);
        assert_eq!(VebTree::with_values(size, [0]).unwrap_err(), err);
    }
    assert_eq!(
        VebTree::new(1 << 32).unwrap_err(),
        Error::UniverseTooLarge { universe: 1 << 32, nodes: 6_029_862_760 }
    );
}

#[test]
fn shape_of_smallest_internal_node() {
    let shape: Shape = VebTree::with_values(4, [0, 3]).unwrap().shape();
    let expected = node(4, Some(0), Some(3), Some((leaf(Some(1), Some(1)), vec![leaf(None, None), leaf(Some(1), Some(1))])));
    assert_eq!(shape, expected);
    assert!(!shape.is_leaf());
    assert!(shape.clusters.iter().all(Shape::is_leaf));
}

#[test]
fn smallest_universe() {
    let mut tree = VebTree::new(2).unwrap();
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.insert(1), Ok(true));
    assert_eq!(tree.insert(0), Ok(true));
    assert_eq!(tree.predecessor(1), Some(0));
    assert_eq!(tree.successor(0), Some(1));
    assert_eq!(tree.predecessor(7), Some(1));
    assert_eq!(tree.successor(7), None);
    assert!(tree.remove(1));
    assert_eq!((tree.minimum(), tree.maximum()), (Some(0), Some(0)));
}

#[test]
fn out_of_range_insert_is_rejected() {
    let mut tree = VebTree::new(16).unwrap();
    assert_eq!(
        tree.insert(16),
        Err(Error::ValueOutOfRange(OutOfRange { value: 16, universe: 16 }))
    );
    assert_eq!(tree.insert(u64::MAX).unwrap_err().to_string(), format!("value {} lies outside the universe [0, 16)", u64::MAX));
    assert!(tree.is_empty());
}

#[test]
fn out_of_range_initial_value_names_position() {
    let err = VebTree::with_values(8, [1, 2, 3, 8, 4]).unwrap_err();
    assert_eq!(
        err,
        Error::InitialValue {
            position: 3,
            source: OutOfRange { value: 8, universe: 8 },
        }
    );
    assert_eq!(std::error::Error::source(&err).map(|source| source.to_string()), Some("value 8 lies outside the universe [0, 8)".to_string()));
}

#[test]
fn queries_outside_universe_never_fail() {
    let mut tree = clrs_tree();
    assert!(!tree.contains(16));
    assert!(!tree.contains(u64::MAX));
    assert_eq!(tree.predecessor(u64::MAX), Some(15));
    assert_eq!(tree.successor(16), None);
    assert!(!tree.remove(99));
    assert_eq!(tree.len(), CLRS_VALUES.len());
}

#[test]
fn clear_keeps_universe() {
    let mut tree = clrs_tree();
    let nodes = tree.node_count();
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.iter().next(), None);
    assert_eq!(tree.node_count(), nodes);
    assert_eq!(tree.shape(), VebTree::new(16).unwrap().shape());

    tree.try_extend([9, 1]).unwrap();
    assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 9]);
}

#[test]
fn extremes_of_a_large_universe() {
    let top = (1u64 << 16) - 1;
    let mut tree = VebTree::new(1 << 16).unwrap();
    tree.insert(top).unwrap();
    tree.insert(0).unwrap();
    assert_eq!(tree.successor(0), Some(top));
    assert_eq!(tree.predecessor(top), Some(0));
    assert_eq!(tree.pop_maximum(), Some(top));
    assert_eq!(tree.pop_maximum(), Some(0));
    assert_eq!(tree.pop_maximum(), None);
}
