//! Pairing heap properties under interleaved inserts and deletes.

use lazyq_heap::PairingHeap;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(i16),
    DeleteMin,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<i16>().prop_map(Op::Insert),
        1 => Just(Op::DeleteMin),
    ]
}

proptest! {
    #[test]
    fn find_min_tracks_a_sorted_model(ops in prop::collection::vec(op(), 0..200)) {
        let mut heap = PairingHeap::new();
        let mut model: Vec<i16> = Vec::new();
        for op in ops {
            match op {
                Op::Insert(v) => {
                    heap = heap.insert(v);
                    model.push(v);
                }
                Op::DeleteMin => {
                    if model.is_empty() {
                        prop_assert!(heap.delete_min().is_err());
                        continue;
                    }
                    model.sort();
                    let min = model.remove(0);
                    prop_assert_eq!(*heap.find_min().unwrap(), min);
                    heap = heap.delete_min().unwrap();
                }
            }
            prop_assert_eq!(heap.len(), model.len());
            if let Some(min) = model.iter().min() {
                prop_assert_eq!(heap.find_min().unwrap(), min);
            }
        }
        model.sort();
        prop_assert_eq!(heap.to_sorted_vec(), model);
    }

    #[test]
    fn sorting_by_key_is_stable(keys in prop::collection::vec(0u8..8, 0..120)) {
        let tagged: Vec<(u8, usize)> = keys.iter().copied().zip(0..).collect();
        let heap = tagged.iter().fold(
            PairingHeap::with_comparator(|a: &(u8, usize), b: &(u8, usize)| a.0 < b.0),
            |h, v| h.insert(*v),
        );
        let mut expected = tagged.clone();
        expected.sort_by_key(|p| p.0);
        prop_assert_eq!(heap.to_sorted_vec(), expected);
    }
}
