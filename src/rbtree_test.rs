use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::StdRng, Rng, SeedableRng};

use super::*;
use crate::Color;

use std::collections::BTreeSet;

#[test]
fn test_rbtree() {
    let seed: u64 = random();
    // let seed: u64 = 4202137795290473411;
    println!("test_rbtree {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut index: RbTree<u8> = RbTree::new();
    let mut btset: BTreeSet<u8> = BTreeSet::new();

    let mut counts = [0_usize; 9];

    for _i in 0..200_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: Op<u8> = uns.arbitrary().unwrap();
        // println!("test_rbtree op -- {:?}", op);
        match op {
            Op::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), btset.len());
            }
            Op::IsEmpty => {
                counts[1] += 1;
                assert_eq!(index.is_empty(), btset.is_empty());
            }
            Op::Insert(key) => {
                counts[2] += 1;
                match (index.insert(key), btset.insert(key)) {
                    (Ok(()), true) => (),
                    (Err(Error::KeyExists(_, _)), false) => (),
                    (Ok(()), false) => panic!("insert dup key {} in rbtree", key),
                    (Err(err), _) => panic!("insert key {} err {}", key, err),
                }
                index.validate().unwrap();
            }
            Op::Delete(key) => {
                counts[3] += 1;
                match (index.delete(&key), btset.remove(&key)) {
                    (None, false) => (),
                    (Some(k), true) => assert_eq!(k, key),
                    (None, true) => panic!("delete no key {} in rbtree", key),
                    (Some(_), false) => panic!("delete no key {} in btset", key),
                }
                index.validate().unwrap();
            }
            Op::Get(key) => {
                counts[4] += 1;
                match (index.get(&key), btset.get(&key)) {
                    (Ok(k), Some(r)) => assert_eq!(k, r),
                    (Err(Error::KeyNotFound(_, _)), None) => (),
                    (Ok(_), None) => panic!("get no key {} in btset", key),
                    (Err(err), _) => panic!("get key {} err {}", key, err),
                }
            }
            Op::Min => {
                counts[5] += 1;
                match (index.min(), btset.iter().next()) {
                    (Ok(k), Some(r)) => assert_eq!(k, r),
                    (Err(Error::Empty(_, _)), None) => (),
                    (res, r) => panic!("min {:?} {:?}", res, r),
                }
            }
            Op::Max => {
                counts[6] += 1;
                match (index.max(), btset.iter().next_back()) {
                    (Ok(k), Some(r)) => assert_eq!(k, r),
                    (Err(Error::Empty(_, _)), None) => (),
                    (res, r) => panic!("max {:?} {:?}", res, r),
                }
            }
            Op::Keys => {
                counts[7] += 1;
                let a: Vec<u8> = index.to_keys().into_iter().cloned().collect();
                let b: Vec<u8> = btset.iter().cloned().collect();
                assert_eq!(a, b);
            }
            Op::Extend(keys) => {
                counts[8] += 1;
                index.extend(keys.clone());
                btset.extend(keys);
                index.validate().unwrap();
            }
        }
    }

    let a: Vec<u8> = index.to_keys().into_iter().cloned().collect();
    let b: Vec<u8> = btset.iter().cloned().collect();
    assert_eq!(a, b);

    println!("counts {:?} len:{}/{}", counts, index.len(), btset.len());
}

#[derive(Debug, Arbitrary)]
enum Op<K> {
    Len,
    IsEmpty,
    Insert(K),
    Delete(K),
    Get(K),
    Min,
    Max,
    Keys,
    Extend(Vec<K>),
}

#[test]
fn test_rbtree_large() {
    let seed: u64 = random();
    println!("test_rbtree_large {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut index: RbTree<u32> = RbTree::new();
    let mut btset: BTreeSet<u32> = BTreeSet::new();

    for i in 0..100_000 {
        let key = rng.gen::<u32>() % 20_000;
        if rng.gen::<u8>() % 3 == 0 {
            assert_eq!(index.delete(&key).is_some(), btset.remove(&key));
        } else {
            assert_eq!(index.insert(key).is_ok(), btset.insert(key));
        }
        if i % 5_000 == 0 {
            index.validate().unwrap();
        }
    }
    index.validate().unwrap();
    assert_eq!(index.len(), btset.len());

    // height stays within 2*log2(n+1).
    let limit = 2.0 * ((index.len() + 1) as f64).log2();
    assert!((index.height() as f64) <= limit, "height {}", index.height());

    let a: Vec<u32> = index.to_keys().into_iter().cloned().collect();
    let b: Vec<u32> = btset.iter().cloned().collect();
    assert_eq!(a, b);
}

#[test]
fn test_empty() {
    let mut index: RbTree<i32> = RbTree::default();
    assert!(index.is_empty());
    assert_eq!(index.root_color(), None);
    assert!(matches!(index.min(), Err(Error::Empty(_, _))));
    assert!(matches!(index.max(), Err(Error::Empty(_, _))));
    assert!(matches!(index.get(&1), Err(Error::KeyNotFound(_, _))));
    assert_eq!(index.delete(&1), None);
    index.validate().unwrap();

    index.insert(1).unwrap();
    assert_eq!(index.root_color(), Some(Color::Black));
    assert_eq!(index.delete(&1), Some(1));
    assert!(index.is_empty());
    assert_eq!(index.root_color(), None);
    index.validate().unwrap();
}

#[test]
fn test_insert_scenario() {
    let mut index: RbTree<i32> = RbTree::new();
    for key in [100, 10, 12, 33].iter() {
        index.insert(*key).unwrap();
        index.validate().unwrap();
        assert_eq!(index.root_color(), Some(Color::Black));
    }
    assert_eq!(index.get(&33).unwrap(), &33);
    assert!(matches!(index.get(&199), Err(Error::KeyNotFound(_, _))));

    index.insert(199).unwrap();
    assert_eq!(index.get(&199).unwrap(), &199);
    assert_eq!(index.root_color(), Some(Color::Black));

    index.insert(129).unwrap();
    assert_eq!(index.root_color(), Some(Color::Black));
    index.validate().unwrap();
    assert_eq!(index.to_keys(), vec![&10, &12, &33, &100, &129, &199]);
}

#[test]
fn test_min_max_scenario() {
    let mut index: RbTree<i32> = RbTree::new();
    for key in [12, 22, 100, 101, 102].iter() {
        index.insert(*key).unwrap();
    }
    assert_eq!(index.min().unwrap(), &12);
    assert_eq!(index.max().unwrap(), &102);
    index.validate().unwrap();
}

#[test]
fn test_duplicate_insert() {
    let mut index: RbTree<i32> = RbTree::new();
    index.extend(vec![5, 3, 8, 1, 4]);
    let before: Vec<i32> = index.to_keys().into_iter().cloned().collect();

    for key in before.iter() {
        assert!(matches!(index.insert(*key), Err(Error::KeyExists(_, _))));
    }
    let after: Vec<i32> = index.to_keys().into_iter().cloned().collect();
    assert_eq!(before, after);
    assert_eq!(index.len(), 5);
    index.validate().unwrap();
}

#[test]
fn test_insert_line() {
    // ascending keys, parent and node on the same side.
    let mut index: RbTree<i32> = RbTree::new();
    index.extend(vec![10, 20, 30]);
    let root = index.root.unwrap();
    assert_eq!(index.arena[root].key, 20);
    assert_eq!(index.arena[root].color, Color::Black);
    for child in [index.arena[root].left, index.arena[root].right].iter() {
        assert_eq!(index.arena[child.unwrap()].color, Color::Red);
    }
    index.validate().unwrap();
}

#[test]
fn test_insert_triangle() {
    for keys in [vec![30, 10, 20], vec![10, 30, 20]].iter() {
        let mut index: RbTree<i32> = RbTree::new();
        index.extend(keys.clone());
        let root = index.root.unwrap();
        assert_eq!(index.arena[root].key, 20, "keys {:?}", keys);
        assert_eq!(index.arena[index.arena[root].left.unwrap()].key, 10);
        assert_eq!(index.arena[index.arena[root].right.unwrap()].key, 30);
        index.validate().unwrap();
    }
}

#[test]
fn test_insert_red_uncle() {
    let mut index: RbTree<i32> = RbTree::new();
    index.extend(vec![10, 5, 15, 1]);
    let root = index.root.unwrap();
    let (left, right) = (index.arena[root].left.unwrap(), index.arena[root].right.unwrap());
    assert_eq!(index.arena[root].color, Color::Black);
    assert_eq!(index.arena[left].color, Color::Black);
    assert_eq!(index.arena[right].color, Color::Black);
    let leaf = index.arena[left].left.unwrap();
    assert_eq!(index.arena[leaf].key, 1);
    assert_eq!(index.arena[leaf].color, Color::Red);
    index.validate().unwrap();
}

#[test]
fn test_delete_red_leaf() {
    let mut index: RbTree<i32> = RbTree::new();
    index.extend(vec![10, 20, 30]);
    assert_eq!(index.delete(&10), Some(10));
    let root = index.root.unwrap();
    assert_eq!(index.arena[root].key, 20);
    assert_eq!(index.arena[root].left, None);
    index.validate().unwrap();
}

#[test]
fn test_delete_root_with_child() {
    let mut index: RbTree<i32> = RbTree::new();
    index.extend(vec![10, 20]);
    assert_eq!(index.delete(&10), Some(10));
    assert_eq!(index.root_color(), Some(Color::Black));
    assert_eq!(index.to_keys(), vec![&20]);
    index.validate().unwrap();
}

#[test]
fn test_delete_two_children() {
    let mut index: RbTree<i32> = RbTree::new();
    index.extend(1..=15);
    for key in [8, 4, 12, 2, 6, 10, 14].iter() {
        assert_eq!(index.delete(key), Some(*key));
        assert!(!index.contains(key));
        index.validate().unwrap();
    }
    assert_eq!(index.to_keys(), vec![&1, &3, &5, &7, &9, &11, &13, &15]);
}

#[test]
fn test_delete_absent() {
    let mut index: RbTree<i32> = RbTree::new();
    index.extend(vec![1, 3, 5, 7]);
    let before: Vec<i32> = index.to_keys().into_iter().cloned().collect();
    assert_eq!(index.delete(&4), None);
    assert_eq!(index.delete(&100), None);
    let after: Vec<i32> = index.to_keys().into_iter().cloned().collect();
    assert_eq!(before, after);
    assert_eq!(index.len(), 4);
    index.validate().unwrap();
}

#[test]
fn test_insert_delete_inverse() {
    let mut index: RbTree<i32> = RbTree::new();
    index.extend((0..200).map(|i| i * 2));
    let before: Vec<i32> = index.to_keys().into_iter().cloned().collect();

    for key in (0..200).map(|i| i * 2 + 1) {
        index.insert(key).unwrap();
        assert_eq!(index.delete(&key), Some(key));
        index.validate().unwrap();
        let after: Vec<i32> = index.to_keys().into_iter().cloned().collect();
        assert_eq!(before, after);
    }
}

#[test]
fn test_drain_orders() {
    let n = 1_000;
    let orders: Vec<Vec<i32>> = vec![
        (0..n).collect(),
        (0..n).rev().collect(),
        (0..n).map(|i| (i * 7919) % n).collect(),
        (0..n / 2).flat_map(|i| vec![i, n - 1 - i]).collect(),
    ];
    for order in orders.iter() {
        let mut index: RbTree<i32> = RbTree::new();
        index.extend(0..n);
        assert_eq!(index.len(), n as usize);
        for (i, key) in order.iter().enumerate() {
            assert_eq!(index.delete(key), Some(*key));
            if i % 37 == 0 {
                index.validate().unwrap();
            }
        }
        assert!(index.is_empty());
        index.validate().unwrap();
    }
}

#[test]
fn test_min_max_bounds() {
    let mut index: RbTree<i64> = RbTree::new();
    index.extend(vec![42, -7, 99, 0, 13, -100, 5]);
    let (min, max) = (*index.min().unwrap(), *index.max().unwrap());
    for key in index.to_keys() {
        assert!(min <= *key && *key <= max);
    }
    assert_eq!((min, max), (-100, 99));

    index.delete(&-100);
    index.delete(&99);
    assert_eq!(index.min().unwrap(), &-7);
    assert_eq!(index.max().unwrap(), &42);
}

#[test]
fn test_custom_comparator() {
    #[derive(Debug)]
    struct Version {
        major: u32,
        minor: u32,
        label: &'static str,
    }

    let by_version =
        |a: &Version, b: &Version| (a.major, a.minor) < (b.major, b.minor);
    let mut index: RbTree<Version, _> = RbTree::with_comparator(by_version);

    let items = vec![(1, 2, "b"), (0, 9, "a"), (2, 0, "d"), (1, 10, "c")];
    for (major, minor, label) in items.into_iter() {
        index.insert(Version { major, minor, label }).unwrap();
    }

    // equality is derived from less-than, label does not take part.
    let probe = Version {
        major: 1,
        minor: 10,
        label: "z",
    };
    assert_eq!(index.get(&probe).unwrap().label, "c");
    assert!(index.insert(probe).is_err());

    assert_eq!(index.min().unwrap().label, "a");
    assert_eq!(index.max().unwrap().label, "d");
    let labels: Vec<&str> = index.to_keys().iter().map(|v| v.label).collect();
    assert_eq!(labels, vec!["a", "b", "c", "d"]);
    index.validate().unwrap();
}

#[test]
fn test_comparator_type() {
    struct ByLen;

    impl Comparator<String> for ByLen {
        fn less(&self, a: &String, b: &String) -> bool {
            a.len() < b.len()
        }
    }

    let mut index = RbTree::with_comparator(ByLen);
    index.insert("ccc".to_string()).unwrap();
    index.insert("a".to_string()).unwrap();
    index.insert("bb".to_string()).unwrap();
    assert!(index.insert("zz".to_string()).is_err());

    assert_eq!(index.min().unwrap(), "a");
    assert_eq!(index.max().unwrap(), "ccc");
    assert_eq!(index.delete(&"xx".to_string()), Some("bb".to_string()));
    assert_eq!(index.len(), 2);
    index.validate().unwrap();
}

#[test]
fn test_validate_detects_violations() {
    let mut index: RbTree<i32> = RbTree::new();
    index.extend(vec![10, 20, 30]);
    index.validate().unwrap();

    let root = index.root.unwrap();
    index.arena[root].set_red();
    assert!(matches!(index.validate(), Err(Error::Fatal(_, _))));
    index.arena[root].set_black();

    let left = index.arena[root].left.unwrap();
    index.arena[left].set_black();
    assert!(matches!(index.validate(), Err(Error::Fatal(_, _))));
    index.arena[left].set_red();

    index.arena[left].key = 25;
    assert!(matches!(index.validate(), Err(Error::Fatal(_, _))));
    index.arena[left].key = 10;

    index.arena[left].parent = None;
    assert!(matches!(index.validate(), Err(Error::Fatal(_, _))));
    index.arena[left].parent = Some(root);

    index.validate().unwrap();
}
