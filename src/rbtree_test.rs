use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;

fn values<T: Clone, C>(tree: &RbTree<T, C>) -> Vec<T> {
    tree.iter().cloned().collect()
}

fn max_depth(n: usize) -> usize {
    // 2 * log2(n+1)
    let n = (n + 1) as f64;
    (2.0 * n.log2()).floor() as usize
}

#[test]
fn test_add_in_order() {
    let mut tree: RbTree<i32> = RbTree::new();
    for value in [1, 7, 5, 9, 22, 4, 2, 4].iter() {
        tree.add(*value);
        tree.validate().unwrap();
    }
    assert_eq!(values(&tree), vec![1, 2, 4, 4, 5, 7, 9, 22]);
    assert_eq!(tree.len(), 8);

    let root = tree.root().unwrap();
    assert_eq!(tree.color(root), Some(Color::Black));
}

#[test]
fn test_custom_comparator() {
    let mut tree = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    tree.extend(vec![1, 7, 5, 9, 22, 4, 2, 4]);
    tree.validate().unwrap();
    assert_eq!(values(&tree), vec![22, 9, 7, 5, 4, 4, 2, 1]);

    let handle = tree.find(&9).unwrap();
    assert_eq!(tree.remove(handle).unwrap(), 9);
    assert_eq!(values(&tree), vec![22, 7, 5, 4, 4, 2, 1]);
}

#[test]
fn test_remove_in_sequence() {
    let refs: Vec<(i32, Vec<i32>)> = vec![
        (1, vec![2, 4, 4, 5, 7, 9, 22]),
        (4, vec![2, 4, 5, 7, 9, 22]),
        (4, vec![2, 5, 7, 9, 22]),
        (22, vec![2, 5, 7, 9]),
        (7, vec![2, 5, 9]),
        (2, vec![5, 9]),
        (5, vec![9]),
        (9, vec![]),
    ];

    let mut tree: RbTree<i32> = RbTree::new();
    tree.extend(vec![1, 7, 5, 9, 22, 4, 2, 4]);

    let mut n = tree.len();
    for (value, refvals) in refs.into_iter() {
        let handle = tree.find(&value).unwrap();
        assert_eq!(tree.get(handle), Some(&value));
        assert_eq!(tree.remove(handle).unwrap(), value);
        n -= 1;

        assert_eq!(values(&tree), refvals);
        assert_eq!(tree.len(), n);
        tree.validate().unwrap();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
}

#[test]
fn test_find() {
    let mut tree: RbTree<i32> = RbTree::new();
    assert_eq!(tree.find(&10), None);

    let handles: Vec<(i32, Handle)> = (0..100).map(|i| (i * 2, tree.add(i * 2))).collect();
    for (value, handle) in handles.iter() {
        let found = tree.find(value).unwrap();
        assert_eq!(found, *handle);
        assert_eq!(tree.get(found), Some(value));
        assert_eq!(tree.find(&(value + 1)), None);
    }
    assert_eq!(tree.find(&-1), None);
}

#[test]
fn test_remove_errors() {
    let mut tree: RbTree<i32> = RbTree::new();
    match tree.remove(None::<Handle>) {
        Err(Error::InvalidArgument(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }

    // never inserted into this tree.
    let mut other: RbTree<i32> = RbTree::new();
    let foreign = other.add(2);
    match tree.remove(foreign) {
        Err(Error::InvalidOperation(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }

    // an identical value, but a different node.
    let handle = tree.add(2);
    match tree.remove(foreign) {
        Err(Error::InvalidOperation(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }
    assert_eq!(values(&tree), vec![2]);
    assert_eq!(values(&other), vec![2]);

    // stale handle.
    assert_eq!(tree.remove(Some(handle)).unwrap(), 2);
    match tree.remove(handle) {
        Err(Error::InvalidOperation(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }

    // slot reuse does not revive a stale handle.
    let fresh = tree.add(3);
    assert_ne!(fresh, handle);
    assert_eq!(tree.get(handle), None);
    match tree.remove(handle) {
        Err(Error::InvalidOperation(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }
    assert_eq!(values(&tree), vec![3]);
}

#[test]
fn test_duplicates_by_handle() {
    let mut tree: RbTree<(u8, u32), _> =
        RbTree::with_comparator(|a: &(u8, u32), b: &(u8, u32)| a.0.cmp(&b.0));

    let mut handles = vec![];
    for i in 0..64_u32 {
        handles.push((i, tree.add(((i % 4) as u8, i))));
    }
    tree.validate().unwrap();

    // equal keys keep their insertion order.
    let tags: Vec<u32> = tree.iter().filter(|(k, _)| *k == 1).map(|(_, t)| *t).collect();
    assert_eq!(tags, (0..64).filter(|i| i % 4 == 1).collect::<Vec<u32>>());

    // remove every other handle, only that very node goes away.
    for (i, handle) in handles.iter() {
        if i % 2 == 0 {
            assert_eq!(tree.remove(*handle).unwrap(), ((i % 4) as u8, *i));
            tree.validate().unwrap();
        }
    }
    for (i, handle) in handles.iter() {
        match i % 2 {
            0 => assert_eq!(tree.get(*handle), None),
            _ => assert_eq!(tree.get(*handle), Some(&((i % 4) as u8, *i))),
        }
    }
    assert_eq!(tree.len(), 32);
}

#[test]
fn test_handles_survive_removal() {
    for substitute in [Substitute::Successor, Substitute::Predecessor].iter() {
        let config = Config::default().set_substitute(*substitute);
        let mut tree = RbTree::with_config(Natural, config);
        assert_eq!(tree.to_config().substitute, *substitute);

        let handles: Vec<Handle> = (0..200).map(|i| tree.add(i)).collect();
        for i in (0..200).step_by(3) {
            // internal nodes included, neighbours keep their values.
            tree.remove(handles[i]).unwrap();
            tree.validate().unwrap();
        }
        for (i, handle) in handles.iter().enumerate() {
            match i % 3 {
                0 => assert_eq!(tree.get(*handle), None),
                _ => assert_eq!(tree.get(*handle), Some(&i)),
            }
        }
    }
}

#[test]
fn test_substitute_shape() {
    //      4
    //     / \
    //    2   6
    //   / \ / \
    //  1  3 5  7
    let build = |substitute| {
        let config = Config::default().set_substitute(substitute);
        let mut tree = RbTree::with_config(Natural, config);
        let handles: Vec<Handle> = [4, 2, 6, 1, 3, 5, 7].iter().map(|v| tree.add(*v)).collect();
        (tree, handles)
    };

    let (mut tree, handles) = build(Substitute::Successor);
    tree.remove(handles[0]).unwrap();
    assert_eq!(tree.root(), Some(handles[5]));
    assert_eq!(tree.get(tree.root().unwrap()), Some(&5));
    tree.validate().unwrap();

    let (mut tree, handles) = build(Substitute::Predecessor);
    tree.remove(handles[0]).unwrap();
    assert_eq!(tree.get(tree.root().unwrap()), Some(&3));
    tree.validate().unwrap();
    assert_eq!(values(&tree), vec![1, 2, 3, 5, 6, 7]);
}

#[test]
fn test_balance_ascending() {
    let mut tree: RbTree<u32> = RbTree::new();
    for i in 0..10_000 {
        tree.add(i);
    }
    let stats = tree.validate().unwrap();
    assert_eq!(stats.entries, 10_000);
    assert!(stats.depth <= max_depth(10_000), "{:?}", stats);

    let handles: Vec<Handle> = (0..10_000).filter_map(|i| tree.find(&i)).collect();
    for handle in handles.into_iter().rev().skip(10) {
        tree.remove(handle).unwrap();
    }
    let stats = tree.validate().unwrap();
    assert_eq!(stats.entries, 10);
    assert!(stats.depth <= max_depth(10), "{:?}", stats);
    assert_eq!(values(&tree), (9_990..10_000).collect::<Vec<u32>>());
}

#[test]
fn test_into_iter() {
    let mut tree: RbTree<String> = RbTree::default();
    tree.extend(vec!["key2".to_string(), "key1".to_string(), "key3".to_string()]);

    let mut keys = vec![];
    for key in &tree {
        keys.push(key.as_str());
    }
    assert_eq!(keys, vec!["key1", "key2", "key3"]);
}

#[test]
fn test_rbtree() {
    let seed: u64 = random();
    // let seed: u64 = 15528437017219366186;
    println!("test_rbtree seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let config = match rng.gen::<bool>() {
        true => Config::default(),
        false => Config::default().set_substitute(Substitute::Predecessor),
    };
    println!("test_rbtree {:?}", config);

    let mut tree: RbTree<u8> = RbTree::with_config(Natural, config);
    let mut other: RbTree<u8> = RbTree::new();
    let mut live: Vec<(Handle, u8)> = vec![];
    let mut dead: Vec<Handle> = vec![];

    let mut counts = [0_usize; 7];

    for _i in 0..200_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: Op = uns.arbitrary().unwrap();
        match op {
            Op::Add(value) => {
                counts[0] += 1;
                let handle = tree.add(value);
                assert_eq!(tree.get(handle), Some(&value));
                live.push((handle, value));
            }
            Op::Find(value) => {
                counts[1] += 1;
                let refval = live.iter().any(|(_, v)| *v == value);
                match tree.find(&value) {
                    Some(handle) => {
                        assert!(refval, "find {}", value);
                        assert_eq!(tree.get(handle), Some(&value));
                    }
                    None => assert!(!refval, "find {}", value),
                }
            }
            Op::Remove(_) if live.is_empty() => counts[2] += 1,
            Op::Remove(off) => {
                counts[2] += 1;
                let (handle, value) = live.swap_remove(off % live.len());
                assert_eq!(tree.remove(handle).unwrap(), value);
                dead.push(handle);
            }
            Op::RemoveStale(_) if dead.is_empty() => counts[3] += 1,
            Op::RemoveStale(off) => {
                counts[3] += 1;
                let handle = dead[off % dead.len()];
                match tree.remove(handle) {
                    Err(Error::InvalidOperation(_, _)) => (),
                    res => panic!("unexpected {:?}", res),
                }
            }
            Op::RemoveForeign(value) => {
                counts[4] += 1;
                let handle = other.add(value);
                match tree.remove(handle) {
                    Err(Error::InvalidOperation(_, _)) => (),
                    res => panic!("unexpected {:?}", res),
                }
            }
            Op::Len => {
                counts[5] += 1;
                assert_eq!(tree.len(), live.len());
                assert_eq!(tree.is_empty(), live.is_empty());
            }
            Op::Iter => {
                counts[6] += 1;
                let mut refvals: Vec<u8> = live.iter().map(|(_, v)| *v).collect();
                refvals.sort();
                assert_eq!(values(&tree), refvals);
            }
        }

        let stats = tree.validate().unwrap();
        assert!(stats.depth <= max_depth(live.len()), "{:?}", stats);
    }

    let mut refvals: Vec<u8> = live.iter().map(|(_, v)| *v).collect();
    refvals.sort();
    assert_eq!(values(&tree), refvals);

    println!("counts {:?} len:{}/{}", counts, tree.len(), live.len());
}

#[derive(Debug, Arbitrary)]
enum Op {
    Add(u8),
    Find(u8),
    Remove(usize),
    RemoveStale(usize),
    RemoveForeign(u8),
    Len,
    Iter,
}
