#![cfg(test)]

// Property tests for OrderedHashSet kept inside the crate so they can audit
// recorded positions, which are not visible through the public API.

use crate::error::Error;
use crate::ordered_hash_set::OrderedHashSet;
use proptest::prelude::*;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// positions shrink towards the front, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize),
    InsertAt(usize, usize),
    ExtendAt(usize, Vec<usize>),
    RemoveAt(usize),
    Remove(usize),
    ReplaceAt(usize, usize),
    RemoveAll(Vec<usize>),
    RetainEven,
    Pop,
    IndexOf(usize),
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::hash_set("[a-z]{1,4}", 1..=12).prop_flat_map(|pool| {
        let pool: Vec<String> = pool.into_iter().collect();
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        // Positions may run past the end to exercise bound checks.
        let pos = 0usize..16;
        let op = prop_oneof![
            3 => idx.clone().prop_map(Op::Insert),
            3 => (pos.clone(), idx.clone()).prop_map(|(p, i)| Op::InsertAt(p, i)),
            1 => (pos.clone(), proptest::collection::vec(idx.clone(), 0..4))
                .prop_map(|(p, is)| Op::ExtendAt(p, is)),
            2 => pos.clone().prop_map(Op::RemoveAt),
            2 => idx.clone().prop_map(Op::Remove),
            2 => (pos.clone(), idx.clone()).prop_map(|(p, i)| Op::ReplaceAt(p, i)),
            1 => proptest::collection::vec(idx.clone(), 0..4).prop_map(Op::RemoveAll),
            1 => Just(Op::RetainEven),
            1 => Just(Op::Pop),
            2 => idx.clone().prop_map(Op::IndexOf),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn out_of_bounds(index: usize, len: usize) -> Error {
    Error::IndexOutOfBounds { index, len }
}

// Apply one op to both the set under test and a `Vec` model, checking the
// returned outcome against the model.
fn step<S: BuildHasher>(
    sut: &mut OrderedHashSet<Key, S>,
    model: &mut Vec<Key>,
    pool: &[String],
    op: Op,
) -> Result<(), TestCaseError> {
    match op {
        Op::Insert(i) => {
            let k = key_from(pool, i);
            let fresh = !model.contains(&k);
            prop_assert_eq!(sut.insert(k.clone()), fresh);
            if fresh {
                model.push(k);
            }
        }
        Op::InsertAt(p, i) => {
            let k = key_from(pool, i);
            let res = sut.insert_at(p, k.clone());
            if p > model.len() {
                prop_assert_eq!(res, Err(out_of_bounds(p, model.len())));
            } else if model.contains(&k) {
                prop_assert_eq!(res, Ok(false));
            } else {
                prop_assert_eq!(res, Ok(true));
                model.insert(p, k);
            }
        }
        Op::ExtendAt(p, is) => {
            let ks: Vec<Key> = is.iter().map(|&i| key_from(pool, i)).collect();
            let res = sut.extend_at(p, ks.clone());
            if p > model.len() {
                prop_assert_eq!(res, Err(out_of_bounds(p, model.len())));
            } else {
                let mut block: Vec<Key> = Vec::new();
                for k in ks {
                    if !model.contains(&k) && !block.contains(&k) {
                        block.push(k);
                    }
                }
                prop_assert_eq!(res, Ok(!block.is_empty()));
                let tail = model.split_off(p);
                model.extend(block);
                model.extend(tail);
            }
        }
        Op::RemoveAt(p) => {
            let res = sut.remove_at(p);
            if p < model.len() {
                prop_assert_eq!(res, Ok(model.remove(p)));
            } else {
                prop_assert_eq!(res, Err(out_of_bounds(p, model.len())));
            }
        }
        Op::Remove(i) => {
            let k = key_from(pool, i);
            let at = model.iter().position(|m| *m == k);
            prop_assert_eq!(sut.remove(k.0.as_str()), at.is_some());
            if let Some(at) = at {
                model.remove(at);
            }
        }
        Op::ReplaceAt(p, i) => {
            let k = key_from(pool, i);
            let res = sut.replace_at(p, k.clone());
            if p >= model.len() {
                prop_assert_eq!(res, Err(out_of_bounds(p, model.len())));
            } else {
                match model.iter().position(|m| *m == k) {
                    Some(j) if j == p => {
                        prop_assert_eq!(res, Ok(k));
                    }
                    Some(j) => {
                        model.remove(j);
                        let target = if j < p { p - 1 } else { p };
                        let old = std::mem::replace(&mut model[target], k);
                        prop_assert_eq!(res, Ok(old));
                    }
                    None => {
                        let old = std::mem::replace(&mut model[p], k);
                        prop_assert_eq!(res, Ok(old));
                    }
                }
            }
        }
        Op::RemoveAll(is) => {
            let ks: Vec<Key> = is.iter().map(|&i| key_from(pool, i)).collect();
            let before = model.len();
            model.retain(|m| !ks.contains(m));
            prop_assert_eq!(sut.remove_all(ks.iter()), model.len() != before);
        }
        Op::RetainEven => {
            let keep = |k: &Key| k.0.len() % 2 == 0;
            sut.retain(keep);
            model.retain(keep);
        }
        Op::Pop => {
            prop_assert_eq!(sut.pop(), model.pop());
        }
        Op::IndexOf(i) => {
            let k = key_from(pool, i);
            let expected = model.iter().position(|m| *m == k);
            prop_assert_eq!(sut.index_of(k.0.as_str()), expected);
            prop_assert_eq!(sut.contains(&k), expected.is_some());
        }
        Op::Clear => {
            sut.clear();
            model.clear();
        }
    }
    Ok(())
}

fn check_parity<S: BuildHasher>(
    sut: &OrderedHashSet<Key, S>,
    model: &[Key],
) -> Result<(), TestCaseError> {
    prop_assert_eq!(sut.len(), model.len());
    prop_assert_eq!(sut.is_empty(), model.is_empty());
    prop_assert!(*sut == *model, "order diverged: {:?} vs {:?}", sut, model);
    for (p, k) in model.iter().enumerate() {
        prop_assert_eq!(sut.get(p), Ok(k));
    }
    Ok(())
}

// Property: state-machine equivalence against a `Vec` model.
// Invariants exercised across random operation sequences:
// - Uniqueness: duplicates are rejected by every insertion path.
// - Order: positional reads match the model after each op.
// - Repair correctness: after any interleaving of positional edits, every
//   recorded position equals the true position once repaired.
// - Out-of-range positions are reported and leave the set untouched.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: OrderedHashSet<Key> = OrderedHashSet::new();
        let mut model: Vec<Key> = Vec::new();
        for op in ops {
            step(&mut sut, &mut model, &pool, op)?;
            check_parity(&sut, &model)?;
        }
        sut.audit();
    }
}

// Same as above, but audit after every op so stale ranges are checked at
// every intermediate shape rather than only at the end.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_repair_after_every_op((pool, ops) in arb_scenario()) {
        let mut sut: OrderedHashSet<Key> = OrderedHashSet::new();
        let mut model: Vec<Key> = Vec::new();
        for op in ops {
            step(&mut sut, &mut model, &pool, op)?;
            sut.audit();
            for (p, k) in model.iter().enumerate() {
                prop_assert_eq!(sut.index_of(k), Some(p));
            }
        }
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same state-machine invariants under worst-case collision
// behavior, where every probe resolves purely through `Eq`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut: OrderedHashSet<Key, ConstBuildHasher> =
            OrderedHashSet::with_hasher(ConstBuildHasher);
        let mut model: Vec<Key> = Vec::new();
        for op in ops {
            step(&mut sut, &mut model, &pool, op)?;
            check_parity(&sut, &model)?;
        }
        sut.audit();
    }
}
