//! Mutation primitives for the ordered sub-resource sequences embedded in a
//! parent document (experience, education, likes, comments).
//!
//! Sequences are most-recent-first: new entries are always inserted at the
//! head. Callers re-save the whole parent after mutating.

use std::collections::VecDeque;

use uuid::Uuid;

/// An entry addressable by a key within its sequence.
pub trait Keyed {
  fn key(&self) -> Uuid;
}

/// Prepend `entry`.
pub fn insert_front<T>(seq: &mut VecDeque<T>, entry: T) { seq.push_front(entry); }

/// Prepend `entry` unless an entry with the same key is already present.
///
/// Returns `false` (leaving the sequence untouched) on a duplicate.
pub fn insert_front_unique<T: Keyed>(seq: &mut VecDeque<T>, entry: T) -> bool {
  if contains(seq, entry.key()) {
    return false;
  }
  seq.push_front(entry);
  true
}

pub fn contains<T: Keyed>(seq: &VecDeque<T>, key: Uuid) -> bool {
  seq.iter().any(|e| e.key() == key)
}

pub fn find<T: Keyed>(seq: &VecDeque<T>, key: Uuid) -> Option<&T> {
  seq.iter().find(|e| e.key() == key)
}

/// Remove the first entry whose key equals `key`.
///
/// `None` means the key was absent and the sequence is unchanged.
pub fn remove_by_key<T: Keyed>(seq: &mut VecDeque<T>, key: Uuid) -> Option<T> {
  let idx = seq.iter().position(|e| e.key() == key)?;
  seq.remove(idx)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone, PartialEq)]
  struct Entry(Uuid, &'static str);

  impl Keyed for Entry {
    fn key(&self) -> Uuid { self.0 }
  }

  fn entry(label: &'static str) -> Entry { Entry(Uuid::new_v4(), label) }

  #[test]
  fn insert_front_is_most_recent_first() {
    let mut seq = VecDeque::new();
    let a = entry("a");
    let b = entry("b");
    insert_front(&mut seq, a.clone());
    insert_front(&mut seq, b.clone());
    assert_eq!(seq, vec![b, a]);
  }

  #[test]
  fn unique_insert_rejects_same_key() {
    let mut seq = VecDeque::new();
    let a = entry("a");
    assert!(insert_front_unique(&mut seq, a.clone()));
    assert!(!insert_front_unique(&mut seq, Entry(a.0, "again")));
    assert_eq!(seq.len(), 1);
    assert_eq!(seq[0].1, "a");
  }

  #[test]
  fn remove_keeps_order_of_remainder() {
    let mut seq = VecDeque::new();
    let (a, b, c) = (entry("a"), entry("b"), entry("c"));
    for e in [a.clone(), b.clone(), c.clone()] {
      insert_front(&mut seq, e);
    }

    let removed = remove_by_key(&mut seq, b.0).unwrap();
    assert_eq!(removed, b);
    assert_eq!(seq, vec![c, a]);
  }

  #[test]
  fn remove_unknown_key_is_none_and_unchanged() {
    let mut seq = VecDeque::new();
    insert_front(&mut seq, entry("a"));
    let before = seq.clone();
    assert!(remove_by_key(&mut seq, Uuid::new_v4()).is_none());
    assert_eq!(seq, before);
  }
}
