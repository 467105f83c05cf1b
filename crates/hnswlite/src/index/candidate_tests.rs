//! Tests for `candidate` module.

use super::candidate::Candidate;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[test]
fn test_candidate_orders_by_distance() {
    let near = Candidate::new(9, 1.0);
    let far = Candidate::new(1, 2.0);
    assert!(near < far);
}

#[test]
fn test_candidate_ties_break_on_slot() {
    let a = Candidate::new(3, 1.5);
    let b = Candidate::new(7, 1.5);
    assert_eq!(a.cmp(&b), Ordering::Less);
    assert_eq!(a, Candidate::new(3, 1.5));
}

#[test]
fn test_candidate_nan_sorts_last() {
    let nan = Candidate::new(0, f32::NAN);
    let inf = Candidate::new(1, f32::INFINITY);
    assert!(inf < nan);
    assert_eq!(nan, Candidate::new(0, f32::NAN));
}

#[test]
fn test_candidate_max_heap_pops_farthest() {
    let mut heap = BinaryHeap::new();
    heap.push(Candidate::new(0, 3.0));
    heap.push(Candidate::new(1, 1.0));
    heap.push(Candidate::new(2, 2.0));

    assert_eq!(heap.pop().map(|c| c.node), Some(0));
    assert_eq!(heap.pop().map(|c| c.node), Some(2));
    assert_eq!(heap.pop().map(|c| c.node), Some(1));
}

#[test]
fn test_candidate_min_heap_pops_closest() {
    let mut heap = BinaryHeap::new();
    heap.push(Reverse(Candidate::new(0, 3.0)));
    heap.push(Reverse(Candidate::new(1, 1.0)));
    heap.push(Reverse(Candidate::new(2, 1.0)));

    assert_eq!(heap.pop().map(|Reverse(c)| c.node), Some(1));
    assert_eq!(heap.pop().map(|Reverse(c)| c.node), Some(2));
    assert_eq!(heap.pop().map(|Reverse(c)| c.node), Some(0));
}
