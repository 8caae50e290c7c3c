//! Bounded permutation enumeration and per-layer candidate generation.

use crate::random::{RandomSource, shuffle};

/// `n!`, saturating at `usize::MAX`.
pub fn factorial(n: usize) -> usize {
    (2..=n)
        .try_fold(1usize, |acc, k| acc.checked_mul(k))
        .unwrap_or(usize::MAX)
}

/// Iterative Heap's algorithm.
///
/// Yields the input order first and then every other ordering exactly once. No recursion and no
/// up-front materialization, so callers can stop after any number of items.
#[derive(Debug, Clone)]
pub struct Permutations<T> {
    current: Vec<T>,
    counters: Vec<usize>,
    i: usize,
    started: bool,
}

impl<T: Clone> Permutations<T> {
    pub fn new(items: &[T]) -> Self {
        Self {
            current: items.to_vec(),
            counters: vec![0; items.len()],
            i: 1,
            started: false,
        }
    }
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if !self.started {
            self.started = true;
            return Some(self.current.clone());
        }
        let n = self.current.len();
        while self.i < n {
            let i = self.i;
            if self.counters[i] < i {
                if i % 2 == 0 {
                    self.current.swap(0, i);
                } else {
                    self.current.swap(self.counters[i], i);
                }
                self.counters[i] += 1;
                self.i = 1;
                return Some(self.current.clone());
            }
            self.counters[i] = 0;
            self.i += 1;
        }
        None
    }
}

/// Candidate orderings for one layer.
///
/// All `n!` orderings when that fits in `budget`. Otherwise `budget` orderings: the input order
/// followed by random shuffles when `sampling` is on, or the first `budget` orderings of
/// [`Permutations`] when it is off.
pub fn layer_candidates<T, R>(
    layer: &[T],
    budget: usize,
    sampling: bool,
    rng: &mut R,
) -> Vec<Vec<T>>
where
    T: Clone,
    R: RandomSource + ?Sized,
{
    let budget = budget.max(1);
    if factorial(layer.len()) <= budget {
        return Permutations::new(layer).collect();
    }
    if !sampling {
        return Permutations::new(layer).take(budget).collect();
    }

    let mut out = Vec::with_capacity(budget);
    out.push(layer.to_vec());
    for _ in 1..budget {
        let mut perm = layer.to_vec();
        shuffle(&mut perm, rng);
        out.push(perm);
    }
    out
}

/// Mixed-radix counter over `radices`, used to walk the cartesian product of per-layer
/// candidate lists without materializing it.
#[derive(Debug, Clone)]
pub(crate) struct Odometer {
    radices: Vec<usize>,
    digits: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl Odometer {
    pub(crate) fn new(radices: Vec<usize>) -> Self {
        let exhausted = radices.contains(&0);
        let digits = vec![0; radices.len()];
        Self {
            radices,
            digits,
            started: false,
            exhausted,
        }
    }

    pub(crate) fn advance(&mut self) -> Option<&[usize]> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.digits);
        }
        // The last position turns fastest.
        for pos in (0..self.digits.len()).rev() {
            self.digits[pos] += 1;
            if self.digits[pos] < self.radices[pos] {
                return Some(&self.digits);
            }
            self.digits[pos] = 0;
        }
        self.exhausted = true;
        None
    }
}
