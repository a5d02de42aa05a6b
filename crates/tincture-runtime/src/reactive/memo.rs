#![forbid(unsafe_code)]

//! Single-generation memoization.
//!
//! [`Memoized`] remembers only the most recent `(args, result)` pair. A call
//! hits when its arguments equal the immediately preceding call's arguments
//! under the injected equality predicate; anything else recomputes and
//! replaces the pair. Alternating inputs (A, B, A, B, ...) therefore miss
//! every time. This bounds memory to one entry, which matches the common
//! case of a single active palette per subtree.

use tracing::trace;

/// Equality predicate deciding whether a call repeats the previous one.
pub type ArgsEq<A> = fn(&A, &A) -> bool;

/// A function wrapped with a one-entry cache.
pub struct Memoized<A, R, F> {
    f: F,
    eq: ArgsEq<A>,
    last: Option<(A, R)>,
    hits: u64,
    misses: u64,
}

impl<A: PartialEq, R, F> Memoized<A, R, F> {
    /// Wrap `f`, comparing arguments with `PartialEq` (pairwise over tuples).
    #[must_use]
    pub fn new(f: F) -> Self {
        Self::with_equality(f, <A as PartialEq>::eq)
    }
}

impl<A, R, F> Memoized<A, R, F> {
    /// Wrap `f`, comparing arguments with `eq`.
    #[must_use]
    pub fn with_equality(f: F, eq: ArgsEq<A>) -> Self {
        Self {
            f,
            eq,
            last: None,
            hits: 0,
            misses: 0,
        }
    }

    fn cached(&mut self, args: &A) -> Option<&R> {
        let eq = self.eq;
        match &self.last {
            Some((last_args, last_result)) if eq(last_args, args) => {
                self.hits += 1;
                trace!(hits = self.hits, "memo hit");
                Some(last_result)
            }
            _ => None,
        }
    }

    /// Call through the cache.
    pub fn call(&mut self, args: A) -> R
    where
        F: FnMut(&A) -> R,
        R: Clone,
    {
        if let Some(hit) = self.cached(&args) {
            return hit.clone();
        }
        self.misses += 1;
        trace!(misses = self.misses, "memo miss");
        let result = (self.f)(&args);
        self.last = Some((args, result.clone()));
        result
    }

    /// Call a fallible function through the cache. Only `Ok` results are
    /// stored; an `Err` leaves the previous pair in place.
    pub fn try_call<E>(&mut self, args: A) -> Result<R, E>
    where
        F: FnMut(&A) -> Result<R, E>,
        R: Clone,
    {
        if let Some(hit) = self.cached(&args) {
            return Ok(hit.clone());
        }
        self.misses += 1;
        trace!(misses = self.misses, "memo miss");
        let result = (self.f)(&args)?;
        self.last = Some((args, result.clone()));
        Ok(result)
    }

    /// Calls answered from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Calls that ran the wrapped function.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Arguments of the cached pair, if any.
    #[must_use]
    pub fn last_args(&self) -> Option<&A> {
        self.last.as_ref().map(|(args, _)| args)
    }

    /// Forget the cached pair.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

impl<A: std::fmt::Debug, R, F> std::fmt::Debug for Memoized<A, R, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("last_args", &self.last_args())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}
