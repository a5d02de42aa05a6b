#![forbid(unsafe_code)]

//! Reactive primitives: observable values and single-generation memoization.
//!
//! - [`Subject`] holds one value and notifies subscribers synchronously, in
//!   registration order, on every publish.
//! - [`Subscription`] is the RAII removal handle returned by
//!   [`Subject::subscribe`].
//! - [`Memoized`] caches exactly one `(args, result)` pair.

pub mod memo;
pub mod subject;

pub use memo::{ArgsEq, Memoized};
pub use subject::{Subject, Subscription};
