//! Operators.
//!
//! Every operator that reduces a sequence to one value is a
//! [`ScalarStrategy`](scalar::ScalarStrategy) run by the shared
//! [`Scalar`](scalar::Scalar) state machine; `sequence_equal` is the only
//! one with two sources and has its own observers. Operators taking a
//! closure also have a `try_` form whose closure may fail; see [`callback`].

pub mod aggregate;
pub mod any;
pub mod average;
pub mod callback;
pub mod collect;
pub mod contains;
pub mod count;
pub mod element_at;
pub mod first;
pub mod into_future;
pub mod last;
pub mod lifecycle;
pub mod minmax;
pub mod scalar;
pub mod sequence_equal;
pub mod serialize;
pub mod single;
pub mod sum;
