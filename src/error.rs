//! Errors raised by the operators themselves.
//!
//! Upstream errors are never wrapped: every operator is generic over the
//! source's error type and forwards it unchanged. Operators that can fail on
//! their own require `Err: From<RxError>` so they can report one of these
//! variants through the normal error notification.

/// Failures detected by an operator while it processes a sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RxError {
  /// The sequence completed without the element the operator needs
  /// (`first`, `last`, `single`, unseeded `aggregate`, `min`/`max`, ...).
  #[error("sequence contains no elements")]
  NoElements,

  /// `single` saw a second element.
  #[error("sequence contains more than one element")]
  MoreThanOneElement,

  /// `element_at` reached completion before the requested index.
  #[error("index {index} is out of range for the sequence")]
  ArgumentOutOfRange { index: usize },

  /// A checked accumulator left the range of its numeric type.
  #[error("arithmetic operation resulted in an overflow")]
  Overflow,

  /// `to_map` saw the same key twice.
  #[error("an element with the same key has already been added")]
  DuplicateKey,
}
