//! User closures as strategies call them.
//!
//! Operators that take a closure come in a plain form (`count_where`) and a
//! fallible one (`try_count_where`) whose closure returns `Result<_, Err>`.
//! Strategies are written once against the traits below: the closure is
//! wrapped in [`Plain`] or [`Fallible`], every call yields a `Result`, and an
//! `Err` from user code becomes the operator's error notification.

/// A closure that cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct Plain<F>(pub F);

/// A closure returning `Result`; its `Err` is delivered downstream.
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

/// `FnMut(&A) -> Output`: predicates and key selectors.
pub trait Selector<A, Err> {
  type Output;

  fn select(&mut self, a: &A) -> Result<Self::Output, Err>;
}

/// `FnMut(&A, &B) -> Output`: comparers and equality tests.
pub trait Comparer<A, B, Err> {
  type Output;

  fn compare(&mut self, a: &A, b: &B) -> Result<Self::Output, Err>;
}

/// `FnMut(A, B) -> Output`: accumulators.
pub trait Folder<A, B, Err> {
  type Output;

  fn fold(&mut self, a: A, b: B) -> Result<Self::Output, Err>;
}

/// `FnMut(A) -> Output`: element projections.
pub trait Projector<A, Err> {
  type Output;

  fn project(&mut self, a: A) -> Result<Self::Output, Err>;
}

/// `FnOnce(A) -> Output`: result selectors, run once at the end.
pub trait Finisher<A, Err> {
  type Output;

  fn apply(self, a: A) -> Result<Self::Output, Err>;
}

impl<F, A, T, Err> Selector<A, Err> for Plain<F>
where
  F: FnMut(&A) -> T,
{
  type Output = T;

  #[inline]
  fn select(&mut self, a: &A) -> Result<T, Err> { Ok((self.0)(a)) }
}

impl<F, A, T, Err> Selector<A, Err> for Fallible<F>
where
  F: FnMut(&A) -> Result<T, Err>,
{
  type Output = T;

  #[inline]
  fn select(&mut self, a: &A) -> Result<T, Err> { (self.0)(a) }
}

impl<F, A, B, T, Err> Comparer<A, B, Err> for Plain<F>
where
  F: FnMut(&A, &B) -> T,
{
  type Output = T;

  #[inline]
  fn compare(&mut self, a: &A, b: &B) -> Result<T, Err> { Ok((self.0)(a, b)) }
}

impl<F, A, B, T, Err> Comparer<A, B, Err> for Fallible<F>
where
  F: FnMut(&A, &B) -> Result<T, Err>,
{
  type Output = T;

  #[inline]
  fn compare(&mut self, a: &A, b: &B) -> Result<T, Err> { (self.0)(a, b) }
}

impl<F, A, B, T, Err> Folder<A, B, Err> for Plain<F>
where
  F: FnMut(A, B) -> T,
{
  type Output = T;

  #[inline]
  fn fold(&mut self, a: A, b: B) -> Result<T, Err> { Ok((self.0)(a, b)) }
}

impl<F, A, B, T, Err> Folder<A, B, Err> for Fallible<F>
where
  F: FnMut(A, B) -> Result<T, Err>,
{
  type Output = T;

  #[inline]
  fn fold(&mut self, a: A, b: B) -> Result<T, Err> { (self.0)(a, b) }
}

impl<F, A, T, Err> Projector<A, Err> for Plain<F>
where
  F: FnMut(A) -> T,
{
  type Output = T;

  #[inline]
  fn project(&mut self, a: A) -> Result<T, Err> { Ok((self.0)(a)) }
}

impl<F, A, T, Err> Projector<A, Err> for Fallible<F>
where
  F: FnMut(A) -> Result<T, Err>,
{
  type Output = T;

  #[inline]
  fn project(&mut self, a: A) -> Result<T, Err> { (self.0)(a) }
}

impl<F, A, T, Err> Finisher<A, Err> for Plain<F>
where
  F: FnOnce(A) -> T,
{
  type Output = T;

  #[inline]
  fn apply(self, a: A) -> Result<T, Err> { Ok((self.0)(a)) }
}

impl<F, A, T, Err> Finisher<A, Err> for Fallible<F>
where
  F: FnOnce(A) -> Result<T, Err>,
{
  type Output = T;

  #[inline]
  fn apply(self, a: A) -> Result<T, Err> { (self.0)(a) }
}
