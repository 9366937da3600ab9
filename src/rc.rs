//! Shared mutable cells with an explicit non-owning handle.
//!
//! Work scheduled for later must not keep a stream alive, and must not touch
//! it once it is gone. [`MutArc`] is the owning side, [`WeakMutArc`] the
//! non-owning side every deferred job captures; a job upgrades it right
//! before touching the state and does nothing if that fails.

use std::{
  fmt,
  sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

pub struct MutArc<T>(Arc<Mutex<T>>);

pub struct WeakMutArc<T>(Weak<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  /// Lock the cell.
  ///
  /// A poisoned lock is recovered: no user code ever runs while the guard
  /// is held, so the state is consistent even after a panic elsewhere.
  #[inline]
  pub fn rc_deref_mut(&self) -> MutexGuard<'_, T> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }

  #[inline]
  pub fn downgrade(&self) -> WeakMutArc<T> { WeakMutArc(Arc::downgrade(&self.0)) }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl<T> WeakMutArc<T> {
  #[inline]
  pub fn upgrade(&self) -> Option<MutArc<T>> { self.0.upgrade().map(MutArc) }

  /// Whether some owner still keeps the cell alive.
  #[inline]
  pub fn is_alive(&self) -> bool { self.0.strong_count() > 0 }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for WeakMutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> fmt::Debug for MutArc<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("MutArc").field(&Arc::as_ptr(&self.0)).finish()
  }
}

impl<T> fmt::Debug for WeakMutArc<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("WeakMutArc").field(&self.is_alive()).finish()
  }
}
