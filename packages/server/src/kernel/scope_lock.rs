//! In-process advisory locks keyed by scope.
//!
//! Mutating maintenance runs (duplicate removal, featured selection) hold the
//! lock for their scope until the guard drops. A second run on an overlapping
//! scope fails fast instead of waiting. Overlap means: the same scope, either
//! side global, or a state and a city inside that state. City locks carry
//! their state so the last case can be checked.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::common::{DirectoryError, Scope, StateId};

/// Held lock keys, each with the key of its enclosing state (cities only)
type HeldScopes = Arc<Mutex<HashMap<String, Option<String>>>>;

#[derive(Clone, Default)]
pub struct ScopeLocks {
    held: HeldScopes,
}

/// Releases the scope when dropped
pub struct ScopeGuard {
    key: String,
    held: HeldScopes,
}

impl ScopeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock a scope without knowing its enclosing state
    pub fn try_acquire(&self, scope: &Scope) -> Result<ScopeGuard, DirectoryError> {
        self.try_acquire_in_state(scope, None)
    }

    /// Lock a scope; `state_id` is the state a city scope belongs to
    pub fn try_acquire_in_state(
        &self,
        scope: &Scope,
        state_id: Option<StateId>,
    ) -> Result<ScopeGuard, DirectoryError> {
        let key = scope.lock_key();
        let global = Scope::All.lock_key();
        let parent = state_id.map(|id| Scope::State(id).lock_key());
        let mut held = self
            .held
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let conflict = held.contains_key(&key)
            || held.contains_key(&global)
            || (key == global && !held.is_empty())
            || parent.as_ref().is_some_and(|p| held.contains_key(p))
            || held.values().any(|p| p.as_deref() == Some(key.as_str()));
        if conflict {
            return Err(DirectoryError::ScopeBusy(key));
        }

        held.insert(key.clone(), parent);
        Ok(ScopeGuard {
            key,
            held: self.held.clone(),
        })
    }

    pub fn is_held(&self, scope: &Scope) -> bool {
        self.held
            .lock()
            .map(|held| held.contains_key(&scope.lock_key()))
            .unwrap_or(false)
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let mut held = self
            .held
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        held.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{CityId, StateId};

    #[test]
    fn test_same_scope_is_exclusive() {
        let locks = ScopeLocks::new();
        let scope = Scope::City(CityId::new());

        let guard = locks.try_acquire(&scope).unwrap();
        assert!(matches!(
            locks.try_acquire(&scope),
            Err(DirectoryError::ScopeBusy(_))
        ));

        drop(guard);
        assert!(locks.try_acquire(&scope).is_ok());
    }

    #[test]
    fn test_different_cities_run_in_parallel() {
        let locks = ScopeLocks::new();
        let _a = locks.try_acquire(&Scope::City(CityId::new())).unwrap();
        let _b = locks.try_acquire(&Scope::City(CityId::new())).unwrap();
        let _c = locks.try_acquire(&Scope::State(StateId::new())).unwrap();
    }

    #[test]
    fn test_global_conflicts_both_ways() {
        let locks = ScopeLocks::new();
        let city = Scope::City(CityId::new());

        let city_guard = locks.try_acquire(&city).unwrap();
        assert!(locks.try_acquire(&Scope::All).is_err());
        drop(city_guard);

        let _global = locks.try_acquire(&Scope::All).unwrap();
        assert!(locks.try_acquire(&city).is_err());
        assert!(locks.is_held(&Scope::All));
    }

    #[test]
    fn test_state_conflicts_with_its_own_cities() {
        let locks = ScopeLocks::new();
        let minnesota = StateId::new();
        let wisconsin = StateId::new();
        let duluth = Scope::City(CityId::new());

        let state_guard = locks.try_acquire(&Scope::State(minnesota)).unwrap();
        assert!(matches!(
            locks.try_acquire_in_state(&duluth, Some(minnesota)),
            Err(DirectoryError::ScopeBusy(_))
        ));
        assert!(locks
            .try_acquire_in_state(&Scope::City(CityId::new()), Some(wisconsin))
            .is_ok());
        drop(state_guard);

        let _city_guard = locks.try_acquire_in_state(&duluth, Some(minnesota)).unwrap();
        assert!(locks.try_acquire(&Scope::State(minnesota)).is_err());
        assert!(locks.try_acquire(&Scope::State(wisconsin)).is_ok());
    }
}
