// Common types used across multiple domains and layers
//
// Shared between the kernel (store implementations) and the listings domain.

use std::fmt;

use super::errors::DirectoryError;
use super::{CityId, StateId};

/// The subset of listings an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    All,
    State(StateId),
    City(CityId),
}

impl Scope {
    /// Resolve request scope fields. `cityId` wins over `stateId`; blank
    /// strings count as absent.
    pub fn from_request(
        city_id: Option<&str>,
        state_id: Option<&str>,
    ) -> Result<Self, DirectoryError> {
        let city_id = city_id.map(str::trim).filter(|s| !s.is_empty());
        let state_id = state_id.map(str::trim).filter(|s| !s.is_empty());

        if let Some(raw) = city_id {
            let id = CityId::parse(raw)
                .map_err(|_| DirectoryError::validation(format!("cityId is not a valid id: {}", raw)))?;
            return Ok(Scope::City(id));
        }

        if let Some(raw) = state_id {
            let id = StateId::parse(raw).map_err(|_| {
                DirectoryError::validation(format!("stateId is not a valid id: {}", raw))
            })?;
            return Ok(Scope::State(id));
        }

        Ok(Scope::All)
    }

    /// Key used by the scope lock registry.
    pub fn lock_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "global"),
            Scope::State(id) => write!(f, "state:{}", id),
            Scope::City(id) => write!(f, "city:{}", id),
        }
    }
}
