//! Duplicate listing actions - entry points for finding and removing duplicates
//!
//! Called from the admin HTTP routes. Actions validate raw input before any
//! store access, then re-derive everything from current store contents, so
//! re-running is always safe.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use tracing::{info, warn};

use crate::common::{CityId, DirectoryError, Scope, StateId};
use crate::domains::listings::data::{
    DuplicateGroupData, DuplicateStats, DuplicatesRequest, DuplicatesResponse, ListingReviewData,
};
use crate::domains::listings::effects::{find_duplicate_groups, plan_removal, DuplicateGroup};
use crate::domains::listings::models::Listing;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateAction {
    /// Report groups for human review, no mutation
    Find,
    /// Keep the oldest listing per group, hard-delete the rest
    Remove,
}

impl FromStr for DuplicateAction {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "find" => Ok(DuplicateAction::Find),
            "remove" => Ok(DuplicateAction::Remove),
            _ => Err(DirectoryError::validation(format!(
                "action must be \"find\" or \"remove\", got \"{}\"",
                s
            ))),
        }
    }
}

/// Find or remove duplicate listings within a scope
pub async fn manage_duplicates(
    request: DuplicatesRequest,
    deps: &ServerDeps,
) -> Result<DuplicatesResponse, DirectoryError> {
    let action: DuplicateAction = request
        .action
        .as_deref()
        .ok_or_else(|| DirectoryError::validation("action is required"))?
        .parse()?;
    let scope = Scope::from_request(request.city_id.as_deref(), request.state_id.as_deref())?;

    match action {
        DuplicateAction::Find => find_duplicates(scope, deps).await,
        DuplicateAction::Remove => remove_duplicates(scope, deps).await,
    }
}

async fn load_listings(scope: &Scope, deps: &ServerDeps) -> Result<Vec<Listing>, DirectoryError> {
    deps.with_timeout("listings query", deps.store.find_listings(scope))
        .await
        .map_err(DirectoryError::StoreRead)
}

fn stats_for(total: usize, groups: &[DuplicateGroup]) -> DuplicateStats {
    DuplicateStats {
        total,
        duplicate_groups: groups.len(),
        duplicates: groups.iter().map(|g| g.duplicates.len()).sum(),
        removed: None,
    }
}

async fn find_duplicates(
    scope: Scope,
    deps: &ServerDeps,
) -> Result<DuplicatesResponse, DirectoryError> {
    info!(scope = %scope, "Finding duplicate listings");

    let listings = load_listings(&scope, deps).await?;
    let groups = find_duplicate_groups(&listings);
    let stats = stats_for(listings.len(), &groups);

    let names = if groups.is_empty() {
        LocationNames::default()
    } else {
        LocationNames::load(&scope, deps).await?
    };

    let duplicates = groups
        .iter()
        .map(|group| DuplicateGroupData {
            original_listing: names.review(&group.original),
            duplicates: group.duplicates.iter().map(|l| names.review(l)).collect(),
        })
        .collect();

    info!(
        scope = %scope,
        total = stats.total,
        duplicate_groups = stats.duplicate_groups,
        duplicates = stats.duplicates,
        "Duplicate scan complete"
    );

    let message = if stats.duplicate_groups == 0 {
        format!("No duplicates found among {} listings", stats.total)
    } else {
        format!(
            "Found {} duplicate groups containing {} duplicate listings",
            stats.duplicate_groups, stats.duplicates
        )
    };

    Ok(DuplicatesResponse {
        message,
        stats,
        duplicates: Some(duplicates),
    })
}

async fn remove_duplicates(
    scope: Scope,
    deps: &ServerDeps,
) -> Result<DuplicatesResponse, DirectoryError> {
    let _guard = deps.lock_scope(&scope).await?;
    info!(scope = %scope, "Removing duplicate listings");

    let listings = load_listings(&scope, deps).await?;
    let groups = find_duplicate_groups(&listings);
    let mut stats = stats_for(listings.len(), &groups);

    let plan = plan_removal(&groups, listings.len()).map_err(|blocked| {
        warn!(
            scope = %scope,
            would_remove = blocked.would_remove,
            max_allowed = blocked.max_allowed,
            total = blocked.total,
            "Duplicate removal blocked by safety limit"
        );
        DirectoryError::SafetyGate(blocked)
    })?;

    if plan.ids_to_remove.is_empty() {
        stats.removed = Some(0);
        return Ok(DuplicatesResponse {
            message: "No duplicate listings to remove".to_string(),
            stats,
            duplicates: None,
        });
    }

    // One batch call: the store deletes all of them or none
    let removed = deps
        .with_timeout(
            "listings delete",
            deps.store.delete_listings(&plan.ids_to_remove),
        )
        .await
        .map_err(DirectoryError::StoreWrite)?;

    stats.removed = Some(removed);
    info!(
        scope = %scope,
        removed = removed,
        duplicate_groups = stats.duplicate_groups,
        "Duplicate listings removed"
    );

    Ok(DuplicatesResponse {
        message: format!(
            "Removed {} duplicate listings from {} groups",
            removed, stats.duplicate_groups
        ),
        stats,
        duplicates: None,
    })
}

/// City and state names for review output
#[derive(Default)]
struct LocationNames {
    cities: HashMap<CityId, (String, StateId)>,
    states: HashMap<StateId, String>,
}

impl LocationNames {
    async fn load(scope: &Scope, deps: &ServerDeps) -> Result<Self, DirectoryError> {
        let cities = deps
            .with_timeout("cities query", deps.store.find_cities(scope))
            .await
            .map_err(DirectoryError::StoreRead)?;

        let state_ids: Vec<StateId> = cities
            .iter()
            .map(|c| c.state_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let states = deps
            .with_timeout("states query", deps.store.find_states(&state_ids))
            .await
            .map_err(DirectoryError::StoreRead)?;

        Ok(Self {
            cities: cities
                .into_iter()
                .map(|c| (c.id, (c.name, c.state_id)))
                .collect(),
            states: states.into_iter().map(|s| (s.id, s.name)).collect(),
        })
    }

    fn review(&self, listing: &Listing) -> ListingReviewData {
        let city = self.cities.get(&listing.city_id);
        let state = city.and_then(|(_, state_id)| self.states.get(state_id));
        ListingReviewData::new(
            listing,
            city.map(|(name, _)| name.clone()),
            state.cloned(),
        )
    }
}
