//! Duplicate listing grouping and removal planning.
//!
//! Grouping is greedy in creation order: the oldest ungrouped listing seeds a
//! group and claims every later ungrouped listing in the same city that
//! matches it. Each listing lands in at most one group, so re-running over
//! unchanged data yields the same groups.

use std::cmp::Ordering;

use crate::common::{BlockedRemoval, ListingId};
use crate::domains::listings::effects::matching::MatchKey;
use crate::domains::listings::models::Listing;

/// A set of two or more listings for the same business, oldest first.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub original: Listing,
    pub duplicates: Vec<Listing>,
}

/// Outcome of checking a removal against the safety gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalPlan {
    pub ids_to_remove: Vec<ListingId>,
    pub max_allowed: usize,
}

fn creation_order(a: &Listing, b: &Listing) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Group near-duplicate listings. Input order does not matter.
pub fn find_duplicate_groups(listings: &[Listing]) -> Vec<DuplicateGroup> {
    let mut ordered: Vec<&Listing> = listings.iter().collect();
    ordered.sort_by(|a, b| creation_order(a, b));

    let keys: Vec<MatchKey> = ordered.iter().map(|l| MatchKey::from_listing(l)).collect();
    let mut grouped = vec![false; ordered.len()];
    let mut groups = Vec::new();

    for i in 0..ordered.len() {
        if grouped[i] {
            continue;
        }
        grouped[i] = true;

        let mut duplicates = Vec::new();
        for j in (i + 1)..ordered.len() {
            if grouped[j] || ordered[j].city_id != ordered[i].city_id {
                continue;
            }
            if keys[i].is_duplicate_of(&keys[j]) {
                grouped[j] = true;
                duplicates.push(ordered[j].clone());
            }
        }

        if !duplicates.is_empty() {
            groups.push(DuplicateGroup {
                original: ordered[i].clone(),
                duplicates,
            });
        }
    }

    groups
}

/// Keep the oldest listing of every group and remove the rest, unless that
/// would remove more than half of the listings in scope.
pub fn plan_removal(
    groups: &[DuplicateGroup],
    total_in_scope: usize,
) -> Result<RemovalPlan, BlockedRemoval> {
    let ids_to_remove: Vec<ListingId> = groups
        .iter()
        .flat_map(|g| g.duplicates.iter().map(|l| l.id))
        .collect();
    let max_allowed = total_in_scope / 2;

    if ids_to_remove.len() > max_allowed {
        return Err(BlockedRemoval {
            total: total_in_scope,
            duplicate_groups: groups.len(),
            duplicates: ids_to_remove.len(),
            would_remove: ids_to_remove.len(),
            max_allowed,
        });
    }

    Ok(RemovalPlan {
        ids_to_remove,
        max_allowed,
    })
}
