//! Featured listing actions - select or clear featured listings per city
//!
//! A batch over independent cities: a failure in one city is recorded in
//! `errors` and the remaining cities are still processed.

use std::str::FromStr;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::common::{DirectoryError, ListingId, Scope};
use crate::domains::listings::data::{
    CityFeaturedData, FeaturedRequest, FeaturedResponse, FeaturedStats,
};
use crate::domains::listings::effects::{plan_rebalance, plan_top_up, FeaturedPlan, FeaturedStrategy};
use crate::domains::locations::models::City;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeaturedAction {
    Select,
    Clear,
}

impl FromStr for FeaturedAction {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(FeaturedAction::Select),
            "clear" => Ok(FeaturedAction::Clear),
            _ => Err(DirectoryError::validation(format!(
                "action must be \"select\" or \"clear\", got \"{}\"",
                s
            ))),
        }
    }
}

/// Select or clear featured listings, with an entropy-seeded tiebreak
pub async fn manage_featured(
    request: FeaturedRequest,
    deps: &ServerDeps,
) -> Result<FeaturedResponse, DirectoryError> {
    let mut rng = StdRng::from_entropy();
    manage_featured_with_rng(request, deps, &mut rng).await
}

/// Same as [`manage_featured`] with a caller-supplied random source
pub async fn manage_featured_with_rng<R: Rng + Send + ?Sized>(
    request: FeaturedRequest,
    deps: &ServerDeps,
    rng: &mut R,
) -> Result<FeaturedResponse, DirectoryError> {
    let action: FeaturedAction = request
        .action
        .as_deref()
        .ok_or_else(|| DirectoryError::validation("action is required"))?
        .parse()?;
    let strategy = match request.strategy.as_deref().map(str::trim) {
        None | Some("") => FeaturedStrategy::default(),
        Some(raw) => raw.parse()?,
    };
    let scope = Scope::from_request(request.city_id.as_deref(), request.state_id.as_deref())?;

    let _guard = deps.lock_scope(&scope).await?;

    let cities = deps
        .with_timeout("cities query", deps.store.find_cities(&scope))
        .await
        .map_err(DirectoryError::StoreRead)?;

    info!(
        scope = %scope,
        action = ?action,
        strategy = %strategy,
        cities = cities.len(),
        "Updating featured listings"
    );

    let mut stats = FeaturedStats {
        cities_processed: cities.len(),
        ..Default::default()
    };
    let mut results = Vec::with_capacity(cities.len());

    for city in &cities {
        let outcome = match action {
            FeaturedAction::Clear => clear_city(city, deps).await,
            FeaturedAction::Select => select_city(city, strategy, deps, rng).await,
        };

        match outcome {
            Ok(data) => {
                stats.listings_updated += data.featured + data.unfeatured + data.cleared;
                if data.no_candidates {
                    stats.cities_without_listings += 1;
                } else {
                    stats.cities_with_listings += 1;
                }
                results.push(data);
            }
            Err(e) => {
                warn!(city_id = %city.id, city = %city.name, error = %e, "Failed to update featured listings");
                stats.errors.push(format!("{}: {:#}", city.name, e));
            }
        }
    }

    info!(
        scope = %scope,
        listings_updated = stats.listings_updated,
        errors = stats.errors.len(),
        "Featured listings updated"
    );

    Ok(FeaturedResponse {
        message: summary(action, &stats),
        stats,
        cities: results,
    })
}

fn summary(action: FeaturedAction, stats: &FeaturedStats) -> String {
    let base = match action {
        FeaturedAction::Select => format!(
            "Featured {} listings across {} cities ({} without candidates)",
            stats.listings_updated, stats.cities_with_listings, stats.cities_without_listings
        ),
        FeaturedAction::Clear => format!(
            "Cleared {} featured listings across {} cities",
            stats.listings_updated, stats.cities_processed
        ),
    };
    if stats.errors.is_empty() {
        base
    } else {
        format!("{}; {} cities failed", base, stats.errors.len())
    }
}

fn city_data(city: &City) -> CityFeaturedData {
    CityFeaturedData {
        city_id: city.id,
        city_name: city.name.clone(),
        ..Default::default()
    }
}

async fn clear_city(city: &City, deps: &ServerDeps) -> Result<CityFeaturedData> {
    let listings = deps
        .with_timeout("listings query", deps.store.find_listings_in_city(city.id))
        .await?;
    let featured: Vec<ListingId> = listings.iter().filter(|l| l.featured).map(|l| l.id).collect();

    let mut data = city_data(city);
    if featured.is_empty() {
        data.no_candidates = true;
        return Ok(data);
    }

    data.cleared = deps
        .with_timeout("featured update", deps.store.set_featured(&featured, false))
        .await?;
    info!(city_id = %city.id, cleared = data.cleared, "Cleared featured listings");
    Ok(data)
}

async fn select_city<R: Rng + Send + ?Sized>(
    city: &City,
    strategy: FeaturedStrategy,
    deps: &ServerDeps,
    rng: &mut R,
) -> Result<CityFeaturedData> {
    let listings = deps
        .with_timeout("listings query", deps.store.find_listings_in_city(city.id))
        .await?;

    let plan: FeaturedPlan = match strategy {
        FeaturedStrategy::TopUpOnly => plan_top_up(&listings, rng),
        FeaturedStrategy::DeterministicRebalance => plan_rebalance(&listings),
    };

    let mut data = city_data(city);
    if plan.candidates == 0 {
        data.no_candidates = true;
        return Ok(data);
    }

    if !plan.to_unfeature.is_empty() {
        let ids: Vec<ListingId> = plan.to_unfeature.iter().map(|l| l.id).collect();
        data.unfeatured = deps
            .with_timeout("featured update", deps.store.set_featured(&ids, false))
            .await?;
    }
    if !plan.to_feature.is_empty() {
        let ids: Vec<ListingId> = plan.to_feature.iter().map(|l| l.id).collect();
        data.featured = deps
            .with_timeout("featured update", deps.store.set_featured(&ids, true))
            .await?;
    }
    data.selected = plan.selected_names();

    info!(
        city_id = %city.id,
        featured = data.featured,
        unfeatured = data.unfeatured,
        "Featured listings selected"
    );
    Ok(data)
}
