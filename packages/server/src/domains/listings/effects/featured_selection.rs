//! Featured listing selection policies.
//!
//! Two policies coexist; callers depend on the observable output of each:
//!
//! - [`FeaturedStrategy::TopUpOnly`]: features up to 3 more listings that have
//!   a phone number, best rated first, equal ratings in random order. Never
//!   un-features anything.
//! - [`FeaturedStrategy::DeterministicRebalance`]: brings the city to exactly
//!   `min(3, listings)` featured, preferring listings with both phone and
//!   website, ranked by rating then review count. Trims any excess.

use std::cmp::Ordering;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::DirectoryError;
use crate::domains::listings::models::Listing;

/// Promotional slots per city
pub const MAX_FEATURED_PER_CITY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeaturedStrategy {
    #[default]
    TopUpOnly,
    DeterministicRebalance,
}

impl std::fmt::Display for FeaturedStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeaturedStrategy::TopUpOnly => write!(f, "topUpOnly"),
            FeaturedStrategy::DeterministicRebalance => write!(f, "deterministicRebalance"),
        }
    }
}

impl FromStr for FeaturedStrategy {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topUpOnly" => Ok(FeaturedStrategy::TopUpOnly),
            "deterministicRebalance" => Ok(FeaturedStrategy::DeterministicRebalance),
            _ => Err(DirectoryError::validation(format!(
                "strategy must be \"topUpOnly\" or \"deterministicRebalance\", got \"{}\"",
                s
            ))),
        }
    }
}

/// Changes to apply to one city
#[derive(Debug, Clone, Default)]
pub struct FeaturedPlan {
    pub to_feature: Vec<Listing>,
    pub to_unfeature: Vec<Listing>,
    /// Listings the policy could choose from
    pub candidates: usize,
}

impl FeaturedPlan {
    pub fn is_noop(&self) -> bool {
        self.to_feature.is_empty() && self.to_unfeature.is_empty()
    }

    pub fn selected_names(&self) -> Vec<String> {
        self.to_feature
            .iter()
            .map(|l| l.business_name.clone())
            .collect()
    }
}

/// Rating desc, then review count desc, then oldest first.
fn quality_order(a: &Listing, b: &Listing) -> Ordering {
    b.review_rating
        .total_cmp(&a.review_rating)
        .then_with(|| b.number_of_reviews.cmp(&a.number_of_reviews))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Pick up to 3 unfeatured listings with a phone, best rated first.
///
/// Ties on rating are broken by `rng`, so repeated runs spread featuring
/// across equally rated businesses. Pass a seeded rng for reproducible output.
pub fn plan_top_up<R: Rng + ?Sized>(listings: &[Listing], rng: &mut R) -> FeaturedPlan {
    let mut candidates: Vec<&Listing> = listings
        .iter()
        .filter(|l| !l.featured && l.has_phone())
        .collect();
    let candidate_count = candidates.len();

    candidates.shuffle(rng);
    // Stable sort: shuffled order survives among equal ratings
    candidates.sort_by(|a, b| b.review_rating.total_cmp(&a.review_rating));

    FeaturedPlan {
        to_feature: candidates
            .into_iter()
            .take(MAX_FEATURED_PER_CITY)
            .cloned()
            .collect(),
        to_unfeature: Vec::new(),
        candidates: candidate_count,
    }
}

/// Bring the city to exactly `min(3, listings)` featured listings.
pub fn plan_rebalance(listings: &[Listing]) -> FeaturedPlan {
    let target = MAX_FEATURED_PER_CITY.min(listings.len());

    let mut featured: Vec<&Listing> = listings.iter().filter(|l| l.featured).collect();
    let mut plan = FeaturedPlan {
        candidates: listings.len(),
        ..Default::default()
    };

    if featured.len() > MAX_FEATURED_PER_CITY {
        featured.sort_by(|a, b| quality_order(a, b));
        plan.to_unfeature = featured[MAX_FEATURED_PER_CITY..]
            .iter()
            .map(|l| (*l).clone())
            .collect();
        return plan;
    }

    let needed = target.saturating_sub(featured.len());
    if needed == 0 {
        return plan;
    }

    // Listings with both phone and website go first; the rest only fill
    // slots the quality pool cannot.
    let mut pool: Vec<&Listing> = listings.iter().filter(|l| !l.featured).collect();
    pool.sort_by(|a, b| {
        let a_quality = a.has_phone() && a.has_website();
        let b_quality = b.has_phone() && b.has_website();
        b_quality
            .cmp(&a_quality)
            .then_with(|| quality_order(a, b))
    });

    plan.to_feature = pool.into_iter().take(needed).cloned().collect();
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CityId;
    use crate::domains::listings::models::NewListing;
    use chrono::{Duration, TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Row<'a> {
        name: &'a str,
        rating: f64,
        reviews: i32,
        phone: &'a str,
        website: &'a str,
        featured: bool,
    }

    fn build(city: CityId, rows: &[Row]) -> Vec<Listing> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        rows
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Listing::from_new(
                    NewListing::builder()
                        .business_name(s.name)
                        .city_id(city)
                        .phone(s.phone)
                        .website(s.website)
                        .review_rating(s.rating)
                        .number_of_reviews(s.reviews)
                        .featured(s.featured)
                        .created_at(base + Duration::hours(i as i64))
                        .build(),
                )
            })
            .collect()
    }

    fn row<'a>(name: &'a str, rating: f64, phone: &'a str) -> Row<'a> {
        Row {
            name,
            rating,
            reviews: 0,
            phone,
            website: "",
            featured: false,
        }
    }

    #[test]
    fn test_strategy_parses_wire_names() {
        assert_eq!(
            "deterministicRebalance".parse::<FeaturedStrategy>().unwrap(),
            FeaturedStrategy::DeterministicRebalance
        );
        assert_eq!(FeaturedStrategy::default(), FeaturedStrategy::TopUpOnly);
        assert!("random".parse::<FeaturedStrategy>().is_err());
    }

    #[test]
    fn test_top_up_requires_phone() {
        let city = CityId::new();
        let listings = build(
            city,
            &[
                row("Joe's Pet Hotel", 4.8, "555-1111"),
                row("joes pet hotel", 4.8, "555-1111"),
                row("Main Street Kennels", 4.2, ""),
            ],
        );
        let mut rng = StdRng::seed_from_u64(7);

        let plan = plan_top_up(&listings, &mut rng);

        assert_eq!(plan.candidates, 2);
        let mut names = plan.selected_names();
        names.sort();
        assert_eq!(names, vec!["Joe's Pet Hotel", "joes pet hotel"]);
    }

    #[test]
    fn test_top_up_caps_at_three_best_rated() {
        let city = CityId::new();
        let listings = build(
            city,
            &[
                row("A", 3.0, "1"),
                row("B", 5.0, "1"),
                row("C", 4.0, "1"),
                row("D", 4.5, "1"),
                row("E", 2.0, "1"),
            ],
        );
        let mut rng = StdRng::seed_from_u64(1);

        let plan = plan_top_up(&listings, &mut rng);

        assert_eq!(plan.selected_names(), vec!["B", "D", "C"]);
        assert!(plan.to_unfeature.is_empty());
    }

    #[test]
    fn test_top_up_skips_already_featured() {
        let city = CityId::new();
        let mut rows = vec![row("A", 5.0, "1"), row("B", 4.0, "1")];
        rows[0].featured = true;
        let listings = build(city, &rows);
        let mut rng = StdRng::seed_from_u64(1);

        let plan = plan_top_up(&listings, &mut rng);

        assert_eq!(plan.selected_names(), vec!["B"]);
    }

    #[test]
    fn test_top_up_with_no_candidates_is_noop() {
        let city = CityId::new();
        let listings = build(city, &[row("A", 5.0, ""), row("B", 4.0, "  ")]);
        let mut rng = StdRng::seed_from_u64(1);

        let plan = plan_top_up(&listings, &mut rng);

        assert!(plan.is_noop());
        assert_eq!(plan.candidates, 0);
    }

    #[test]
    fn test_top_up_is_reproducible_with_same_seed() {
        let city = CityId::new();
        let listings = build(
            city,
            &(0..10)
                .map(|_| row("Tie", 4.0, "1"))
                .collect::<Vec<_>>(),
        );

        let first = plan_top_up(&listings, &mut StdRng::seed_from_u64(42));
        let second = plan_top_up(&listings, &mut StdRng::seed_from_u64(42));

        let ids = |p: &FeaturedPlan| p.to_feature.iter().map(|l| l.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_top_up_tiebreak_varies_across_seeds() {
        let city = CityId::new();
        let listings = build(
            city,
            &(0..12)
                .map(|_| row("Tie", 4.0, "1"))
                .collect::<Vec<_>>(),
        );

        let picks: std::collections::HashSet<Vec<_>> = (0..20u64)
            .map(|seed| {
                plan_top_up(&listings, &mut StdRng::seed_from_u64(seed))
                    .to_feature
                    .iter()
                    .map(|l| l.id)
                    .collect()
            })
            .collect();

        assert!(picks.len() > 1);
    }

    #[test]
    fn test_rebalance_prefers_phone_and_website() {
        let city = CityId::new();
        let listings = build(
            city,
            &[
                Row { website: "", ..row("Top rated, no site", 5.0, "1") },
                Row { website: "https://a.example", ..row("A", 3.0, "1") },
                Row { website: "https://b.example", ..row("B", 4.0, "1") },
                Row { website: "https://c.example", ..row("C", 2.0, "") },
            ],
        );

        let plan = plan_rebalance(&listings);

        // Two quality listings, then the best remaining fills the third slot
        assert_eq!(plan.selected_names(), vec!["B", "A", "Top rated, no site"]);
    }

    #[test]
    fn test_rebalance_breaks_rating_ties_by_review_count() {
        let city = CityId::new();
        let listings = build(
            city,
            &[
                Row { reviews: 3, ..row("Few", 4.0, "") },
                Row { reviews: 90, ..row("Many", 4.0, "") },
                Row { reviews: 10, ..row("Some", 4.0, "") },
                Row { reviews: 1, ..row("One", 4.0, "") },
            ],
        );

        let plan = plan_rebalance(&listings);

        assert_eq!(plan.selected_names(), vec!["Many", "Some", "Few"]);
    }

    #[test]
    fn test_rebalance_tops_up_to_city_size() {
        let city = CityId::new();
        let mut rows = vec![row("A", 1.0, ""), row("B", 2.0, "")];
        rows[0].featured = true;
        let listings = build(city, &rows);

        let plan = plan_rebalance(&listings);

        assert_eq!(plan.selected_names(), vec!["B"]);
    }

    #[test]
    fn test_rebalance_trims_lowest_ranked_excess() {
        let city = CityId::new();
        let rows: Vec<Row> = [("A", 5.0), ("B", 1.0), ("C", 4.0), ("D", 2.0), ("E", 3.0)]
            .into_iter()
            .map(|(name, rating)| Row { featured: true, ..row(name, rating, "1") })
            .collect();
        let listings = build(city, &rows);

        let plan = plan_rebalance(&listings);

        assert!(plan.to_feature.is_empty());
        let mut trimmed: Vec<_> = plan.to_unfeature.iter().map(|l| l.business_name.as_str()).collect();
        trimmed.sort();
        assert_eq!(trimmed, vec!["B", "D"]);
    }

    #[test]
    fn test_rebalance_leaves_full_city_alone() {
        let city = CityId::new();
        let rows: Vec<Row> = ["A", "B", "C"]
            .into_iter()
            .map(|name| Row { featured: true, ..row(name, 4.0, "1") })
            .chain(std::iter::once(row("D", 5.0, "1")))
            .collect();
        let listings = build(city, &rows);

        assert!(plan_rebalance(&listings).is_noop());
    }

    #[test]
    fn test_rebalance_writes_in_one_direction_only() {
        let city = CityId::new();
        for already_featured in 0..=6 {
            let rows: Vec<Row> = (0..6)
                .map(|i| Row {
                    featured: i < already_featured,
                    ..row("Biz", i as f64, "1")
                })
                .collect();
            let plan = plan_rebalance(&build(city, &rows));

            assert!(
                plan.to_feature.is_empty() || plan.to_unfeature.is_empty(),
                "{} featured produced a mixed plan",
                already_featured
            );
        }
    }
}
