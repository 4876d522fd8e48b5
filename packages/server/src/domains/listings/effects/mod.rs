// Listing maintenance effects - pure decision logic, no store access

pub mod duplicate_grouping;
pub mod featured_selection;
pub mod matching;

pub use duplicate_grouping::{find_duplicate_groups, plan_removal, DuplicateGroup, RemovalPlan};
pub use featured_selection::{
    plan_rebalance, plan_top_up, FeaturedPlan, FeaturedStrategy, MAX_FEATURED_PER_CITY,
};
pub use matching::{addresses_match, phones_match, MatchKey};
