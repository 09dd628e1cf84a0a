//! Search and ordering helpers for product and user listings.

use crate::catalog::{ProductRecord, Role, UserRecord};
use std::cmp::Ordering;

/// Direction for ordering products by segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SegmentOrder {
    /// budget → midrange → flagship
    #[default]
    Asc,
    /// flagship → midrange → budget
    Desc,
}

/// Which role is listed first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RoleOrder {
    #[default]
    AdminFirst,
    UserFirst,
}

/// Normalize a search query; `None` when it would match everything.
fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    (!q.is_empty()).then_some(q)
}

/// Products whose name contains the query, case-insensitively.
///
/// # Examples
///
/// ```
/// use phone_compare::filters::name_matches;
///
/// assert!(name_matches("Galaxy S24 Ultra", " s24 "));
/// assert!(name_matches("Pixel 9", ""));
/// assert!(!name_matches("Pixel 9", "galaxy"));
/// ```
pub fn name_matches(name: &str, query: &str) -> bool {
    normalize_query(query).is_none_or(|q| name.to_lowercase().contains(&q))
}

pub fn filter_by_name<'a>(products: &'a [ProductRecord], query: &str) -> Vec<&'a ProductRecord> {
    products
        .iter()
        .filter(|p| name_matches(&p.product_name, query))
        .collect()
}

/// Admin catalog search: matches the product name or the segment.
pub fn search_catalog<'a>(products: &'a [ProductRecord], query: &str) -> Vec<&'a ProductRecord> {
    let Some(q) = normalize_query(query) else {
        return products.iter().collect();
    };
    products
        .iter()
        .filter(|p| p.product_name.to_lowercase().contains(&q) || p.segment.as_str().contains(&q))
        .collect()
}

/// Stable sort by segment tier.
pub fn sort_by_segment(products: &mut [&ProductRecord], order: SegmentOrder) {
    products.sort_by(|a, b| {
        let by_rank = a.segment.rank().cmp(&b.segment.rank());
        match order {
            SegmentOrder::Asc => by_rank,
            SegmentOrder::Desc => by_rank.reverse(),
        }
    });
}

pub fn filter_users<'a>(users: &'a [UserRecord], query: &str) -> Vec<&'a UserRecord> {
    let Some(q) = normalize_query(query) else {
        return users.iter().collect();
    };
    users
        .iter()
        .filter(|u| u.username.to_lowercase().contains(&q))
        .collect()
}

fn role_rank(role: Role, order: RoleOrder) -> u8 {
    match (role, order) {
        (Role::Admin, RoleOrder::AdminFirst) | (Role::User, RoleOrder::UserFirst) => 0,
        _ => 1,
    }
}

/// Sort by role, then by username ignoring case.
pub fn sort_users(users: &mut [&UserRecord], order: RoleOrder) {
    users.sort_by(|a, b| {
        role_rank(a.role_type, order)
            .cmp(&role_rank(b.role_type, order))
            .then_with(|| compare_names(&a.username, &b.username))
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
