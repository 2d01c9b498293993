//! Summary tables behind the five report views.
//!
//! Every function here is a pure, single-pass transform over the order
//! records. Missing keys never form a group. A grouping with no groups
//! yields [`ViewError::NoData`] instead of a result.

use crate::error::ViewError;
use crate::models::{
    CategoryExtremes, MonthlyCount, OrderRecord, RankedEntry, Ranking, ViewKind,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

/// Years compared by the monthly trend.
pub const TREND_YEARS: [i32; 2] = [2017, 2018];

/// Length of each list in the category view.
pub const CATEGORY_EXTREMES_LEN: usize = 5;

/// Number of cities in the city view.
pub const TOP_CITIES: usize = 10;

/// Distinct orders per (year, month) for 2017 and 2018, ascending by
/// year then month. Months without orders are absent.
pub fn monthly_trend(records: &[OrderRecord]) -> Result<Vec<MonthlyCount>, ViewError> {
    let mut groups: BTreeMap<(i32, u32), HashSet<&str>> = BTreeMap::new();

    for record in records {
        let (Some(year), Some(month)) = (record.order_year, record.month_num) else {
            continue;
        };
        if !TREND_YEARS.contains(&year) {
            continue;
        }

        let orders = groups.entry((year, month)).or_default();
        if let Some(ref order_id) = record.order_id {
            orders.insert(order_id.as_str());
        }
    }

    if groups.is_empty() {
        return Err(ViewError::NoData {
            view: ViewKind::MonthlyTrend,
        });
    }

    Ok(groups
        .into_iter()
        .map(|((year, month), orders)| MonthlyCount {
            year,
            month,
            orders: orders.len(),
        })
        .collect())
}

/// Record counts per product category: the five highest (descending) and
/// the five lowest (ascending). Ties keep ascending category name order.
pub fn category_extremes(records: &[OrderRecord]) -> Result<CategoryExtremes, ViewError> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for record in records {
        if let Some(ref category) = record.product_category_name {
            *counts.entry(category.as_str()).or_default() += 1;
        }
    }

    if counts.is_empty() {
        return Err(ViewError::NoData {
            view: ViewKind::CategoryExtremes,
        });
    }

    let entries: Vec<RankedEntry<String>> = counts
        .into_iter()
        .map(|(category, count)| RankedEntry::new(category.to_string(), count))
        .collect();

    let mut top = entries.clone();
    top.sort_by_key(|entry| std::cmp::Reverse(entry.count));
    top.truncate(CATEGORY_EXTREMES_LEN);

    let mut bottom = entries;
    bottom.sort_by_key(|entry| entry.count);
    bottom.truncate(CATEGORY_EXTREMES_LEN);

    Ok(CategoryExtremes { top, bottom })
}

/// Distinct customers per state, descending. Ties keep ascending state
/// name order.
pub fn purchases_by_state(records: &[OrderRecord]) -> Result<Ranking<String>, ViewError> {
    let mut groups: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();

    for record in records {
        let Some(ref state) = record.customer_state else {
            continue;
        };

        let customers = groups.entry(state.as_str()).or_default();
        if let Some(ref customer_id) = record.customer_id {
            customers.insert(customer_id.as_str());
        }
    }

    let mut entries: Vec<RankedEntry<String>> = groups
        .into_iter()
        .map(|(state, customers)| RankedEntry::new(state.to_string(), customers.len()))
        .collect();
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.count));

    Ranking::new(entries).ok_or(ViewError::NoData {
        view: ViewKind::PurchasesByState,
    })
}

/// The ten cities with the most records, descending. Ties keep first
/// appearance order.
pub fn purchases_by_city(records: &[OrderRecord]) -> Result<Ranking<String>, ViewError> {
    let mut entries = value_counts(records.iter().filter_map(|r| r.customer_city.as_deref()));
    entries.truncate(TOP_CITIES);

    let entries = entries
        .into_iter()
        .map(|entry| RankedEntry::new(entry.key.to_string(), entry.count))
        .collect();

    Ranking::new(entries).ok_or(ViewError::NoData {
        view: ViewKind::PurchasesByCity,
    })
}

/// Records per review score, descending. Ties keep first appearance order.
pub fn satisfaction_distribution(records: &[OrderRecord]) -> Result<Ranking<u8>, ViewError> {
    let entries = value_counts(records.iter().filter_map(|r| r.review_score));

    Ranking::new(entries).ok_or(ViewError::NoData {
        view: ViewKind::Satisfaction,
    })
}

/// Occurrences of each value, descending by count. Equal counts keep the
/// order in which the values first appeared.
pub fn value_counts<K, I>(values: I) -> Vec<RankedEntry<K>>
where
    K: Eq + Hash + Copy,
    I: IntoIterator<Item = K>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut entries: Vec<RankedEntry<K>> = Vec::new();

    for value in values {
        match positions.get(&value) {
            Some(&index) => entries[index].count += 1,
            None => {
                positions.insert(value, entries.len());
                entries.push(RankedEntry::new(value, 1));
            }
        }
    }

    entries.sort_by_key(|entry| std::cmp::Reverse(entry.count));
    entries
}
