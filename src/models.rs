//! Data models for the sales report.
//!
//! This module contains the order records read from the dataset, the
//! summary tables derived from them, and the report structures handed
//! to the renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One row of the dataset: a single product line within a purchase.
///
/// Blank cells are kept as `None` and never form a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_id: Option<String>,
    pub order_year: Option<i32>,
    pub month_num: Option<u32>,
    pub product_category_name: Option<String>,
    pub customer_id: Option<String>,
    pub customer_state: Option<String>,
    pub customer_city: Option<String>,
    pub review_score: Option<u8>,
}

/// The loaded dataset. Read-only for the lifetime of a render.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    records: Vec<OrderRecord>,
}

impl Dataset {
    pub fn new(source: impl Into<PathBuf>, records: Vec<OrderRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The five fixed views of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    MonthlyTrend,
    CategoryExtremes,
    PurchasesByState,
    PurchasesByCity,
    Satisfaction,
}

impl ViewKind {
    /// All views in report order.
    pub const ALL: [ViewKind; 5] = [
        ViewKind::MonthlyTrend,
        ViewKind::CategoryExtremes,
        ViewKind::PurchasesByState,
        ViewKind::PurchasesByCity,
        ViewKind::Satisfaction,
    ];
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::MonthlyTrend => write!(f, "monthly trend"),
            ViewKind::CategoryExtremes => write!(f, "category"),
            ViewKind::PurchasesByState => write!(f, "state"),
            ViewKind::PurchasesByCity => write!(f, "city"),
            ViewKind::Satisfaction => write!(f, "satisfaction"),
        }
    }
}

/// Distinct orders in one (year, month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    pub year: i32,
    /// 1-indexed month number.
    pub month: u32,
    pub orders: usize,
}

/// A grouping key with its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry<K> {
    pub key: K,
    pub count: usize,
}

impl<K> RankedEntry<K> {
    pub fn new(key: K, count: usize) -> Self {
        Self { key, count }
    }
}

/// A non-empty, ordered list of counts.
///
/// The only constructor rejects an empty list, so [`Ranking::most_common`]
/// always has an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking<K> {
    entries: Vec<RankedEntry<K>>,
}

impl<K> Ranking<K> {
    /// Wrap already-ordered entries. Returns `None` when empty.
    pub fn new(entries: Vec<RankedEntry<K>>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    pub fn entries(&self) -> &[RankedEntry<K>] {
        &self.entries
    }

    #[allow(dead_code)] // Convenience for callers inspecting a ranking
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The first entry holding the maximum count.
    pub fn most_common(&self) -> &RankedEntry<K> {
        let mut best = &self.entries[0];
        for entry in &self.entries[1..] {
            if entry.count > best.count {
                best = entry;
            }
        }
        best
    }
}

/// Best and worst selling product categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryExtremes {
    /// Highest record counts, descending.
    pub top: Vec<RankedEntry<String>>,
    /// Lowest record counts, ascending.
    pub bottom: Vec<RankedEntry<String>>,
}

/// Chart layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Vertical bars, one series.
    Bar,
    /// Vertical bars, one group per category and one bar per series.
    GroupedBar,
    /// Horizontal bars, one series.
    HorizontalBar,
}

/// A single bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: usize,
    pub color: String,
}

/// A named series of bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub bars: Vec<Bar>,
}

/// Everything a renderer needs to draw one bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    /// Category axis labels in display order.
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    /// Title of the series legend, if one is drawn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_title: Option<String>,
    /// Label of the emphasised bar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    /// Bars grow right to left with labels on the right.
    #[serde(default)]
    pub mirrored: bool,
}

/// Content of a report section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionBody {
    Charts { charts: Vec<Chart> },
    Unavailable { reason: String },
}

/// One view of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub view: ViewKind,
    /// Question the view answers, shown as the subheader.
    pub question: String,
    /// Title spanning all charts of the section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub body: SectionBody,
}

impl Section {
    pub fn is_available(&self) -> bool {
        matches!(self.body, SectionBody::Charts { .. })
    }
}

/// Author details shown beside the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sidebar {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dicoding_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Metadata about a render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub title: String,
    pub dataset_path: String,
    pub generated_at: DateTime<Utc>,
    pub records: usize,
    pub views_rendered: usize,
    pub views_unavailable: usize,
    pub duration_seconds: f64,
}

/// The complete report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub sidebar: Sidebar,
    pub sections: Vec<Section>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_rejects_empty() {
        assert!(Ranking::<String>::new(Vec::new()).is_none());
    }

    #[test]
    fn test_ranking_most_common_is_first_maximum() {
        let ranking = Ranking::new(vec![
            RankedEntry::new("RJ", 3),
            RankedEntry::new("SP", 7),
            RankedEntry::new("MG", 7),
        ])
        .unwrap();

        assert_eq!(ranking.most_common().key, "SP");
        assert_eq!(ranking.most_common().count, 7);
        assert_eq!(ranking.len(), 3);
    }

    #[test]
    fn test_view_kind_order() {
        assert_eq!(ViewKind::ALL[0], ViewKind::MonthlyTrend);
        assert_eq!(ViewKind::ALL[4], ViewKind::Satisfaction);
        assert_eq!(ViewKind::PurchasesByState.to_string(), "state");
    }

    #[test]
    fn test_section_availability() {
        let section = Section {
            view: ViewKind::Satisfaction,
            question: "q".to_string(),
            heading: None,
            body: SectionBody::Unavailable {
                reason: "none".to_string(),
            },
        };
        assert!(!section.is_available());
    }

    #[test]
    fn test_section_body_serializes_with_status_tag() {
        let body = SectionBody::Unavailable {
            reason: "insufficient data".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"status\":\"unavailable\""));
    }
}
