//! Aggregation engine.
//!
//! Runs the five view aggregations over a loaded dataset. Each view is
//! computed on its own, so one view without data does not stop the rest.

pub mod aggregator;

pub use aggregator::*;

use crate::error::ViewError;
use crate::models::{CategoryExtremes, Dataset, MonthlyCount, Ranking, ViewKind};
use tracing::{debug, warn};

/// Outcome of one view.
pub type ViewOutcome<T> = Result<T, ViewError>;

/// Summaries for all five views of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub monthly_trend: ViewOutcome<Vec<MonthlyCount>>,
    pub category_extremes: ViewOutcome<CategoryExtremes>,
    pub by_state: ViewOutcome<Ranking<String>>,
    pub by_city: ViewOutcome<Ranking<String>>,
    pub satisfaction: ViewOutcome<Ranking<u8>>,
}

impl Analysis {
    /// Views that produced no summary, in report order.
    pub fn unavailable_views(&self) -> Vec<ViewKind> {
        let failures = [
            self.monthly_trend.as_ref().err(),
            self.category_extremes.as_ref().err(),
            self.by_state.as_ref().err(),
            self.by_city.as_ref().err(),
            self.satisfaction.as_ref().err(),
        ];

        ViewKind::ALL
            .into_iter()
            .zip(failures)
            .filter_map(|(view, err)| err.map(|_| view))
            .collect()
    }
}

/// Compute every view from the dataset.
pub fn analyze(dataset: &Dataset) -> Analysis {
    let records = dataset.records();
    debug!("Aggregating {} records", records.len());

    let analysis = Analysis {
        monthly_trend: monthly_trend(records),
        category_extremes: category_extremes(records),
        by_state: purchases_by_state(records),
        by_city: purchases_by_city(records),
        satisfaction: satisfaction_distribution(records),
    };

    for view in analysis.unavailable_views() {
        warn!("Insufficient data for the {} view", view);
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderRecord;

    fn record(state: &str, city: &str, score: u8) -> OrderRecord {
        OrderRecord {
            order_id: Some(format!("{}-{}", state, city)),
            order_year: Some(2017),
            month_num: Some(6),
            product_category_name: Some("toys".to_string()),
            customer_id: Some(format!("cust-{}", city)),
            customer_state: Some(state.to_string()),
            customer_city: Some(city.to_string()),
            review_score: Some(score),
        }
    }

    #[test]
    fn test_analyze_all_views() {
        let dataset = Dataset::new(
            "memory.csv",
            vec![record("SP", "campinas", 5), record("RJ", "niteroi", 4)],
        );

        let analysis = analyze(&dataset);

        assert!(analysis.unavailable_views().is_empty());
        assert_eq!(analysis.monthly_trend.as_ref().unwrap()[0].orders, 2);
        assert_eq!(analysis.by_city.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_view_does_not_block_others() {
        let mut only_reviews = record("SP", "santos", 3);
        only_reviews.customer_city = None;
        let dataset = Dataset::new("memory.csv", vec![only_reviews]);

        let analysis = analyze(&dataset);

        assert_eq!(analysis.unavailable_views(), vec![ViewKind::PurchasesByCity]);
        assert_eq!(analysis.satisfaction.as_ref().unwrap().most_common().key, 3);
        assert!(analysis.by_state.is_ok());
    }

    #[test]
    fn test_fixture_summaries() {
        let dataset = crate::dataset::read_dataset(
            include_str!("../../fixtures/orders_sample.csv").as_bytes(),
            std::path::Path::new("orders_sample.csv"),
            &crate::dataset::LoadOptions::default(),
        )
        .unwrap();

        let analysis = analyze(&dataset);

        let trend = analysis.monthly_trend.unwrap();
        assert_eq!(trend.len(), 24);
        assert_eq!(trend[0], MonthlyCount { year: 2017, month: 1, orders: 2 });
        assert_eq!(trend[23], MonthlyCount { year: 2018, month: 12, orders: 1 });

        let extremes = analysis.category_extremes.unwrap();
        assert_eq!(extremes.top[0].key, "cama_mesa_banho");
        assert_eq!(extremes.top[0].count, 9);
        let bottom: Vec<_> = extremes.bottom.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            bottom,
            vec!["automotivo", "perfumaria", "brinquedos", "telefonia", "relogios_presentes"]
        );

        let states = analysis.by_state.unwrap();
        assert_eq!(states.most_common(), &crate::models::RankedEntry::new("SP".to_string(), 18));

        let cities = analysis.by_city.unwrap();
        assert_eq!(cities.len(), 9);
        assert_eq!(cities.most_common().count, 14);

        let scores = analysis.satisfaction.unwrap();
        let keys: Vec<u8> = scores.entries().iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![5, 4, 1, 3, 2]);
    }

    #[test]
    fn test_empty_dataset() {
        let analysis = analyze(&Dataset::new("empty.csv", Vec::new()));
        assert_eq!(analysis.unavailable_views(), ViewKind::ALL.to_vec());
    }
}
