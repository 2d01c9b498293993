//! Report assembly and rendering.

pub mod chart;
pub mod generator;
pub mod svg;

pub use generator::{generate_html_report, generate_json_report, generate_markdown_report};

use crate::analysis::Analysis;
use crate::config::Config;
use crate::models::{Dataset, Report, ReportMetadata, Sidebar};
use chrono::Utc;

/// Assemble the report for one render.
pub fn build_report(
    dataset: &Dataset,
    analysis: &Analysis,
    config: &Config,
    duration_seconds: f64,
) -> Report {
    let sections = chart::build_sections(analysis, &config.palette);
    let views_rendered = sections.iter().filter(|s| s.is_available()).count();

    let metadata = ReportMetadata {
        title: config.report.title.clone(),
        dataset_path: dataset.source().display().to_string(),
        generated_at: Utc::now(),
        records: dataset.len(),
        views_rendered,
        views_unavailable: sections.len() - views_rendered,
        duration_seconds,
    };

    Report {
        metadata,
        sidebar: sidebar_from_config(config),
        sections,
    }
}

fn sidebar_from_config(config: &Config) -> Sidebar {
    let non_empty = |s: &str| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    Sidebar {
        title: config.report.sidebar_title.clone(),
        author: non_empty(&config.report.author),
        email: non_empty(&config.report.email),
        dicoding_id: non_empty(&config.report.dicoding_id),
        caption: non_empty(&config.report.caption),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::dataset::{read_dataset, LoadOptions};
    use crate::models::{SectionBody, ViewKind};
    use std::path::Path;

    fn sample_dataset() -> Dataset {
        read_dataset(
            include_str!("../../fixtures/orders_sample.csv").as_bytes(),
            Path::new("fixtures/orders_sample.csv"),
            &LoadOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_build_report_from_fixture() {
        let dataset = sample_dataset();
        let analysis = analyze(&dataset);
        let report = build_report(&dataset, &analysis, &Config::default(), 0.5);

        assert_eq!(report.sections.len(), 5);
        assert_eq!(report.metadata.views_rendered, 5);
        assert_eq!(report.metadata.views_unavailable, 0);
        assert_eq!(report.metadata.records, dataset.len());
        assert_eq!(report.metadata.dataset_path, "fixtures/orders_sample.csv");
        assert!(report.sidebar.author.is_none());

        let views: Vec<ViewKind> = report.sections.iter().map(|s| s.view).collect();
        assert_eq!(views, ViewKind::ALL.to_vec());
    }

    #[test]
    fn test_fixture_highlights() {
        let dataset = sample_dataset();
        let analysis = analyze(&dataset);
        let report = build_report(&dataset, &analysis, &Config::default(), 0.0);

        let highlight = |view: ViewKind| match &report.sections[view_index(view)].body {
            SectionBody::Charts { charts } => charts[0].highlight.clone(),
            SectionBody::Unavailable { .. } => None,
        };

        assert_eq!(highlight(ViewKind::PurchasesByState).as_deref(), Some("SP"));
        assert_eq!(highlight(ViewKind::PurchasesByCity).as_deref(), Some("sao paulo"));
        assert_eq!(highlight(ViewKind::Satisfaction).as_deref(), Some("5"));
        assert_eq!(highlight(ViewKind::CategoryExtremes).as_deref(), Some("cama_mesa_banho"));
    }

    fn view_index(view: ViewKind) -> usize {
        ViewKind::ALL.iter().position(|v| *v == view).unwrap_or(0)
    }

    #[test]
    fn test_sidebar_from_config() {
        let mut config = Config::default();
        config.report.author = "  Rizky  ".to_string();
        config.report.caption = "Copyright 2024".to_string();

        let sidebar = sidebar_from_config(&config);

        assert_eq!(sidebar.title, "E-Commerce Public Data Analysis");
        assert_eq!(sidebar.author.as_deref(), Some("Rizky"));
        assert!(sidebar.email.is_none());
        assert_eq!(sidebar.caption.as_deref(), Some("Copyright 2024"));
    }

    #[test]
    fn test_empty_dataset_still_reports() {
        let dataset = Dataset::new("empty.csv", Vec::new());
        let analysis = analyze(&dataset);
        let report = build_report(&dataset, &analysis, &Config::default(), 0.0);

        assert_eq!(report.metadata.views_rendered, 0);
        assert_eq!(report.metadata.views_unavailable, 5);
        assert!(generate_html_report(&report).contains("Insufficient data for this view"));
    }
}
