//! Chart descriptions for each view.
//!
//! This is the only place that knows about titles, axis labels, colours
//! and which bar gets emphasised. The aggregation engine hands over raw
//! summaries and this module turns them into [`Chart`]s.

use crate::analysis::{Analysis, ViewOutcome, TREND_YEARS};
use crate::config::PaletteConfig;
use crate::models::{
    Bar, CategoryExtremes, Chart, ChartKind, MonthlyCount, RankedEntry, Ranking, Section,
    SectionBody, Series, ViewKind,
};
use std::fmt::Display;
use tracing::debug;

/// Month tick labels, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label for a 1-indexed month number.
pub fn month_label(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_LABELS.get(index as usize))
        .copied()
}

/// The question a view answers.
pub fn question(view: ViewKind) -> &'static str {
    match view {
        ViewKind::MonthlyTrend => "How is the sales trend in 2017 and 2018?",
        ViewKind::CategoryExtremes => "What product categories have the highest and lowest sales?",
        ViewKind::PurchasesByState => "Which states recorded the most purchases?",
        ViewKind::PurchasesByCity => "Which city has the highest number of customers by purchase?",
        ViewKind::Satisfaction => "How is the customer satisfaction level?",
    }
}

/// Build one section per view, in report order.
pub fn build_sections(analysis: &Analysis, palette: &PaletteConfig) -> Vec<Section> {
    vec![
        section(
            ViewKind::MonthlyTrend,
            None,
            &analysis.monthly_trend,
            |trend| vec![monthly_trend_chart(trend, palette)],
        ),
        section(
            ViewKind::CategoryExtremes,
            Some("Best and lowest selling by category"),
            &analysis.category_extremes,
            |extremes| category_charts(extremes, palette),
        ),
        section(
            ViewKind::PurchasesByState,
            None,
            &analysis.by_state,
            |ranking| {
                vec![ranking_chart(
                    ranking,
                    "Number of Customers from Each State",
                    "State",
                    "Number of Customers",
                    palette,
                )]
            },
        ),
        section(
            ViewKind::PurchasesByCity,
            None,
            &analysis.by_city,
            |ranking| {
                vec![ranking_chart(
                    ranking,
                    "Number of Customers from Each City",
                    "City",
                    "Number of Customers",
                    palette,
                )]
            },
        ),
        section(
            ViewKind::Satisfaction,
            None,
            &analysis.satisfaction,
            |ranking| {
                vec![ranking_chart(
                    ranking,
                    "Evaluation of satisfaction level based on rating",
                    "Rating",
                    "Count",
                    palette,
                )]
            },
        ),
    ]
}

fn section<T>(
    view: ViewKind,
    heading: Option<&str>,
    outcome: &ViewOutcome<T>,
    charts: impl FnOnce(&T) -> Vec<Chart>,
) -> Section {
    let body = match outcome {
        Ok(summary) => SectionBody::Charts {
            charts: charts(summary),
        },
        Err(err) => SectionBody::Unavailable {
            reason: err.to_string(),
        },
    };

    Section {
        view,
        question: question(view).to_string(),
        heading: heading.map(String::from),
        body,
    }
}

/// Colour for a bar depending on whether it is the emphasised one.
pub fn bar_color(highlighted: bool, palette: &PaletteConfig) -> String {
    if highlighted {
        palette.highlight.clone()
    } else {
        palette.muted.clone()
    }
}

/// Grouped bars: one group per month, one bar per year.
pub fn monthly_trend_chart(trend: &[MonthlyCount], palette: &PaletteConfig) -> Chart {
    let series = TREND_YEARS
        .iter()
        .enumerate()
        .map(|(i, &year)| {
            let color = palette
                .years
                .get(i % palette.years.len().max(1))
                .cloned()
                .unwrap_or_else(|| palette.highlight.clone());

            let bars = trend
                .iter()
                .filter(|m| m.year == year)
                .filter_map(|m| match month_label(m.month) {
                    Some(label) => Some(Bar {
                        label: label.to_string(),
                        value: m.orders,
                        color: color.clone(),
                    }),
                    None => {
                        debug!("Skipping month {} of {}: not a calendar month", m.month, year);
                        None
                    }
                })
                .collect();

            Series {
                name: year.to_string(),
                color,
                bars,
            }
        })
        .collect();

    Chart {
        kind: ChartKind::GroupedBar,
        title: "Monthly Transaction Trends for the Years 2017 and 2018".to_string(),
        x_label: Some("Month".to_string()),
        y_label: Some("Number of Transactions".to_string()),
        categories: MONTH_LABELS.iter().map(|m| m.to_string()).collect(),
        series,
        legend_title: Some("Year".to_string()),
        highlight: None,
        mirrored: false,
    }
}

/// Two horizontal panels. The first bar of each is emphasised and the
/// lowest-selling panel is mirrored.
pub fn category_charts(extremes: &CategoryExtremes, palette: &PaletteConfig) -> Vec<Chart> {
    vec![
        category_panel("Best-selling category", &extremes.top, false, palette),
        category_panel("Lowest-selling category", &extremes.bottom, true, palette),
    ]
}

fn category_panel(
    title: &str,
    entries: &[RankedEntry<String>],
    mirrored: bool,
    palette: &PaletteConfig,
) -> Chart {
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| Bar {
            label: entry.key.clone(),
            value: entry.count,
            color: bar_color(i == 0, palette),
        })
        .collect();

    Chart {
        kind: ChartKind::HorizontalBar,
        title: title.to_string(),
        x_label: None,
        y_label: None,
        categories: bars.iter().map(|b| b.label.clone()).collect(),
        highlight: bars.first().map(|b| b.label.clone()),
        series: vec![Series {
            name: "products".to_string(),
            color: palette.muted.clone(),
            bars,
        }],
        legend_title: None,
        mirrored,
    }
}

/// Vertical bars with the most common entry emphasised.
pub fn ranking_chart<K: Display>(
    ranking: &Ranking<K>,
    title: &str,
    x_label: &str,
    y_label: &str,
    palette: &PaletteConfig,
) -> Chart {
    let highlight = ranking.most_common().key.to_string();

    let bars: Vec<Bar> = ranking
        .entries()
        .iter()
        .map(|entry| {
            let label = entry.key.to_string();
            let color = bar_color(label == highlight, palette);
            Bar {
                label,
                value: entry.count,
                color,
            }
        })
        .collect();

    Chart {
        kind: ChartKind::Bar,
        title: title.to_string(),
        x_label: Some(x_label.to_string()),
        y_label: Some(y_label.to_string()),
        categories: bars.iter().map(|b| b.label.clone()).collect(),
        series: vec![Series {
            name: y_label.to_string(),
            color: palette.muted.clone(),
            bars,
        }],
        legend_title: None,
        highlight: Some(highlight),
        mirrored: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewError;

    fn palette() -> PaletteConfig {
        PaletteConfig::default()
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(1), Some("Jan"));
        assert_eq!(month_label(12), Some("Dec"));
        assert_eq!(month_label(0), None);
        assert_eq!(month_label(13), None);
    }

    #[test]
    fn test_ranking_chart_highlights_most_common() {
        let ranking = Ranking::new(vec![
            RankedEntry::new(5u8, 10),
            RankedEntry::new(4u8, 6),
            RankedEntry::new(1u8, 2),
        ])
        .unwrap();

        let chart = ranking_chart(&ranking, "Ratings", "Rating", "Count", &palette());

        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.highlight.as_deref(), Some("5"));
        assert_eq!(chart.categories, vec!["5", "4", "1"]);
        let colors: Vec<_> = chart.series[0].bars.iter().map(|b| b.color.as_str()).collect();
        assert_eq!(colors, vec!["#102cd4", "#D3D3D3", "#D3D3D3"]);
    }

    #[test]
    fn test_monthly_trend_chart_series_per_year() {
        let trend = vec![
            MonthlyCount { year: 2017, month: 1, orders: 800 },
            MonthlyCount { year: 2017, month: 2, orders: 1700 },
            MonthlyCount { year: 2018, month: 1, orders: 7200 },
        ];

        let chart = monthly_trend_chart(&trend, &palette());

        assert_eq!(chart.kind, ChartKind::GroupedBar);
        assert_eq!(chart.categories.len(), 12);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, "2017");
        assert_eq!(chart.series[0].color, "#0DA6D1");
        assert_eq!(chart.series[0].bars.len(), 2);
        assert_eq!(chart.series[1].bars[0].label, "Jan");
        assert_eq!(chart.series[1].bars[0].value, 7200);
        assert_eq!(chart.legend_title.as_deref(), Some("Year"));
        assert!(chart.highlight.is_none());
    }

    #[test]
    fn test_monthly_trend_chart_with_empty_year_palette() {
        let palette = PaletteConfig {
            years: Vec::new(),
            ..PaletteConfig::default()
        };
        let trend = vec![MonthlyCount { year: 2018, month: 3, orders: 1 }];

        let chart = monthly_trend_chart(&trend, &palette);
        assert_eq!(chart.series[1].color, "#102cd4");
    }

    #[test]
    fn test_category_charts_first_bar_highlighted() {
        let extremes = CategoryExtremes {
            top: vec![RankedEntry::new("bed".to_string(), 9), RankedEntry::new("toys".to_string(), 4)],
            bottom: vec![RankedEntry::new("cds".to_string(), 1), RankedEntry::new("toys".to_string(), 4)],
        };

        let charts = category_charts(&extremes, &palette());

        assert_eq!(charts.len(), 2);
        assert!(!charts[0].mirrored);
        assert!(charts[1].mirrored);
        assert_eq!(charts[0].highlight.as_deref(), Some("bed"));
        assert_eq!(charts[1].highlight.as_deref(), Some("cds"));
        assert_eq!(charts[1].series[0].bars[0].color, "#102cd4");
        assert_eq!(charts[1].series[0].bars[1].color, "#D3D3D3");
    }

    #[test]
    fn test_build_sections_marks_unavailable_views() {
        let no_data = |view| ViewError::NoData { view };
        let analysis = Analysis {
            monthly_trend: Err(no_data(ViewKind::MonthlyTrend)),
            category_extremes: Err(no_data(ViewKind::CategoryExtremes)),
            by_state: Ranking::new(vec![RankedEntry::new("SP".to_string(), 3)])
                .ok_or(no_data(ViewKind::PurchasesByState)),
            by_city: Err(no_data(ViewKind::PurchasesByCity)),
            satisfaction: Err(no_data(ViewKind::Satisfaction)),
        };

        let sections = build_sections(&analysis, &palette());

        assert_eq!(sections.len(), 5);
        assert_eq!(sections[2].view, ViewKind::PurchasesByState);
        assert!(sections[2].is_available());
        assert_eq!(
            sections[2].question,
            "Which states recorded the most purchases?"
        );
        assert!(!sections[0].is_available());
        assert_eq!(
            sections[1].heading.as_deref(),
            Some("Best and lowest selling by category")
        );
        match &sections[3].body {
            SectionBody::Unavailable { reason } => {
                assert_eq!(reason, "insufficient data for the city view")
            }
            other => panic!("expected unavailable, got {:?}", other),
        }
    }
}
