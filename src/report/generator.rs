//! Report generation.
//!
//! This module renders a [`Report`] as a self-contained HTML page,
//! as Markdown, or as JSON.

use super::svg::{escape, render_chart};
use crate::models::{Chart, ChartKind, Report, ReportMetadata, Section, SectionBody, Sidebar};
use anyhow::Result;

/// Generate the HTML page with one inline SVG chart per view.
pub fn generate_html_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    output.push_str(&format!(
        "<title>{}</title>\n",
        escape(&report.metadata.title)
    ));
    output.push_str("<style>\n");
    output.push_str(inline_css());
    output.push_str("</style>\n</head>\n<body>\n");

    output.push_str(&generate_sidebar(&report.sidebar));

    output.push_str("<main>\n");
    output.push_str(&format!("<h1>{}</h1>\n", escape(&report.metadata.title)));
    output.push_str(&generate_html_metadata(&report.metadata));

    for section in &report.sections {
        output.push_str(&generate_html_section(section));
    }

    output.push_str("</main>\n</body>\n</html>\n");

    output
}

fn inline_css() -> &'static str {
    r#"body { margin: 0; display: flex; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; color: #111827; background: #f9fafb; }
aside { width: 260px; min-height: 100vh; padding: 2rem 1.5rem; background: #f0f2f6; box-sizing: border-box; }
aside h2 { font-size: 1.2rem; margin-top: 0; }
aside p { margin: 0.25rem 0; }
aside .caption { margin-top: 1.5rem; font-size: 0.8rem; color: #6b7280; }
main { flex: 1; max-width: 960px; padding: 2rem 3rem; }
h1 { font-size: 2rem; }
h2 { font-size: 1.4rem; margin-top: 2.5rem; }
h3 { font-size: 1.1rem; color: #374151; }
.meta { color: #6b7280; font-size: 0.85rem; }
.chart { margin: 1rem 0; }
.panels { display: flex; flex-wrap: wrap; gap: 1rem; }
.unavailable { padding: 1rem; border-left: 4px solid #d97706; background: #fffbeb; }
"#
}

/// Generate the sidebar with the author details.
fn generate_sidebar(sidebar: &Sidebar) -> String {
    let mut section = String::new();

    section.push_str("<aside>\n");
    section.push_str(&format!("<h2>{}</h2>\n", escape(&sidebar.title)));

    let lines = [
        ("Name", &sidebar.author),
        ("Email", &sidebar.email),
        ("ID Dicoding", &sidebar.dicoding_id),
    ];
    for (label, value) in lines {
        if let Some(value) = value {
            section.push_str(&format!(
                "<p><strong>{}:</strong> {}</p>\n",
                label,
                escape(value)
            ));
        }
    }

    if let Some(ref caption) = sidebar.caption {
        section.push_str(&format!("<p class=\"caption\">{}</p>\n", escape(caption)));
    }

    section.push_str("</aside>\n");

    section
}

fn generate_html_metadata(metadata: &ReportMetadata) -> String {
    format!(
        "<p class=\"meta\">Dataset <code>{}</code> &middot; {} records &middot; generated {}</p>\n",
        escape(&metadata.dataset_path),
        metadata.records,
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Generate one view: subheader, then the charts or a notice.
fn generate_html_section(section: &Section) -> String {
    let mut html = String::new();

    html.push_str(&format!("<section id=\"{}\">\n", anchor(section)));
    html.push_str(&format!("<h2>{}</h2>\n", escape(&section.question)));

    match &section.body {
        SectionBody::Charts { charts } => {
            if let Some(ref heading) = section.heading {
                html.push_str(&format!("<h3>{}</h3>\n", escape(heading)));
            }

            let panels = charts.len() > 1;
            if panels {
                html.push_str("<div class=\"panels\">\n");
            }
            for chart in charts {
                html.push_str("<div class=\"chart\">\n");
                html.push_str(&render_chart(chart));
                html.push_str("\n</div>\n");
            }
            if panels {
                html.push_str("</div>\n");
            }
        }
        SectionBody::Unavailable { .. } => {
            html.push_str("<p class=\"unavailable\">Insufficient data for this view</p>\n");
        }
    }

    html.push_str("</section>\n");

    html
}

fn anchor(section: &Section) -> String {
    serde_json::to_value(section.view)
        .ok()
        .and_then(|v| v.as_str().map(|s| s.replace('_', "-")))
        .unwrap_or_else(|| "view".to_string())
}

/// Generate a Markdown report with one table per chart.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.metadata.title));
    output.push_str(&generate_markdown_metadata(&report.metadata, &report.sidebar));

    for section in &report.sections {
        output.push_str(&generate_markdown_section(section));
    }

    if let Some(ref caption) = report.sidebar.caption {
        output.push_str("---\n\n");
        output.push_str(&format!("*{}*\n", caption));
    }

    output
}

fn generate_markdown_metadata(metadata: &ReportMetadata, sidebar: &Sidebar) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    if let Some(ref author) = sidebar.author {
        section.push_str(&format!("- **Author:** {}\n", author));
    }
    if let Some(ref email) = sidebar.email {
        section.push_str(&format!("- **Email:** {}\n", email));
    }
    if let Some(ref id) = sidebar.dicoding_id {
        section.push_str(&format!("- **ID Dicoding:** {}\n", id));
    }
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset_path));
    section.push_str(&format!("- **Records:** {}\n", metadata.records));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Views:** {} rendered, {} without data\n",
        metadata.views_rendered, metadata.views_unavailable
    ));
    section.push('\n');

    section
}

fn generate_markdown_section(section: &Section) -> String {
    let mut md = String::new();

    md.push_str(&format!("## {}\n\n", section.question));

    match &section.body {
        SectionBody::Charts { charts } => {
            if let Some(ref heading) = section.heading {
                md.push_str(&format!("### {}\n\n", heading));
            }
            for chart in charts {
                md.push_str(&generate_markdown_table(chart));
            }
        }
        SectionBody::Unavailable { .. } => {
            md.push_str("> Insufficient data for this view\n\n");
        }
    }

    md
}

/// One row per category. Grouped charts get one column per series;
/// the highlighted label is bold.
fn generate_markdown_table(chart: &Chart) -> String {
    let mut table = String::new();

    table.push_str(&format!("#### {}\n\n", chart.title));

    let label_header = chart.x_label.as_deref().unwrap_or("Category");
    if chart.kind == ChartKind::GroupedBar {
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        let names: Vec<String> = names.into_iter().map(markdown_cell).collect();
        table.push_str(&format!(
            "| {} | {} |\n",
            markdown_cell(label_header),
            names.join(" | ")
        ));
        table.push_str(&format!("|:---|{}\n", ":---:|".repeat(names.len())));

        for category in &chart.categories {
            let cells: Vec<String> = chart
                .series
                .iter()
                .map(|s| {
                    s.bars
                        .iter()
                        .find(|b| &b.label == category)
                        .map(|b| b.value.to_string())
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            table.push_str(&format!(
                "| {} | {} |\n",
                markdown_cell(category),
                cells.join(" | ")
            ));
        }
    } else {
        let value_header = chart.y_label.as_deref().unwrap_or("Count");
        table.push_str(&format!(
            "| {} | {} |\n",
            markdown_cell(label_header),
            markdown_cell(value_header)
        ));
        table.push_str("|:---|:---:|\n");

        for bar in chart.series.iter().flat_map(|s| &s.bars) {
            let label = markdown_cell(&bar.label);
            if chart.highlight.as_deref() == Some(bar.label.as_str()) {
                table.push_str(&format!("| **{}** | **{}** |\n", label, bar.value));
            } else {
                table.push_str(&format!("| {} | {} |\n", label, bar.value));
            }
        }
    }
    table.push('\n');

    table
}

/// Escape pipes so a label stays inside its table cell.
fn markdown_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
