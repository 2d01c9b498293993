//! Inline SVG rendering of bar charts.

use crate::models::{Chart, ChartKind};

const WIDTH: f64 = 760.0;
const VERTICAL_HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 90.0;
const ROW_HEIGHT: f64 = 34.0;
const LABEL_WIDTH: f64 = 200.0;
const Y_TICKS: usize = 5;

/// Render a chart as a standalone `<svg>` element.
pub fn render_chart(chart: &Chart) -> String {
    if chart.categories.is_empty() || chart.series.iter().all(|s| s.bars.is_empty()) {
        return String::from("<svg></svg>");
    }

    match chart.kind {
        ChartKind::Bar | ChartKind::GroupedBar => render_vertical(chart),
        ChartKind::HorizontalBar => render_horizontal(chart),
    }
}

/// Largest bar value, at least 1 so scaling never divides by zero.
fn max_value(chart: &Chart) -> usize {
    chart
        .series
        .iter()
        .flat_map(|s| s.bars.iter().map(|b| b.value))
        .max()
        .unwrap_or(0)
        .max(1)
}

fn render_vertical(chart: &Chart) -> String {
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = VERTICAL_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_height;
    let max = max_value(chart) as f64;

    let group_width = plot_width / chart.categories.len() as f64;
    let series_count = chart.series.len().max(1);
    let bar_width = group_width * 0.8 / series_count as f64;

    let mut bars = String::new();
    for (si, series) in chart.series.iter().enumerate() {
        for bar in &series.bars {
            let Some(ci) = chart.categories.iter().position(|c| *c == bar.label) else {
                continue;
            };

            let height = bar.value as f64 / max * plot_height;
            let x = MARGIN_LEFT + ci as f64 * group_width + group_width * 0.1 + si as f64 * bar_width;
            let y = baseline - height;

            bars.push_str(&format!(
                r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>"##,
                x,
                y,
                bar_width * 0.95,
                height,
                escape(&bar.color),
                escape(&bar.label),
                bar.value
            ));
        }
    }

    // Long category axes get slanted labels.
    let rotate = chart.categories.len() > 8;
    let mut x_labels = String::new();
    for (ci, category) in chart.categories.iter().enumerate() {
        let x = MARGIN_LEFT + (ci as f64 + 0.5) * group_width;
        let y = baseline + 16.0;
        let transform = if rotate {
            format!(r#" transform="rotate(-45, {:.1}, {:.1})""#, x, y)
        } else {
            String::new()
        };
        let anchor = if rotate { "end" } else { "middle" };

        x_labels.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" text-anchor="{}" font-size="11" fill="#374151"{}>{}</text>"##,
            x,
            y,
            anchor,
            transform,
            escape(category)
        ));
    }

    let mut y_ticks = String::new();
    for i in 0..=Y_TICKS {
        let value = max * i as f64 / Y_TICKS as f64;
        let y = baseline - plot_height * i as f64 / Y_TICKS as f64;
        y_ticks.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#f3f4f6"/><text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10" fill="#6b7280">{:.0}</text>"##,
            MARGIN_LEFT,
            y,
            WIDTH - MARGIN_RIGHT,
            y,
            MARGIN_LEFT - 6.0,
            y + 3.0,
            value
        ));
    }

    let legend = render_legend(chart);
    let axis_labels = render_axis_labels(chart, VERTICAL_HEIGHT);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" style="background:white; border-radius:8px">
  <text x="{cx}" y="24" text-anchor="middle" font-size="15" font-weight="600" fill="#111827">{title}</text>
  {y_ticks}
  <line x1="{left}" y1="{base}" x2="{right}" y2="{base}" stroke="#9ca3af" stroke-width="1"/>
  <line x1="{left}" y1="{top}" x2="{left}" y2="{base}" stroke="#9ca3af" stroke-width="1"/>
  {bars}
  {x_labels}
  {axis_labels}
  {legend}
</svg>"##,
        w = WIDTH,
        h = VERTICAL_HEIGHT,
        cx = WIDTH / 2.0,
        title = escape(&chart.title),
        y_ticks = y_ticks,
        left = MARGIN_LEFT,
        right = WIDTH - MARGIN_RIGHT,
        top = MARGIN_TOP,
        base = baseline,
        bars = bars,
        x_labels = x_labels,
        axis_labels = axis_labels,
        legend = legend,
    )
}

fn render_horizontal(chart: &Chart) -> String {
    let rows = chart.categories.len() as f64;
    let height = MARGIN_TOP + rows * ROW_HEIGHT + 30.0;
    let plot_width = WIDTH - LABEL_WIDTH - 2.0 * MARGIN_RIGHT;
    let max = max_value(chart) as f64;

    // Mirrored panels put the labels on the right and grow bars leftwards.
    let (plot_left, label_x, anchor) = if chart.mirrored {
        (MARGIN_RIGHT, WIDTH - LABEL_WIDTH + 8.0, "start")
    } else {
        (LABEL_WIDTH, LABEL_WIDTH - 8.0, "end")
    };
    let plot_right = plot_left + plot_width;

    let mut bars = String::new();
    for series in &chart.series {
        for bar in &series.bars {
            let Some(ri) = chart.categories.iter().position(|c| *c == bar.label) else {
                continue;
            };

            let length = bar.value as f64 / max * plot_width;
            let y = MARGIN_TOP + ri as f64 * ROW_HEIGHT + ROW_HEIGHT * 0.15;
            let x = if chart.mirrored { plot_right - length } else { plot_left };

            bars.push_str(&format!(
                r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>"##,
                x,
                y,
                length,
                ROW_HEIGHT * 0.7,
                escape(&bar.color),
                escape(&bar.label),
                bar.value
            ));
        }
    }

    let mut labels = String::new();
    for (ri, category) in chart.categories.iter().enumerate() {
        let y = MARGIN_TOP + (ri as f64 + 0.5) * ROW_HEIGHT + 4.0;
        labels.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" text-anchor="{}" font-size="13" fill="#374151">{}</text>"##,
            label_x,
            y,
            anchor,
            escape(category)
        ));
    }

    let axis_x = if chart.mirrored { plot_right } else { plot_left };
    let axis_labels = render_axis_labels(chart, height);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" style="background:white; border-radius:8px">
  <text x="{cx}" y="26" text-anchor="middle" font-size="16" font-weight="600" fill="#111827">{title}</text>
  <line x1="{ax}" y1="{top}" x2="{ax}" y2="{bottom}" stroke="#9ca3af" stroke-width="1"/>
  {bars}
  {labels}
  {axis_labels}
</svg>"##,
        w = WIDTH,
        h = height,
        cx = WIDTH / 2.0,
        title = escape(&chart.title),
        ax = axis_x,
        top = MARGIN_TOP,
        bottom = MARGIN_TOP + rows * ROW_HEIGHT,
        bars = bars,
        labels = labels,
        axis_labels = axis_labels,
    )
}

fn render_axis_labels(chart: &Chart, height: f64) -> String {
    let mut out = String::new();

    if let Some(ref x_label) = chart.x_label {
        out.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" fill="#6b7280">{}</text>"##,
            WIDTH / 2.0,
            height - 8.0,
            escape(x_label)
        ));
    }

    if let Some(ref y_label) = chart.y_label {
        let cy = height / 2.0;
        out.push_str(&format!(
            r##"<text x="16" y="{:.1}" text-anchor="middle" font-size="12" fill="#6b7280" transform="rotate(-90, 16, {:.1})">{}</text>"##,
            cy,
            cy,
            escape(y_label)
        ));
    }

    out
}

fn render_legend(chart: &Chart) -> String {
    let Some(ref legend_title) = chart.legend_title else {
        return String::new();
    };

    let x = WIDTH - MARGIN_RIGHT - 90.0;
    let mut out = format!(
        r##"<text x="{:.1}" y="{:.1}" font-size="11" font-weight="600" fill="#374151">{}</text>"##,
        x,
        MARGIN_TOP - 4.0,
        escape(legend_title)
    );

    for (i, series) in chart.series.iter().enumerate() {
        let y = MARGIN_TOP + 6.0 + i as f64 * 16.0;
        out.push_str(&format!(
            r##"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}"/><text x="{:.1}" y="{:.1}" font-size="11" fill="#374151">{}</text>"##,
            x,
            y,
            escape(&series.color),
            x + 18.0,
            y + 10.0,
            escape(&series.name)
        ));
    }

    out
}

/// Escape text for XML/HTML content and attributes.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
