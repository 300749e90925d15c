//! Gantt charts as SVG.

use std::fmt::Write;

use run_records::gantt::{GanttChart, ACTION_LABELS};

const LEFT_MARGIN: f64 = 130.0;
const TOP_MARGIN: f64 = 40.0;
const PLOT_WIDTH: f64 = 800.0;
const ROW_HEIGHT: f64 = 24.0;
const BAR_HEIGHT: f64 = 16.0;
const LEGEND_HEIGHT: f64 = 40.0;

pub fn action_color(label: &str) -> &'static str {
    match label {
        "Drive" => "blue",
        "PickUp" => "green",
        "Drop" => "red",
        "Refuel" => "violet",
        _ => "black",
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// One row per object, one bar per action, time on the horizontal axis.
pub fn render_svg(chart: &GanttChart) -> Result<String, std::fmt::Error> {
    let span = if chart.time_max > chart.time_min {
        chart.time_max - chart.time_min
    } else {
        1.0
    };
    let x = |t: f64| LEFT_MARGIN + (t - chart.time_min) / span * PLOT_WIDTH;
    let rows_height = ROW_HEIGHT * chart.objects.len() as f64;
    let width = LEFT_MARGIN + PLOT_WIDTH + 20.0;
    let height = TOP_MARGIN + rows_height + 20.0 + LEGEND_HEIGHT;

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" font-family="sans-serif" font-size="12">"#,
        width, height
    )?;
    writeln!(svg, "<title>{}</title>", escape(&chart.title))?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="20" text-anchor="middle" font-size="14">{}</text>"#,
        LEFT_MARGIN + PLOT_WIDTH / 2.0,
        escape(&chart.title)
    )?;

    for (idx, object) in chart.objects.iter().enumerate() {
        let y = TOP_MARGIN + ROW_HEIGHT * idx as f64;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            LEFT_MARGIN - 6.0,
            y + ROW_HEIGHT / 2.0 + 4.0,
            escape(object)
        )?;
        for bar in chart.bars.iter().filter(|b| &b.object == object) {
            let x0 = x(bar.start);
            writeln!(
                svg,
                r#"<rect x="{:.2}" y="{:.1}" width="{:.2}" height="{:.1}" fill="{}" stroke="black" stroke-width="0.5"><title>{} {:.3}-{:.3}</title></rect>"#,
                x0,
                y + (ROW_HEIGHT - BAR_HEIGHT) / 2.0,
                (x(bar.end) - x0).max(1.0),
                BAR_HEIGHT,
                action_color(&bar.label),
                escape(&bar.label),
                bar.start,
                bar.end
            )?;
        }
    }

    // Time axis
    let axis_y = TOP_MARGIN + rows_height;
    writeln!(
        svg,
        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        LEFT_MARGIN,
        axis_y,
        LEFT_MARGIN + PLOT_WIDTH,
        axis_y
    )?;
    for (t, anchor) in [(chart.time_min, "start"), (chart.time_max, "end")] {
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="{}">{:.3}</text>"#,
            x(t),
            axis_y + 14.0,
            anchor,
            t
        )?;
    }

    // Legend, only with the actions present in the chart.
    let mut labels: Vec<&str> = ACTION_LABELS.iter().map(|(_, l)| *l).collect();
    for bar in chart.bars.iter() {
        if !labels.contains(&bar.label.as_str()) {
            labels.push(bar.label.as_str());
        }
    }
    let legend_y = axis_y + 20.0 + LEGEND_HEIGHT / 2.0;
    let mut legend_x = LEFT_MARGIN;
    for label in labels
        .into_iter()
        .filter(|l| chart.bars.iter().any(|b| b.label == *l))
    {
        writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}"/>"#,
            legend_x,
            legend_y - 10.0,
            action_color(label)
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}">{}</text>"#,
            legend_x + 16.0,
            legend_y,
            escape(label)
        )?;
        legend_x += 100.0;
    }
    write!(svg, "</svg>")?;
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use run_records::gantt::GanttBar;

    fn bar(object: &str, label: &str, start: f64, end: f64) -> GanttBar {
        GanttBar {
            object: object.to_string(),
            label: label.to_string(),
            start,
            end,
        }
    }

    fn chart() -> GanttChart {
        GanttChart {
            name: "gantt_tfd_p01".to_string(),
            title: "tfd: p01 (23.00)".to_string(),
            objects: vec!["truck-1".to_string(), "package-1".to_string()],
            bars: vec![
                bar("truck-1", "Drive", 0.0, 20.0),
                bar("truck-1", "PickUp", 20.0, 21.0),
                bar("package-1", "PickUp", 20.0, 21.0),
                bar("truck-1", "unload<x>", 21.0, 22.0),
            ],
            time_min: 0.0,
            time_max: 22.0,
        }
    }

    #[test]
    fn colors() {
        assert_eq!(action_color("Drive"), "blue");
        assert_eq!(action_color("PickUp"), "green");
        assert_eq!(action_color("Drop"), "red");
        assert_eq!(action_color("Refuel"), "violet");
        assert_eq!(action_color("unload"), "black");
    }

    #[test]
    fn svg_content() {
        let svg = render_svg(&chart()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("tfd: p01 (23.00)"));
        assert!(svg.contains(">truck-1</text>"));
        assert!(svg.contains(">package-1</text>"));
        assert_eq!(svg.matches("fill=\"green\"").count(), 3);
        assert!(svg.contains("unload&lt;x&gt;"));
        // No legend entry for the actions that are not in the chart.
        assert!(!svg.contains(">Refuel</text>"));
    }

    #[test]
    fn single_instant_chart() {
        let mut c = chart();
        c.time_max = 0.0;
        c.bars = vec![bar("truck-1", "Drive", 0.0, 0.0)];
        assert!(render_svg(&c).is_ok());
    }
}
