use crate::data::timeline::{FlagColumn, Timeline};
use crate::error::Result;
use crate::processing::downsampling::decimate;
use crate::profile::PanelSpec;
use crate::render::canvas::{Canvas, Range, Rect};
use crate::render::style::{
    FigureSize, Rgb, LINE_WIDTH, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP, PANEL_GAP,
};
use crate::render::RenderedImage;

const FLAG_RANGE: Range = Range { min: -0.1, max: 1.1 };

struct Trace<'a> {
    ys: &'a [f64],
    color: Rgb,
}

pub fn render(
    timeline: &Timeline,
    panels: &[PanelSpec],
    flag: &FlagColumn,
    flag_color: Rgb,
    fault_number: u8,
    size: FigureSize,
) -> Result<RenderedImage> {
    // Resolve every plotted column before touching the canvas.
    let mut resolved: Vec<Vec<Trace>> = Vec::with_capacity(panels.len());
    for panel in panels {
        let mut traces = Vec::with_capacity(panel.series.len());
        for series in &panel.series {
            let handle = timeline.resolve(&series.column)?;
            traces.push(Trace { ys: timeline.column(handle), color: series.color });
        }
        resolved.push(traces);
    }
    let flag_values: Vec<f64> = flag.flags().iter().map(|&f| if f { 1.0 } else { 0.0 }).collect();

    let xs: Vec<f64> = match timeline.timestamps().first() {
        Some(&t0) => timeline
            .timestamps()
            .iter()
            .map(|t| t.signed_duration_since(t0).num_milliseconds() as f64 / 1000.0)
            .collect(),
        None => Vec::new(),
    };
    let x_range = Range::fit(&xs, 0.0);

    let n_panels = resolved.len() as u32 + 1;
    size.check(n_panels)?;
    let usable = size.height - MARGIN_TOP - MARGIN_BOTTOM - PANEL_GAP * (n_panels - 1);
    let panel_h = (usable / n_panels) as i64;
    let area_for = |i: u32| Rect {
        x: MARGIN_LEFT as i64,
        y: (MARGIN_TOP + i * PANEL_GAP) as i64 + i as i64 * panel_h,
        w: (size.width - MARGIN_LEFT - MARGIN_RIGHT) as i64,
        h: panel_h,
    };

    let mut canvas = Canvas::new(size.width, size.height);
    for (i, traces) in resolved.iter().enumerate() {
        let area = area_for(i as u32);
        let y_range = Range::fit(traces.iter().flat_map(|t| t.ys.iter()), 0.05);
        canvas.frame(area, 4);
        for (k, trace) in traces.iter().enumerate() {
            draw_trace(&mut canvas, area, &xs, trace.ys, x_range, y_range, trace.color);
            draw_legend_swatch(&mut canvas, area, k, trace.color);
        }
    }

    let area = area_for(n_panels - 1);
    canvas.frame(area, 2);
    draw_trace(&mut canvas, area, &xs, &flag_values, x_range, FLAG_RANGE, flag_color);
    draw_legend_swatch(&mut canvas, area, 0, flag_color);

    canvas.encode_png(caption(timeline, panels, flag, fault_number))
}

fn draw_trace(
    canvas: &mut Canvas,
    area: Rect,
    xs: &[f64],
    ys: &[f64],
    x_range: Range,
    y_range: Range,
    color: Rgb,
) {
    let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    let points = decimate(points, (area.w as usize) * 2);

    let to_px = |(x, y): (f64, f64)| {
        let px = area.x + (x_range.normalize(x) * (area.w - 1) as f64).round() as i64;
        let py = area.bottom() - 1 - (y_range.normalize(y) * (area.h - 1) as f64).round() as i64;
        (px, py)
    };

    let defined = |p: &(f64, f64)| p.1.is_finite();
    if points.len() == 1 && defined(&points[0]) {
        let (px, py) = to_px(points[0]);
        canvas.line(px, py, px, py, color, LINE_WIDTH + 2);
        return;
    }
    for w in points.windows(2) {
        // A NaN reading leaves a gap instead of a drop to zero.
        if defined(&w[0]) && defined(&w[1]) {
            let (x0, y0) = to_px(w[0]);
            let (x1, y1) = to_px(w[1]);
            canvas.line(x0, y0, x1, y1, color, LINE_WIDTH);
        }
    }
}

fn draw_legend_swatch(canvas: &mut Canvas, area: Rect, index: usize, color: Rgb) {
    let swatch = Rect {
        x: area.right() - 30 - index as i64 * 26,
        y: area.y + 8,
        w: 18,
        h: 4,
    };
    canvas.fill_rect(swatch, color);
}

fn caption(timeline: &Timeline, panels: &[PanelSpec], flag: &FlagColumn, fault_number: u8) -> String {
    let mut parts: Vec<String> = panels
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let legends: Vec<&str> = p.series.iter().map(|s| s.legend.as_str()).collect();
            format!("panel {}: {} [{}]", i + 1, legends.join(", "), p.unit)
        })
        .collect();
    parts.push(format!("panel {}: Fault ({}) [Fault Flags]", panels.len() + 1, flag.name()));

    let span = match (timeline.timestamps().first(), timeline.timestamps().last()) {
        (Some(a), Some(b)) => format!("{} to {}", a.format("%Y-%m-%d %H:%M"), b.format("%Y-%m-%d %H:%M")),
        _ => "no data".to_string(),
    };
    format!("Fault Conditions {fault_number} Plot: {}; x: Date ({span})", parts.join("; "))
}
