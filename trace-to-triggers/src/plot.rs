use anyhow::Result;
use plotters::prelude::*;
use seismo_common::{FilteredWaveform, Seconds};
use std::path::Path;

const PLOT_SIZE: (u32, u32) = (1200, 600);

/// Renders the filtered velocity trace to an SVG, with the chosen
/// trigger marked as a vertical line. Consumes only read-only views;
/// nothing feeds back into detection.
pub(crate) fn render_trace(
    path: &Path,
    source: &str,
    filtered: &FilteredWaveform,
    trigger_time: Option<Seconds>,
) -> Result<()> {
    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (min, max) = filtered
        .samples()
        .iter()
        .fold((f64::MAX, f64::MIN), |(min, max), &v| {
            (min.min(v), max.max(v))
        });
    // Keep a flat trace visible.
    let margin = ((max - min) * 0.05).max(1e-12);
    let (y_min, y_max) = (min - margin, max + margin);

    let mut chart = ChartBuilder::on(&root)
        .caption(source, ("sans-serif", 20).into_font())
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, (8i32).percent_width())
        .set_label_area_size(LabelAreaPosition::Bottom, (10i32).percent_height())
        .build_cartesian_2d(0.0..filtered.duration(), y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Velocity (m/s)")
        .draw()?;

    chart.draw_series(LineSeries::new(filtered.iter(), &BLUE))?;

    if let Some(time) = trigger_time {
        chart
            .draw_series(LineSeries::new(
                [(time, y_min), (time, y_max)],
                &GREEN,
            ))?
            .label("Best Trigger On")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
