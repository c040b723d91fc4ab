use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::aggregate::Analysis;

pub const REVENUE_BY_ANIMAL_FILE: &str = "revenue_by_animal.png";
pub const AVG_ORDER_BY_ANIMAL_FILE: &str = "avg_check_by_animal.png";
pub const TOP_PRODUCTS_FILE: &str = "top_products.png";

/// How many products the horizontal chart shows
pub const TOP_PRODUCTS_ON_CHART: usize = 10;

/// Bar fill colors for the animal-type charts, one per rank
const BAR_COLORS: [RGBColor; 3] = [
    RGBColor(0xff, 0x99, 0x99),
    RGBColor(0x99, 0xcc, 0xff),
    RGBColor(0xcc, 0xcc, 0xcc),
];

/// Fill for the product ranking bars
const PRODUCT_BAR_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);

/// Possible errors while rendering a chart
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("failed to render {file}: {message}")]
    Render { file: &'static str, message: String },
}

impl ChartError {
    fn render(file: &'static str, error: impl std::fmt::Display) -> Self {
        Self::Render {
            file,
            message: error.to_string(),
        }
    }
}

/// Renders the revenue-per-animal-type bar chart
pub fn revenue_by_animal(dir: &Path, analysis: &Analysis) -> Result<PathBuf, ChartError> {
    let path = dir.join(REVENUE_BY_ANIMAL_FILE);
    let bars: Vec<(String, f64)> = analysis
        .by_animal
        .iter()
        .map(|stats| (stats.animal.to_string(), stats.revenue))
        .collect();

    vertical_bars(&path, "Revenue by animal type", "Revenue, RUB", &bars, |v| {
        format!("{:.1}K", v / 1000.0)
    })
    .map_err(|e| ChartError::render(REVENUE_BY_ANIMAL_FILE, e))?;
    Ok(path)
}

/// Renders the average-order-per-animal-type bar chart
pub fn avg_order_by_animal(dir: &Path, analysis: &Analysis) -> Result<PathBuf, ChartError> {
    let path = dir.join(AVG_ORDER_BY_ANIMAL_FILE);
    let bars: Vec<(String, f64)> = analysis
        .by_animal
        .iter()
        .map(|stats| (stats.animal.to_string(), stats.avg_order))
        .collect();

    vertical_bars(
        &path,
        "Average order value by animal type",
        "Average order, RUB",
        &bars,
        |v| format!("{v:.0} RUB"),
    )
    .map_err(|e| ChartError::render(AVG_ORDER_BY_ANIMAL_FILE, e))?;
    Ok(path)
}

/// Renders the top-products ranking as horizontal bars
pub fn top_products(dir: &Path, analysis: &Analysis) -> Result<PathBuf, ChartError> {
    let path = dir.join(TOP_PRODUCTS_FILE);
    let bars: Vec<(String, f64)> = analysis
        .by_product
        .iter()
        .take(TOP_PRODUCTS_ON_CHART)
        .cloned()
        .collect();

    horizontal_bars(
        &path,
        &format!("Top {TOP_PRODUCTS_ON_CHART} products by revenue"),
        "Revenue, RUB",
        &bars,
    )
    .map_err(|e| ChartError::render(TOP_PRODUCTS_FILE, e))?;
    Ok(path)
}

fn vertical_bars(
    path: &Path,
    title: &str,
    y_desc: &str,
    bars: &[(String, f64)],
    label: impl Fn(f64) -> String,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    if bars.is_empty() {
        root.present()?;
        return Ok(());
    }

    let max = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((0..bars.len()).into_segmented(), 0.0..max * 1.15)?;

    let names: Vec<&str> = bars.iter().map(|(name, _)| name.as_str()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                names.get(*i).copied().unwrap_or("").to_string()
            }
            SegmentValue::Last => String::new(),
        })
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
        let color = BAR_COLORS[i % BAR_COLORS.len()];
        Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), *value),
            ],
            color.filled(),
        )
    }))?;

    let value_style =
        TextStyle::from(("sans-serif", 15).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
        Text::new(
            label(*value),
            (SegmentValue::CenterOf(i), *value),
            value_style.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn horizontal_bars(
    path: &Path,
    title: &str,
    x_desc: &str,
    bars: &[(String, f64)],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    if bars.is_empty() {
        root.present()?;
        return Ok(());
    }

    let max = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };
    let rows = bars.len();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(260)
        .build_cartesian_2d(0.0..max * 1.1, (0..rows).into_segmented())?;

    // rank 0 sits in the topmost slot
    let names: Vec<&str> = bars.iter().map(|(name, _)| name.as_str()).collect();
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(rows)
        .y_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => names
                .get(rows - 1 - (*i).min(rows - 1))
                .copied()
                .unwrap_or("")
                .to_string(),
            SegmentValue::Last => String::new(),
        })
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(rank, (_, value))| {
        let slot = rows - 1 - rank;
        Rectangle::new(
            [
                (0.0, SegmentValue::Exact(slot)),
                (*value, SegmentValue::Exact(slot + 1)),
            ],
            PRODUCT_BAR_COLOR.filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}
