use std::io::{self, Write};

use crate::aggregate::Analysis;
use crate::clean::CleanSummary;
use crate::transaction::RawRecord;

const RULE_WIDTH: usize = 60;

/// Rows shown in the post-load preview
pub const PREVIEW_ROWS: usize = 3;
/// Pairs listed in the basket section
pub const TOP_PAIRS: usize = 5;
/// Categories listed in the category section
pub const TOP_CATEGORIES: usize = 5;
/// Products listed in the product section
pub const TOP_PRODUCTS: usize = 5;

/// Writes a section banner
pub fn banner<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// Formats an amount with thousands separators and two decimals
pub fn fmt_money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{fraction:02}")
}

/// Row count and a short preview of the raw table
pub fn write_load_section<W: Write>(out: &mut W, records: &[RawRecord]) -> io::Result<()> {
    writeln!(out, "\nTotal sales: {}", records.len())?;
    writeln!(out, "First {} records:", PREVIEW_ROWS.min(records.len()))?;
    for record in records.iter().take(PREVIEW_ROWS) {
        writeln!(out, "  {record}")?;
    }
    Ok(())
}

/// What the cleaning stage dropped and why
pub fn write_clean_section<W: Write>(out: &mut W, summary: &CleanSummary) -> io::Result<()> {
    writeln!(out, "\nMissing values per column:")?;
    for (column, count) in summary.missing.by_column() {
        writeln!(out, "  {column}: {count}")?;
    }

    writeln!(
        out,
        "\nRows kept after dropping incomplete records: {}",
        summary.rows_in - summary.dropped_incomplete
    )?;
    if summary.dropped_malformed > 0 {
        writeln!(
            out,
            "Dropped {} rows with unparsable dates or numbers",
            summary.dropped_malformed
        )?;
    }
    Ok(())
}

/// Sales counts per animal type, with shares
pub fn write_animal_distribution<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    writeln!(out, "\nSales by animal type:")?;
    for (animal, count) in &analysis.animal_counts {
        let share = *count as f64 / analysis.totals.orders as f64 * 100.0;
        writeln!(out, "  {animal}: {count} sales ({share:.1}%)")?;
    }
    Ok(())
}

pub fn write_overall_metrics<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    writeln!(out, "\nTotal revenue: {} RUB", fmt_money(analysis.totals.revenue))?;
    writeln!(out, "Number of sales: {}", analysis.totals.orders)?;
    writeln!(
        out,
        "Average order value: {} RUB",
        fmt_money(analysis.totals.avg_order)
    )?;
    Ok(())
}

/// The per-animal-type statistics table
pub fn write_animal_stats<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    writeln!(
        out,
        "\n{:<12} {:>14} {:>12} {:>8} {:>12}",
        "Animal type", "Revenue", "Avg order", "Orders", "Avg price"
    )?;
    for stats in &analysis.by_animal {
        writeln!(
            out,
            "{:<12} {:>14} {:>12} {:>8} {:>12}",
            stats.animal.to_string(),
            fmt_money(stats.revenue),
            fmt_money(stats.avg_order),
            stats.orders,
            fmt_money(stats.avg_price),
        )?;
    }
    Ok(())
}

/// Same-day basket analysis
pub fn write_co_purchases<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    writeln!(out, "\nDays with recorded sales: {}", analysis.days_with_sales)?;

    if analysis.co_purchases.is_empty() {
        writeln!(out, "No day recorded more than one sale.")?;
        return Ok(());
    }

    writeln!(out, "Top {TOP_PAIRS} product pairs bought together:")?;
    for (rank, pair) in analysis.co_purchases.iter().take(TOP_PAIRS).enumerate() {
        writeln!(
            out,
            "  {}. {} + {}: {} times",
            rank + 1,
            pair.first,
            pair.second,
            pair.count
        )?;
    }
    Ok(())
}

pub fn write_category_breakdown<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    writeln!(out, "\nTop categories by revenue:")?;
    for (category, revenue) in analysis.by_category.iter().take(TOP_CATEGORIES) {
        let share = if analysis.totals.revenue > 0.0 {
            revenue / analysis.totals.revenue * 100.0
        } else {
            0.0
        };
        writeln!(
            out,
            "  {category}: {} RUB ({share:.1}%)",
            fmt_money(*revenue)
        )?;
    }
    Ok(())
}

pub fn write_product_breakdown<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    writeln!(out, "\nTop {TOP_PRODUCTS} products by revenue:")?;
    for (product, revenue) in analysis.by_product.iter().take(TOP_PRODUCTS) {
        writeln!(out, "  {product}: {} RUB", fmt_money(*revenue))?;
    }
    Ok(())
}

/// The closing narrative
///
/// Comparisons that need an empty group report themselves as
/// unavailable instead of failing the run.
pub fn write_final_summary<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    match analysis.top_animal() {
        Some(stats) => {
            writeln!(out, "\nMost profitable animal type: {}", stats.animal)?;
            writeln!(out, "  Revenue: {} RUB", fmt_money(stats.revenue))?;
        }
        None => writeln!(out, "\nNo sales survived cleaning; nothing to summarise.")?,
    }

    match analysis.cat_dog_avg_orders() {
        Some((cat_avg, dog_avg)) if cat_avg > dog_avg => {
            writeln!(out, "\nCat owners spend more per order")?;
            writeln!(
                out,
                "  Cats: {} RUB vs Dogs: {} RUB",
                fmt_money(cat_avg),
                fmt_money(dog_avg)
            )?;
        }
        Some((cat_avg, dog_avg)) => {
            writeln!(out, "\nDog owners spend more per order")?;
            writeln!(
                out,
                "  Dogs: {} RUB vs Cats: {} RUB",
                fmt_money(dog_avg),
                fmt_money(cat_avg)
            )?;
        }
        None => writeln!(
            out,
            "\nInsufficient data to compare cat and dog average orders"
        )?,
    }

    match analysis.top_pair() {
        Some(pair) => {
            writeln!(out, "\nMost popular combination:")?;
            writeln!(out, "  {} + {}", pair.first, pair.second)?;
            writeln!(out, "  (bought together {} times)", pair.count)?;
        }
        None => writeln!(out, "\nNo products were ever bought on the same day")?,
    }
    Ok(())
}
