use std::fs;
use std::io::{self, Write};
use std::path::Path;

use pet_shop_analytics::{chart, clean, load_records, report, workbook, Analysis};

/// The sales export this tool analyses, relative to the working directory
const INPUT_FILE: &str = "pet_shop_sales.csv";
/// Where the rendered reports land
const REPORT_DIR: &str = "pet_reports";

fn main() -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    report::banner(&mut out, "Pet shop sales analysis")?;

    writeln!(out, "\nLoading data...")?;
    let records = load_records(Path::new(INPUT_FILE))?;
    report::write_load_section(&mut out, &records)?;

    report::banner(&mut out, "Cleaning data...")?;
    let (transactions, summary) = clean(&records);
    report::write_clean_section(&mut out, &summary)?;

    report::banner(&mut out, "Classifying products by animal type...")?;
    let analysis = Analysis::run(&transactions);
    report::write_animal_distribution(&mut out, &analysis)?;

    report::banner(&mut out, "Overall metrics")?;
    report::write_overall_metrics(&mut out, &analysis)?;

    report::banner(&mut out, "Animal type breakdown")?;
    report::write_animal_stats(&mut out, &analysis)?;

    report::banner(&mut out, "Basket analysis (bought together)")?;
    report::write_co_purchases(&mut out, &analysis)?;

    report::banner(&mut out, "Category and product breakdown")?;
    report::write_category_breakdown(&mut out, &analysis)?;
    report::write_product_breakdown(&mut out, &analysis)?;

    report::banner(&mut out, "Rendering charts")?;
    let report_dir = Path::new(REPORT_DIR);
    if !report_dir.exists() {
        fs::create_dir_all(report_dir)?;
        writeln!(out, "Created directory {}/", report_dir.display())?;
    }
    for path in [
        chart::revenue_by_animal(report_dir, &analysis)?,
        chart::avg_order_by_animal(report_dir, &analysis)?,
        chart::top_products(report_dir, &analysis)?,
    ] {
        writeln!(out, "Chart saved: {}", path.display())?;
    }

    report::banner(&mut out, "Writing the spreadsheet report")?;
    let workbook_path = workbook::write_workbook(report_dir, &transactions, &analysis)?;
    writeln!(out, "Report saved: {}", workbook_path.display())?;

    report::banner(&mut out, "Summary")?;
    report::write_final_summary(&mut out, &analysis)?;

    report::banner(&mut out, "Analysis complete!")?;
    writeln!(out, "All reports are in {}/", report_dir.display())?;

    Ok(())
}
