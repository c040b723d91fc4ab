use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::aggregate::Analysis;
use crate::transaction::Transaction;

pub const WORKBOOK_FILE: &str = "pet_shop_report.xlsx";

const SALES_SHEET: &str = "All Sales";
const ANIMAL_SHEET: &str = "By Animal Type";
const PRODUCT_SHEET: &str = "By Product";

/// Possible errors while writing the report workbook
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    #[error(transparent)]
    Xlsx(#[from] XlsxError),
}

/// Writes the three-sheet report workbook into `dir`
///
/// Sheet one holds the full cleaned table, sheets two and three the
/// animal-type and product aggregates. Plain tabular data, no formulas.
pub fn write_workbook(
    dir: &Path,
    transactions: &[Transaction],
    analysis: &Analysis,
) -> Result<PathBuf, WorkbookError> {
    let path = dir.join(WORKBOOK_FILE);
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    write_sales_sheet(workbook.add_worksheet(), &header, transactions)?;
    write_animal_sheet(workbook.add_worksheet(), &header, analysis)?;
    write_product_sheet(workbook.add_worksheet(), &header, analysis)?;

    workbook.save(&path)?;
    Ok(path)
}

fn write_header(sheet: &mut Worksheet, format: &Format, titles: &[&str]) -> Result<(), XlsxError> {
    for (col, title) in titles.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    Ok(())
}

fn write_sales_sheet(
    sheet: &mut Worksheet,
    header: &Format,
    transactions: &[Transaction],
) -> Result<(), XlsxError> {
    sheet.set_name(SALES_SHEET)?;
    write_header(
        sheet,
        header,
        &[
            "date",
            "product",
            "category",
            "price",
            "quantity",
            "total",
            "month",
            "day_of_week",
            "animal_type",
        ],
    )?;

    for (i, transaction) in transactions.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, transaction.date.to_string())?;
        sheet.write_string(row, 1, transaction.product.as_str())?;
        sheet.write_string(row, 2, transaction.category.as_str())?;
        sheet.write_number(row, 3, transaction.price)?;
        sheet.write_number(row, 4, transaction.quantity)?;
        sheet.write_number(row, 5, transaction.total)?;
        sheet.write_number(row, 6, transaction.month)?;
        sheet.write_string(row, 7, transaction.day_of_week.as_str())?;
        sheet.write_string(row, 8, transaction.animal_type.to_string())?;
    }
    Ok(())
}

fn write_animal_sheet(
    sheet: &mut Worksheet,
    header: &Format,
    analysis: &Analysis,
) -> Result<(), XlsxError> {
    sheet.set_name(ANIMAL_SHEET)?;
    write_header(
        sheet,
        header,
        &["animal_type", "revenue", "avg_order", "orders", "avg_price"],
    )?;

    for (i, stats) in analysis.by_animal.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, stats.animal.to_string())?;
        sheet.write_number(row, 1, round2(stats.revenue))?;
        sheet.write_number(row, 2, round2(stats.avg_order))?;
        sheet.write_number(row, 3, stats.orders as f64)?;
        sheet.write_number(row, 4, round2(stats.avg_price))?;
    }
    Ok(())
}

fn write_product_sheet(
    sheet: &mut Worksheet,
    header: &Format,
    analysis: &Analysis,
) -> Result<(), XlsxError> {
    sheet.set_name(PRODUCT_SHEET)?;
    write_header(
        sheet,
        header,
        &["product", "revenue", "avg_order", "orders", "units"],
    )?;

    for (i, stats) in analysis.product_stats.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, stats.product.as_str())?;
        sheet.write_number(row, 1, round2(stats.revenue))?;
        sheet.write_number(row, 2, round2(stats.avg_order))?;
        sheet.write_number(row, 3, stats.orders as f64)?;
        sheet.write_number(row, 4, stats.units as f64)?;
    }
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean;
    use crate::transaction::RawRecord;

    #[test]
    fn writes_a_workbook_with_all_sheets() {
        let records: Vec<RawRecord> = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(
                r#"date,product,category,price,quantity,total
                   2024-01-01, Корм для кошек,    корм,       450, 2, 900
                   2024-01-01, Ошейник для собак, аксессуары, 750, 1, 750"#
                    .as_bytes(),
            )
            .deserialize()
            .map(Result::unwrap)
            .collect();
        let (transactions, _) = clean(&records);
        let analysis = Analysis::run(&transactions);

        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(dir.path(), &transactions, &analysis).unwrap();

        assert_eq!(path, dir.path().join(WORKBOOK_FILE));
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn rounds_exported_aggregates() {
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(675.0), 675.0);
        assert_eq!(round2(433.333_333), 433.33);
    }
}
