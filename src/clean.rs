use crate::transaction::{RawRecord, Transaction};

/// Per-column tally of missing values in the raw table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MissingCounts {
    pub date: usize,
    pub product: usize,
    pub category: usize,
    pub price: usize,
    pub quantity: usize,
    pub total: usize,
}

impl MissingCounts {
    pub fn tally(records: &[RawRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.date += usize::from(record.date.is_none());
            counts.product += usize::from(record.product.is_none());
            counts.category += usize::from(record.category.is_none());
            counts.price += usize::from(record.price.is_none());
            counts.quantity += usize::from(record.quantity.is_none());
            counts.total += usize::from(record.total.is_none());
        }
        counts
    }

    /// Column name and count pairs, in export column order
    pub fn by_column(&self) -> [(&'static str, usize); 6] {
        [
            ("date", self.date),
            ("product", self.product),
            ("category", self.category),
            ("price", self.price),
            ("quantity", self.quantity),
            ("total", self.total),
        ]
    }
}

/// What the cleaning stage did to the raw table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub rows_in: usize,
    pub missing: MissingCounts,
    pub dropped_incomplete: usize,
    pub dropped_malformed: usize,
    pub rows_out: usize,
}

/// Drops unusable rows and derives the calendar and animal-type fields
///
/// A row is dropped when any column is missing, or when its date or a
/// numeric column does not parse. Both cases are counted in the summary
/// rather than failing the run.
pub fn clean(records: &[RawRecord]) -> (Vec<Transaction>, CleanSummary) {
    let mut summary = CleanSummary {
        rows_in: records.len(),
        missing: MissingCounts::tally(records),
        ..CleanSummary::default()
    };
    let mut transactions = Vec::with_capacity(records.len());

    for record in records {
        if !record.is_complete() {
            summary.dropped_incomplete += 1;
            continue;
        }
        match Transaction::from_raw(record) {
            Some(transaction) => transactions.push(transaction),
            None => summary.dropped_malformed += 1,
        }
    }

    summary.rows_out = transactions.len();
    (transactions, summary)
}
