pub use self::{
    aggregate::{Analysis, AnimalStats, PairCount, ProductStats, Totals},
    classify::{classify, AnimalType},
    clean::{clean, CleanSummary, MissingCounts},
    load::{load_records, LoadError},
    transaction::{RawRecord, Transaction},
};

pub mod chart;
pub mod report;
pub mod workbook;

mod aggregate;
mod classify;
mod clean;
mod load;
mod transaction;
