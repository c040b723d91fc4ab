use chrono::{Datelike, NaiveDate};

use crate::classify::{classify, AnimalType};

/// The date layout used by the sales export
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the sales export, before any validation
///
/// Every column is optional because exports regularly arrive with gaps.
/// The cleaning stage decides what to drop.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct RawRecord {
    pub date: Option<String>,
    pub product: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub total: Option<String>,
}

impl RawRecord {
    /// Whether every column carries a value
    pub fn is_complete(&self) -> bool {
        self.date.is_some()
            && self.product.is_some()
            && self.category.is_some()
            && self.price.is_some()
            && self.quantity.is_some()
            && self.total.is_some()
    }
}

impl std::fmt::Display for RawRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn field(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("<missing>")
        }

        write!(
            f,
            "{} | {} | {} | {} x {} = {}",
            field(&self.date),
            field(&self.product),
            field(&self.category),
            field(&self.price),
            field(&self.quantity),
            field(&self.total),
        )
    }
}

/// A validated sale
///
/// Carries the parsed export columns plus the fields derived during
/// cleaning: calendar attributes and the animal-type label.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub product: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub total: f64,
    pub month: u32,
    pub day_of_week: String,
    pub animal_type: AnimalType,
}

impl Transaction {
    /// Parses a raw row into a validated transaction
    ///
    /// Returns `None` when a column is missing or does not parse; the
    /// cleaning stage counts and drops such rows.
    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        let date = NaiveDate::parse_from_str(raw.date.as_deref()?, DATE_FORMAT).ok()?;
        let product = raw.product.clone()?;
        let category = raw.category.clone()?;
        let price = raw.price.as_deref()?.parse().ok()?;
        let quantity = raw.quantity.as_deref()?.parse().ok()?;
        let total = raw.total.as_deref()?.parse().ok()?;

        Some(Self {
            month: date.month(),
            day_of_week: date.format("%A").to_string(),
            animal_type: classify(&product),
            date,
            product,
            category,
            price,
            quantity,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        date: &str,
        product: &str,
        category: &str,
        price: &str,
        quantity: &str,
        total: &str,
    ) -> RawRecord {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RawRecord {
            date: opt(date),
            product: opt(product),
            category: opt(category),
            price: opt(price),
            quantity: opt(quantity),
            total: opt(total),
        }
    }

    #[test]
    fn parses_a_complete_row() {
        let record = raw("2024-01-01", "Корм для кошек", "корм", "450", "2", "900");
        let transaction = Transaction::from_raw(&record).unwrap();

        assert_eq!(transaction.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(transaction.price, 450.0);
        assert_eq!(transaction.quantity, 2);
        assert_eq!(transaction.total, 900.0);
        assert_eq!(transaction.month, 1);
        assert_eq!(transaction.day_of_week, "Monday");
        assert_eq!(transaction.animal_type, AnimalType::Cat);
    }

    #[test]
    fn rejects_a_row_with_a_missing_column() {
        let record = raw("2024-01-01", "", "корм", "450", "2", "900");
        assert!(!record.is_complete());
        assert!(Transaction::from_raw(&record).is_none());
    }

    #[test]
    fn rejects_an_unparsable_date() {
        let record = raw("01.02.2024", "Корм для кошек", "корм", "450", "2", "900");
        assert!(Transaction::from_raw(&record).is_none());
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let bad_price = raw("2024-01-01", "Корм", "корм", "n/a", "2", "900");
        let bad_quantity = raw("2024-01-01", "Корм", "корм", "450", "two", "900");

        assert!(Transaction::from_raw(&bad_price).is_none());
        assert!(Transaction::from_raw(&bad_quantity).is_none());
    }
}
