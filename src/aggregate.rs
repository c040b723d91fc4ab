use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::classify::AnimalType;
use crate::transaction::Transaction;

/// Whole-table revenue figures
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub revenue: f64,
    pub orders: usize,
    pub avg_order: f64,
}

/// Revenue summary for one animal type
#[derive(Clone, Debug, PartialEq)]
pub struct AnimalStats {
    pub animal: AnimalType,
    pub revenue: f64,
    pub avg_order: f64,
    pub orders: usize,
    pub avg_price: f64,
}

/// Revenue summary for one product
#[derive(Clone, Debug, PartialEq)]
pub struct ProductStats {
    pub product: String,
    pub revenue: f64,
    pub avg_order: f64,
    pub orders: usize,
    pub units: u64,
}

/// How often two products sold on the same day
///
/// `first` and `second` are lexicographically ordered, so the pair is
/// the same key regardless of which product a day recorded first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairCount {
    pub first: String,
    pub second: String,
    pub count: usize,
}

/// Every aggregate derived from the cleaned table
///
/// All of it is a pure function of the transactions; rerunning the
/// pipeline on the same input reproduces the same orderings.
#[derive(Clone, Debug, Default)]
pub struct Analysis {
    pub totals: Totals,
    /// Sorted by revenue descending
    pub by_animal: Vec<AnimalStats>,
    /// Sales count per animal type, sorted by count descending
    pub animal_counts: Vec<(AnimalType, usize)>,
    /// Sorted by revenue descending, alphabetical among equals
    pub by_category: Vec<(String, f64)>,
    /// Sorted by revenue descending, alphabetical among equals
    pub by_product: Vec<(String, f64)>,
    /// Per-product detail for the spreadsheet, sorted like `by_product`
    pub product_stats: Vec<ProductStats>,
    /// Sorted by count descending, first-encountered pairs among equals
    pub co_purchases: Vec<PairCount>,
    pub days_with_sales: usize,
}

impl Analysis {
    /// Computes every aggregate over the cleaned table
    pub fn run(transactions: &[Transaction]) -> Self {
        let (co_purchases, days_with_sales) = co_purchase_counts(transactions);

        Self {
            totals: totals(transactions),
            by_animal: animal_stats(transactions),
            animal_counts: animal_counts(transactions),
            by_category: revenue_by(transactions, |t| t.category.as_str()),
            by_product: revenue_by(transactions, |t| t.product.as_str()),
            product_stats: product_stats(transactions),
            co_purchases,
            days_with_sales,
        }
    }

    /// The animal type with the highest revenue
    pub fn top_animal(&self) -> Option<&AnimalStats> {
        self.by_animal.first()
    }

    /// Average order values for cats and dogs
    ///
    /// `None` when either group has no cleaned rows, in which case the
    /// comparison cannot be made.
    pub fn cat_dog_avg_orders(&self) -> Option<(f64, f64)> {
        let avg_of = |animal| {
            self.by_animal
                .iter()
                .find(|stats| stats.animal == animal)
                .map(|stats| stats.avg_order)
        };

        Some((avg_of(AnimalType::Cat)?, avg_of(AnimalType::Dog)?))
    }

    /// The most frequent same-day product pair
    pub fn top_pair(&self) -> Option<&PairCount> {
        self.co_purchases.first()
    }
}

fn totals(transactions: &[Transaction]) -> Totals {
    let revenue: f64 = transactions.iter().map(|t| t.total).sum();
    let orders = transactions.len();
    let avg_order = if orders == 0 {
        0.0
    } else {
        revenue / orders as f64
    };

    Totals {
        revenue,
        orders,
        avg_order,
    }
}

fn animal_stats(transactions: &[Transaction]) -> Vec<AnimalStats> {
    let mut groups: BTreeMap<AnimalType, (f64, f64, usize)> = BTreeMap::new();
    for transaction in transactions {
        let (revenue, price_sum, orders) = groups.entry(transaction.animal_type).or_default();
        *revenue += transaction.total;
        *price_sum += transaction.price;
        *orders += 1;
    }

    let mut stats: Vec<AnimalStats> = groups
        .into_iter()
        .map(|(animal, (revenue, price_sum, orders))| AnimalStats {
            animal,
            revenue,
            avg_order: revenue / orders as f64,
            orders,
            avg_price: price_sum / orders as f64,
        })
        .collect();
    stats.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    stats
}

fn animal_counts(transactions: &[Transaction]) -> Vec<(AnimalType, usize)> {
    let mut counts: BTreeMap<AnimalType, usize> = BTreeMap::new();
    for transaction in transactions {
        *counts.entry(transaction.animal_type).or_default() += 1;
    }

    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn revenue_by<'a, F>(transactions: &'a [Transaction], key: F) -> Vec<(String, f64)>
where
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();
    for transaction in transactions {
        *groups.entry(key(transaction)).or_default() += transaction.total;
    }

    let mut rows: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(key, revenue)| (key.to_string(), revenue))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows
}

fn product_stats(transactions: &[Transaction]) -> Vec<ProductStats> {
    let mut groups: BTreeMap<&str, (f64, usize, u64)> = BTreeMap::new();
    for transaction in transactions {
        let (revenue, orders, units) = groups.entry(transaction.product.as_str()).or_default();
        *revenue += transaction.total;
        *orders += 1;
        *units += u64::from(transaction.quantity);
    }

    let mut stats: Vec<ProductStats> = groups
        .into_iter()
        .map(|(product, (revenue, orders, units))| ProductStats {
            product: product.to_string(),
            revenue,
            avg_order: revenue / orders as f64,
            orders,
            units,
        })
        .collect();
    stats.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    stats
}

/// Counts unordered same-day product pairs across the whole table
///
/// Pairs come from each day's row list, duplicates included, so a
/// product sold twice on one day pairs with itself. Returns the counts
/// and the number of distinct sale dates.
fn co_purchase_counts(transactions: &[Transaction]) -> (Vec<PairCount>, usize) {
    let mut by_date: BTreeMap<NaiveDate, Vec<&str>> = BTreeMap::new();
    for transaction in transactions {
        by_date
            .entry(transaction.date)
            .or_default()
            .push(transaction.product.as_str());
    }
    let days_with_sales = by_date.len();

    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    let mut first_seen: Vec<(String, String)> = Vec::new();
    for products in by_date.values_mut() {
        if products.len() < 2 {
            continue;
        }
        products.sort_unstable();
        for i in 0..products.len() {
            for j in (i + 1)..products.len() {
                let pair = (products[i].to_string(), products[j].to_string());
                match counts.get_mut(&pair) {
                    Some(count) => *count += 1,
                    None => {
                        counts.insert(pair.clone(), 1);
                        first_seen.push(pair);
                    }
                }
            }
        }
    }

    let mut pairs: Vec<PairCount> = first_seen
        .into_iter()
        .map(|pair| {
            let count = counts.remove(&pair).unwrap_or(0);
            PairCount {
                first: pair.0,
                second: pair.1,
                count,
            }
        })
        .collect();
    // stable sort keeps first-seen order among equal counts
    pairs.sort_by(|a, b| b.count.cmp(&a.count));

    (pairs, days_with_sales)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean;
    use crate::transaction::RawRecord;

    fn cleaned(csv: &str) -> Vec<Transaction> {
        let records: Vec<RawRecord> = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes())
            .deserialize()
            .map(Result::unwrap)
            .collect();
        clean(&records).0
    }

    const MIXED_WEEK: &str = r#"date,product,category,price,quantity,total
        2024-01-01, Корм для кошек,    корм,       450, 2, 900
        2024-01-01, Ошейник для собак, аксессуары, 750, 1, 750
        2024-01-02, Корм для кошек,    корм,       450, 1, 450
        2024-01-02, Наполнитель,       гигиена,    500, 1, 500
        2024-01-03, Корм для собак,    корм,       400, 3, 1200"#;

    #[test]
    fn animal_revenue_partitions_total_revenue() {
        let transactions = cleaned(MIXED_WEEK);
        let analysis = Analysis::run(&transactions);

        let partition: f64 = analysis.by_animal.iter().map(|s| s.revenue).sum();
        assert_eq!(partition, analysis.totals.revenue);
        assert_eq!(analysis.totals.revenue, 3800.0);
        assert_eq!(analysis.totals.orders, 5);
    }

    #[test]
    fn animal_stats_sort_by_revenue_descending() {
        let transactions = cleaned(MIXED_WEEK);
        let analysis = Analysis::run(&transactions);

        let animals: Vec<AnimalType> = analysis.by_animal.iter().map(|s| s.animal).collect();
        assert_eq!(
            animals,
            vec![AnimalType::Dog, AnimalType::Cat, AnimalType::Universal]
        );
        // dogs: 750 + 1200, cats: 900 + 450
        assert_eq!(analysis.by_animal[0].revenue, 1950.0);
        assert_eq!(analysis.by_animal[1].revenue, 1350.0);
        assert_eq!(analysis.by_animal[1].orders, 2);
        assert_eq!(analysis.by_animal[1].avg_order, 675.0);
        assert_eq!(analysis.by_animal[1].avg_price, 450.0);
    }

    #[test]
    fn same_day_products_pair_once_per_day() {
        let transactions = cleaned(
            r#"date,product,category,price,quantity,total
               2024-01-01, Корм для кошек,    корм,       450, 2, 900
               2024-01-01, Ошейник для собак, аксессуары, 750, 1, 750"#,
        );
        let analysis = Analysis::run(&transactions);

        assert_eq!(analysis.co_purchases.len(), 1);
        let pair = analysis.top_pair().unwrap();
        assert_eq!(pair.first, "Корм для кошек");
        assert_eq!(pair.second, "Ошейник для собак");
        assert_eq!(pair.count, 1);
    }

    #[test]
    fn pair_identity_ignores_row_order() {
        let forward = cleaned(
            r#"date,product,category,price,quantity,total
               2024-01-01, A, корм, 100, 1, 100
               2024-01-01, B, корм, 100, 1, 100"#,
        );
        let reversed = cleaned(
            r#"date,product,category,price,quantity,total
               2024-01-01, B, корм, 100, 1, 100
               2024-01-01, A, корм, 100, 1, 100"#,
        );

        let forward = Analysis::run(&forward).co_purchases;
        let reversed = Analysis::run(&reversed).co_purchases;
        assert_eq!(forward, reversed);
        assert_eq!(forward[0].first, "A");
        assert_eq!(forward[0].second, "B");
    }

    #[test]
    fn three_products_make_three_pairs() {
        let transactions = cleaned(
            r#"date,product,category,price,quantity,total
               2024-01-01, A, корм, 100, 1, 100
               2024-01-01, B, корм, 100, 1, 100
               2024-01-01, C, корм, 100, 1, 100"#,
        );
        let analysis = Analysis::run(&transactions);

        let pairs: Vec<(&str, &str)> = analysis
            .co_purchases
            .iter()
            .map(|p| (p.first.as_str(), p.second.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "B"), ("A", "C"), ("B", "C")]);
        assert!(analysis.co_purchases.iter().all(|p| p.count == 1));
    }

    #[test]
    fn pair_counts_accumulate_across_days() {
        let transactions = cleaned(
            r#"date,product,category,price,quantity,total
               2024-01-01, A, корм, 100, 1, 100
               2024-01-01, B, корм, 100, 1, 100
               2024-01-02, A, корм, 100, 1, 100
               2024-01-02, B, корм, 100, 1, 100
               2024-01-02, C, корм, 100, 1, 100
               2024-01-03, A, корм, 100, 1, 100"#,
        );
        let analysis = Analysis::run(&transactions);

        assert_eq!(analysis.days_with_sales, 3);
        let top = analysis.top_pair().unwrap();
        assert_eq!((top.first.as_str(), top.second.as_str()), ("A", "B"));
        assert_eq!(top.count, 2);
        // equal counts keep first-encountered order
        let rest: Vec<&str> = analysis.co_purchases[1..]
            .iter()
            .map(|p| p.second.as_str())
            .collect();
        assert_eq!(rest, vec!["C", "C"]);
    }

    #[test]
    fn single_row_days_produce_no_pairs() {
        let transactions = cleaned(
            r#"date,product,category,price,quantity,total
               2024-01-01, A, корм, 100, 1, 100
               2024-01-02, B, корм, 100, 1, 100"#,
        );
        let analysis = Analysis::run(&transactions);

        assert!(analysis.co_purchases.is_empty());
        assert!(analysis.top_pair().is_none());
        assert_eq!(analysis.days_with_sales, 2);
    }

    #[test]
    fn revenue_rankings_are_descending_and_deterministic() {
        let transactions = cleaned(MIXED_WEEK);
        let analysis = Analysis::run(&transactions);

        assert_eq!(analysis.by_product[0].0, "Корм для кошек");
        assert_eq!(analysis.by_product[0].1, 1350.0);
        assert!(analysis
            .by_product
            .windows(2)
            .all(|pair| pair[0].1 >= pair[1].1));
        assert_eq!(analysis.by_category[0].0, "корм");
        assert_eq!(analysis.by_category[0].1, 2550.0);
    }

    #[test]
    fn product_stats_track_units_sold() {
        let transactions = cleaned(MIXED_WEEK);
        let analysis = Analysis::run(&transactions);

        let feed = analysis
            .product_stats
            .iter()
            .find(|s| s.product == "Корм для кошек")
            .unwrap();
        assert_eq!(feed.orders, 2);
        assert_eq!(feed.units, 3);
        assert_eq!(feed.revenue, 1350.0);
    }

    #[test]
    fn cat_dog_comparison_requires_both_groups() {
        let cats_only = cleaned(
            r#"date,product,category,price,quantity,total
               2024-01-01, Корм для кошек, корм, 450, 2, 900"#,
        );
        let analysis = Analysis::run(&cats_only);
        assert_eq!(analysis.cat_dog_avg_orders(), None);

        let both = cleaned(MIXED_WEEK);
        let analysis = Analysis::run(&both);
        let (cat_avg, dog_avg) = analysis.cat_dog_avg_orders().unwrap();
        assert_eq!(cat_avg, 675.0);
        assert_eq!(dog_avg, 975.0);
    }

    #[test]
    fn empty_table_yields_empty_analysis() {
        let analysis = Analysis::run(&[]);

        assert_eq!(analysis.totals, Totals::default());
        assert!(analysis.by_animal.is_empty());
        assert!(analysis.top_animal().is_none());
        assert!(analysis.cat_dog_avg_orders().is_none());
    }
}
