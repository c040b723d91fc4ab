/// The animal a product is marketed for
///
/// Derived from the product name; products that name neither cats nor
/// dogs count as universal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnimalType {
    Cat,
    Dog,
    Universal,
}

impl std::fmt::Display for AnimalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AnimalType::Cat => "Cats",
            AnimalType::Dog => "Dogs",
            AnimalType::Universal => "Universal",
        })
    }
}

/// Name stems checked against the lower-cased product name.
/// The first rule whose stem matches wins, so cat products take
/// precedence over dog products when a name mentions both.
const RULES: &[(AnimalType, &[&str])] = &[
    (AnimalType::Cat, &["кошек", "кошки"]),
    (AnimalType::Dog, &["собак"]),
];

/// Maps a product name to the animal type it is sold for
pub fn classify(product_name: &str) -> AnimalType {
    let name = product_name.to_lowercase();

    RULES
        .iter()
        .find(|(_, stems)| stems.iter().any(|stem| name.contains(stem)))
        .map(|(animal, _)| *animal)
        .unwrap_or(AnimalType::Universal)
}
