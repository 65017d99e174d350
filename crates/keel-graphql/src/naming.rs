//! Deterministic field and type naming.
//!
//! All generated schema names derive from declared type names through the
//! pure functions in this module: single-item and mutation fields are named
//! after the type, list fields are `List` plus the pluralized type name,
//! and input/filter type names append a structural suffix. No reflection is
//! involved, so every name is unit-testable in isolation.

/// Prefix for paginated list fields.
const LIST_PREFIX: &str = "List";

/// Suffix for generated command input types.
const INPUT_SUFFIX: &str = "Input";

/// Suffix for generated read-model filter input types.
const FILTER_SUFFIX: &str = "Filter";

/// Suffix for the per-scalar operator input types.
const PROPERTY_FILTER_SUFFIX: &str = "PropertyFilter";

/// Nouns with irregular plural forms, lowercase singular to plural.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("leaf", "leaves"),
    ("knife", "knives"),
    ("life", "lives"),
    ("shelf", "shelves"),
    ("wolf", "wolves"),
];

/// Nouns whose plural equals the singular.
const INVARIANT: &[&str] = &[
    "sheep",
    "fish",
    "deer",
    "series",
    "species",
    "equipment",
    "information",
    "money",
];

/// The kind of generated field a name is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-item query field.
    Read,
    /// Paginated list query field.
    List,
    /// Mutation field.
    Command,
    /// Single-item subscription field.
    Subscribe,
    /// List subscription field.
    SubscribeList,
}

/// Returns the generated field name for a declared type and field kind.
pub fn field_name(type_name: &str, kind: FieldKind) -> String {
    match kind {
        FieldKind::Read | FieldKind::Command | FieldKind::Subscribe => type_name.to_string(),
        FieldKind::List | FieldKind::SubscribeList => {
            format!("{LIST_PREFIX}{}", pluralize(type_name))
        }
    }
}

/// Returns the generated input type name for a command type.
pub fn input_type_name(type_name: &str) -> String {
    format!("{type_name}{INPUT_SUFFIX}")
}

/// Returns the generated filter input type name for a read-model type.
pub fn filter_type_name(type_name: &str) -> String {
    format!("{type_name}{FILTER_SUFFIX}")
}

/// Returns the operator input type name for a scalar or enum type name.
pub fn property_filter_type_name(base: &str) -> String {
    format!("{base}{PROPERTY_FILTER_SUFFIX}")
}

/// Pluralizes the last camel-case word of a type name.
///
/// `Cart` becomes `Carts`, `CartItem` becomes `CartItems`, `Person`
/// becomes `People`. Irregulars and invariants are table-driven; the
/// fallback applies standard English suffix rules.
pub fn pluralize(type_name: &str) -> String {
    if type_name.is_empty() {
        return String::new();
    }

    // Split off the last capitalized word so only it is pluralized.
    let split = type_name
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_ascii_uppercase())
        .map(|(i, _)| i)
        .unwrap_or(0);
    let (prefix, word) = type_name.split_at(split);
    let lower = word.to_ascii_lowercase();

    if INVARIANT.contains(&lower.as_str()) {
        return type_name.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return format!("{prefix}{}", match_case(word, plural));
    }

    format!("{prefix}{}", apply_suffix_rules(word))
}

/// Standard English pluralization suffix rules.
fn apply_suffix_rules(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if let Some(stem) = word.strip_suffix('y') {
        let before = lower.chars().rev().nth(1);
        if !matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u')) {
            return format!("{stem}ies");
        }
    }

    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{word}es");
    }

    format!("{word}s")
}

/// Applies the capitalization of `pattern`'s first character to `word`.
fn match_case(pattern: &str, word: &str) -> String {
    let capitalized = pattern.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    if !capitalized {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize_regular() {
        assert_eq!(pluralize("Cart"), "Carts");
        assert_eq!(pluralize("Order"), "Orders");
        assert_eq!(pluralize("Address"), "Addresses");
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("Match"), "Matches");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Day"), "Days");
    }

    #[test]
    fn test_pluralize_irregular_and_invariant() {
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(pluralize("Child"), "Children");
        assert_eq!(pluralize("Money"), "Money");
        assert_eq!(pluralize("Sheep"), "Sheep");
    }

    #[test]
    fn test_pluralize_last_word_only() {
        assert_eq!(pluralize("CartItem"), "CartItems");
        assert_eq!(pluralize("SalesPerson"), "SalesPeople");
        assert_eq!(pluralize("ProductCategory"), "ProductCategories");
    }

    #[test]
    fn test_field_names() {
        assert_eq!(field_name("Cart", FieldKind::Read), "Cart");
        assert_eq!(field_name("Cart", FieldKind::List), "ListCarts");
        assert_eq!(field_name("ChangeCart", FieldKind::Command), "ChangeCart");
        assert_eq!(field_name("Cart", FieldKind::Subscribe), "Cart");
        assert_eq!(field_name("Cart", FieldKind::SubscribeList), "ListCarts");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(input_type_name("ChangeCart"), "ChangeCartInput");
        assert_eq!(filter_type_name("Cart"), "CartFilter");
        assert_eq!(property_filter_type_name("String"), "StringPropertyFilter");
    }
}
