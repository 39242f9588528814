//! Wire-name canonicalization.
//!
//! eBay element and attribute names arrive in PascalCase with acronyms (`ItemID`,
//! `eBayAuthToken`). Every lookup key inside a [`Record`](crate::Record) is reduced to a
//! single lower_snake_case form by [`normalize_key`]. [`camelize`] goes the other way for
//! outbound call names only and is deliberately not an inverse.

use std::sync::LazyLock;

use regex::Regex;

/// A run of capitals/digits followed by a capitalized word: `IDValue` -> `ID_Value`.
static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z0-9]+)([A-Z][a-z])").expect("valid regex"));

/// A lowercase letter or digit followed by a capital: `itemID` -> `item_ID`.
static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Convert a wire name into its canonical lower_snake_case lookup key.
///
/// The brand token is merged back after splitting, so `eBayFoo` becomes `ebay_foo` rather
/// than `e_bay_foo`. Normalizing an already-normalized key returns it unchanged.
///
/// ```
/// use rustbay_xml::normalize_key;
///
/// assert_eq!(normalize_key("ItemID"), "item_id");
/// assert_eq!(normalize_key("eBayAuthToken"), "ebay_auth_token");
/// assert_eq!(normalize_key("item_id"), "item_id");
/// ```
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    underscore(raw).replace("e_bay", "ebay")
}

fn underscore(raw: &str) -> String {
    let needs_work = raw.contains("::") || raw.chars().any(|c| c.is_ascii_uppercase() || c == '-');
    if !needs_work {
        return raw.to_owned();
    }

    let word = raw.replace("::", "/");
    let word = ACRONYM_BOUNDARY.replace_all(&word, "${1}_${2}");
    let word = WORD_BOUNDARY.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}

/// Convert a snake_case call name into the eBay wire name.
///
/// Names that are not entirely lowercase are assumed to already be wire-cased and are
/// returned unchanged.
///
/// ```
/// use rustbay_xml::camelize;
///
/// assert_eq!(camelize("get_ebay_official_time"), "GeteBayOfficialTime");
/// assert_eq!(camelize("GeteBayOfficialTime"), "GeteBayOfficialTime");
/// ```
#[must_use]
pub fn camelize(raw: &str) -> String {
    if raw != raw.to_lowercase() {
        return raw.to_owned();
    }

    raw.split('_')
        .map(capitalize)
        .collect::<String>()
        .replace("Ebay", "eBay")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE_NAMES: &[&str] = &[
        "EBay",
        "ItemID",
        "Order",
        "OrderID",
        "GetSellerList",
        "VerifyAddFixedPriceItem",
        "CompleteSale",
        "GetSuggestedCategories",
        "GeteBayOfficialTime",
        "eBayAuthToken",
        "HTTPSEnabled",
        "Item2ID",
        "x-ebay-site",
        "Outer::Inner",
    ];

    #[test]
    fn test_should_normalize_common_wire_names() {
        assert_eq!(normalize_key("EBay"), "ebay");
        assert_eq!(normalize_key("ItemID"), "item_id");
        assert_eq!(normalize_key("Order"), "order");
        assert_eq!(normalize_key("GetSellerList"), "get_seller_list");
        assert_eq!(normalize_key("VerifyAddFixedPriceItem"), "verify_add_fixed_price_item");
        assert_eq!(normalize_key("CompleteSale"), "complete_sale");
        assert_eq!(normalize_key("GetSuggestedCategories"), "get_suggested_categories");
    }

    #[test]
    fn test_should_split_acronym_before_word() {
        assert_eq!(normalize_key("HTTPSEnabled"), "https_enabled");
        assert_eq!(normalize_key("SKUDetails"), "sku_details");
        assert_eq!(normalize_key("Item2ID"), "item2_id");
    }

    #[test]
    fn test_should_merge_brand_token() {
        assert_eq!(normalize_key("eBayFoo"), "ebay_foo");
        assert_eq!(normalize_key("GeteBayOfficialTime"), "getebay_official_time");
        assert_eq!(normalize_key("GeteBayDetails"), "getebay_details");
        assert_eq!(normalize_key("e_bay"), "ebay");
    }

    #[test]
    fn test_should_convert_hyphens_and_path_separators() {
        assert_eq!(normalize_key("x-ebay-site"), "x_ebay_site");
        assert_eq!(normalize_key("Outer::Inner"), "outer/inner");
    }

    #[test]
    fn test_should_leave_lowercase_keys_alone() {
        assert_eq!(normalize_key("foo"), "foo");
        assert_eq!(normalize_key("sym_bar"), "sym_bar");
        assert_eq!(normalize_key("value"), "value");
    }

    #[test]
    fn test_should_be_idempotent() {
        for name in WIRE_NAMES {
            let once = normalize_key(name);
            assert_eq!(normalize_key(&once), once, "not idempotent for {name}");
        }
    }

    #[test]
    fn test_should_camelize_lowercase_command() {
        assert_eq!(camelize("get_ebay_official_time"), "GeteBayOfficialTime");
        assert_eq!(camelize("get_orders"), "GetOrders");
        assert_eq!(camelize("blah"), "Blah");
        assert_eq!(camelize("add__item"), "AddItem");
    }

    #[test]
    fn test_should_pass_mixed_case_command_through() {
        assert_eq!(camelize("GeteBayOfficialTime"), "GeteBayOfficialTime");
        assert_eq!(camelize("get_Orders"), "get_Orders");
        assert_eq!(camelize("Blah"), "Blah");
    }
}
