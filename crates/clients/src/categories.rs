//! Cuisine to provider-category alias expansion.
//!
//! Lookup providers index restaurants under finer-grained category aliases
//! than users pick (a "mexican" preference should also surface tex-mex and
//! taco shops). The lookup client widens each aggregated cuisine through
//! this table before querying; unknown cuisines pass through unchanged.

/// (cuisine, provider aliases) pairs.
const CUISINE_ALIASES: &[(&str, &[&str])] = &[
    ("indian", &["indpak", "indian", "pakistani", "himalayan"]),
    ("chinese", &["chinese", "cantonese", "dimsum", "shanghainese", "szechuan"]),
    ("italian", &["italian", "sicilian", "sardinian", "tuscan"]),
    ("mexican", &["mexican", "tex-mex", "tacos", "newmexican"]),
    ("japanese", &["japanese", "sushi", "ramen", "teppanyaki", "izakaya"]),
    ("thai", &["thai", "laotian"]),
    ("vietnamese", &["vietnamese", "pho"]),
    ("korean", &["korean", "kbbq"]),
    ("american", &["newamerican", "tradamerican", "burgers", "diners"]),
    ("mediterranean", &["mediterranean", "greek", "lebanese", "turkish"]),
    ("middle eastern", &["mideastern", "lebanese", "turkish", "egyptian"]),
    ("french", &["french", "bistros", "provencal"]),
    ("seafood", &["seafood", "fishnchips", "raw_food"]),
    ("vegetarian", &["vegetarian", "vegan"]),
    ("bbq", &["bbq", "smokehouse"]),
    ("dessert", &["desserts", "icecream", "bakeries"]),
];

/// Expand one cuisine into its provider aliases; unknown cuisines map to
/// themselves.
pub fn category_aliases(cuisine: &str) -> Vec<String> {
    let normalized = cuisine.trim().to_lowercase();
    for (name, aliases) in CUISINE_ALIASES {
        if *name == normalized {
            return aliases.iter().map(|a| a.to_string()).collect();
        }
    }
    vec![normalized]
}

/// Expand a cuisine list into a deduplicated alias list, keeping first-seen
/// order so the resulting query string is deterministic.
pub fn expand_categories(cuisines: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    for cuisine in cuisines {
        for alias in category_aliases(cuisine) {
            if !expanded.contains(&alias) {
                expanded.push(alias);
            }
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_cuisine_expands() {
        let aliases = category_aliases("mexican");
        assert!(aliases.contains(&"tex-mex".to_string()));
        assert!(aliases.contains(&"tacos".to_string()));
    }

    #[test]
    fn test_unknown_cuisine_passes_through() {
        assert_eq!(category_aliases("ethiopian"), vec!["ethiopian"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(category_aliases("  Thai "), vec!["thai", "laotian"]);
    }

    #[test]
    fn test_expansion_dedups_shared_aliases() {
        // mediterranean and middle eastern both expand to lebanese/turkish
        let cuisines = vec!["mediterranean".to_string(), "middle eastern".to_string()];
        let expanded = expand_categories(&cuisines);
        let lebanese = expanded.iter().filter(|a| *a == "lebanese").count();
        assert_eq!(lebanese, 1);
    }

    #[test]
    fn test_expansion_keeps_first_seen_order() {
        let cuisines = vec!["thai".to_string(), "korean".to_string()];
        let expanded = expand_categories(&cuisines);
        assert_eq!(expanded, vec!["thai", "laotian", "korean", "kbbq"]);
    }
}
