use std::collections::HashMap;
use std::sync::LazyLock;

/// Informal names and landmarks mapped to canonical "Place, Region, Country".
static LOCATION_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("yosemite", "Yosemite National Park, California, USA"),
        ("yellowstone", "Yellowstone National Park, Wyoming, USA"),
        ("grand canyon", "Grand Canyon National Park, Arizona, USA"),
        ("nyc", "New York City, New York, USA"),
        ("la", "Los Angeles, California, USA"),
        ("sf", "San Francisco, California, USA"),
        ("london", "London, England, UK"),
        ("paris", "Paris, France"),
        ("tokyo", "Tokyo, Japan"),
        ("accra", "Accra, Ghana"),
        ("lagos", "Lagos, Nigeria"),
        ("cairo", "Cairo, Egypt"),
        ("sydney", "Sydney, Australia"),
        ("mumbai", "Mumbai, India"),
        ("delhi", "New Delhi, India"),
    ])
});

/// Canonical form of `text` if it is a known alias (case-insensitive, exact).
pub fn lookup_alias(text: &str) -> Option<&'static str> {
    LOCATION_ALIASES
        .get(text.trim().to_lowercase().as_str())
        .copied()
}

/// Map an extracted location phrase to its canonical form, or pass it through.
pub fn normalize_location(text: &str) -> String {
    match lookup_alias(text) {
        Some(canonical) => canonical.to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviation_maps() {
        assert_eq!(normalize_location("NYC"), "New York City, New York, USA");
        assert_eq!(normalize_location("sf"), "San Francisco, California, USA");
    }

    #[test]
    fn test_landmark_maps() {
        assert_eq!(
            normalize_location("Grand Canyon"),
            "Grand Canyon National Park, Arizona, USA"
        );
    }

    #[test]
    fn test_unmapped_passes_through() {
        assert_eq!(normalize_location("Agbogba"), "Agbogba");
        assert_eq!(normalize_location("Paris, Texas"), "Paris, Texas");
    }

    #[test]
    fn test_lookup_is_exact_match() {
        assert!(lookup_alias("new york city").is_none());
        assert!(lookup_alias("tokyo tower").is_none());
        assert_eq!(lookup_alias("  Tokyo "), Some("Tokyo, Japan"));
    }
}
