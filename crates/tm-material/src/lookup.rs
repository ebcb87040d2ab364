//! Linear search over externally ordered collections.

/// Position and item of the first element matching `predicate`.
pub fn find_first<T, I, P>(items: I, mut predicate: P) -> Option<(usize, T)>
where
    I: IntoIterator<Item = T>,
    P: FnMut(&T) -> bool,
{
    items.into_iter().enumerate().find(|(_, item)| predicate(item))
}

/// Case-insensitive equality of two names.
pub fn name_matches(candidate: &str, name: &str) -> bool {
    candidate.eq_ignore_ascii_case(name)
}

/// Case-insensitive substring test.
pub fn label_contains(label: &str, fragment: &str) -> bool {
    label.to_lowercase().contains(&fragment.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_match_with_position() {
        let labels = ["Vapor", "Liquid1", "Liquid2"];
        let hit = find_first(labels.iter(), |l| label_contains(l, "liq"));
        assert_eq!(hit, Some((1, &"Liquid1")));
        assert!(find_first(labels.iter(), |l| label_contains(l, "solid")).is_none());
    }

    #[test]
    fn name_match_ignores_case() {
        assert!(name_matches("TemperatureLow", "temperaturelow"));
        assert!(!name_matches("work2", "work"));
    }
}
