//! Naming helpers: humanized titles, view slugs and run-title resolution.

/// Title used when neither an override nor a fetched location name exists.
pub const DEFAULT_TITLE: &str = "Home";

/// Turn an `object_id` into a display title (`living_room` → `Living Room`).
///
/// Only the first character of each word is uppercased, so a leading digit
/// keeps the rest of the word lowercase (`2nd_floor` → `2nd Floor`). Runs of
/// separators collapse to one space.
#[must_use]
pub fn humanize(object_id: &str) -> String {
    object_id
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Lowercase ASCII slug with `_` separators (`Living Room!` → `living_room`).
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// Return the first present, non-blank candidate, trimmed.
///
/// Candidates are given in precedence order, e.g. explicit override, fetched
/// location name, configured default.
#[must_use]
pub fn resolve_title<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_humanize_underscored_object_id() {
        assert_eq!(humanize("living_room"), "Living Room");
    }

    #[test]
    fn should_lowercase_tail_of_each_word() {
        assert_eq!(humanize("TV_remote"), "Tv Remote");
    }

    #[test]
    fn should_keep_word_lowercase_after_leading_digit() {
        assert_eq!(humanize("2nd_floor"), "2nd Floor");
        assert_eq!(humanize("zone_3b"), "Zone 3b");
    }

    #[test]
    fn should_collapse_repeated_separators() {
        assert_eq!(humanize("__upstairs__hall_"), "Upstairs Hall");
    }

    #[test]
    fn should_slugify_title() {
        assert_eq!(slugify("Living Room!"), "living_room");
        assert_eq!(slugify("  My   Home "), "my_home");
        assert_eq!(slugify("Été"), "t");
    }

    #[test]
    fn should_return_empty_slug_for_symbols_only() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn should_prefer_first_present_title() {
        let title = resolve_title([Some("Cabin"), Some("Fetched"), Some(DEFAULT_TITLE)]);
        assert_eq!(title, Some("Cabin"));
    }

    #[test]
    fn should_skip_absent_and_blank_titles() {
        let title = resolve_title([None, Some("   "), Some("Fetched"), Some(DEFAULT_TITLE)]);
        assert_eq!(title, Some("Fetched"));
    }

    #[test]
    fn should_return_none_when_no_candidate_is_present() {
        assert_eq!(resolve_title([None, Some("")]), None);
    }
}
