//! Backing attribute naming
//!
//! Layer display names map deterministically to attribute names:
//! `prefix + sanitize(display_name)`, disambiguated with `_01`, `_02`, ...

use std::collections::HashSet;

use crate::config::MaskConfig;

/// Clean a display name so it is safe as an attribute name.
///
/// Lower-cases, turns whitespace into underscores and drops everything
/// outside `[a-z0-9_]`. Returns `fallback` when nothing is left.
pub fn sanitize(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();

    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Desired backing attribute name for a display name, before uniquing
pub fn backing_name(config: &MaskConfig, display_name: &str) -> String {
    format!(
        "{}{}",
        config.attribute_prefix,
        sanitize(display_name, &config.fallback_token)
    )
}

/// First name derived from `base` that is not in `existing`
pub fn unique_name<'a, I>(existing: I, base: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: HashSet<&str> = existing.into_iter().collect();
    if !taken.contains(base) {
        return base.to_string();
    }

    let mut i = 1u32;
    loop {
        let candidate = format!("{}_{:02}", base, i);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        i += 1;
    }
}
