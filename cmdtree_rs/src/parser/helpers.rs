//! Small helpers shared by the token walk.

use strsim::levenshtein;

/// Suggest a close candidate using Levenshtein distance.
/// Returns the nearest one within a distance of 2.
pub(super) fn suggest_similar<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_lower = input.to_lowercase();
    let mut best_match: Option<(&str, usize)> = None;

    for candidate in candidates {
        let distance = levenshtein(&input_lower, &candidate.to_lowercase());
        if distance == 0 || distance > 2 {
            continue;
        }
        match best_match {
            Some((best, best_dist))
                if distance > best_dist || (distance == best_dist && candidate >= best) => {}
            _ => best_match = Some((candidate, distance)),
        }
    }

    best_match.map(|(candidate, _)| candidate.to_string())
}

/// Split `--name=value` at the first delimiter.
///
/// Only tokens that look like options (leading `-` or `/`) are split.
pub(super) fn split_inline<'a>(token: &'a str, delimiters: &[char]) -> Option<(&'a str, &'a str)> {
    if !(token.starts_with('-') || token.starts_with('/')) {
        return None;
    }
    let index = token.find(|c| delimiters.contains(&c))?;
    if index == 0 {
        return None;
    }
    Some((&token[..index], &token[index + 1..]))
}
