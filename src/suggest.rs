// "Did you mean" hints for failed lookups.
use strsim::levenshtein;

// Closest candidate within edit distance 2, ignoring case. An exact
// (case-insensitive) hit returns nothing: the lookup already failed, so
// repeating the same name back is no help.
pub fn nearest<'a, I>(input: &str, known: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = input.to_lowercase();
    let mut best: Option<(usize, &str)> = None;
    for cand in known {
        let d = levenshtein(&needle, &cand.to_lowercase());
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, cand));
        }
    }
    match best {
        Some((d, cand)) if (1..=2).contains(&d) => Some(cand.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITIES: [&str; 5] = ["Pune", "Mumbai", "Delhi", "Bangalore", "Chennai"];

    #[test]
    fn close_misspelling_is_suggested() {
        assert_eq!(nearest("Mumbay", CITIES).as_deref(), Some("Mumbai"));
        assert_eq!(nearest("dehli", CITIES).as_deref(), Some("Delhi"));
    }

    #[test]
    fn distant_input_gets_no_suggestion() {
        assert_eq!(nearest("Reykjavik", CITIES), None);
    }

    #[test]
    fn exact_name_gets_no_suggestion() {
        assert_eq!(nearest("pune", CITIES), None);
    }

    #[test]
    fn empty_candidate_set_is_fine() {
        assert_eq!(nearest("Pune", []), None);
    }
}
