//! English pluralization for endpoint names.
//!
//! Rule set, applied to the last `_`-separated word of a snake_case name:
//!
//! 1. uncountable words are returned unchanged (`news`, `equipment`, ...)
//! 2. irregular singulars map to their plural (`person` -> `people`); words that
//!    already are one of those irregular plurals are returned unchanged
//! 3. suffix rules, first match wins:
//!    - `quiz` -> `quizzes`
//!    - `-ix` / `-ex` after `matr`, `vert`, `ind` -> `-ices`
//!    - `-is` -> `-es` (`analysis` -> `analyses`)
//!    - a word of four or more letters ending in `-s` but not `-ss` or `-us`
//!      is taken as already plural and kept (`users`, `categories`)
//!    - `-s`, `-x`, `-z`, `-ch`, `-sh` -> `+es`
//!    - consonant + `y` -> `-ies`
//!    - `hero`, `potato`, `tomato`, `echo`, `veto` -> `+es`
//! 4. otherwise `+s`

const UNCOUNTABLE: &[&str] = &[
    "audio",
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "information",
    "metadata",
    "money",
    "news",
    "police",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "traffic",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("criterion", "criteria"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("half", "halves"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("man", "men"),
    ("medium", "media"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("woman", "women"),
];

const O_TAKES_ES: &[&str] = &["echo", "hero", "potato", "tomato", "veto"];

/// Pluralize the final word of a snake_case identifier.
///
/// ```
/// use apigen_core::naming::pluralize::pluralize;
/// assert_eq!(pluralize("profile_payer"), "profile_payers");
/// assert_eq!(pluralize("blog_category"), "blog_categories");
/// ```
pub fn pluralize(name: &str) -> String {
    match name.rsplit_once('_') {
        Some((head, last)) => format!("{}_{}", head, pluralize_word(last)),
        None => pluralize_word(name),
    }
}

/// Pluralize a single lowercase English word
pub fn pluralize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    for (singular, plural) in IRREGULAR {
        if lower == *singular {
            return (*plural).to_string();
        }
        if lower == *plural {
            return word.to_string();
        }
    }

    if lower == "quiz" {
        return format!("{}zes", word);
    }

    for stem in ["matr", "vert", "ind"] {
        for suffix in ["ix", "ex"] {
            if lower.ends_with(&format!("{}{}", stem, suffix)) {
                return format!("{}ices", &word[..word.len() - 2]);
            }
        }
    }

    if lower.ends_with("is") && lower.len() > 2 {
        return format!("{}es", &word[..word.len() - 2]);
    }

    if is_regular_plural(&lower) {
        return word.to_string();
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| lower.ends_with(suffix)) {
        return format!("{}es", word);
    }

    if let Some(stem) = lower.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }

    if O_TAKES_ES.contains(&lower.as_str()) {
        return format!("{}es", word);
    }

    format!("{}s", word)
}

fn is_regular_plural(lower: &str) -> bool {
    lower.chars().count() >= 4
        && lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_words() {
        assert_eq!(pluralize_word("payer"), "payers");
        assert_eq!(pluralize_word("photo"), "photos");
        assert_eq!(pluralize_word("day"), "days");
    }

    #[test]
    fn sibilant_endings() {
        assert_eq!(pluralize_word("box"), "boxes");
        assert_eq!(pluralize_word("status"), "statuses");
        assert_eq!(pluralize_word("match"), "matches");
        assert_eq!(pluralize_word("wish"), "wishes");
    }

    #[test]
    fn plural_input_is_kept() {
        assert_eq!(pluralize_word("users"), "users");
        assert_eq!(pluralize_word("categories"), "categories");
        assert_eq!(pluralize_word("boxes"), "boxes");
        assert_eq!(pluralize("profile_payers"), "profile_payers");
        // short words and -ss / -us stay singular
        assert_eq!(pluralize_word("bus"), "buses");
        assert_eq!(pluralize_word("gas"), "gases");
        assert_eq!(pluralize_word("class"), "classes");
        assert_eq!(pluralize_word("campus"), "campuses");
    }

    #[test]
    fn consonant_y() {
        assert_eq!(pluralize_word("category"), "categories");
        assert_eq!(pluralize_word("key"), "keys");
    }

    #[test]
    fn irregular_and_uncountable() {
        assert_eq!(pluralize_word("person"), "people");
        assert_eq!(pluralize_word("people"), "people");
        assert_eq!(pluralize_word("child"), "children");
        assert_eq!(pluralize_word("news"), "news");
        assert_eq!(pluralize_word("equipment"), "equipment");
    }

    #[test]
    fn latin_and_greek_endings() {
        assert_eq!(pluralize_word("index"), "indices");
        assert_eq!(pluralize_word("matrix"), "matrices");
        assert_eq!(pluralize_word("analysis"), "analyses");
        assert_eq!(pluralize_word("quiz"), "quizzes");
        assert_eq!(pluralize_word("hero"), "heroes");
    }

    #[test]
    fn only_last_word_is_pluralized() {
        assert_eq!(pluralize("profile_payer"), "profile_payers");
        assert_eq!(pluralize("sales_person"), "sales_people");
        assert_eq!(pluralize(""), "");
    }
}
