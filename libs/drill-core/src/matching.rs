//! Answer matching: normalization, Levenshtein distance, fuzzy tolerance
//! and Serbian Cyrillic to Latin transliteration.

use crate::types::Language;
use serde::{Deserialize, Serialize};

/// Default tolerance for [`fuzzy_match`].
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// Separators between alternative answers, e.g. `kuća, dom`.
const ALTERNATIVE_SEPARATORS: [char; 3] = [',', ';', '/'];

/// Result of a fuzzy comparison between two strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    /// Normalized forms are identical.
    pub exact: bool,
    /// Distance is within the tolerance. Implied by `exact`.
    pub close: bool,
    pub distance: usize,
}

/// Outcome of judging a typed answer against an expected translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerMatch {
    pub correct: bool,
    pub exact: bool,
    /// Smallest distance to any accepted alternative.
    pub distance: usize,
}

/// Trim, lowercase and collapse whitespace runs to a single space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Edit distance between the normalized forms of `a` and `b`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    levenshtein_distance(&normalize(a), &normalize(b))
}

/// Edit distance over `char`s, without normalizing.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let source: Vec<char> = a.chars().collect();
    let target: Vec<char> = b.chars().collect();

    if source.is_empty() {
        return target.len();
    }
    if target.is_empty() {
        return source.len();
    }

    // row[j] is the distance from the current prefix of `source` to target[..j]
    let mut row: Vec<usize> = (0..=target.len()).collect();
    let mut next = vec![0; target.len() + 1];

    for (i, s) in source.iter().enumerate() {
        next[0] = i + 1;
        for (j, t) in target.iter().enumerate() {
            let substitute = row[j] + usize::from(s != t);
            next[j + 1] = substitute.min(row[j + 1] + 1).min(next[j] + 1);
        }
        std::mem::swap(&mut row, &mut next);
    }

    row[target.len()]
}

/// Compare an answer to the expected text after normalizing both.
pub fn fuzzy_match(answer: &str, expected: &str, max_distance: usize) -> FuzzyMatch {
    let distance = levenshtein(answer, expected);
    FuzzyMatch {
        exact: distance == 0,
        close: distance <= max_distance,
        distance,
    }
}

/// Judge a typed answer against the expected translation.
///
/// Every alternative in `expected` is tried with [`fuzzy_match`]; the
/// answer is correct when any of them is close. Serbian answers are
/// compared in Latin script whichever script the learner typed.
pub fn check_answer(
    answer: &str,
    expected: &str,
    language: Language,
    max_distance: usize,
) -> AnswerMatch {
    let prepare = |text: &str| {
        if language == Language::Sr {
            normalize(&transliterate_serbian_cyrillic_to_latin(text))
        } else {
            normalize(text)
        }
    };

    let given = prepare(answer);
    let mut alternatives: Vec<String> = expected
        .split(&ALTERNATIVE_SEPARATORS[..])
        .map(prepare)
        .filter(|alt| !alt.is_empty())
        .collect();
    if alternatives.is_empty() {
        alternatives.push(prepare(expected));
    }

    let mut result = AnswerMatch {
        correct: false,
        exact: false,
        distance: usize::MAX,
    };
    for alt in &alternatives {
        let matched = fuzzy_match(&given, alt, max_distance);
        result.correct |= matched.close;
        result.exact |= matched.exact;
        result.distance = result.distance.min(matched.distance);
    }
    result
}

/// Latin spelling of a lowercase Serbian Cyrillic letter.
fn latin_for(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'ђ' => "đ",
        'е' => "e",
        'ж' => "ž",
        'з' => "z",
        'и' => "i",
        'ј' => "j",
        'к' => "k",
        'л' => "l",
        'љ' => "lj",
        'м' => "m",
        'н' => "n",
        'њ' => "nj",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'ћ' => "ć",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "č",
        'џ' => "dž",
        'ш' => "š",
        _ => return None,
    };
    Some(latin)
}

/// Transliterate Serbian Cyrillic to Latin script.
///
/// Uppercase letters map to a capitalized Latin form (`Љ` becomes `Lj`).
/// Characters outside the table pass through unchanged.
pub fn transliterate_serbian_cyrillic_to_latin(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        match latin_for(lower) {
            Some(latin) if lower != c => {
                let mut chars = latin.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                }
            }
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}
