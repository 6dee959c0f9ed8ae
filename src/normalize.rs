//! Character classes for Arabic script and diacritic stripping.

/// True for every code point of the basic Arabic block (U+0600..=U+06FF).
pub fn is_arabic_char(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// True for the marks removed by [`remove_diacritics`]: the small Quranic
/// marks U+0617..=U+061A and the harakat U+064B..=U+0652 (fathatan to sukun).
pub fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{0617}'..='\u{061A}' | '\u{064B}'..='\u{0652}')
}

///Removes Arabic diacritic marks from a string. Everything else is kept as is.
/// # Example
/// ```
/// use tarkib::remove_diacritics;
/// assert_eq!(remove_diacritics("كِتَابٌ"), "كتاب");
/// assert_eq!(remove_diacritics("abc"), "abc");
/// ```
pub fn remove_diacritics(text: &str) -> String {
    text.chars().filter(|c| !is_diacritic(*c)).collect()
}

/// Maximal runs of Arabic-block characters. Anything else (digits, Latin,
/// punctuation, whitespace) separates runs.
pub fn arabic_runs(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_arabic_char(c))
        .filter(|run| !run.is_empty())
}
