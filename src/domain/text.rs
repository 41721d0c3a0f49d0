//! Single-pass text scans over an article's title and summary.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

#[allow(clippy::expect_used)]
static MONEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(
        r"\$\d+(\.\d{1,2})?|\d+(,\d{3})*(\.\d{1,2})?\s*dollars|\d+(,\d{3})*(\.\d{1,2})?\s*USD",
    )
    .case_insensitive(true)
    .build()
    .expect("money regex is valid")
});

/// Count case-insensitive, non-overlapping occurrences of `phrase` across `texts`.
pub fn phrase_count(phrase: &str, texts: &[&str]) -> usize {
    if phrase.is_empty() {
        return 0;
    }

    let Ok(pattern) = RegexBuilder::new(&regex::escape(phrase))
        .case_insensitive(true)
        .build()
    else {
        return 0;
    };

    texts
        .iter()
        .map(|text| pattern.find_iter(text).count())
        .sum()
}

/// Whether any of `texts` mentions an amount of money ("$10.99", "1,000 dollars", "20 USD").
pub fn mentions_money(texts: &[&str]) -> bool {
    texts.iter().any(|text| MONEY_PATTERN.is_match(text))
}
