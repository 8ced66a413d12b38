use std::fmt;

/// Filler for names with fewer than three letters.
pub const PAD_LETTER: char = 'A';
pub const PREFIX_LEN: usize = 3;

/// The three-character head of a client code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix(String);

impl Prefix {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ## Summary
/// Derives a client-code prefix from a display name.
///
/// - Three or more words: the first character of each of the first three words
///   (`"First National Bank"` -> `FNB`). The character is taken as-is, even if
///   it is not a letter.
/// - Otherwise the letters of the name: the first three (`"Protea"` -> `PRO`),
///   right-padded with `A` when there are fewer (`"IT"` -> `ITA`), or `AAA`
///   when there are none.
///
/// The result is always exactly three upper-case characters.
#[must_use]
pub fn derive_prefix(name: &str) -> Prefix {
    let upper = name.trim().to_uppercase();

    let words: Vec<&str> = upper.split_whitespace().collect();
    if words.len() >= PREFIX_LEN {
        return Prefix(
            words
                .iter()
                .take(PREFIX_LEN)
                .filter_map(|word| word.chars().next())
                .collect(),
        );
    }

    let mut prefix: String = upper
        .chars()
        .filter(|c| c.is_alphabetic())
        .take(PREFIX_LEN)
        .collect();
    while prefix.chars().count() < PREFIX_LEN {
        prefix.push(PAD_LETTER);
    }
    Prefix(prefix)
}
