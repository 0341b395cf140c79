use std::ops::Index;

/// Ordered list of words shown during a session, one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList(Vec<String>);

impl WordList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Index<usize> for WordList {
    type Output = str;

    fn index(&self, idx: usize) -> &str {
        &self.0[idx]
    }
}

impl From<Vec<String>> for WordList {
    fn from(words: Vec<String>) -> Self {
        Self(words)
    }
}

impl<'a> IntoIterator for &'a WordList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Turns pasted free-form text into a word list.
///
/// Accepts one word per line (optionally numbered `1.` / `2)` or bulleted
/// `-` / `•` / `*`), comma separated words, or a mix of both.
pub fn parse_word_list(text: &str) -> WordList {
    if text.trim().is_empty() {
        return WordList::default();
    }

    let mut words = Vec::new();

    for line in text.split('\n').filter(|line| !line.trim().is_empty()) {
        let cleaned = strip_bullet(strip_enumeration(line)).trim();

        if cleaned.contains(',') {
            words.extend(split_commas(cleaned));
        } else if !cleaned.is_empty() {
            words.push(cleaned.to_string());
        }
    }

    // Every line was a bare marker; try the raw text as a comma list.
    if words.is_empty() {
        words = split_commas(text).collect();
    }

    WordList(words)
}

fn split_commas(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
}

/// Strips `12.` or `12)` plus trailing whitespace from the start of the line.
fn strip_enumeration(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }

    match rest.strip_prefix(['.', ')']) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

fn strip_bullet(line: &str) -> &str {
    match line.strip_prefix(['-', '•', '*']) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}
