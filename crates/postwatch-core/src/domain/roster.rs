//! Roster - 監視対象フレーズと、そのコンパイル済みマッチャ
//!
//! # マッチ規則
//! - 大文字小文字は区別しない
//! - フレーズ中のアポストロフィ（`'` / `’`）は省略可能
//!   （`luigi's mansion` は `luigis mansion` にも一致）
//! - フレーズ中の空白の連続は、本文側の任意の空白の連続に一致
//! - 両端は単語境界（`mario` は `mariachi` に一致しない）
//!
//! マッチャは設定読み込み時に 1 回だけ組み立て、投稿ごとには作り直さない。

use regex::{Regex, RegexBuilder};

use super::errors::ConfigError;

const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];

/// A compiled whole-word / whole-phrase pattern.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// Compile `phrase` into a case-insensitive matcher.
    ///
    /// Word boundaries are asserted next to the outermost character that is not
    /// an apostrophe, and only if that character is a word character; a phrase
    /// like `"c++"` is delimited by its own punctuation. An edge apostrophe
    /// stays optional outside the boundary (`'zelda` → `['’]?\bzelda\b`).
    pub fn build(phrase: &str) -> Result<Self, ConfigError> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(ConfigError::EmptyPhrase);
        }

        let chars: Vec<char> = phrase.chars().collect();
        let first = chars.iter().position(|c| !APOSTROPHES.contains(c));
        let last = chars.iter().rposition(|c| !APOSTROPHES.contains(c));
        // アポストロフィだけのフレーズは空パターンになり、何にでも一致してしまう
        if first.is_none() {
            return Err(ConfigError::EmptyPhrase);
        }

        let mut pattern = String::with_capacity(phrase.len() * 2 + 8);
        let mut in_space = false;
        for (i, &c) in chars.iter().enumerate() {
            if Some(i) == first && is_word_char(c) {
                pattern.push_str(r"\b");
            }

            if c.is_whitespace() {
                if !in_space {
                    pattern.push_str(r"\s+");
                }
                in_space = true;
                continue;
            }
            in_space = false;

            if APOSTROPHES.contains(&c) {
                pattern.push_str("['\u{2019}]?");
            } else {
                let mut buf = [0u8; 4];
                pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }

            if Some(i) == last && is_word_char(c) {
                pattern.push_str(r"\b");
            }
        }

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidPhrase {
                phrase: phrase.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { regex })
    }

    /// True iff the phrase occurs anywhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// One roster phrase plus its matcher.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    phrase: String,
    matcher: Matcher,
}

impl RosterEntry {
    pub fn new(phrase: impl Into<String>) -> Result<Self, ConfigError> {
        let phrase = phrase.into();
        let matcher = Matcher::build(&phrase)?;
        Ok(Self {
            phrase: phrase.trim().to_string(),
            matcher,
        })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matcher.matches(text)
    }
}

/// Ordered list of roster entries. Order decides which phrase labels a match.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new<I, S>(phrases: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = phrases
            .into_iter()
            .map(RosterEntry::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// First entry (in configured order) whose matcher matches `text`.
    pub fn first_match(&self, text: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|entry| entry.matches(text))
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
