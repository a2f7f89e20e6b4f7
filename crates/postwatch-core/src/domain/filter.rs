//! MatchFilter - ゲートキーワード + Roster による投稿の選別
//!
//! # 判定順
//! 1. `title + " " + body` を小文字化（body なしは空文字扱い）
//! 2. ゲートキーワードが設定されていて、本文のどこにも含まれなければ即不一致
//! 3. Roster を設定順に走査し、最初に一致したエントリを返す
//!
//! ゲートは Roster とは独立した述語として持つ（なしでも動く）。
//! 共有フォーラムで対象外プラットフォームの大量ヒットを抑えるためのもの。

use super::errors::ConfigError;
use super::post::CandidatePost;
use super::roster::{Roster, RosterEntry};

/// Token that must co-occur with a roster phrase.
///
/// Matched as a case-insensitive substring, so `"switch"` also passes
/// `"#NintendoSwitch"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateKeyword(String);

impl GateKeyword {
    pub fn new(keyword: impl AsRef<str>) -> Result<Self, ConfigError> {
        let keyword = keyword.as_ref().trim().to_lowercase();
        if keyword.is_empty() {
            return Err(ConfigError::EmptyGateKeyword);
        }
        Ok(Self(keyword))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `lowered` must already be lowercased.
    pub fn admits(&self, lowered: &str) -> bool {
        lowered.contains(&self.0)
    }
}

/// Decides whether a post is a match, and against which roster phrase.
#[derive(Debug, Clone)]
pub struct MatchFilter {
    roster: Roster,
    gate: Option<GateKeyword>,
}

impl MatchFilter {
    pub fn new(roster: Roster, gate: Option<GateKeyword>) -> Self {
        Self { roster, gate }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn gate(&self) -> Option<&GateKeyword> {
        self.gate.as_ref()
    }

    /// Returns the first roster entry the post qualifies for.
    pub fn is_candidate(&self, post: &CandidatePost) -> Option<&RosterEntry> {
        self.match_text(&post.searchable_text())
    }

    /// Same as `is_candidate` for free text (used by the `check` command).
    pub fn match_text(&self, text: &str) -> Option<&RosterEntry> {
        let lowered = text.to_lowercase();
        if let Some(gate) = &self.gate
            && !gate.admits(&lowered)
        {
            return None;
        }
        self.roster.first_match(&lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(phrases: &[&str], gate: Option<&str>) -> MatchFilter {
        MatchFilter::new(
            Roster::new(phrases.iter().copied()).unwrap(),
            gate.map(|g| GateKeyword::new(g).unwrap()),
        )
    }

    #[test]
    fn gate_rejects_post_without_keyword() {
        let f = filter(&["zelda"], Some("switch"));
        let post = CandidatePost::new("b", "Zelda cartridge only", "https://b");
        assert!(f.is_candidate(&post).is_none());
    }

    #[test]
    fn gate_admits_post_with_keyword() {
        let f = filter(&["zelda"], Some("switch"));
        let post = CandidatePost::new("a", "Zelda for switch, mint", "https://a");
        assert_eq!(f.is_candidate(&post).map(|e| e.phrase()), Some("zelda"));
    }

    #[test]
    fn gate_keyword_can_come_from_body() {
        let f = filter(&["zelda"], Some("Switch"));
        let post = CandidatePost::new("a", "Zelda TOTK", "https://a").with_body("for the SWITCH");
        assert!(f.is_candidate(&post).is_some());
    }

    #[test]
    fn gate_alone_is_not_a_match() {
        let f = filter(&["zelda"], Some("switch"));
        let post = CandidatePost::new("a", "Switch console bundle", "https://a");
        assert!(f.is_candidate(&post).is_none());
    }

    #[test]
    fn without_gate_roster_decides() {
        let f = filter(&["god of war"], None);
        let post = CandidatePost::new("a", "[H] God of War [W] PayPal", "https://a");
        assert_eq!(f.is_candidate(&post).map(|e| e.phrase()), Some("god of war"));
    }

    #[test]
    fn phrase_split_across_title_and_body_does_not_fuse_words() {
        let f = filter(&["witcher3"], None);
        let post = CandidatePost::new("a", "The witcher", "https://a").with_body("3 is here");
        assert!(f.is_candidate(&post).is_none());
    }

    #[test]
    fn gate_is_a_substring_not_a_whole_word() {
        let gate = GateKeyword::new("Switch").unwrap();
        assert!(gate.admits("zelda for the switcher"));
        assert!(gate.admits("#nintendoswitch zelda"));
        assert!(!gate.admits("zelda for the wii u"));

        let f = filter(&["zelda"], Some("switch"));
        let post = CandidatePost::new("a", "Zelda #NintendoSwitch", "https://a");
        assert!(f.is_candidate(&post).is_some());
    }

    #[test]
    fn blank_gate_keyword_is_rejected() {
        assert!(matches!(GateKeyword::new("  "), Err(ConfigError::EmptyGateKeyword)));
    }
}
