//! CandidatePost - フィードから届いた投稿の読み取り専用ビュー

use serde::{Deserialize, Serialize};

use super::ids::PostId;

/// A post delivered by a `PostSource`.
///
/// The core never owns or mutates posts; it only reads `id`, `title`, `body`
/// and `url` during one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePost {
    pub id: PostId,
    pub title: String,

    /// Self-text. Link posts have none.
    #[serde(default)]
    pub body: Option<String>,

    pub url: String,
}

impl CandidatePost {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: PostId::new(id),
            title: title.into(),
            body: None,
            url: url.into(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Lowercased `title + " " + body`.
    ///
    /// The separator keeps the last word of the title and the first word of the
    /// body from fusing into one token. A missing body counts as empty.
    pub fn searchable_text(&self) -> String {
        let body = self.body.as_deref().unwrap_or("");
        let mut text = String::with_capacity(self.title.len() + body.len() + 1);
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(body);
        text.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn searchable_text_joins_title_and_body() {
        let post = CandidatePost::new("a", "Zelda", "https://x").with_body("For SWITCH");
        assert_eq!(post.searchable_text(), "zelda for switch");
    }

    #[test]
    fn missing_body_is_treated_as_empty() {
        let post = CandidatePost::new("a", "Zelda Cartridge", "https://x");
        assert_eq!(post.searchable_text(), "zelda cartridge ");
    }

    #[test]
    fn body_defaults_to_none_when_absent_in_json() {
        let json = r#"{ "id": "a", "title": "t", "url": "u" }"#;
        let post: CandidatePost = serde_json::from_str(json).unwrap();
        assert!(post.body.is_none());
    }
}
