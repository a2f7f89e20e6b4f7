//! Digest - 1 回の実行で見つかった一致をまとめた通知
//!
//! 一致ごとに通知はしない。1 実行につき最大 1 通。

use serde::{Deserialize, Serialize};

use super::ids::{PostId, SourceId};

/// One matched post, labelled with the roster phrase that caught it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub post_id: PostId,
    pub phrase: String,
    pub title: String,
    pub url: String,
}

/// Subject + body handed to the `Notifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

impl Digest {
    /// Compose the digest for `matches`. `None` when there is nothing to send.
    ///
    /// Body layout is `title\nurl` per match, separated by a blank line.
    pub fn compose(prefix: &str, source: &SourceId, matches: &[MatchResult]) -> Option<Self> {
        if matches.is_empty() {
            return None;
        }
        let noun = if matches.len() == 1 { "match" } else { "matches" };
        let subject = format!("{prefix} {} new {noun} in {source}", matches.len())
            .trim()
            .to_string();
        let body = matches
            .iter()
            .map(|m| format!("{}\n{}", m.title, m.url))
            .collect::<Vec<_>>()
            .join("\n\n");
        Some(Self { subject, body })
    }
}
