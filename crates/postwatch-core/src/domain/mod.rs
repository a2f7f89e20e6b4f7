//! Domain model (ids, posts, seen set, roster, filter, digest, run state).
//!
//! ここは純粋なモデルだけを置く。I/O・時刻・ログは ports / app 側の責務。

pub mod digest;
pub mod errors;
pub mod filter;
pub mod ids;
pub mod post;
pub mod report;
pub mod roster;
pub mod seen;
pub mod state;

pub use digest::{Digest, MatchResult};
pub use errors::{ConfigError, NotifyError, RunError, SourceError, StoreError};
pub use filter::{GateKeyword, MatchFilter};
pub use ids::{PostId, SourceId};
pub use post::CandidatePost;
pub use report::{NotifyOutcome, RunReport};
pub use roster::{Matcher, Roster, RosterEntry};
pub use seen::{SeenRecord, SeenSet};
pub use state::{RunMode, RunPhase};
