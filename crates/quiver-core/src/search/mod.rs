mod ranker;
pub mod scorer;

pub use ranker::{RankedAction, ResultList, rank};
pub use scorer::{MatchTier, match_tier, score};
