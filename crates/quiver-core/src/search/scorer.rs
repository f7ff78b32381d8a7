//! Tiered substring scoring.
//!
//! Every action is scored in exactly one tier, checked top to bottom:
//!
//! | tier     | condition                                            | score band        |
//! |----------|------------------------------------------------------|-------------------|
//! | mnemonic | query word and mnemonic are prefixes of one another  | `3 * TIER_BAND ±` |
//! | name     | query word occurs in the display name (any case)     | `2 * TIER_BAND ±` |
//! | hint     | query word occurs in the match hint (any case)       | `1 * TIER_BAND ±` |
//!
//! Within a tier the bonus never leaves `±MAX_BONUS`, which is below half a
//! band, so tiers cannot overlap for any input.

use crate::action::Action;
use crate::utils::first_word;

pub const TIER_BAND: i64 = 1 << 32;
const MAX_BONUS: i64 = (1 << 31) - 1;

const HINT_BASE: i64 = TIER_BAND;
const NAME_BASE: i64 = 2 * TIER_BAND;
const MNEMONIC_BASE: i64 = 3 * TIER_BAND;

/// Match category, ordered by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    Hint,
    Name,
    Mnemonic,
}

/// Score an action against the query typed so far.
///
/// Only the first word of `query` takes part in matching. Returns `None` when
/// the action does not match or is inactive.
#[must_use]
pub fn score(action: &Action, query: &str) -> Option<u64> {
    evaluate(action, query).map(|(_, score)| score)
}

/// Which tier an action matches in, if any.
#[must_use]
pub fn match_tier(action: &Action, query: &str) -> Option<MatchTier> {
    evaluate(action, query).map(|(tier, _)| tier)
}

fn evaluate(action: &Action, query: &str) -> Option<(MatchTier, u64)> {
    if !action.active {
        return None;
    }

    let word = first_word(query);
    if word.is_empty() {
        return None;
    }
    let word_len = word.chars().count();

    let (tier, raw) = if let Some(bonus) = mnemonic_bonus(&action.mnemonic, word) {
        (MatchTier::Mnemonic, MNEMONIC_BASE + bonus)
    } else {
        // Doubled so the mnemonic tie-break below can never outweigh a
        // one-character position difference.
        let tie_break = i64::from(!action.mnemonic.is_empty());
        if let Some(pos) = find_ignore_case(&action.display_name, word) {
            (
                MatchTier::Name,
                NAME_BASE + 2 * position_bonus(word_len, pos) + tie_break,
            )
        } else if let Some(pos) = find_ignore_case(&action.match_hint, word) {
            (
                MatchTier::Hint,
                HINT_BASE + 2 * position_bonus(word_len, pos) + tie_break,
            )
        } else {
            return None;
        }
    };

    if raw <= 0 {
        return None;
    }
    u64::try_from(raw).ok().map(|score| (tier, score))
}

/// Closeness bonus when the query word and the mnemonic are prefixes of one
/// another. An exact match scores highest.
fn mnemonic_bonus(mnemonic: &str, word: &str) -> Option<i64> {
    if mnemonic.is_empty() {
        return None;
    }
    if !(mnemonic.starts_with(word) || word.starts_with(mnemonic)) {
        return None;
    }
    let distance = mnemonic.chars().count().abs_diff(word.chars().count());
    let distance = i64::try_from(distance).unwrap_or(MAX_BONUS).min(MAX_BONUS);
    Some(MAX_BONUS - distance)
}

/// `query_len - position`, clamped into half of the per-tier range.
fn position_bonus(query_len: usize, position: usize) -> i64 {
    let half = MAX_BONUS / 2;
    let query_len = i64::try_from(query_len).unwrap_or(half).min(half);
    let position = i64::try_from(position).unwrap_or(half).min(half);
    query_len - position
}

/// Character position of the first case-insensitive occurrence of `needle`.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    if haystack.is_empty() {
        return None;
    }
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    let byte_pos = haystack.find(&needle)?;
    Some(haystack[..byte_pos].chars().count())
}
