// Scam keyword boost — fixed heuristic patterns layered on the model
// scores. Each distinct pattern that matches adds a fixed increment; the
// total is capped so keywords alone cannot saturate the score.

use std::sync::LazyLock;

use regex::Regex;

/// Boost added per distinct matched pattern.
pub const BOOST_PER_PATTERN: f64 = 0.05;

/// Hard cap on the total keyword boost.
pub const BOOST_CAP: f64 = 0.4;

/// Strong scam indicators. Matched case-insensitively against the whole
/// text; each pattern counts at most once.
const SCAM_PATTERNS: &[&str] = &[
    "urgent",
    "act now",
    "limited time",
    "verify your account",
    "click here",
    r"http[s]?://",
    "free money",
    "winner",
    "congratulations",
    "gift card",
    "otp",
    "bank account",
    "password",
    "crypto",
    "wallet",
    "pay immediately",
];

static COMPILED: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    SCAM_PATTERNS
        .iter()
        .map(|p| {
            (
                *p,
                Regex::new(p).expect("built-in scam pattern must compile"),
            )
        })
        .collect()
});

/// Result of a keyword scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordBoost {
    /// Total boost in [0, BOOST_CAP].
    pub boost: f64,
    /// The patterns that matched, in table order.
    pub matched: Vec<&'static str>,
}

/// Scan text for scam keyword patterns.
pub fn scan(text: &str) -> KeywordBoost {
    let lowered = text.to_lowercase();
    let matched: Vec<&'static str> = COMPILED
        .iter()
        .filter(|(_, re)| re.is_match(&lowered))
        .map(|(name, _)| *name)
        .collect();

    let boost = (matched.len() as f64 * BOOST_PER_PATTERN).min(BOOST_CAP);
    KeywordBoost { boost, matched }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
