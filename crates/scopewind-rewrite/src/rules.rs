//! Class-token matching rule.
//!
//! A scoped rename `original -> replacement` applies to a single class token
//! in one of three ways, tried in this order:
//!
//! 1. exact: `primary` -> `shop-primary`
//! 2. suffixed: `primary-50` -> `shop-primary-50`
//! 3. modified: `hover-primary` -> `hover-shop-primary`
//!
//! The modifier in rule 3 is exactly one lowercase segment. A longer prefix
//! such as `bg-primary-` in `bg-primary-dark` is part of another token name,
//! so the token is left alone.
//!
//! `:`-separated variants (`md:hover:`) in front of the utility are kept as-is.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::Serialize;

/// Leading hyphen modifier: a single lowercase segment ending in `-`.
fn modifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z]+-$").expect("modifier pattern is valid"))
}

/// A single rename recorded for a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopePair {
    pub original: String,
    pub replacement: String,
}

/// Ordered rename rules for one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeRules {
    pairs: Vec<ScopePair>,
}

impl ScopeRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a `section -> original -> replacement` table into rules.
    ///
    /// Sections and fields are visited in key order. The same rename declared
    /// under two sections is kept once.
    pub fn from_sections(sections: &BTreeMap<String, BTreeMap<String, String>>) -> Self {
        let mut rules = Self::new();
        for fields in sections.values() {
            for (original, replacement) in fields {
                rules.push(original, replacement);
            }
        }
        rules
    }

    /// Append a rename, ignoring exact duplicates.
    pub fn push(&mut self, original: impl Into<String>, replacement: impl Into<String>) {
        let pair = ScopePair {
            original: original.into(),
            replacement: replacement.into(),
        };
        if !self.pairs.contains(&pair) {
            self.pairs.push(pair);
        }
    }

    pub fn pairs(&self) -> &[ScopePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Rewrite one whitespace-free class token.
    ///
    /// Returns `None` when the token is left unchanged, either because no
    /// rule matches or because it already carries a scoped name.
    pub fn apply(&self, token: &str) -> Option<String> {
        let (variants, utility) = split_variants(token);
        if utility.is_empty() {
            return None;
        }

        if self
            .pairs
            .iter()
            .any(|pair| locate(utility, &pair.replacement).is_some())
        {
            return None;
        }

        self.pairs.iter().find_map(|pair| {
            locate(utility, &pair.original).map(|at| {
                let end = at + pair.original.len();
                format!(
                    "{}{}{}{}",
                    variants,
                    &utility[..at],
                    pair.replacement,
                    &utility[end..]
                )
            })
        })
    }

    /// Like [`ScopeRules::apply`], but always returns the resulting token.
    pub fn apply_or_keep(&self, token: &str) -> String {
        self.apply(token).unwrap_or_else(|| token.to_string())
    }
}

/// Split `md:hover:bg-primary` into `("md:hover:", "bg-primary")`.
///
/// Colons inside an arbitrary value (`bg-[url(a:b)]`) are not variant
/// separators, so only colons before the first `[` count.
fn split_variants(token: &str) -> (&str, &str) {
    let scan_end = token.find('[').unwrap_or(token.len());
    match token[..scan_end].rfind(':') {
        Some(idx) => token.split_at(idx + 1),
        None => ("", token),
    }
}

/// Byte offset of `name` inside `utility` under rules 1-3.
fn locate(utility: &str, name: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    if utility == name {
        return Some(0);
    }
    if utility.len() > name.len()
        && utility.starts_with(name)
        && utility.as_bytes()[name.len()] == b'-'
    {
        return Some(0);
    }
    if utility.len() > name.len() && utility.ends_with(name) {
        let at = utility.len() - name.len();
        if utility.is_char_boundary(at) && modifier().is_match(&utility[..at]) {
            return Some(at);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop_rules() -> ScopeRules {
        let mut rules = ScopeRules::new();
        rules.push("primary", "shop-primary");
        rules
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(shop_rules().apply("primary").as_deref(), Some("shop-primary"));
    }

    #[test]
    fn test_suffix_match_keeps_remainder() {
        let rules = shop_rules();
        assert_eq!(rules.apply("primary-50").as_deref(), Some("shop-primary-50"));
        assert_eq!(
            rules.apply("primary-[#fff]").as_deref(),
            Some("shop-primary-[#fff]")
        );
    }

    #[test]
    fn test_single_modifier() {
        let rules = shop_rules();
        assert_eq!(rules.apply("bg-primary").as_deref(), Some("bg-shop-primary"));
        assert_eq!(rules.apply("text-primary").as_deref(), Some("text-shop-primary"));
        assert_eq!(rules.apply("hover-primary").as_deref(), Some("hover-shop-primary"));
    }

    #[test]
    fn test_chained_modifiers_left_alone() {
        assert_eq!(shop_rules().apply("hover-bg-primary"), None);
    }

    #[test]
    fn test_longer_token_ending_in_field_untouched() {
        // `primary-dark` is its own token; only `dark` was scoped.
        let mut rules = ScopeRules::new();
        rules.push("dark", "shop-dark");
        assert_eq!(rules.apply("bg-primary-dark"), None);
        assert_eq!(rules.apply("text-primary-dark"), None);
        assert_eq!(rules.apply("bg-dark").as_deref(), Some("bg-shop-dark"));
        assert_eq!(rules.apply("dark-50").as_deref(), Some("shop-dark-50"));
    }

    #[test]
    fn test_colon_variants_preserved() {
        let rules = shop_rules();
        assert_eq!(
            rules.apply("md:hover:bg-primary").as_deref(),
            Some("md:hover:bg-shop-primary")
        );
    }

    #[test]
    fn test_non_matching_tokens_pass_through() {
        let rules = shop_rules();
        assert_eq!(rules.apply("primaryish"), None);
        assert_eq!(rules.apply("bg-primary-dark2x"), None);
        assert_eq!(rules.apply("bg-[primary]"), None);
        assert_eq!(rules.apply("p-4"), None);
        assert_eq!(rules.apply("Bg-primary"), None);
        assert_eq!(rules.apply(""), None);
    }

    #[test]
    fn test_modifier_with_suffix_is_not_rewritten() {
        // Rule 3 needs the base to equal the field name exactly.
        assert_eq!(shop_rules().apply("text-primary-50"), None);
    }

    #[test]
    fn test_already_scoped_is_noop() {
        let rules = shop_rules();
        for token in [
            "shop-primary",
            "shop-primary-50",
            "bg-shop-primary",
            "hover-bg-shop-primary",
            "md:text-shop-primary",
        ] {
            assert_eq!(rules.apply(token), None, "token {token} was rewritten");
        }
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let rules = shop_rules();
        for token in ["primary", "primary-50", "bg-primary", "hover-primary", "sm:primary"] {
            let once = rules.apply_or_keep(token);
            assert_eq!(rules.apply_or_keep(&once), once);
        }
    }

    #[test]
    fn test_first_matching_pair_wins() {
        let mut rules = ScopeRules::new();
        rules.push("primary", "shop-primary");
        rules.push("primary-dark", "shop-primary-dark");
        assert_eq!(
            rules.apply("primary-dark").as_deref(),
            Some("shop-primary-dark")
        );
        assert_eq!(
            rules.apply("bg-primary-dark").as_deref(),
            Some("bg-shop-primary-dark")
        );
    }

    #[test]
    fn test_from_sections_dedupes() {
        let mut sections = BTreeMap::new();
        sections.insert(
            "colors".to_string(),
            BTreeMap::from([("primary".to_string(), "shop-primary".to_string())]),
        );
        sections.insert(
            "spacing".to_string(),
            BTreeMap::from([
                ("primary".to_string(), "shop-primary".to_string()),
                ("gutter".to_string(), "shop-gutter".to_string()),
            ]),
        );

        let rules = ScopeRules::from_sections(&sections);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.pairs()[0].original, "primary");
        assert_eq!(rules.pairs()[1].original, "gutter");
    }
}
