//! Whitespace-preserving rewrite of a class-list string.

use indexmap::IndexSet;

use crate::rules::ScopeRules;

/// Which ends of a string segment touch a template interpolation.
///
/// A token at an open end is only a fragment of the final class name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentEdges {
    pub open_start: bool,
    pub open_end: bool,
}

impl SegmentEdges {
    pub const CLOSED: SegmentEdges = SegmentEdges {
        open_start: false,
        open_end: false,
    };
}

/// Class tokens seen while rewriting, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedClasses {
    /// Complete class tokens after rewriting, changed or not.
    pub classes: IndexSet<String>,
    /// Tokens glued to an interpolation, after rewriting.
    pub partial: IndexSet<String>,
}

impl ObservedClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, other: ObservedClasses) {
        self.classes.extend(other.classes);
        self.partial.extend(other.partial);
    }
}

/// Rewrite every whitespace-delimited token of `text`.
///
/// Whitespace runs are copied through untouched, so a string with no
/// matching token comes back byte-identical.
pub fn rewrite_class_list(
    text: &str,
    rules: &ScopeRules,
    edges: SegmentEdges,
    observed: &mut ObservedClasses,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut offset = 0;

    while !rest.is_empty() {
        let ws_len = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        out.push_str(&rest[..ws_len]);
        rest = &rest[ws_len..];
        offset += ws_len;
        if rest.is_empty() {
            break;
        }

        let token_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = &rest[..token_len];
        let rewritten = rules.apply_or_keep(token);

        let at_start = offset == 0;
        let at_end = offset + token_len == text.len();
        if (at_start && edges.open_start) || (at_end && edges.open_end) {
            observed.partial.insert(rewritten.clone());
        } else {
            observed.classes.insert(rewritten.clone());
        }
        out.push_str(&rewritten);

        rest = &rest[token_len..];
        offset += token_len;
    }

    out
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
    fn test_rewrites_each_token() {
        let mut observed = ObservedClasses::new();
        let out = rewrite_class_list(
            "bg-primary text-primary hover-primary",
            &shop_rules(),
            SegmentEdges::CLOSED,
            &mut observed,
        );
        assert_eq!(out, "bg-shop-primary text-shop-primary hover-shop-primary");
        assert_eq!(observed.classes.len(), 3);
        assert!(observed.partial.is_empty());
    }

    #[test]
    fn test_preserves_whitespace() {
        let mut observed = ObservedClasses::new();
        let out = rewrite_class_list(
            "  p-4\n\tbg-primary   ",
            &shop_rules(),
            SegmentEdges::CLOSED,
            &mut observed,
        );
        assert_eq!(out, "  p-4\n\tbg-shop-primary   ");
        let classes: Vec<_> = observed.classes.iter().cloned().collect();
        assert_eq!(classes, vec!["p-4", "bg-shop-primary"]);
    }

    #[test]
    fn test_empty_and_blank() {
        let mut observed = ObservedClasses::new();
        assert_eq!(
            rewrite_class_list("", &shop_rules(), SegmentEdges::CLOSED, &mut observed),
            ""
        );
        assert_eq!(
            rewrite_class_list("   ", &shop_rules(), SegmentEdges::CLOSED, &mut observed),
            "   "
        );
        assert!(observed.classes.is_empty());
    }

    #[test]
    fn test_open_edges_mark_fragments() {
        let mut observed = ObservedClasses::new();
        let out = rewrite_class_list(
            "primary- p-4 bg-",
            &shop_rules(),
            SegmentEdges {
                open_start: true,
                open_end: true,
            },
            &mut observed,
        );
        assert_eq!(out, "shop-primary- p-4 bg-");
        assert!(observed.partial.contains("shop-primary-"));
        assert!(observed.partial.contains("bg-"));
        assert!(observed.classes.contains("p-4"));
        assert_eq!(observed.classes.len(), 1);
    }

    #[test]
    fn test_open_edge_with_space_is_complete() {
        let mut observed = ObservedClasses::new();
        rewrite_class_list(
            " bg-primary ",
            &shop_rules(),
            SegmentEdges {
                open_start: true,
                open_end: true,
            },
            &mut observed,
        );
        assert!(observed.classes.contains("bg-shop-primary"));
        assert!(observed.partial.is_empty());
    }
}
