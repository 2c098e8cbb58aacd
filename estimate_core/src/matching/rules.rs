//! The four matching rules, loosest last.
//!
//! Each rule answers one question: does this (normalized) task name match
//! this (normalized) template name? The ordering and early exit live in
//! [`TemplateMatcher`](super::TemplateMatcher).

use super::{MatchStrategy, NormalizedName};

/// Keyword that triggers [`DomainSpecificRule`]
pub const CUTTING_KEYWORD: &str = "cutting";

/// Words of this length or shorter are ignored by [`PartialRule`]
pub const PARTIAL_MIN_WORD_LEN: usize = 3;

/// One step in the matching chain.
pub trait MatchRule: Send + Sync {
    fn strategy(&self) -> MatchStrategy;

    fn matches(&self, task: &NormalizedName, template: &NormalizedName) -> bool;
}

/// Case-insensitive full-string equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactRule;

impl MatchRule for ExactRule {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::Exact
    }

    fn matches(&self, task: &NormalizedName, template: &NormalizedName) -> bool {
        !task.text.is_empty() && task.text == template.text
    }
}

/// Material-specific cutting variants.
///
/// Applies only when the task mentions "cutting". The template must also
/// mention "cutting" and contain whatever the task says besides it, so
/// "cutting porcelain" finds "Cutting porcelain tiles" but not "Cutting
/// sandstone". A bare "cutting" task has nothing to discriminate on and is
/// left to the later rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainSpecificRule;

impl MatchRule for DomainSpecificRule {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::DomainSpecific
    }

    fn matches(&self, task: &NormalizedName, template: &NormalizedName) -> bool {
        if !task.text.contains(CUTTING_KEYWORD) || !template.text.contains(CUTTING_KEYWORD) {
            return false;
        }
        let remainder = task
            .text
            .replace(CUTTING_KEYWORD, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        !remainder.is_empty() && template.text.contains(&remainder)
    }
}

/// Every task word appears, in order, inside successive template words.
///
/// Words need not be adjacent in the template, but each task word must be
/// found in a template word after the one that matched the previous task
/// word. "transport sand" matches "Transport of sand by dumper" but not
/// "Sand transport".
#[derive(Debug, Clone, Copy, Default)]
pub struct WordOrderRule;

impl MatchRule for WordOrderRule {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::WordOrder
    }

    fn matches(&self, task: &NormalizedName, template: &NormalizedName) -> bool {
        if task.words.is_empty() {
            return false;
        }
        let mut remaining = template.words.iter();
        task.words
            .iter()
            .all(|word| remaining.any(|candidate| candidate.contains(word.as_str())))
    }
}

/// Loosest pass: significant words overlap as substrings in either direction.
///
/// Only words longer than three characters count. Every significant task
/// word needs a template word that contains it or is contained by it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialRule;

impl MatchRule for PartialRule {
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::Partial
    }

    fn matches(&self, task: &NormalizedName, template: &NormalizedName) -> bool {
        let task_words: Vec<&str> = significant_words(task).collect();
        let template_words: Vec<&str> = significant_words(template).collect();
        if task_words.is_empty() || template_words.is_empty() {
            return false;
        }
        task_words.iter().all(|tw| {
            template_words
                .iter()
                .any(|ww| ww.contains(tw) || tw.contains(ww))
        })
    }
}

fn significant_words(name: &NormalizedName) -> impl Iterator<Item = &str> {
    name.words
        .iter()
        .map(String::as_str)
        .filter(|w| w.chars().count() > PARTIAL_MIN_WORD_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> NormalizedName {
        NormalizedName::new(s)
    }

    #[test]
    fn test_exact() {
        assert!(ExactRule.matches(&n("Laying KL kerbs"), &n("  laying kl   KERBS ")));
        assert!(!ExactRule.matches(&n("Laying kerbs"), &n("Laying KL kerbs")));
        assert!(!ExactRule.matches(&n(""), &n("")));
    }

    #[test]
    fn test_domain_specific() {
        let rule = DomainSpecificRule;
        assert!(rule.matches(&n("cutting porcelain"), &n("Cutting porcelain tiles")));
        assert!(!rule.matches(&n("cutting porcelain"), &n("Cutting sandstone slabs")));
        assert!(!rule.matches(&n("cutting porcelain"), &n("Porcelain laying")));
        assert!(!rule.matches(&n("laying porcelain"), &n("Cutting porcelain tiles")));
        assert!(!rule.matches(&n("cutting"), &n("Cutting porcelain tiles")));
    }

    #[test]
    fn test_word_order_is_sequential() {
        let rule = WordOrderRule;
        assert!(rule.matches(&n("transport sand"), &n("Transport of sand by dumper")));
        assert!(rule.matches(&n("lay kerb"), &n("Laying KL kerbs")));
        assert!(!rule.matches(&n("transport sand"), &n("Sand transport")));
        // one template word cannot satisfy two task words
        assert!(!rule.matches(&n("sand sand"), &n("Sand transport")));
        assert!(!rule.matches(&n(""), &n("anything")));
    }

    #[test]
    fn test_partial() {
        let rule = PartialRule;
        // "kerbs" is contained in "kerbstones"; word order does not matter
        assert!(rule.matches(&n("kerbs laying"), &n("Laying kerbstones")));
        assert!(rule.matches(&n("excavation manual"), &n("Manual foundation excavation")));
        assert!(!rule.matches(&n("kerbs laying"), &n("Laying slabs")));
        // only short words: nothing significant to compare
        assert!(!rule.matches(&n("lay kl"), &n("lay kl kerbs")));
    }
}
