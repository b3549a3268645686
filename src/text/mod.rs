//! Text preprocessing (C3): number expansion → rewrite ruleset → lowercasing.
//!
//! Each stage rewrites the whole buffer in turn; the output feeds the
//! selector (`crate::selector`) as plain lowercase text.

pub mod lowercase;
pub mod numbers;
pub mod rewrite;

pub use rewrite::{load_ruleset, CompiledRuleset};

/// Run the full preprocessing pipeline: number expansion, then user rewrite
/// rules (so a rule can target text the cardinal reading produces), then
/// lowercasing.
pub fn preprocess(text: &str, ruleset: &CompiledRuleset) -> String {
    let expanded = numbers::expand_numbers(text);
    let rewritten = ruleset.apply(&expanded);
    lowercase::lowercase(&rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_order() {
        let ruleset = CompiledRuleset::empty();
        assert_eq!(preprocess("Tenho 21 ANOS", &ruleset), "tenho vinte e um anos");
    }

    #[test]
    fn empty_ruleset_is_identity_for_rewrite_stage() {
        let ruleset = CompiledRuleset::empty();
        assert_eq!(ruleset.apply("abc"), "abc");
        assert!(ruleset.is_empty());
    }
}
