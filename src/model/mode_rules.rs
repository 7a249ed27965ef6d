use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::{config::ModeRule, model::structures::competition_key::CompetitionKey};

/// Compiles one rule pattern as a case-insensitive, fully anchored regex.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("^(?:{})$", pattern))
        .case_insensitive(true)
        .build()
}

#[derive(Debug, Clone)]
struct CompiledModeRule {
    language: Regex,
    mode: Regex,
    mode2: Regex
}

impl CompiledModeRule {
    /// `None` for rules that can never match: a pattern is missing, empty,
    /// or does not compile.
    fn compile(index: usize, rule: &ModeRule) -> Option<CompiledModeRule> {
        let language = Self::compile_field(index, "language", rule.language.as_deref())?;
        let mode = Self::compile_field(index, "mode", rule.mode.as_deref())?;
        let mode2 = Self::compile_field(index, "mode2", rule.mode2.as_deref())?;

        Some(CompiledModeRule { language, mode, mode2 })
    }

    fn compile_field(index: usize, field: &str, pattern: Option<&str>) -> Option<Regex> {
        let pattern = pattern.filter(|p| !p.is_empty())?;

        match compile_pattern(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(index, field, pattern, error = %e, "Ignoring mode rule with invalid pattern");
                None
            }
        }
    }

    fn matches(&self, language: &str, mode: &str, mode2: &str) -> bool {
        self.language.is_match(language) && self.mode.is_match(mode) && self.mode2.is_match(mode2)
    }
}

/// Decides which (language, mode, mode2) combinations get a daily leaderboard.
///
/// Rules are compiled once; rules that cannot match are dropped (and logged)
/// at that point so evaluation never fails.
#[derive(Debug, Clone, Default)]
pub struct ModeRuleMatcher {
    rules: Vec<CompiledModeRule>
}

impl ModeRuleMatcher {
    pub fn new(rules: &[ModeRule]) -> ModeRuleMatcher {
        ModeRuleMatcher {
            rules: rules
                .iter()
                .enumerate()
                .filter_map(|(index, rule)| CompiledModeRule::compile(index, rule))
                .collect()
        }
    }

    /// Number of rules that can match anything
    pub fn active_rules(&self) -> usize {
        self.rules.len()
    }

    pub fn is_eligible(&self, language: &str, mode: &str, mode2: &str) -> bool {
        if language.is_empty() || mode.is_empty() || mode2.is_empty() {
            return false;
        }

        self.rules.iter().any(|rule| rule.matches(language, mode, mode2))
    }

    pub fn is_key_eligible(&self, key: &CompetitionKey) -> bool {
        self.is_eligible(&key.language, &key.mode, &key.mode2)
    }
}

/// One-shot eligibility check against uncompiled rules. Callers evaluating
/// many keys against the same rules should build a [`ModeRuleMatcher`].
pub fn is_eligible(language: &str, mode: &str, mode2: &str, rules: &[ModeRule]) -> bool {
    ModeRuleMatcher::new(rules).is_eligible(language, mode, mode2)
}
