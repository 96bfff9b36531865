use log::debug;
use regex::RegexBuilder;

use crate::rules::Rule;

/// A rule whose pattern failed to compile. The rule is skipped and the run
/// continues with the text as it stood.
#[derive(Debug)]
pub struct RuleFailure {
    pub antigo: String,
    pub error: regex::Error,
}

/// Applies each rule in order as a case-insensitive, replace-all regex
/// substitution. Rule i+1 sees the output of rule i. `novo` is passed
/// through as the replacement template, so `$1`-style capture references
/// keep their meaning.
pub fn apply(source: &str, rules: &[Rule]) -> (String, Vec<RuleFailure>) {
    let mut text = source.to_string();
    let mut failures = Vec::new();

    for rule in rules {
        match RegexBuilder::new(&rule.antigo).case_insensitive(true).build() {
            Ok(re) => {
                text = re.replace_all(&text, rule.novo.as_str()).into_owned();
            }
            Err(error) => {
                debug!("pattern {:?} did not compile: {error}", rule.antigo);
                failures.push(RuleFailure {
                    antigo: rule.antigo.clone(),
                    error,
                });
            }
        }
    }

    (text, failures)
}
