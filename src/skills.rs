use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

/// Reference vocabulary checked for presence in resume text.
/// Fixed for the process lifetime; exact lowercase token match only.
pub const REFERENCE_SKILLS: [&str; 7] = [
    "python",
    "sql",
    "java",
    "aws",
    "tensorflow",
    "pytorch",
    "docker",
];

lazy_static! {
    // Letters plus the symbols that keep tokens like "c++" and "c#" whole.
    // "-" is deliberately not included.
    static ref SKILL_TOKEN: Regex = Regex::new(r"[a-zA-Z+#.]+").unwrap();
}

/// Partition of the reference skill set against a resume's tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillMatch {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
}

/// Tokenize the normalized resume text and partition the reference
/// skills into those present and those absent. Total: every reference
/// skill lands in exactly one of the two sets.
pub fn match_skills(normalized_resume: &str) -> SkillMatch {
    let tokens: BTreeSet<&str> = SKILL_TOKEN
        .find_iter(normalized_resume)
        .map(|m| m.as_str())
        .collect();

    let mut matched = BTreeSet::new();
    let mut missing = BTreeSet::new();
    for skill in REFERENCE_SKILLS {
        if tokens.contains(skill) {
            matched.insert(skill.to_string());
        } else {
            missing.insert(skill.to_string());
        }
    }

    SkillMatch { matched, missing }
}
