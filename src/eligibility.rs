//! Eligibility filter.
//!
//! Selects which sections take part in scheduling. A section is dropped
//! when its department is not examined or when its subject is one of the
//! non-examined kinds: listed explicitly, matching a text pattern
//! (laboratory, practicum, thesis, ...), or carrying an excluded prefix.

use crate::config::EligibilityRules;
use crate::models::{ExamSection, ExcludedSection, ExclusionReason};

/// Sections split by the eligibility filter, both in input order.
#[derive(Debug, Clone, Default)]
pub struct Eligibility<'a> {
    /// Sections that take part.
    pub eligible: Vec<&'a ExamSection>,
    /// Sections filtered out, with the rule that removed them.
    pub excluded: Vec<ExcludedSection>,
}

/// Applies the rules to every section.
pub fn partition<'a>(sections: &'a [ExamSection], rules: &EligibilityRules) -> Eligibility<'a> {
    let mut result = Eligibility::default();
    for section in sections {
        match exclusion_reason(section, rules) {
            None => result.eligible.push(section),
            Some(reason) => result.excluded.push(ExcludedSection {
                section: section.clone(),
                reason,
            }),
        }
    }
    result
}

/// Whether a section takes part in scheduling.
pub fn is_eligible(section: &ExamSection, rules: &EligibilityRules) -> bool {
    exclusion_reason(section, rules).is_none()
}

/// The first rule excluding a section, checked department first.
pub fn exclusion_reason(section: &ExamSection, rules: &EligibilityRules) -> Option<ExclusionReason> {
    let department = section.department.trim();
    if rules
        .excluded_departments
        .iter()
        .any(|d| d.eq_ignore_ascii_case(department))
    {
        return Some(ExclusionReason::Department);
    }
    subject_exclusion(&section.subject_id, rules)
}

fn subject_exclusion(subject_id: &str, rules: &EligibilityRules) -> Option<ExclusionReason> {
    let normalized = normalize_subject(subject_id);
    if normalized.is_empty() {
        return None;
    }
    if rules.excluded_subjects.contains(&normalized) {
        return Some(ExclusionReason::ExcludedSubject);
    }

    let lower = normalized.to_lowercase();
    if rules.excluded_patterns.iter().any(|p| lower.contains(p.as_str())) {
        return Some(ExclusionReason::Pattern);
    }

    let prefix = alphabetic_prefix(&normalized);
    if !prefix.is_empty() && rules.excluded_prefixes.iter().any(|p| p == prefix) {
        return Some(ExclusionReason::Prefix);
    }
    None
}

/// Uppercase, trimmed, with whitespace runs collapsed to one space.
pub fn normalize_subject(subject_id: &str) -> String {
    subject_id
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn alphabetic_prefix(normalized: &str) -> &str {
    let end = normalized
        .char_indices()
        .find(|(_, c)| !c.is_ascii_uppercase())
        .map_or(normalized.len(), |(i, _)| i);
    &normalized[..end]
}
