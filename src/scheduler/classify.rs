//! Subject classification and grouping.

use std::collections::HashMap;

use crate::config::SchedulerConfig;
use crate::models::ExamSection;

/// Scheduling class of a section, decided by its subject.
///
/// Classes are disjoint; precedence is GenEd > Math > Architecture > Major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectClass<'c> {
    /// General-education subject of the named category.
    GenEd(&'c str),
    /// Mathematics subject of the mathematics department.
    Math,
    /// Architecture subject.
    Architecture,
    /// Everything else.
    Major,
}

/// All sections of one subject, in input order.
#[derive(Debug, Clone)]
pub struct SubjectGroup<'a> {
    /// Shared subject id.
    pub subject_id: &'a str,
    /// The subject's sections.
    pub sections: Vec<&'a ExamSection>,
}

/// Classifies a section.
pub fn classify<'c>(section: &ExamSection, config: &'c SchedulerConfig) -> SubjectClass<'c> {
    if let Some(category) = config.gen_ed_category(&section.subject_id) {
        return SubjectClass::GenEd(category.name.as_str());
    }
    let subject = section.subject_id.to_uppercase();
    let rules = &config.priority;
    if subject.starts_with(rules.math_prefix.as_str())
        && section.department.trim().eq_ignore_ascii_case(&rules.math_department)
    {
        return SubjectClass::Math;
    }
    if is_architecture(&section.subject_id, config) {
        return SubjectClass::Architecture;
    }
    SubjectClass::Major
}

/// Whether a subject is architecture-flagged (restricts its buildings).
pub fn is_architecture(subject_id: &str, config: &SchedulerConfig) -> bool {
    !config.priority.arch_marker.is_empty()
        && subject_id
            .to_uppercase()
            .contains(config.priority.arch_marker.as_str())
}

/// Groups sections by subject, groups ordered by first appearance.
pub fn group_by_subject<'a, I>(sections: I) -> Vec<SubjectGroup<'a>>
where
    I: IntoIterator<Item = &'a ExamSection>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<SubjectGroup<'a>> = Vec::new();
    for section in sections {
        let subject_id = section.subject_id.as_str();
        let slot = *index.entry(subject_id).or_insert_with(|| {
            groups.push(SubjectGroup {
                subject_id,
                sections: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].sections.push(section);
    }
    groups
}

impl SubjectGroup<'_> {
    /// Number of sections.
    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the group has no sections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(subject: &str, dept: &str) -> ExamSection {
        ExamSection::new("1", subject, "BSCS", 1).with_department(dept)
    }

    #[test]
    fn test_classify() {
        let config = SchedulerConfig::default();
        assert_eq!(
            classify(&section("ENGL 1013", "SHAS"), &config),
            SubjectClass::GenEd("ENGL")
        );
        assert_eq!(classify(&section("MATH 1013", "sace"), &config), SubjectClass::Math);
        // Mathematics outside the mathematics department is a major subject
        assert_eq!(classify(&section("MATH 1013", "SECAP"), &config), SubjectClass::Major);
        assert_eq!(
            classify(&section("ARCH 2013", "SACE"), &config),
            SubjectClass::Architecture
        );
        assert_eq!(classify(&section("CSCI 1013", "SACE"), &config), SubjectClass::Major);
    }

    #[test]
    fn test_group_by_subject_first_appearance() {
        let sections = vec![
            ExamSection::new("1", "B", "X", 1),
            ExamSection::new("2", "A", "X", 1),
            ExamSection::new("3", "B", "Y", 1),
        ];
        let groups = group_by_subject(&sections);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].subject_id, "B");
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].sections[1].code, "3");
        assert_eq!(groups[1].subject_id, "A");
    }
}
