//! Cohort conflict matrix.
//!
//! For every cohort (course, year level), records which subjects must
//! never share a period: every pair of distinct subjects the cohort takes.
//! Parallel sections of one subject never conflict with each other.
//!
//! # Complexity
//! O(Σ s²) where s = distinct subjects per cohort. Cohorts take a handful
//! of subjects, so this stays small.

use std::collections::{BTreeSet, HashMap};

use crate::models::{Cohort, ExamSection};

/// Per-cohort subject conflict sets.
#[derive(Debug, Clone, Default)]
pub struct ConflictMatrix {
    cohorts: HashMap<Cohort, HashMap<String, BTreeSet<String>>>,
}

impl ConflictMatrix {
    /// Builds the matrix from eligible sections.
    ///
    /// Sections without a cohort (missing course or year level) are skipped.
    pub fn build<'a, I>(sections: I) -> Self
    where
        I: IntoIterator<Item = &'a ExamSection>,
    {
        let mut subjects_by_cohort: HashMap<Cohort, BTreeSet<&'a str>> = HashMap::new();
        for section in sections {
            if let Some(cohort) = section.cohort() {
                subjects_by_cohort
                    .entry(cohort)
                    .or_default()
                    .insert(section.subject_id.as_str());
            }
        }

        let cohorts = subjects_by_cohort
            .into_iter()
            .map(|(cohort, subjects)| {
                let table = subjects
                    .iter()
                    .map(|&subject| {
                        let others = subjects
                            .iter()
                            .filter(|&&other| other != subject)
                            .map(|&other| other.to_string())
                            .collect();
                        (subject.to_string(), others)
                    })
                    .collect();
                (cohort, table)
            })
            .collect();

        Self { cohorts }
    }

    /// Subjects that may not share a period with `subject_id` within `cohort`.
    pub fn conflicts(&self, cohort: &Cohort, subject_id: &str) -> Option<&BTreeSet<String>> {
        self.cohorts.get(cohort)?.get(subject_id)
    }

    /// Whether two subjects conflict within a cohort.
    pub fn is_conflict(&self, cohort: &Cohort, a: &str, b: &str) -> bool {
        self.conflicts(cohort, a).is_some_and(|set| set.contains(b))
    }

    /// Number of cohorts.
    pub fn cohort_count(&self) -> usize {
        self.cohorts.len()
    }
}
