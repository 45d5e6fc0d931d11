//! Exam section model.
//!
//! A section is one sitting of a subject's exam for a specific student
//! group. Parallel sections of the same subject share a `subject_id` and
//! are normally examined together in one period.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One exam section to be placed (immutable input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSection {
    /// Unique section code.
    pub code: String,
    /// Subject identifier shared by all parallel sections (e.g., "MATH 1013").
    pub subject_id: String,
    /// Descriptive title.
    pub title: String,
    /// Degree program of the student group (e.g., "BSCS").
    pub course: String,
    /// Year level of the student group (1-based; 0 = unknown).
    pub year_level: u32,
    /// Owning department code.
    pub department: String,
    /// Instructor name.
    pub instructor: String,
    /// Number of consecutive slots the exam occupies.
    pub width: SlotWidth,
    /// Enrolled student count (informational; rooms are not capacity-checked).
    pub student_count: u32,
}

/// Number of consecutive slots an exam needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotWidth {
    /// One slot.
    #[default]
    Single,
    /// Two consecutive slots in the same room.
    Double,
}

/// A student cohort: students of one course and year level.
///
/// Members of a cohort cannot sit two exams at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cohort {
    /// Degree program.
    pub course: String,
    /// Year level.
    pub year_level: u32,
}

impl ExamSection {
    /// Creates a single-width section.
    pub fn new(
        code: impl Into<String>,
        subject_id: impl Into<String>,
        course: impl Into<String>,
        year_level: u32,
    ) -> Self {
        Self {
            code: code.into(),
            subject_id: subject_id.into(),
            title: String::new(),
            course: course.into(),
            year_level,
            department: String::new(),
            instructor: String::new(),
            width: SlotWidth::Single,
            student_count: 0,
        }
    }

    /// Sets the descriptive title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the department code.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Sets the instructor.
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    /// Sets the slot width.
    pub fn with_width(mut self, width: SlotWidth) -> Self {
        self.width = width;
        self
    }

    /// Sets the student count.
    pub fn with_student_count(mut self, count: u32) -> Self {
        self.student_count = count;
        self
    }

    /// The section's cohort, or `None` if course or year level is missing.
    pub fn cohort(&self) -> Option<Cohort> {
        let course = self.course.trim();
        if course.is_empty() || self.year_level == 0 {
            return None;
        }
        Some(Cohort::new(course, self.year_level))
    }

    /// Whether the section needs two consecutive slots.
    #[inline]
    pub fn is_double(&self) -> bool {
        self.width == SlotWidth::Double
    }
}

impl SlotWidth {
    /// Width implied by lecture units: six-unit subjects sit a double exam.
    pub fn from_lecture_units(units: u32) -> Self {
        if units == 6 {
            Self::Double
        } else {
            Self::Single
        }
    }

    /// Number of slots.
    #[inline]
    pub fn slots(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

impl Cohort {
    /// Creates a cohort.
    pub fn new(course: impl Into<String>, year_level: u32) -> Self {
        Self {
            course: course.into(),
            year_level,
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.course, self.year_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_builder() {
        let s = ExamSection::new("1001", "MATH 1013", "BSCS", 1)
            .with_title("Calculus")
            .with_department("SACE")
            .with_instructor("Cruz")
            .with_width(SlotWidth::Double)
            .with_student_count(40);

        assert_eq!(s.code, "1001");
        assert_eq!(s.title, "Calculus");
        assert_eq!(s.department, "SACE");
        assert_eq!(s.instructor, "Cruz");
        assert!(s.is_double());
        assert_eq!(s.student_count, 40);
    }

    #[test]
    fn test_cohort() {
        let s = ExamSection::new("1", "ENGL 1013", " BSCS ", 2);
        assert_eq!(s.cohort(), Some(Cohort::new("BSCS", 2)));
        assert_eq!(s.cohort().unwrap().to_string(), "BSCS-2");

        assert!(ExamSection::new("2", "X", "", 1).cohort().is_none());
        assert!(ExamSection::new("3", "X", "BSCS", 0).cohort().is_none());
    }

    #[test]
    fn test_width_from_units() {
        assert_eq!(SlotWidth::from_lecture_units(3), SlotWidth::Single);
        assert_eq!(SlotWidth::from_lecture_units(6), SlotWidth::Double);
        assert_eq!(SlotWidth::Double.slots(), 2);
        assert_eq!(SlotWidth::Single.slots(), 1);
    }
}
