//! Input validation and output auditing.
//!
//! [`validate_input`] checks the structural integrity of sections and
//! rooms before scheduling. Detects:
//! - Duplicate section codes and room identifiers
//! - Sections missing a code or subject
//! - Room identifiers not following `<Building>-<Number>`
//! - A day count of zero
//!
//! [`audit_schedule`] re-checks a finished schedule against the placement
//! invariants and reports every breach it finds. A schedule produced by
//! the scheduler always audits clean.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::config::SchedulerConfig;
use crate::models::{
    Cohort, ExamSchedule, ExamSection, Period, Phase, Room, ScheduledExam, Violation,
    ViolationType,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two sections share the same code.
    DuplicateCode,
    /// A room identifier does not follow `<Building>-<Number>`.
    MalformedRoom,
    /// A room identifier appears twice.
    DuplicateRoom,
    /// A section has an empty code or subject.
    MissingField,
    /// The day count is zero.
    NoDays,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input of a scheduling run.
///
/// Problems found here never stop the scheduler (malformed rooms are
/// simply never selected), but they usually indicate a data issue.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input<S: AsRef<str>>(
    sections: &[ExamSection],
    rooms: &[S],
    num_days: usize,
) -> ValidationResult {
    let mut errors = Vec::new();

    if num_days == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoDays,
            "Day count must be at least 1",
        ));
    }

    let mut codes = HashSet::new();
    for section in sections {
        if section.code.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                format!("Section of subject '{}' has no code", section.subject_id),
            ));
        } else if !codes.insert(section.code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCode,
                format!("Duplicate section code: {}", section.code),
            ));
        }

        if section.subject_id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                format!("Section '{}' has no subject", section.code),
            ));
        }
    }

    let mut room_ids = HashSet::new();
    for room in rooms {
        let id = room.as_ref();
        if !room_ids.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRoom,
                format!("Duplicate room ID: {id}"),
            ));
        }
        if !Room::parse(id).is_well_formed() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedRoom,
                format!("Room '{id}' does not follow <Building>-<Number>"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Audits a schedule against the placement invariants.
///
/// Checks:
/// 1. No room holds two sections in any covered slot
/// 2. No two different subjects of one cohort start in the same period
/// 3. Exams of one cohort on one day keep the minimum break
/// 4. Sections of a subject share one period unless placed by the fallback phase
/// 5. No double-width exam runs past the final slot
pub fn audit_schedule(schedule: &ExamSchedule, config: &SchedulerConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_rooms(&schedule.exams, &mut violations);
    check_cohorts(&schedule.exams, config, &mut violations);
    check_atomicity(&schedule.exams, &mut violations);

    let slots = config.slot_count();
    for exam in &schedule.exams {
        if exam.period.slot + exam.section.width.slots() > slots {
            violations.push(Violation::new(
                ViolationType::MultiSlotOverflow,
                &exam.section.code,
                format!(
                    "Section '{}' starts at {} and runs past the last slot",
                    exam.section.code, exam.period
                ),
            ));
        }
    }
    violations
}

fn check_rooms(exams: &[ScheduledExam], violations: &mut Vec<Violation>) {
    let mut occupancy: BTreeMap<(Period, &str), Vec<&str>> = BTreeMap::new();
    for exam in exams {
        for period in exam.periods() {
            occupancy
                .entry((period, exam.room.as_str()))
                .or_default()
                .push(exam.section.code.as_str());
        }
    }
    for ((period, room), codes) in occupancy {
        if codes.len() > 1 {
            violations.push(Violation::new(
                ViolationType::RoomDoubleBooked,
                room,
                format!("Room {room} holds {} at {period}", codes.join(", ")),
            ));
        }
    }
}

fn check_cohorts(exams: &[ScheduledExam], config: &SchedulerConfig, violations: &mut Vec<Violation>) {
    let mut by_day: HashMap<(Cohort, usize), Vec<&ScheduledExam>> = HashMap::new();
    for exam in exams {
        if let Some(cohort) = exam.section.cohort() {
            by_day.entry((cohort, exam.period.day)).or_default().push(exam);
        }
    }

    let window = |exam: &ScheduledExam| {
        let last = exam.period.slot + exam.section.width.slots() - 1;
        (
            config.slot_start(exam.period.slot),
            config.slot_start(last).saturating_add(config.slot_minutes),
        )
    };

    // Sorted for stable reporting order
    let mut keys: Vec<&(Cohort, usize)> = by_day.keys().collect();
    keys.sort();
    for key in keys {
        let (cohort, _) = key;
        let day_exams = &by_day[key];
        for (i, a) in day_exams.iter().enumerate() {
            for b in &day_exams[i + 1..] {
                if a.section.subject_id == b.section.subject_id {
                    continue;
                }
                if a.period == b.period {
                    violations.push(Violation::new(
                        ViolationType::CohortConflict,
                        cohort.to_string(),
                        format!(
                            "{cohort} has {} and {} at {}",
                            a.section.subject_id, b.section.subject_id, a.period
                        ),
                    ));
                    continue;
                }
                let (a_start, a_end) = window(a);
                let (b_start, b_end) = window(b);
                let min_break = config.min_break_minutes;
                if !(a_start >= b_end.saturating_add(min_break)
                    || b_start >= a_end.saturating_add(min_break))
                {
                    violations.push(Violation::new(
                        ViolationType::BreakTooShort,
                        cohort.to_string(),
                        format!(
                            "{cohort} has {} at {} and {} at {} with less than {min_break} minutes between",
                            a.section.subject_id, a.period, b.section.subject_id, b.period
                        ),
                    ));
                }
            }
        }
    }
}

fn check_atomicity(exams: &[ScheduledExam], violations: &mut Vec<Violation>) {
    let mut periods: BTreeMap<&str, BTreeSet<Period>> = BTreeMap::new();
    for exam in exams.iter().filter(|e| e.phase != Phase::Fallback) {
        periods
            .entry(exam.section.subject_id.as_str())
            .or_default()
            .insert(exam.period);
    }
    for (subject, set) in periods {
        if set.len() > 1 {
            violations.push(Violation::new(
                ViolationType::SubjectSplit,
                subject,
                format!("Subject {subject} is split over {} periods", set.len()),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotWidth;

    fn sample_sections() -> Vec<ExamSection> {
        vec![
            ExamSection::new("101", "MATH 1013", "BSCS", 1).with_department("SACE"),
            ExamSection::new("102", "ENGL 1013", "BSCS", 1).with_department("SHAS"),
        ]
    }

    fn exam(section: ExamSection, day: usize, slot: usize, room: &str, phase: Phase) -> ScheduledExam {
        ScheduledExam {
            section,
            period: Period::new(day, slot),
            day_label: String::new(),
            slot_label: String::new(),
            room: room.to_string(),
            phase,
        }
    }

    fn schedule_of(exams: Vec<ScheduledExam>) -> ExamSchedule {
        let mut schedule = ExamSchedule::new(3);
        schedule.exams = exams;
        schedule
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_sections(), &["N-11", "A-101"], 3).is_ok());
    }

    #[test]
    fn test_duplicate_code() {
        let mut sections = sample_sections();
        sections[1].code = "101".into();
        let errors = validate_input(&sections, &["N-11"], 3).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateCode));
    }

    #[test]
    fn test_room_errors() {
        let errors = validate_input(&sample_sections(), &["N-11", "N-11", "Gym"], 3).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateRoom));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MalformedRoom && e.message.contains("Gym")));
    }

    #[test]
    fn test_missing_field_and_no_days() {
        let sections = vec![ExamSection::new("", "MATH 1013", "BSCS", 1), ExamSection::new("2", " ", "BSCS", 1)];
        let errors = validate_input(&sections, &["N-11"], 0).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::MissingField)
                .count(),
            2
        );
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::NoDays));
    }

    #[test]
    fn test_audit_clean() {
        let s = sample_sections();
        let schedule = schedule_of(vec![
            exam(s[0].clone(), 0, 0, "N-11", Phase::HighPriority),
            exam(s[1].clone(), 0, 2, "L-11", Phase::GenEd),
        ]);
        assert!(audit_schedule(&schedule, &SchedulerConfig::default()).is_empty());
    }

    #[test]
    fn test_audit_room_double_booked() {
        let s = sample_sections();
        let other = ExamSection::new("103", "HIST 1013", "BSIT", 1);
        let schedule = schedule_of(vec![
            exam(s[0].clone().with_width(SlotWidth::Double), 0, 0, "N-11", Phase::Bulk),
            exam(other, 0, 1, "N-11", Phase::Bulk),
        ]);
        let violations = audit_schedule(&schedule, &SchedulerConfig::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::RoomDoubleBooked);
        assert_eq!(violations[0].entity_id, "N-11");
    }

    #[test]
    fn test_audit_cohort_conflict_and_break() {
        let s = sample_sections();
        let config = SchedulerConfig::default();

        let same_period = schedule_of(vec![
            exam(s[0].clone(), 0, 0, "N-11", Phase::Bulk),
            exam(s[1].clone(), 0, 0, "N-12", Phase::Bulk),
        ]);
        let violations = audit_schedule(&same_period, &config);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::CohortConflict);
        assert_eq!(violations[0].entity_id, "BSCS-1");

        let adjacent = schedule_of(vec![
            exam(s[0].clone(), 0, 0, "N-11", Phase::Bulk),
            exam(s[1].clone(), 0, 1, "N-12", Phase::Bulk),
        ]);
        let violations = audit_schedule(&adjacent, &config);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::BreakTooShort);
    }

    #[test]
    fn test_audit_huge_break() {
        let s = sample_sections();
        let config = SchedulerConfig::default().with_min_break(u32::MAX);
        let schedule = schedule_of(vec![
            exam(s[0].clone(), 0, 0, "N-11", Phase::Bulk),
            exam(s[1].clone(), 0, 7, "N-12", Phase::Bulk),
        ]);
        let violations = audit_schedule(&schedule, &config);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::BreakTooShort);
    }

    #[test]
    fn test_audit_split_only_outside_fallback() {
        let a = ExamSection::new("1", "CSCI 1", "BSCS", 1);
        let b = ExamSection::new("2", "CSCI 1", "BSIT", 1);
        let config = SchedulerConfig::default();

        let fallback = schedule_of(vec![
            exam(a.clone(), 0, 0, "N-11", Phase::Fallback),
            exam(b.clone(), 0, 3, "N-11", Phase::Fallback),
        ]);
        assert!(audit_schedule(&fallback, &config).is_empty());

        let bulk = schedule_of(vec![
            exam(a, 0, 0, "N-11", Phase::Bulk),
            exam(b, 0, 3, "N-11", Phase::Bulk),
        ]);
        let violations = audit_schedule(&bulk, &config);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::SubjectSplit);
    }

    #[test]
    fn test_audit_multi_slot_overflow() {
        let double = ExamSection::new("1", "ARCH 1", "BSAR", 1).with_width(SlotWidth::Double);
        let schedule = schedule_of(vec![exam(double, 0, 7, "C-21", Phase::Bulk)]);
        let violations = audit_schedule(&schedule, &SchedulerConfig::default());
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::MultiSlotOverflow));
    }
}
