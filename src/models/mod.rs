//! Examination timetabling domain models.
//!
//! Provides the input records (sections, rooms) and the output of a
//! scheduling run (placements, unplaced sections, violations).
//!
//! # Domain Mappings
//!
//! | u-exam-schedule | Generic scheduling |
//! |-----------------|--------------------|
//! | ExamSection | Activity |
//! | Subject (shared `subject_id`) | Task |
//! | Room | Resource |
//! | Period | Time bucket |
//! | Cohort | Disjunctive resource |

mod room;
mod schedule;
mod section;

pub use room::{standard_rooms, Room};
pub use schedule::{
    ExamSchedule, ExcludedSection, ExclusionReason, FailureReason, Period, Phase, PhaseReport,
    ScheduledExam, Unplaced, Violation, ViolationType,
};
pub use section::{Cohort, ExamSection, SlotWidth};
