//! Greedy exam scheduler and KPI evaluation.
//!
//! # Structure
//!
//! - `classify`: subject classes and subject grouping
//! - `rooms`: building allow-lists and room ranking
//! - `placement`: cohort legality check and the atomic group placement primitive
//! - `phases`: the four placement phases
//! - `exam`: the run driver, [`ExamScheduler`]
//! - `kpi`: [`ScheduleKpi`]
//!
//! # Algorithm
//!
//! First-fit greedy placement in four strictly sequential phases. Every
//! commit goes through [`Placer::try_schedule_group`], which places all
//! sections of a subject in one period or none of them. Only the last
//! phase places sections one by one.
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated
//! timetabling", EJOR 140(2)

mod classify;
mod exam;
mod kpi;
mod phases;
mod placement;
mod rooms;

pub use classify::{classify, group_by_subject, is_architecture, SubjectClass, SubjectGroup};
pub use exam::{ExamScheduler, ScheduleRequest};
pub use kpi::ScheduleKpi;
pub use phases::{
    bulk_phase, day_order, fallback_phase, gen_ed_phase, high_priority_phase, FallbackOutcome,
    PhaseOutcome,
};
pub use placement::Placer;
pub use rooms::{fits_in_day, RoomSelector};
