//! Examination timetabling for the U-Engine ecosystem.
//!
//! Places exam sections into (day, slot, room) triples over a fixed
//! number of days. Rooms are never double-booked and a student cohort
//! never sits two exams without a break; sections of one subject sit
//! together wherever possible.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ExamSection`, `Cohort`, `Room`, `Period`,
//!   `ScheduledExam`, `ExamSchedule`, `Violation`
//! - **`config`**: `SchedulerConfig`, the injected slot table and policy tables
//! - **`eligibility`**: Which sections take part in scheduling
//! - **`conflict`**: Per-cohort subject conflict matrix
//! - **`state`**: Run-scoped bookkeeping threaded through the phases
//! - **`scheduler`**: Room selection, group placement, the four phases, KPIs
//! - **`validation`**: Input integrity checks and schedule audits
//! - **`error`**: Configuration errors
//!
//! # Example
//!
//! ```
//! use u_exam_schedule::config::SchedulerConfig;
//! use u_exam_schedule::models::{standard_rooms, ExamSection};
//! use u_exam_schedule::scheduler::ExamScheduler;
//! use u_exam_schedule::validation::audit_schedule;
//!
//! let sections = vec![
//!     ExamSection::new("1", "MATH 1013", "BSCS", 1).with_department("SACE"),
//!     ExamSection::new("2", "ENGL 1013", "BSCS", 1).with_department("SHAS"),
//! ];
//! let scheduler = ExamScheduler::new(SchedulerConfig::default());
//! let schedule = scheduler.schedule(&sections, &standard_rooms(), 3);
//!
//! assert!(schedule.is_complete());
//! assert!(audit_schedule(&schedule, scheduler.config()).is_empty());
//! ```
//!
//! # References
//!
//! - Carter, Laporte & Lee (1996), "Examination Timetabling: Algorithmic
//!   Strategies and Applications"
//! - Qu et al. (2009), "A survey of search methodologies and automated
//!   system development for examination timetabling"

pub mod config;
pub mod conflict;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod state;
pub mod validation;
