//! Room selection.
//!
//! For a section and a candidate period, lists the free rooms it may use,
//! best first.
//!
//! # Algorithm
//! 1. Allowed buildings: architecture subjects get the architecture
//!    buildings; others use the first department entry whose code occurs
//!    in the section's department; otherwise the default building set.
//! 2. Keep rooms in an allowed building that are free in the period (and,
//!    for double-width sections, in the following slot too).
//! 3. Order: the preferred architecture building first (architecture
//!    subjects only), then lower floor, then room id.

use std::cmp::Ordering;

use super::classify::is_architecture;
use crate::config::SchedulerConfig;
use crate::models::{ExamSection, Period, Room};
use crate::state::SchedulingState;

/// Room universe with precomputed building and floor.
#[derive(Debug, Clone)]
pub struct RoomSelector {
    rooms: Vec<Room>,
}

impl RoomSelector {
    /// Parses the room universe.
    pub fn new<I, S>(rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rooms: rooms.into_iter().map(Room::parse).collect(),
        }
    }

    /// All rooms.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Buildings a section may use.
    pub fn allowed_buildings<'c>(
        &self,
        section: &ExamSection,
        config: &'c SchedulerConfig,
    ) -> &'c [String] {
        let rules = &config.buildings;
        if is_architecture(&section.subject_id, config) {
            return &rules.architecture;
        }
        let department = section.department.to_uppercase();
        rules
            .by_department
            .iter()
            .find(|entry| !entry.department.is_empty() && department.contains(&entry.department))
            .map_or(&rules.default, |entry| &entry.buildings)
    }

    /// Eligible free rooms for `section` starting at `period`, best first.
    ///
    /// Empty if none is free, or if a double-width section would start in
    /// the day's final slot.
    pub fn candidates<'r>(
        &'r self,
        section: &ExamSection,
        period: Period,
        state: &SchedulingState,
        config: &SchedulerConfig,
    ) -> Vec<&'r Room> {
        if !fits_in_day(section, period, config) {
            return Vec::new();
        }

        let allowed = self.allowed_buildings(section, config);
        let mut free: Vec<&Room> = self
            .rooms
            .iter()
            .filter(|room| allowed.iter().any(|b| *b == room.building))
            .filter(|room| {
                (0..section.width.slots()).all(|offset| {
                    state.is_room_free(Period::new(period.day, period.slot + offset), &room.id)
                })
            })
            .collect();

        let preferred = is_architecture(&section.subject_id, config)
            .then_some(config.buildings.architecture_preferred.as_str());
        free.sort_by(|a, b| compare_rooms(a, b, preferred));
        free
    }
}

/// Whether every slot the section needs exists on the day.
pub fn fits_in_day(section: &ExamSection, period: Period, config: &SchedulerConfig) -> bool {
    period.slot + section.width.slots() <= config.slot_count()
}

fn compare_rooms(a: &Room, b: &Room, preferred: Option<&str>) -> Ordering {
    let rank = |room: &Room| match preferred {
        Some(building) if room.building == building => 0,
        Some(_) => 1,
        None => 0,
    };
    rank(a)
        .cmp(&rank(b))
        .then(a.floor.cmp(&b.floor))
        .then_with(|| a.id.cmp(&b.id))
}
