//! Room model.
//!
//! Rooms are identified by strings of the form `<Building>-<Number>`
//! (e.g., `A-101`, `N-23`). Building and floor are derived from the
//! identifier; rooms are binary occupied/free with no capacity.

use serde::{Deserialize, Serialize};

/// An examination room with its derived location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier as supplied (e.g., "A-101").
    pub id: String,
    /// Building code: the leading uppercase letters before `-`. Empty if malformed.
    pub building: String,
    /// Floor: first digit of the room number when it has at least two digits, else 0.
    pub floor: u32,
}

impl Room {
    /// Parses a room identifier.
    ///
    /// Never fails: identifiers not following the convention yield an empty
    /// building (and are therefore never eligible) and floor 0.
    pub fn parse(id: impl Into<String>) -> Self {
        let id = id.into();
        let building = building_of(&id).to_string();
        let floor = floor_of(&id);
        Self {
            id,
            building,
            floor,
        }
    }

    /// Whether the identifier follows the `<Building>-<Number>` convention.
    pub fn is_well_formed(&self) -> bool {
        !self.building.is_empty()
            && self
                .id
                .split_once('-')
                .is_some_and(|(_, n)| n.starts_with(|c: char| c.is_ascii_digit()))
    }
}

/// Leading uppercase run, only if directly followed by `-`.
fn building_of(id: &str) -> &str {
    let end = id
        .char_indices()
        .find(|(_, c)| !c.is_ascii_uppercase())
        .map_or(id.len(), |(i, _)| i);
    if end > 0 && id[end..].starts_with('-') {
        &id[..end]
    } else {
        ""
    }
}

/// First digit after a `-` that is followed by another digit.
fn floor_of(id: &str) -> u32 {
    let bytes = id.as_bytes();
    bytes
        .windows(3)
        .find(|w| w[0] == b'-' && w[1].is_ascii_digit() && w[2].is_ascii_digit())
        .map_or(0, |w| u32::from(w[1] - b'0'))
}

/// The institution's standard examination room universe.
///
/// Building A (three floors), main-campus buildings C, N, K, J, B and
/// the satellite buildings L and M.
pub fn standard_rooms() -> Vec<String> {
    let numbered = |building: &str, numbers: std::ops::RangeInclusive<u32>| {
        numbers
            .map(|n| format!("{building}-{n}"))
            .collect::<Vec<_>>()
    };

    let mut rooms = Vec::new();
    rooms.extend(numbered("A", 101..=115));
    rooms.extend(numbered("A", 201..=216));
    rooms.extend(numbered("A", 301..=316));
    rooms.extend(numbered("C", 21..=25));
    rooms.extend(numbered("N", 11..=15));
    rooms.extend(numbered("N", 21..=28));
    rooms.extend(numbered("N", 31..=40));
    rooms.extend(numbered("K", 11..=13));
    rooms.extend(numbered("K", 21..=25));
    rooms.extend(numbered("K", 31..=35));
    rooms.extend(
        ["J-11", "J-12", "J-21", "J-22", "J-31", "J-32", "B-11", "B-21"].map(String::from),
    );
    rooms.extend(numbered("L", 11..=15));
    rooms.extend(numbered("L", 21..=24));
    rooms.extend(numbered("M", 11..=14));
    rooms.extend(numbered("M", 21..=23));
    rooms
}
