//! Round-robin interleaved seat allocation.
//!
//! Students are sorted by roll number, grouped by department in order of first
//! appearance, then dealt out row by row: the `i`-th member of group `g` goes
//! to room `(i + g) mod rooms`. The `+ g` offset rotates each department's
//! starting room so the same position of different departments lands in
//! different rooms.
//!
//! # Invariants
//! - Group order is an explicit insertion-ordered `Vec`, never map order.
//! - Seats in each room are `1..=k` without gaps, assigned at append time.
//! - `students_per_room` is advisory and never caps a room.

use crate::model::student::{SeatAssignment, StudentRecord};
use std::collections::HashMap;

/// Room count and advisory room size for one allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationOptions {
    rooms: usize,
    students_per_room: usize,
}

impl AllocationOptions {
    /// Builds options, flooring both values at 1.
    pub fn new(rooms: usize, students_per_room: usize) -> Self {
        Self {
            rooms: rooms.max(1),
            students_per_room: students_per_room.max(1),
        }
    }

    pub fn rooms(&self) -> usize {
        self.rooms
    }

    pub fn students_per_room(&self) -> usize {
        self.students_per_room
    }
}

/// Ordered seat assignments plus per-room occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingPlan {
    /// Room 1 first, then seat order within each room.
    pub assignments: Vec<SeatAssignment>,
    room_count: usize,
    /// Seated counts for the leading rooms that can receive anyone; every
    /// later room is empty.
    occupancy: Vec<usize>,
    students_per_room: usize,
}

impl SeatingPlan {
    pub fn room_count(&self) -> usize {
        self.room_count
    }

    /// Number of students seated in `room_index`, 0 for empty or unknown rooms.
    pub fn occupancy(&self, room_index: usize) -> usize {
        self.occupancy.get(room_index).copied().unwrap_or(0)
    }

    pub fn students_per_room(&self) -> usize {
        self.students_per_room
    }

    /// Zero-based indices of rooms holding more than the advisory size.
    pub fn rooms_over_capacity(&self) -> Vec<usize> {
        self.occupancy
            .iter()
            .enumerate()
            .filter(|(_, seated)| **seated > self.students_per_room)
            .map(|(index, _)| index)
            .collect()
    }

    /// Assignments of one room, in seat order.
    pub fn room(&self, room_index: usize) -> impl Iterator<Item = &SeatAssignment> {
        self.assignments
            .iter()
            .filter(move |assignment| assignment.room_index == room_index)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

struct DepartmentGroup<'a> {
    members: Vec<&'a StudentRecord>,
}

/// Groups roll-sorted students by department, in first-appearance order.
fn group_by_department<'a>(sorted: &[&'a StudentRecord]) -> Vec<DepartmentGroup<'a>> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<DepartmentGroup<'a>> = Vec::new();
    for student in sorted {
        let position = *positions
            .entry(student.department.as_str())
            .or_insert_with(|| {
                groups.push(DepartmentGroup {
                    members: Vec::new(),
                });
                groups.len() - 1
            });
        groups[position].members.push(*student);
    }
    groups
}

/// Seats `students` across `options.rooms()` rooms.
///
/// Rooms may stay empty when there are fewer students than rooms.
pub fn allocate_seats(students: &[StudentRecord], options: AllocationOptions) -> SeatingPlan {
    let mut sorted: Vec<&StudentRecord> = students.iter().collect();
    sorted.sort_by(|left, right| left.roll_number.cmp(&right.roll_number));

    let groups = group_by_department(&sorted);
    let max_group_size = groups
        .iter()
        .map(|group| group.members.len())
        .max()
        .unwrap_or(0);

    // (row + group_index) never reaches max_group_size + groups.len(), so rooms
    // past that bound stay empty and are not materialized.
    let reachable_rooms = options.rooms.min(max_group_size + groups.len());
    let mut rooms: Vec<Vec<SeatAssignment>> = vec![Vec::new(); reachable_rooms];
    for row in 0..max_group_size {
        for (group_index, group) in groups.iter().enumerate() {
            let Some(student) = group.members.get(row) else {
                continue;
            };
            let room_index = (row + group_index) % options.rooms;
            let seat = rooms[room_index].len() + 1;
            rooms[room_index].push(SeatAssignment {
                student: (*student).clone(),
                room_index,
                seat,
            });
        }
    }

    let occupancy = rooms.iter().map(Vec::len).collect();
    SeatingPlan {
        assignments: rooms.into_iter().flatten().collect(),
        room_count: options.rooms,
        occupancy,
        students_per_room: options.students_per_room,
    }
}
