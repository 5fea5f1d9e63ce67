// 🔗 Association Index - room id → students in that room
// Built once per run, read-only afterwards.

use crate::records::{Room, RoomId, Student, StudentSummary};
use std::collections::{HashMap, HashSet};

// ============================================================================
// ASSOCIABLE
// ============================================================================

/// A record that belongs to a room and can be listed under it.
pub trait Associable {
    /// Room this record points at
    fn room_key(&self) -> RoomId;

    /// What gets attached to the room
    fn project(&self) -> StudentSummary;
}

impl Associable for Student {
    fn room_key(&self) -> RoomId {
        self.room
    }

    fn project(&self) -> StudentSummary {
        self.summary()
    }
}

// ============================================================================
// INDEX
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationIndex {
    groups: HashMap<RoomId, Vec<StudentSummary>>,
}

impl AssociationIndex {
    /// Group `records` by room key.
    ///
    /// Stable sort by room, then one linear pass cutting runs of equal keys.
    /// Stability keeps each group in input order.
    pub fn build<T: Associable>(records: &[T]) -> Self {
        let mut sorted: Vec<&T> = records.iter().collect();
        sorted.sort_by_key(|record| record.room_key());

        let mut groups: HashMap<RoomId, Vec<StudentSummary>> = HashMap::new();
        let mut current: Option<(RoomId, Vec<StudentSummary>)> = None;

        for record in sorted {
            let key = record.room_key();
            if let Some((room, members)) = current.as_mut() {
                if *room == key {
                    members.push(record.project());
                    continue;
                }
            }

            if let Some((room, members)) = current.replace((key, vec![record.project()])) {
                groups.insert(room, members);
            }
        }

        if let Some((room, members)) = current {
            groups.insert(room, members);
        }

        AssociationIndex { groups }
    }

    /// Students of `room`, empty when nobody points at it
    pub fn lookup(&self, room: RoomId) -> &[StudentSummary] {
        self.groups.get(&room).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct room ids referenced
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Referenced room ids, ascending
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.groups.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn total_students(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Indexed students whose room is not among `rooms`
    pub fn unmatched(&self, rooms: &[Room]) -> usize {
        let known: HashSet<RoomId> = rooms.iter().map(|room| room.id).collect();
        self.groups
            .iter()
            .filter(|(room, _)| !known.contains(room))
            .map(|(_, members)| members.len())
            .sum()
    }
}
