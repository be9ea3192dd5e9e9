use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use poise::serenity_prelude::{ChannelId, UserId};

use crate::models::ManagedRoom;

#[derive(Debug, Default)]
struct RoomTables {
    /// Rooms under management
    managed: HashMap<ChannelId, ManagedRoom>,
    /// Owner to room; every value is a key of `managed`
    member_rooms: HashMap<UserId, ChannelId>,
    /// Members whose room is being created
    provisioning: HashSet<UserId>,
}

impl RoomTables {
    fn occupied_slots(&self) -> usize {
        self.managed.len() + self.provisioning.len()
    }
}

/// Why a member could not be admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    AtCapacity,
    AlreadyProvisioning,
}

/// In-memory record of managed rooms and who owns them.
///
/// All mutations happen under one short lock that is never held across an
/// await, so each transition is observed as a whole by concurrent events.
#[derive(Debug)]
pub struct RoomRegistry {
    tables: Mutex<RoomTables>,
    max_rooms: Option<usize>,
}

impl RoomRegistry {
    pub fn new(max_rooms: Option<usize>) -> Self {
        Self {
            tables: Mutex::new(RoomTables::default()),
            max_rooms,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RoomTables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn max_rooms(&self) -> Option<usize> {
        self.max_rooms
    }

    pub fn len(&self) -> usize {
        self.lock().managed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().managed.is_empty()
    }

    pub fn is_managed(&self, channel_id: ChannelId) -> bool {
        self.lock().managed.contains_key(&channel_id)
    }

    pub fn room_of(&self, user_id: UserId) -> Option<ChannelId> {
        self.lock().member_rooms.get(&user_id).copied()
    }

    #[cfg(test)]
    pub fn rooms(&self) -> Vec<ManagedRoom> {
        self.lock().managed.values().cloned().collect()
    }

    /// Stop managing a room and drop every owner entry pointing at it.
    /// Returns whether the room was managed.
    pub fn forget_room(&self, channel_id: ChannelId) -> bool {
        let mut tables = self.lock();
        let was_managed = tables.managed.remove(&channel_id).is_some();
        tables.member_rooms.retain(|_, room| *room != channel_id);
        was_managed
    }

    /// Claim a provisioning slot for a member, counting rooms still being
    /// created against the ceiling.
    pub fn try_reserve(&self, user_id: UserId) -> Result<Reservation<'_>, AdmissionError> {
        let mut tables = self.lock();
        if tables.provisioning.contains(&user_id) {
            return Err(AdmissionError::AlreadyProvisioning);
        }
        if let Some(max) = self.max_rooms
            && tables.occupied_slots() >= max
        {
            return Err(AdmissionError::AtCapacity);
        }
        tables.provisioning.insert(user_id);

        Ok(Reservation {
            registry: self,
            user_id,
            committed: false,
        })
    }

    /// Manage an existing room without an owner. Fails when at capacity.
    pub fn adopt(&self, channel_id: ChannelId) -> Result<(), AdmissionError> {
        let mut tables = self.lock();
        if tables.managed.contains_key(&channel_id) {
            return Ok(());
        }
        if let Some(max) = self.max_rooms
            && tables.occupied_slots() >= max
        {
            return Err(AdmissionError::AtCapacity);
        }
        tables.managed.insert(
            channel_id,
            ManagedRoom {
                room_id: channel_id,
                owner_id: None,
            },
        );
        Ok(())
    }

    #[cfg(test)]
    pub fn assert_consistent(&self) {
        let tables = self.lock();
        let mut seen = HashSet::new();
        for room in tables.member_rooms.values() {
            assert!(tables.managed.contains_key(room), "owner entry for unmanaged room {room}");
            assert!(seen.insert(*room), "room {room} has more than one owner");
        }
        if let Some(max) = self.max_rooms {
            assert!(tables.managed.len() <= max, "managed rooms exceed the ceiling");
        }
    }
}

/// A provisioning slot held while a member's room is created.
/// Dropping it without committing releases the slot.
#[derive(Debug)]
pub struct Reservation<'a> {
    registry: &'a RoomRegistry,
    user_id: UserId,
    committed: bool,
}

impl Reservation<'_> {
    /// Register the created room for the member
    pub fn commit(mut self, room_id: ChannelId) {
        let mut tables = self.registry.lock();
        tables.provisioning.remove(&self.user_id);
        tables.managed.insert(
            room_id,
            ManagedRoom {
                room_id,
                owner_id: Some(self.user_id),
            },
        );
        if let Some(previous) = tables.member_rooms.insert(self.user_id, room_id)
            && previous != room_id
        {
            tables.managed.remove(&previous);
        }
        self.committed = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.registry.lock().provisioning.remove(&self.user_id);
        }
    }
}
