//! 宿主侧的持久存储：每个存储由整数 ID 标识，内容归宿主所有。

use std::collections::BTreeMap;
use std::fmt;

use bevy::prelude::*;
use thiserror::Error;

/// 宿主存储的不透明 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageHandle(pub u32);

impl fmt::Display for StorageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 单个存储的最大格数
pub const MAX_STORAGE_CAPACITY: u32 = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("storage capacity must be positive")]
    ZeroCapacity,
    #[error("storage capacity {0} exceeds {MAX_STORAGE_CAPACITY}")]
    TooLarge(u32),
    #[error("no storage ids left")]
    Exhausted,
}

/// 宿主提供的“新建存储”能力
pub trait StorageHost {
    fn create_storage(&mut self, capacity: u32) -> Result<StorageHandle, HostError>;
}

/// 一个存储容器，格子里放的是物品实体
#[derive(Debug, Clone)]
pub struct StorageContainer {
    pub slots: Vec<Option<Entity>>,
}

impl StorageContainer {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// 放进第一个空格，返回格子下标；满了返回 None
    pub fn insert(&mut self, item: Entity) -> Option<usize> {
        let (idx, slot) = self.slots.iter_mut().enumerate().find(|(_, s)| s.is_none())?;
        *slot = Some(item);
        Some(idx)
    }
}

#[derive(Resource, Debug)]
pub struct StorageWorld {
    containers: BTreeMap<StorageHandle, StorageContainer>,
    next_id: u32,
}

impl Default for StorageWorld {
    fn default() -> Self {
        Self {
            containers: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl StorageWorld {
    pub fn get(&self, handle: StorageHandle) -> Option<&StorageContainer> {
        self.containers.get(&handle)
    }

    pub fn get_mut(&mut self, handle: StorageHandle) -> Option<&mut StorageContainer> {
        self.containers.get_mut(&handle)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StorageHandle, &StorageContainer)> {
        self.containers.iter()
    }
}

impl StorageHost for StorageWorld {
    fn create_storage(&mut self, capacity: u32) -> Result<StorageHandle, HostError> {
        if capacity == 0 {
            return Err(HostError::ZeroCapacity);
        }
        if capacity > MAX_STORAGE_CAPACITY {
            return Err(HostError::TooLarge(capacity));
        }
        let handle = StorageHandle(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(HostError::Exhausted)?;
        self.containers.insert(
            handle,
            StorageContainer {
                slots: vec![None; capacity as usize],
            },
        );
        debug!("新建存储 #{handle}，容量 {capacity}");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_distinct() {
        let mut world = StorageWorld::default();
        let a = world.create_storage(48).unwrap();
        let b = world.create_storage(48).unwrap();
        assert_eq!(a, StorageHandle(1));
        assert_eq!(b, StorageHandle(2));
        assert_eq!(world.get(a).unwrap().capacity(), 48);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut world = StorageWorld::default();
        assert_eq!(world.create_storage(0), Err(HostError::ZeroCapacity));
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        let mut world = StorageWorld::default();
        assert_eq!(
            world.create_storage(4_000_000_000),
            Err(HostError::TooLarge(4_000_000_000))
        );
        assert!(world.create_storage(MAX_STORAGE_CAPACITY).is_ok());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn insert_fills_first_free_slot_then_reports_full() {
        let mut container = StorageContainer {
            slots: vec![None; 2],
        };
        let e = Entity::from_raw(7);
        assert_eq!(container.insert(e), Some(0));
        assert_eq!(container.insert(e), Some(1));
        assert_eq!(container.insert(e), None);
        assert_eq!(container.occupied(), 2);
    }
}
