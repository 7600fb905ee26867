use bevy::prelude::*;

use crate::host::storage::StorageHandle;

#[derive(Event, Debug, Clone)]
pub struct GiveItemEvent {
    pub player: Entity,
    pub id: String,
    pub count: u32,
    /// 仅对背包有效
    pub variation: u8,
}

/// 让 CLI 请求打印物品栏
#[derive(Event, Debug, Clone, Copy)]
pub struct ListInventoryEvent {
    pub player: Entity,
}

/// 把物品栏某格放进一个存储（箱子或背包）
#[derive(Event, Debug, Clone, Copy)]
pub struct InventoryToChestEvent {
    pub player: Entity,
    pub index: usize,
    pub chest: StorageHandle,
}
