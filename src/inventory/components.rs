use bevy::prelude::*;

/// 每个玩家的物品栏格数
pub const INVENTORY_SLOTS: usize = 30;

/// 物品实例（背包额外带 BackpackItem + ItemAttributes）
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub count: u32,
}

/// 玩家物品栏，格子里存物品实体
#[derive(Component, Debug, Clone)]
pub struct Inventory {
    pub slots: Vec<Option<Entity>>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: vec![None; INVENTORY_SLOTS],
        }
    }
}

impl Inventory {
    /// 放进第一个空格
    pub fn insert(&mut self, item: Entity) -> Option<usize> {
        let (idx, slot) = self.slots.iter_mut().enumerate().find(|(_, s)| s.is_none())?;
        *slot = Some(item);
        Some(idx)
    }

    pub fn get(&self, index: usize) -> Option<Entity> {
        self.slots.get(index).copied().flatten()
    }

    pub fn take(&mut self, index: usize) -> Option<Entity> {
        self.slots.get_mut(index)?.take()
    }

    /// 所有已占用格子里的物品
    pub fn items(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}
