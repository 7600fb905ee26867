use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy)]
pub struct EquipEvent {
    pub player: Entity,
    pub index: usize, // 物品栏索引
}

#[derive(Event, Debug, Clone, Copy)]
pub struct UnequipEvent {
    pub player: Entity,
}
