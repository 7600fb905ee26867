use bevy::prelude::*;

/// 简化为只有手持一格；手上的物品就是“装备中的物品”
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Equipment {
    pub hand: Option<Entity>,
}
