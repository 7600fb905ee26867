use bevy::prelude::*;

/// 标记：该物品实体是背包，variation 为颜色变体（0 = 默认）
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackpackItem {
    pub variation: u8,
}
