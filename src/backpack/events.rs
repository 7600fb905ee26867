use bevy::prelude::*;

/// 玩家手持物品按下右键
#[derive(Event, Debug, Clone)]
pub struct SecondaryAction {
    pub player: Entity,
}

/// 玩家在聊天框输入的命令（原样，含前缀）
#[derive(Event, Debug, Clone)]
pub struct PlayerCommand {
    pub player: Entity,
    pub command: String,
}

/// 为玩家执行一次“打开背包”
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenBackpack {
    pub player: Entity,
}
