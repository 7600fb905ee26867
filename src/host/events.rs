use bevy::prelude::*;

use super::components::SessionId;
use super::storage::StorageHandle;

/* ---------------------------- 会话生命周期 ---------------------------- */

#[derive(Event, Debug, Clone)]
pub struct PlayerConnected {
    pub name: String,
}

#[derive(Event, Debug, Clone)]
pub struct PlayerDisconnected {
    pub player: Entity,
}

/// 玩家实体已移除，只剩会话 ID
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnded {
    pub session: SessionId,
}

/* ---------------------------- 表现层副作用 ---------------------------- */

/// 给玩家打开存储界面
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ShowStorage {
    pub player: Entity,
    pub handle: StorageHandle,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlaySound {
    pub player: Entity,
    pub sound: String,
}

/// 屏幕中央的状态提示，持续 seconds 秒
#[derive(Event, Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub player: Entity,
    pub text: String,
    pub seconds: f32,
}

/// 聊天框文字
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TextMessage {
    pub player: Entity,
    pub text: String,
}
