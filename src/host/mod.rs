//! 模拟宿主游戏服务器：会话、持久存储、以及发给客户端的表现事件。

pub mod attributes;
pub mod components;
pub mod events;
pub mod storage;
mod systems;

use bevy::prelude::*;
use components::*;
use events::*;
use storage::StorageWorld;
use systems::*;

/// 会话系统集合；需要在玩家实体消失前处理下线的系统排在它前面
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionSet;

pub struct HostPlugin;

impl Plugin for HostPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StorageWorld>()
            .init_resource::<SessionCounter>()
            .add_event::<PlayerConnected>()
            .add_event::<PlayerDisconnected>()
            .add_event::<SessionEnded>()
            .add_event::<ShowStorage>()
            .add_event::<PlaySound>()
            .add_event::<StatusMessage>()
            .add_event::<TextMessage>()
            // 会话事件不受 AppState 限制，加载期间也可能有人上线
            .add_systems(
                PreUpdate,
                (handle_connect, handle_disconnect).in_set(SessionSet),
            )
            .add_systems(
                PostUpdate,
                (present_storage, present_sound, present_messages),
            );
    }
}
