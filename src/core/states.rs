use bevy::prelude::*;

/// 插件运行的大状态
///
/// Loading 期间加载物品目录并完成注册，进入 InGame 后才处理玩家事件。
#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Startup,
    Loading,
    InGame,
    Shutdown,
}
