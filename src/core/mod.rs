use bevy::prelude::*;

pub mod states;
pub mod events;
pub mod resources;

/// 核心插件：注册全局状态 / 日志事件 / 配置
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        app.init_state::<AppState>()
            .add_event::<events::LogEvent>()
            // main 里已经按配置文件插入时不覆盖
            .init_resource::<resources::BackpackConfig>()
            .add_systems(Startup, events::announce_config);
    }
}
