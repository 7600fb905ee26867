use bevy::prelude::*;

use super::resources::BackpackConfig;

/// 控制台输出一行
#[derive(Event, Debug, Clone, PartialEq)]
pub struct LogEvent(pub String);

/// 启动时打印当前配置摘要
pub fn announce_config(config: Res<BackpackConfig>, mut writer: EventWriter<LogEvent>) {
    writer.write(LogEvent(format!(
        "Backpacks 已启用：{} 格，命令 `{} open`",
        config.slots, config.command_prefix
    )));
}
