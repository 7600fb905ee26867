use std::num::NonZero;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

mod backpack;
mod core;
mod data;
mod equipment;
mod host;
mod interface;
mod inventory;
mod registry;

use crate::core::CorePlugin;
use crate::core::resources::BackpackConfig;
use crate::core::states;
use crate::interface::debug_cli::DebugCliPlugin;

const CONFIG_PATH: &str = "assets/config/backpacks.toml";
/// 服务器逻辑帧率
const TICKS_PER_SECOND: f64 = 20.0;

fn main() -> anyhow::Result<()> {
    let config = BackpackConfig::load(Path::new(CONFIG_PATH)).context("加载配置失败")?;

    let exit = App::new()
        // 无窗口：服务器插件只跑逻辑帧
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / TICKS_PER_SECOND,
            ))),
            AssetPlugin::default(),
            StatesPlugin,
            LogPlugin::default(),
        ))
        .insert_resource(config)
        .add_plugins(CorePlugin)
        .add_plugins(host::HostPlugin)
        .add_plugins(data::DataPlugin)
        .add_plugins((
            inventory::InventoryPlugin,
            equipment::EquipmentPlugin,
            backpack::BackpackPlugin,
        ))
        .add_plugins(DebugCliPlugin)
        .add_systems(Update, forward_log_event) // 简单打印
        .add_systems(Startup, |mut next: ResMut<NextState<states::AppState>>| {
            next.set(states::AppState::Loading);
        })
        .add_systems(OnEnter(states::AppState::Shutdown), shutdown)
        .run();

    anyhow::ensure!(exit.is_success(), "插件异常退出：{exit:?}");
    Ok(())
}

fn forward_log_event(mut reader: EventReader<crate::core::events::LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}

/// 注册表不存在说明加载失败，以错误码退出
fn shutdown(mut exit: EventWriter<AppExit>, items: Option<Res<registry::ItemRegistry>>) {
    if items.is_some() {
        exit.write(AppExit::Success);
    } else {
        exit.write(AppExit::Error(NonZero::<u8>::MIN));
    }
}
