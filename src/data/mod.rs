pub mod schema;
pub mod loader;

use bevy::asset::LoadState;
use bevy::prelude::*;
use schema::Catalog;
use crate::core::{events::LogEvent, resources::BackpackConfig, states::AppState};
use crate::registry;

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct CatalogAssets {
    handle: Option<Handle<Catalog>>,
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<Catalog>()
            .register_asset_loader(loader::RonCatalogLoader)
            .init_resource::<CatalogAssets>()
            // Loading 流程：加载完成后注册物品和配方
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(
                Update,
                check_loaded.run_if(in_state(AppState::Loading)),
            );
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut catalog_assets: ResMut<CatalogAssets>,
    asset_server: Res<AssetServer>,
    config: Res<BackpackConfig>,
) {
    let handle: Handle<Catalog> = asset_server.load(config.catalog_path.clone());
    catalog_assets.handle = Some(handle);
}

fn check_loaded(
    mut commands: Commands,
    mut next: ResMut<NextState<AppState>>,
    mut log: EventWriter<LogEvent>,
    catalog_assets: Res<CatalogAssets>,
    catalogs: Res<Assets<Catalog>>,
    asset_server: Res<AssetServer>,
    config: Res<BackpackConfig>,
) {
    let Some(handle) = &catalog_assets.handle else {
        return;
    };
    if matches!(asset_server.load_state(handle), LoadState::Failed(_)) {
        error!("物品目录 {} 加载失败", config.catalog_path);
        next.set(AppState::Shutdown);
        return;
    }
    let Some(catalog) = catalogs.get(handle) else {
        return;
    };

    match registry::register_catalog(catalog, &config) {
        Ok((items, recipes)) => {
            log.write(LogEvent(format!(
                "✔ 已注册 {} 个物品、{} 个配方",
                items.len(),
                recipes.len()
            )));
            commands.insert_resource(items);
            commands.insert_resource(recipes);
            next.set(AppState::InGame);
        }
        Err(e) => {
            error!("物品目录无效：{e}");
            next.set(AppState::Shutdown);
        }
    }
}
