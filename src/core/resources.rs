use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;
use serde::Deserialize;

use crate::host::storage::MAX_STORAGE_CAPACITY;

/// 插件配置（assets/config/backpacks.toml）
///
/// 所有字段都有默认值，配置文件里只需写要覆盖的部分。
#[derive(Resource, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackpackConfig {
    /// 自定义物品的唯一 ID
    pub item_id: String,
    /// 每个背包的容量
    pub slots: u32,
    /// 物品属性里保存存储 ID 的键
    pub attribute_key: String,
    pub command_prefix: String,
    pub open_sound: String,
    pub broken_message: String,
    pub broken_message_secs: f32,
    pub reject_message: String,
    pub catalog_path: String,
}

impl Default for BackpackConfig {
    fn default() -> Self {
        Self {
            item_id: "main.backpacks.custombackpack".into(),
            slots: 48,
            attribute_key: "backpack_id".into(),
            command_prefix: "/bp".into(),
            open_sound: "donkey_panniers".into(),
            broken_message: "This backpack is broken!".into(),
            broken_message_secs: 2.0,
            reject_message: "SYSTEM: Backpacks cannot be added to this storage unit!".into(),
            catalog_path: "data/backpacks.ron".into(),
        }
    }
}

impl BackpackConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("无法解析 backpacks.toml")?;
        anyhow::ensure!(config.slots > 0, "slots 必须大于 0");
        anyhow::ensure!(
            config.slots <= MAX_STORAGE_CAPACITY,
            "slots 不能超过 {MAX_STORAGE_CAPACITY}"
        );
        anyhow::ensure!(
            !config.attribute_key.is_empty(),
            "attribute_key 不能为空"
        );
        Ok(config)
    }

    /// 读取配置文件；文件不存在时退回默认值
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            warn!("未找到配置 {}，使用默认值", path.display());
            return Ok(Self::default());
        }
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取 {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("配置文件 {} 无效", path.display()))
    }
}
