use std::collections::BTreeMap;

use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde::Deserialize;

/// 语言代码 -> 文本，例如 "en" -> "Backpack"
pub type Localized = BTreeMap<String, String>;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelEntry {
    pub model: String,
    pub texture: String,
    #[serde(default = "one")]
    pub scale: f32,
}

fn one() -> f32 {
    1.0
}

fn one_u32() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VariationEntry {
    pub index: u8,
    pub texture: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ItemEntry {
    pub id: String,
    /// 内部名，命令里也可以用它
    pub name: String,
    pub names: Localized,
    pub model: ModelEntry,
    pub icon: String,
    #[serde(default = "one_u32")]
    pub max_stack: u32,
    #[serde(default)]
    pub idle_animation: Option<String>,
    #[serde(default)]
    pub variations: Vec<VariationEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecipeEntry {
    /// 产出的自定义物品 ID
    pub item: String,
    pub workbench: String,
    pub categories: Localized,
    #[serde(default = "one")]
    pub preview_size: f32,
    /// "<数量>x <物品>"
    pub ingredients: Vec<String>,
    /// 可含 {slots} 占位符
    #[serde(default)]
    pub descriptions: Localized,
}

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct Catalog {
    pub items: Vec<ItemEntry>,
    #[serde(default)]
    pub recipes: Vec<RecipeEntry>,
}
