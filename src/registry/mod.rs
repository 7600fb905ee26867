//! 自定义物品与配方的注册表，由物品目录填充。

pub mod recipe;

use std::collections::BTreeSet;

use bevy::prelude::*;
use thiserror::Error;
use uuid::Uuid;

use crate::core::resources::BackpackConfig;
use crate::data::schema::{Catalog, Localized};
use recipe::{Ingredient, format_description, parse_ingredient};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("item `{0}` is registered twice")]
    DuplicateItem(String),
    #[error("item `{id}` has invalid max stack size {max_stack}")]
    InvalidStackSize { id: String, max_stack: u32 },
    #[error("item `{id}` has invalid or duplicate variation {index}")]
    BadVariation { id: String, index: u8 },
    #[error("backpack item `{0}` is missing from the catalog")]
    MissingBackpack(String),
    #[error("backpack item `{0}` must not stack")]
    StackableBackpack(String),
    #[error("recipe produces unknown item `{0}`")]
    UnknownRecipeItem(String),
    #[error("malformed ingredient `{0}`")]
    BadIngredient(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredItem {
    pub id: String,
    pub name: String,
    pub uuid: Uuid,
    pub names: Localized,
    pub max_stack: u32,
    pub model_scale: f32,
    pub idle_animation: Option<String>,
    pub variations: Vec<u8>,
    /// 模型、贴图、图标及各变体贴图的路径
    pub assets: Vec<String>,
}

impl RegisteredItem {
    /// 英文名优先，否则内部名
    pub fn display_name(&self) -> &str {
        self.names.get("en").unwrap_or(&self.name)
    }

    #[cfg(test)]
    pub fn test_backpack() -> Self {
        let id = "main.backpacks.custombackpack".to_string();
        Self {
            uuid: uuid_from_id(&id),
            id,
            name: "backpack".into(),
            names: [("en".to_string(), "Backpack".to_string())].into(),
            max_stack: 1,
            model_scale: 2.46,
            idle_animation: Some("HoldPelt1".into()),
            variations: vec![1, 2, 3, 4],
            assets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredRecipe {
    pub item: String,
    pub workbench: String,
    pub categories: Localized,
    pub preview_size: f32,
    pub ingredients: Vec<Ingredient>,
    /// 直接沿用物品的本地化名称
    pub names: Localized,
    pub descriptions: Localized,
}

#[derive(Resource, Debug, Default)]
pub struct ItemRegistry {
    items: Vec<RegisteredItem>,
}

impl ItemRegistry {
    pub fn from_items(items: impl IntoIterator<Item = RegisteredItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// 按 id / 内部名 / uuid 查找，忽略大小写
    pub fn find(&self, token: &str) -> Option<&RegisteredItem> {
        self.items.iter().find(|e| {
            e.id.eq_ignore_ascii_case(token)
                || e.name.eq_ignore_ascii_case(token)
                || e.uuid.to_string() == token.to_lowercase()
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Resource, Debug, Default)]
pub struct RecipeRegistry {
    recipes: Vec<RegisteredRecipe>,
}

impl RecipeRegistry {
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredRecipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// 是否出现在任何配方的材料里
    pub fn is_ingredient(&self, item: &str) -> bool {
        self.recipes
            .iter()
            .flat_map(|r| &r.ingredients)
            .any(|i| i.item.eq_ignore_ascii_case(item))
    }
}

pub fn uuid_from_id(id: &str) -> Uuid {
    // 固定 namespace + id 生成 v5 UUID，重启后不变
    Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes())
}

/// 校验目录并生成两个注册表
pub fn register_catalog(
    catalog: &Catalog,
    config: &BackpackConfig,
) -> Result<(ItemRegistry, RecipeRegistry), CatalogError> {
    let mut items = Vec::with_capacity(catalog.items.len());
    for entry in &catalog.items {
        if items.iter().any(|i: &RegisteredItem| i.id == entry.id) {
            return Err(CatalogError::DuplicateItem(entry.id.clone()));
        }
        if entry.max_stack == 0 {
            return Err(CatalogError::InvalidStackSize {
                id: entry.id.clone(),
                max_stack: entry.max_stack,
            });
        }
        let mut seen = BTreeSet::new();
        for v in &entry.variations {
            // 0 是默认外观
            if v.index == 0 || !seen.insert(v.index) {
                return Err(CatalogError::BadVariation {
                    id: entry.id.clone(),
                    index: v.index,
                });
            }
        }
        let mut assets = vec![
            entry.model.model.clone(),
            entry.model.texture.clone(),
            entry.icon.clone(),
        ];
        for v in &entry.variations {
            assets.push(v.texture.clone());
            assets.push(v.icon.clone());
        }
        items.push(RegisteredItem {
            id: entry.id.clone(),
            name: entry.name.clone(),
            uuid: uuid_from_id(&entry.id),
            names: entry.names.clone(),
            max_stack: entry.max_stack,
            model_scale: entry.model.scale,
            idle_animation: entry.idle_animation.clone(),
            variations: seen.into_iter().collect(),
            assets,
        });
    }

    // 每个背包实例各自绑定一个存储，不能堆叠
    let backpack = items
        .iter()
        .find(|i| i.id == config.item_id)
        .ok_or_else(|| CatalogError::MissingBackpack(config.item_id.clone()))?;
    if backpack.max_stack != 1 {
        return Err(CatalogError::StackableBackpack(backpack.id.clone()));
    }

    let mut recipes = Vec::with_capacity(catalog.recipes.len());
    for entry in &catalog.recipes {
        let item = items
            .iter()
            .find(|i| i.id == entry.item)
            .ok_or_else(|| CatalogError::UnknownRecipeItem(entry.item.clone()))?;
        let ingredients = entry
            .ingredients
            .iter()
            .map(|s| parse_ingredient(s))
            .collect::<Result<Vec<_>, _>>()?;
        recipes.push(RegisteredRecipe {
            item: item.id.clone(),
            workbench: entry.workbench.clone(),
            categories: entry.categories.clone(),
            preview_size: entry.preview_size,
            ingredients,
            names: item.names.clone(),
            descriptions: entry
                .descriptions
                .iter()
                .map(|(lang, text)| (lang.clone(), format_description(text, config.slots)))
                .collect(),
        });
    }

    for item in &items {
        info!("注册物品 {} ({})", item.id, item.uuid);
    }
    for recipe in &recipes {
        info!("注册配方 {} @ {}", recipe.item, recipe.workbench);
    }

    Ok((ItemRegistry { items }, RecipeRegistry { recipes }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_catalog;

    fn bundled() -> Catalog {
        parse_catalog(include_str!("../../assets/data/backpacks.ron")).unwrap()
    }

    #[test]
    fn bundled_catalog_registers() {
        let (items, recipes) = register_catalog(&bundled(), &BackpackConfig::default()).unwrap();
        let bag = items.find("backpack").unwrap();
        assert_eq!(bag.id, "main.backpacks.custombackpack");
        assert_eq!(bag.display_name(), "Backpack");
        assert_eq!(bag.variations, vec![1, 2, 3, 4]);
        assert_eq!(bag.assets.len(), 3 + 4 * 2);
        assert_eq!(bag.assets[0], "assets/backpack.obj");
        assert_eq!(items.find(&bag.uuid.to_string()), Some(bag));

        let recipe = recipes.iter().next().unwrap();
        assert_eq!(recipe.names, bag.names);
        assert_eq!(
            recipe.ingredients[0],
            Ingredient {
                count: 200,
                item: "aluminiumingot".into()
            }
        );
        assert!(recipe.descriptions["en"].contains("48 items"));
        assert!(recipes.is_ingredient("cloth"));
        assert!(!recipes.is_ingredient("backpack"));
    }

    #[test]
    fn description_follows_configured_slots() {
        let config = BackpackConfig {
            slots: 24,
            ..Default::default()
        };
        let (_, recipes) = register_catalog(&bundled(), &config).unwrap();
        let recipe = recipes.iter().next().unwrap();
        assert!(recipe.descriptions["de"].contains("24"));
    }

    #[test]
    fn uuid_is_stable() {
        assert_eq!(uuid_from_id("a"), uuid_from_id("a"));
        assert_ne!(uuid_from_id("a"), uuid_from_id("b"));
    }

    #[test]
    fn missing_backpack_is_rejected() {
        let config = BackpackConfig {
            item_id: "other".into(),
            ..Default::default()
        };
        assert_eq!(
            register_catalog(&bundled(), &config).unwrap_err(),
            CatalogError::MissingBackpack("other".into())
        );
    }

    #[test]
    fn stackable_backpack_is_rejected() {
        let mut catalog = bundled();
        catalog.items[0].max_stack = 5;
        assert!(matches!(
            register_catalog(&catalog, &BackpackConfig::default()),
            Err(CatalogError::StackableBackpack(_))
        ));
    }

    #[test]
    fn duplicate_variation_is_rejected() {
        let mut catalog = bundled();
        let dup = catalog.items[0].variations[0].clone();
        catalog.items[0].variations.push(dup);
        assert!(matches!(
            register_catalog(&catalog, &BackpackConfig::default()),
            Err(CatalogError::BadVariation { index: 1, .. })
        ));
    }

    #[test]
    fn bad_ingredient_is_rejected() {
        let mut catalog = bundled();
        catalog.recipes[0].ingredients.push("lots of cloth".into());
        assert_eq!(
            register_catalog(&catalog, &BackpackConfig::default()).unwrap_err(),
            CatalogError::BadIngredient("lots of cloth".into())
        );
    }

    #[test]
    fn recipe_for_unknown_item_is_rejected() {
        let mut catalog = bundled();
        catalog.recipes[0].item = "nope".into();
        assert_eq!(
            register_catalog(&catalog, &BackpackConfig::default()).unwrap_err(),
            CatalogError::UnknownRecipeItem("nope".into())
        );
    }
}
