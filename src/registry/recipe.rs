use std::fmt;

use super::CatalogError;

/// 配方中的一项材料
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub count: u32,
    pub item: String,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}", self.count, self.item)
    }
}

/// 解析 "200x aluminiumingot"
pub fn parse_ingredient(s: &str) -> Result<Ingredient, CatalogError> {
    let bad = || CatalogError::BadIngredient(s.to_string());
    let (count, item) = s.trim().split_once(char::is_whitespace).ok_or_else(bad)?;
    let count: u32 = count
        .strip_suffix('x')
        .and_then(|n| n.parse().ok())
        .filter(|n| *n > 0)
        .ok_or_else(bad)?;
    let item = item.trim();
    if item.is_empty() {
        return Err(bad());
    }
    Ok(Ingredient {
        count,
        item: item.to_string(),
    })
}

/// 替换描述里的 {slots}
pub fn format_description(template: &str, slots: u32) -> String {
    template.replace("{slots}", &slots.to_string())
}
