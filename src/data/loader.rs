use bevy::asset::{AssetLoader, LoadContext, io::Reader};
use thiserror::Error;

use super::schema::Catalog;

#[derive(Default)]
pub struct RonCatalogLoader;

#[derive(Debug, Error)]
pub enum RonCatalogLoaderError {
    #[error("Could not load asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Could not interpret bytes as UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// 解析目录文本，loader 与测试共用
pub fn parse_catalog(s: &str) -> Result<Catalog, ron::error::SpannedError> {
    ron::de::from_str(s)
}

impl AssetLoader for RonCatalogLoader {
    type Asset = Catalog;
    type Settings = ();
    type Error = RonCatalogLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let s = std::str::from_utf8(&bytes)?;
        Ok(parse_catalog(s)?)
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_parses() {
        let catalog = parse_catalog(include_str!("../../assets/data/backpacks.ron")).unwrap();
        assert_eq!(catalog.items.len(), 1);
        let item = &catalog.items[0];
        assert_eq!(item.id, "main.backpacks.custombackpack");
        assert_eq!(item.max_stack, 1);
        assert_eq!(item.variations.len(), 4);
        assert_eq!(catalog.recipes[0].workbench, "loom");
        assert_eq!(catalog.recipes[0].ingredients.len(), 4);
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let catalog = parse_catalog(
            r#"(
                items: [(
                    id: "x",
                    name: "x",
                    names: {"en": "X"},
                    model: (model: "x.obj", texture: "x.dds"),
                    icon: "x.png",
                )],
            )"#,
        )
        .unwrap();
        let item = &catalog.items[0];
        assert_eq!(item.max_stack, 1);
        assert_eq!(item.model.scale, 1.0);
        assert!(item.variations.is_empty());
        assert!(catalog.recipes.is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_catalog("(items: [").is_err());
    }
}
