use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::Serialize;

/// 物品实例上的键值属性，由宿主持久化，所有插件共用
pub trait AttributeStore {
    fn get(&self, key: &str) -> Option<&str>;
    fn set(&mut self, key: &str, value: String);
}

#[derive(Component, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ItemAttributes(pub BTreeMap<String, String>);

impl ItemAttributes {
    /// 任一键或值里出现 needle
    pub fn mentions(&self, needle: &str) -> bool {
        self.0
            .iter()
            .any(|(k, v)| k.contains(needle) || v.contains(needle))
    }
}

impl AttributeStore for ItemAttributes {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }
}
