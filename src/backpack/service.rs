//! 背包物品与宿主存储之间的关联。
//!
//! 每个背包物品在属性里记一个存储 ID，第一次打开时向宿主申请新存储并写回属性，
//! 之后一直沿用；另外按会话记住最后打开的存储，手上没拿背包时用它兜底。
//!
//! 所有修改都经过 `&mut self`，放在 Bevy 资源里时调度器保证同一时刻只有一个写者，
//! 因此同一物品不会被分配两个存储。

use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

use crate::core::resources::BackpackConfig;
use crate::host::attributes::AttributeStore;
use crate::host::components::SessionId;
use crate::host::storage::{HostError, StorageHandle, StorageHost};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackpackError {
    #[error("no backpack item was supplied")]
    InvalidItem,
    /// 属性被别的插件改写成了无法解析的值
    #[error("attribute `{key}` holds {value:?}, which is not a storage id")]
    CorruptAttribute { key: String, value: String },
    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub handle: StorageHandle,
    pub created: bool,
}

/// 一次“打开背包”的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// 打开了手上物品对应的存储
    Opened {
        handle: StorageHandle,
        created: bool,
    },
    /// 手上没有背包，打开了本会话最后一次打开的存储
    Reopened(StorageHandle),
    Broken { value: String },
    NothingToOpen,
}

#[derive(Resource, Debug)]
pub struct StorageAssociation {
    attribute_key: String,
    capacity: u32,
    last_opened: HashMap<SessionId, StorageHandle>,
}

impl FromWorld for StorageAssociation {
    fn from_world(world: &mut World) -> Self {
        let config = world
            .get_resource::<BackpackConfig>()
            .cloned()
            .unwrap_or_default();
        Self::new(config.attribute_key, config.slots)
    }
}

/// 只接受纯十进制数字，"+7"、" 7"、"-1" 都算损坏
fn parse_handle(value: &str) -> Option<StorageHandle> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok().map(StorageHandle)
}

impl StorageAssociation {
    pub fn new(attribute_key: impl Into<String>, capacity: u32) -> Self {
        Self {
            attribute_key: attribute_key.into(),
            capacity,
            last_opened: HashMap::new(),
        }
    }

    pub fn attribute_key(&self) -> &str {
        &self.attribute_key
    }

    /// 找到物品对应的存储；没有就新建一个并写回属性。
    ///
    /// 属性值损坏时返回 `CorruptAttribute`，不会覆盖原值。
    pub fn resolve_or_create<A, H>(
        &self,
        item: Option<&mut A>,
        host: &mut H,
    ) -> Result<Resolution, BackpackError>
    where
        A: AttributeStore + ?Sized,
        H: StorageHost + ?Sized,
    {
        let item = item.ok_or(BackpackError::InvalidItem)?;

        if let Some(value) = item.get(&self.attribute_key) {
            return match parse_handle(value) {
                Some(handle) => Ok(Resolution {
                    handle,
                    created: false,
                }),
                None => Err(BackpackError::CorruptAttribute {
                    key: self.attribute_key.clone(),
                    value: value.to_string(),
                }),
            };
        }

        let handle = host.create_storage(self.capacity)?;
        item.set(&self.attribute_key, handle.to_string());
        Ok(Resolution {
            handle,
            created: true,
        })
    }

    pub fn record_opened(&mut self, session: SessionId, handle: StorageHandle) {
        self.last_opened.insert(session, handle);
    }

    pub fn last_opened(&self, session: SessionId) -> Option<StorageHandle> {
        self.last_opened.get(&session).copied()
    }

    pub fn clear_session(&mut self, session: SessionId) {
        self.last_opened.remove(&session);
    }

    pub fn tracked_sessions(&self) -> usize {
        self.last_opened.len()
    }

    /// 组合行为：有物品就解析它并记住；没有物品就退回到最后打开的存储。
    ///
    /// 只有宿主建存储失败才返回 Err。
    pub fn open_backpack<A, H>(
        &mut self,
        session: SessionId,
        item: Option<&mut A>,
        host: &mut H,
    ) -> Result<OpenOutcome, HostError>
    where
        A: AttributeStore + ?Sized,
        H: StorageHost + ?Sized,
    {
        match self.resolve_or_create(item, host) {
            Ok(Resolution { handle, created }) => {
                self.record_opened(session, handle);
                Ok(OpenOutcome::Opened { handle, created })
            }
            Err(BackpackError::InvalidItem) => Ok(self
                .last_opened(session)
                .map_or(OpenOutcome::NothingToOpen, OpenOutcome::Reopened)),
            Err(BackpackError::CorruptAttribute { value, .. }) => {
                Ok(OpenOutcome::Broken { value })
            }
            Err(BackpackError::Host(e)) => Err(e),
        }
    }
}
