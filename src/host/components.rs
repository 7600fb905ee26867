use std::fmt;

use bevy::prelude::*;

/// 一次在线会话的标识，断线后作废
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// 在线玩家
#[derive(Component, Debug, Clone)]
pub struct Player {
    pub session: SessionId,
    pub name: String,
}

/// 会话计数器
#[derive(Resource, Default)]
pub struct SessionCounter(pub u64);

impl SessionCounter {
    pub fn next(&mut self) -> SessionId {
        self.0 += 1;
        SessionId(self.0)
    }
}
