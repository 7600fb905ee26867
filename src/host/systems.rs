use super::{components::*, events::*, storage::StorageWorld};
use crate::core::events::LogEvent;
use bevy::prelude::*;

/// 玩家上线：分配新会话并生成玩家实体
pub fn handle_connect(
    mut commands: Commands,
    mut ev_connect: EventReader<PlayerConnected>,
    mut counter: ResMut<SessionCounter>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_connect.read() {
        let session = counter.next();
        commands.spawn(Player {
            session,
            name: ev.name.clone(),
        });
        info!("{} 上线，会话 {session}", ev.name);
        log.write(LogEvent(format!("{} 已连接 ({session})", ev.name)));
    }
}

/// 玩家下线：移除实体并广播 SessionEnded
pub fn handle_disconnect(
    mut commands: Commands,
    mut ev_disconnect: EventReader<PlayerDisconnected>,
    mut ev_ended: EventWriter<SessionEnded>,
    mut log: EventWriter<LogEvent>,
    players: Query<&Player>,
) {
    for ev in ev_disconnect.read() {
        let Ok(player) = players.get(ev.player) else {
            warn!("下线事件指向不存在的玩家 {:?}", ev.player);
            continue;
        };
        ev_ended.write(SessionEnded {
            session: player.session,
        });
        log.write(LogEvent(format!("{} 已断开 ({})", player.name, player.session)));
        commands.entity(ev.player).despawn();
    }
}

/* ---------------------------- 模拟客户端表现 ---------------------------- */

fn player_name(players: &Query<&Player>, entity: Entity) -> String {
    players
        .get(entity)
        .map(|p| p.name.clone())
        .unwrap_or_else(|_| format!("{entity:?}"))
}

pub fn present_storage(
    mut ev_show: EventReader<ShowStorage>,
    mut log: EventWriter<LogEvent>,
    storages: Res<StorageWorld>,
    players: Query<&Player>,
) {
    for ev in ev_show.read() {
        let name = player_name(&players, ev.player);
        match storages.get(ev.handle) {
            Some(container) => log.write(LogEvent(format!(
                "[{name}] 打开存储 #{} ({}/{})",
                ev.handle,
                container.occupied(),
                container.capacity()
            ))),
            None => log.write(LogEvent(format!("[{name}] 存储 #{} 不存在", ev.handle))),
        };
    }
}

pub fn present_sound(
    mut ev_sound: EventReader<PlaySound>,
    mut log: EventWriter<LogEvent>,
    players: Query<&Player>,
) {
    for ev in ev_sound.read() {
        let name = player_name(&players, ev.player);
        log.write(LogEvent(format!("[{name}] ♪ {}", ev.sound)));
    }
}

pub fn present_messages(
    mut ev_status: EventReader<StatusMessage>,
    mut ev_text: EventReader<TextMessage>,
    mut log: EventWriter<LogEvent>,
    players: Query<&Player>,
) {
    for ev in ev_status.read() {
        let name = player_name(&players, ev.player);
        log.write(LogEvent(format!("[{name}] <{}s> {}", ev.seconds, ev.text)));
    }
    for ev in ev_text.read() {
        let name = player_name(&players, ev.player);
        log.write(LogEvent(format!("[{name}] {}", ev.text)));
    }
}
