use super::{components::*, events::*, service::*};
use crate::core::resources::BackpackConfig;
use crate::equipment::components::Equipment;
use crate::host::attributes::ItemAttributes;
use crate::host::components::Player;
use crate::host::events::{PlaySound, SessionEnded, ShowStorage, StatusMessage};
use crate::host::storage::StorageWorld;
use bevy::prelude::*;

/// 右键只对手持背包生效
pub fn handle_secondary_action(
    mut ev_action: EventReader<SecondaryAction>,
    mut ev_open: EventWriter<OpenBackpack>,
    players: Query<&Equipment, With<Player>>,
    backpacks: Query<(), With<BackpackItem>>,
) {
    for ev in ev_action.read() {
        let holding_backpack = players
            .get(ev.player)
            .ok()
            .and_then(|equip| equip.hand)
            .is_some_and(|item| backpacks.contains(item));
        if holding_backpack {
            ev_open.write(OpenBackpack { player: ev.player });
        }
    }
}

/// `<prefix> open`，按单个空格切分后恰好两个词；其他形式一律忽略
///
/// 只丢弃末尾的空词，所以连续空格或开头的空格都会多出一个空词。
pub fn is_open_command(command: &str, prefix: &str) -> bool {
    let mut tokens: Vec<&str> = command.split(' ').collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    matches!(tokens.as_slice(), [p, "open"] if *p == prefix)
}

pub fn handle_player_command(
    mut ev_command: EventReader<PlayerCommand>,
    mut ev_open: EventWriter<OpenBackpack>,
    config: Res<BackpackConfig>,
) {
    for ev in ev_command.read() {
        if is_open_command(&ev.command, &config.command_prefix) {
            ev_open.write(OpenBackpack { player: ev.player });
        }
    }
}

/// 执行打开：解析手持背包 / 兜底到最后打开的存储，并发出表现事件
pub fn open_backpack(
    mut ev_open: EventReader<OpenBackpack>,
    mut association: ResMut<StorageAssociation>,
    mut storages: ResMut<StorageWorld>,
    mut items: Query<&mut ItemAttributes, With<BackpackItem>>,
    players: Query<(&Player, Option<&Equipment>)>,
    config: Res<BackpackConfig>,
    mut ev_show: EventWriter<ShowStorage>,
    mut ev_sound: EventWriter<PlaySound>,
    mut ev_status: EventWriter<StatusMessage>,
) {
    for ev in ev_open.read() {
        let Ok((player, equipment)) = players.get(ev.player) else {
            warn!("打开背包：玩家 {:?} 不存在", ev.player);
            continue;
        };

        // 手上不是背包时视为没有物品
        let mut held = equipment
            .and_then(|e| e.hand)
            .and_then(|item| items.get_mut(item).ok());

        let outcome =
            match association.open_backpack(player.session, held.as_deref_mut(), &mut *storages) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("{} 的背包无法分配存储：{e}", player.name);
                    continue;
                }
            };

        match outcome {
            OpenOutcome::Opened { handle, created } => {
                if created {
                    info!("{} 的背包分配到新存储 #{handle}", player.name);
                }
                ev_show.write(ShowStorage {
                    player: ev.player,
                    handle,
                });
                ev_sound.write(PlaySound {
                    player: ev.player,
                    sound: config.open_sound.clone(),
                });
            }
            OpenOutcome::Reopened(handle) => {
                debug!("{} 未手持背包，打开上次的存储 #{handle}", player.name);
                ev_show.write(ShowStorage {
                    player: ev.player,
                    handle,
                });
                ev_sound.write(PlaySound {
                    player: ev.player,
                    sound: config.open_sound.clone(),
                });
            }
            OpenOutcome::Broken { value } => {
                warn!(
                    "{} 的背包属性 `{}` 已损坏：{value:?}",
                    player.name,
                    association.attribute_key()
                );
                ev_status.write(StatusMessage {
                    player: ev.player,
                    text: config.broken_message.clone(),
                    seconds: config.broken_message_secs,
                });
            }
            OpenOutcome::NothingToOpen => {
                debug!("{} 没有可打开的背包", player.name);
            }
        }
    }
}

/// 会话结束时丢弃“最后打开”记录
pub fn clear_ended_sessions(
    mut ev_ended: EventReader<SessionEnded>,
    mut association: ResMut<StorageAssociation>,
) {
    for ev in ev_ended.read() {
        association.clear_session(ev.session);
    }
}
