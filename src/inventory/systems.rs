use super::{components::*, events::*};
use crate::backpack::components::BackpackItem;
use crate::core::events::LogEvent;
use crate::core::resources::BackpackConfig;
use crate::equipment::components::Equipment;
use crate::host::attributes::ItemAttributes;
use crate::host::components::Player;
use crate::host::events::{PlayerDisconnected, TextMessage};
use crate::host::storage::StorageWorld;
use crate::registry::{ItemRegistry, RecipeRegistry};
use bevy::prelude::*;

/// 新上线的玩家补上物品栏和装备栏
pub fn attach_inventory(
    mut commands: Commands,
    joined: Query<Entity, (Added<Player>, Without<Inventory>)>,
) {
    for player in &joined {
        commands
            .entity(player)
            .insert((Inventory::default(), Equipment::default()));
    }
}

/// 玩家下线前销毁其物品栏和手上的物品；已放进存储的物品不受影响
pub fn drop_owned_items(
    mut commands: Commands,
    mut ev_disconnect: EventReader<PlayerDisconnected>,
    owners: Query<(Option<&Inventory>, Option<&Equipment>), With<Player>>,
) {
    for ev in ev_disconnect.read() {
        let Ok((inventory, equipment)) = owners.get(ev.player) else {
            continue;
        };
        let carried = inventory
            .into_iter()
            .flat_map(Inventory::items)
            .chain(equipment.and_then(|e| e.hand));
        for item in carried {
            commands.entity(item).despawn();
        }
    }
}

/// 处理"give"——背包每个单独占一格，材料合成一个堆叠
pub fn give_item(
    mut commands: Commands,
    mut ev_give: EventReader<GiveItemEvent>,
    mut inventories: Query<(&Player, &mut Inventory)>,
    items: Res<ItemRegistry>,
    recipes: Res<RecipeRegistry>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_give.read() {
        let Ok((player, mut inventory)) = inventories.get_mut(ev.player) else {
            warn!("give：玩家 {:?} 不存在", ev.player);
            continue;
        };
        if ev.count == 0 {
            continue;
        }

        if let Some(custom) = items.find(&ev.id) {
            if ev.variation != 0 && !custom.variations.contains(&ev.variation) {
                log.write(LogEvent(format!("{} 没有变体 {}", custom.name, ev.variation)));
                continue;
            }
            let mut given = 0;
            for _ in 0..ev.count {
                if inventory.is_full() {
                    warn!("{} 的物品栏已满", player.name);
                    break;
                }
                let entity = commands
                    .spawn((
                        Item {
                            id: custom.id.clone(),
                            name: custom.name.clone(),
                            count: 1,
                        },
                        BackpackItem {
                            variation: ev.variation,
                        },
                        ItemAttributes::default(),
                    ))
                    .id();
                inventory.insert(entity);
                given += 1;
            }
            log.write(LogEvent(format!("{} 获得 {} ×{given}", player.name, custom.name)));
        } else if recipes.is_ingredient(&ev.id) {
            let entity = commands
                .spawn((
                    Item {
                        id: ev.id.clone(),
                        name: ev.id.clone(),
                        count: ev.count,
                    },
                    ItemAttributes::default(),
                ))
                .id();
            if inventory.insert(entity).is_some() {
                log.write(LogEvent(format!("{} 获得 {} ×{}", player.name, ev.id, ev.count)));
            } else {
                commands.entity(entity).despawn();
                log.write(LogEvent(format!("{} 的物品栏已满", player.name)));
            }
        } else {
            log.write(LogEvent(format!("不存在物品 ID {}", ev.id)));
        }
    }
}

/// 打印物品栏内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    inventories: Query<(&Player, &Inventory, &Equipment)>,
    items: Query<(&Item, Option<&BackpackItem>)>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_list.read() {
        let Ok((player, inventory, equipment)) = inventories.get(ev.player) else {
            continue;
        };
        let describe = |entity: Entity| match items.get(entity) {
            Ok((item, Some(bag))) if bag.variation != 0 => {
                format!("{} (变体 {})", item.name, bag.variation)
            }
            Ok((item, _)) => format!("{} ×{}", item.name, item.count),
            Err(_) => "?".to_string(),
        };

        let mut lines = vec![format!("== {} 的物品栏 ==", player.name)];
        if let Some(hand) = equipment.hand {
            lines.push(format!("手持: {}", describe(hand)));
        }
        for (idx, slot) in inventory.slots.iter().enumerate() {
            if let Some(entity) = slot {
                lines.push(format!("[{idx}] {}", describe(*entity)));
            }
        }
        if lines.len() == 1 {
            lines.push("  (empty)".to_string());
        }
        log.write(LogEvent(lines.join("\n")));
    }
}

/// 背包不能放进任何存储；其他物品放进第一个空格
pub fn transfer_to_chest(
    mut ev_transfer: EventReader<InventoryToChestEvent>,
    mut inventories: Query<&mut Inventory, With<Player>>,
    items: Query<(Has<BackpackItem>, Option<&ItemAttributes>)>,
    mut storages: ResMut<StorageWorld>,
    config: Res<BackpackConfig>,
    mut ev_text: EventWriter<TextMessage>,
) {
    for ev in ev_transfer.read() {
        let Ok(mut inventory) = inventories.get_mut(ev.player) else {
            continue;
        };
        let Some(item) = inventory.get(ev.index) else {
            ev_text.write(TextMessage {
                player: ev.player,
                text: format!("物品栏第 {} 格为空", ev.index),
            });
            continue;
        };

        let is_backpack = items.get(item).is_ok_and(|(marked, attrs)| {
            marked || attrs.is_some_and(|a| a.mentions("backpack"))
        });
        if is_backpack {
            ev_text.write(TextMessage {
                player: ev.player,
                text: config.reject_message.clone(),
            });
            continue;
        }

        let Some(container) = storages.get_mut(ev.chest) else {
            ev_text.write(TextMessage {
                player: ev.player,
                text: format!("存储 #{} 不存在", ev.chest),
            });
            continue;
        };
        match container.insert(item) {
            Some(slot) => {
                inventory.take(ev.index);
                debug!("物品 {item:?} 放入存储 #{} 第 {slot} 格", ev.chest);
            }
            None => {
                ev_text.write(TextMessage {
                    player: ev.player,
                    text: format!("存储 #{} 已满", ev.chest),
                });
            }
        }
    }
}
