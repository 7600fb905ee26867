use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::host::components::Player;
use crate::inventory::components::{Inventory, Item};
use bevy::prelude::*;

fn item_name(items: &Query<&Item>, entity: Entity) -> String {
    items
        .get(entity)
        .map(|i| i.name.clone())
        .unwrap_or_else(|_| format!("{entity:?}"))
}

/// 把物品栏某格拿到手上；手上原有的物品放回同一格
pub fn equip_item(
    mut ev_equip: EventReader<EquipEvent>,
    mut players: Query<(&Player, &mut Inventory, &mut Equipment)>,
    items: Query<&Item>,
    mut log_event: EventWriter<LogEvent>,
) {
    for ev in ev_equip.read() {
        let Ok((player, mut inventory, mut equip)) = players.get_mut(ev.player) else {
            continue;
        };

        if ev.index >= inventory.slots.len() {
            log_event.write(LogEvent("物品栏索引超出范围".to_string()));
            continue;
        }
        let Some(taken) = inventory.take(ev.index) else {
            log_event.write(LogEvent("该物品栏格为空".to_string()));
            continue;
        };

        // 交换：旧的手持物品回到刚空出的格子
        inventory.slots[ev.index] = equip.hand.take();
        equip.hand = Some(taken);

        log_event.write(LogEvent(format!(
            "{} 手持 {}",
            player.name,
            item_name(&items, taken)
        )));
    }
}

/// 卸下手持物品
pub fn unequip_item(
    mut ev_unequip: EventReader<UnequipEvent>,
    mut players: Query<(&Player, &mut Inventory, &mut Equipment)>,
    items: Query<&Item>,
    mut log_event: EventWriter<LogEvent>,
) {
    for ev in ev_unequip.read() {
        let Ok((player, mut inventory, mut equip)) = players.get_mut(ev.player) else {
            continue;
        };
        let Some(item) = equip.hand else {
            log_event.write(LogEvent(format!("{} 手上没有东西", player.name)));
            continue;
        };

        if inventory.insert(item).is_some() {
            equip.hand = None;
            log_event.write(LogEvent(format!(
                "{} 收起 {}",
                player.name,
                item_name(&items, item)
            )));
        } else {
            // 物品栏满了，保持手持
            log_event.write(LogEvent("物品栏已满，无法卸下".to_string()));
        }
    }
}
