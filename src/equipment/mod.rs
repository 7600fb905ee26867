pub mod components;
pub mod events;
mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use events::*;
use systems::*;

pub struct EquipmentPlugin;
impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EquipEvent>()
            .add_event::<UnequipEvent>()
            .add_systems(
                Update,
                (equip_item, unequip_item).chain().run_if(in_state(AppState::InGame)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::components::Equipment;
    use super::*;
    use crate::core::events::LogEvent;
    use crate::host::components::{Player, SessionId};
    use crate::inventory::components::{INVENTORY_SLOTS, Inventory};
    use bevy::state::app::StatesPlugin;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_state(AppState::InGame)
            .add_event::<LogEvent>()
            .add_plugins(EquipmentPlugin);
        app
    }

    fn spawn_player(app: &mut App, inventory: Inventory, hand: Option<Entity>) -> Entity {
        app.world_mut()
            .spawn((
                Player {
                    session: SessionId(1),
                    name: "p1".into(),
                },
                inventory,
                Equipment { hand },
            ))
            .id()
    }

    #[test]
    fn equip_swaps_with_hand() {
        let mut app = app();
        let old = app.world_mut().spawn_empty().id();
        let new = app.world_mut().spawn_empty().id();
        let mut inventory = Inventory::default();
        inventory.slots[3] = Some(new);
        let player = spawn_player(&mut app, inventory, Some(old));

        app.world_mut().send_event(EquipEvent { player, index: 3 });
        app.update();

        assert_eq!(app.world().get::<Equipment>(player).unwrap().hand, Some(new));
        assert_eq!(app.world().get::<Inventory>(player).unwrap().get(3), Some(old));
    }

    #[test]
    fn equip_empty_slot_changes_nothing() {
        let mut app = app();
        let player = spawn_player(&mut app, Inventory::default(), None);
        app.world_mut().send_event(EquipEvent { player, index: 0 });
        app.world_mut().send_event(EquipEvent { player, index: 99 });
        app.update();
        assert_eq!(app.world().get::<Equipment>(player).unwrap().hand, None);
    }

    #[test]
    fn unequip_returns_item_to_inventory() {
        let mut app = app();
        let bag = app.world_mut().spawn_empty().id();
        let player = spawn_player(&mut app, Inventory::default(), Some(bag));

        app.world_mut().send_event(UnequipEvent { player });
        app.update();

        assert_eq!(app.world().get::<Equipment>(player).unwrap().hand, None);
        assert_eq!(app.world().get::<Inventory>(player).unwrap().get(0), Some(bag));
    }

    #[test]
    fn unequip_with_full_inventory_keeps_hand() {
        let mut app = app();
        let filler = app.world_mut().spawn_empty().id();
        let bag = app.world_mut().spawn_empty().id();
        let inventory = Inventory {
            slots: vec![Some(filler); INVENTORY_SLOTS],
        };
        let player = spawn_player(&mut app, inventory, Some(bag));

        app.world_mut().send_event(UnequipEvent { player });
        app.update();

        assert_eq!(app.world().get::<Equipment>(player).unwrap().hand, Some(bag));
    }
}
