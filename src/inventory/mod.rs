pub mod components;
pub mod events;
mod systems;

use crate::core::states::AppState;
use crate::host::SessionSet;
use bevy::prelude::*;
use events::*;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GiveItemEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<InventoryToChestEvent>()
            .add_systems(PreUpdate, drop_owned_items.before(SessionSet))
            .add_systems(Update, attach_inventory)
            .add_systems(
                Update,
                (give_item, transfer_to_chest, print_inventory)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
