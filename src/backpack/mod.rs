pub mod components;
pub mod events;
pub mod service;
mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use events::*;
use service::StorageAssociation;
use systems::*;

/// 背包插件：右键 / `/bp open` 打开背包对应的存储
pub struct BackpackPlugin;

impl Plugin for BackpackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StorageAssociation>()
            .add_event::<SecondaryAction>()
            .add_event::<PlayerCommand>()
            .add_event::<OpenBackpack>()
            // 断线清理不依赖 AppState
            .add_systems(Update, clear_ended_sessions)
            .add_systems(
                Update,
                (
                    (handle_secondary_action, handle_player_command),
                    open_backpack,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::components::BackpackItem;
    use super::systems::is_open_command;
    use super::*;
    use crate::core::events::LogEvent;
    use crate::core::resources::BackpackConfig;
    use crate::equipment::components::Equipment;
    use crate::host::HostPlugin;
    use crate::host::attributes::{AttributeStore, ItemAttributes};
    use crate::host::components::{Player, SessionId};
    use crate::host::events::*;
    use crate::host::storage::{StorageHandle, StorageWorld};
    use bevy::state::app::StatesPlugin;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_state(AppState::InGame)
            .add_event::<LogEvent>()
            .init_resource::<BackpackConfig>()
            .add_plugins((HostPlugin, BackpackPlugin));
        app
    }

    fn spawn_player(app: &mut App, session: u64, hand: Option<Entity>) -> Entity {
        app.world_mut()
            .spawn((
                Player {
                    session: SessionId(session),
                    name: format!("p{session}"),
                },
                Equipment { hand },
            ))
            .id()
    }

    fn spawn_backpack(app: &mut App, attrs: ItemAttributes) -> Entity {
        app.world_mut()
            .spawn((BackpackItem::default(), attrs))
            .id()
    }

    fn drain<E: Event>(app: &mut App) -> Vec<E> {
        app.world_mut().resource_mut::<Events<E>>().drain().collect()
    }

    fn command(app: &mut App, player: Entity, command: &str) {
        app.world_mut().send_event(PlayerCommand {
            player,
            command: command.into(),
        });
    }

    #[test]
    fn open_command_parsing() {
        assert!(is_open_command("/bp open", "/bp"));
        assert!(is_open_command("/bp open  ", "/bp"));
        assert!(!is_open_command("/bp  open", "/bp"));
        assert!(!is_open_command(" /bp open", "/bp"));
        assert!(!is_open_command("/bp\topen", "/bp"));
        assert!(!is_open_command("", "/bp"));
        assert!(!is_open_command("/bp", "/bp"));
        assert!(!is_open_command("/bp open now", "/bp"));
        assert!(!is_open_command("/bp close", "/bp"));
        assert!(!is_open_command("/pack open", "/bp"));
    }

    #[test]
    fn secondary_action_creates_storage_once() {
        let mut app = app();
        let bag = spawn_backpack(&mut app, ItemAttributes::default());
        let player = spawn_player(&mut app, 1, Some(bag));

        app.world_mut().send_event(SecondaryAction { player });
        app.update();
        app.world_mut().send_event(SecondaryAction { player });
        app.update();

        let shown = drain::<ShowStorage>(&mut app);
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0], shown[1]);
        assert_eq!(app.world().resource::<StorageWorld>().len(), 1);

        let attrs = app.world().get::<ItemAttributes>(bag).unwrap();
        assert_eq!(attrs.get("backpack_id"), Some(shown[0].handle.to_string().as_str()));

        let sounds = drain::<PlaySound>(&mut app);
        assert!(sounds.iter().all(|s| s.sound == "donkey_panniers"));
        assert_eq!(sounds.len(), 2);
    }

    #[test]
    fn same_frame_requests_share_one_storage() {
        let mut app = app();
        let bag = spawn_backpack(&mut app, ItemAttributes::default());
        let player = spawn_player(&mut app, 1, Some(bag));

        app.world_mut().send_event(SecondaryAction { player });
        command(&mut app, player, "/bp open");
        app.update();

        let shown = drain::<ShowStorage>(&mut app);
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].handle, shown[1].handle);
        assert_eq!(app.world().resource::<StorageWorld>().len(), 1);
    }

    #[test]
    fn secondary_action_ignores_other_items() {
        let mut app = app();
        let sword = app.world_mut().spawn(ItemAttributes::default()).id();
        let player = spawn_player(&mut app, 1, Some(sword));
        app.world_mut()
            .resource_mut::<StorageAssociation>()
            .record_opened(SessionId(1), StorageHandle(4));

        app.world_mut().send_event(SecondaryAction { player });
        app.update();

        assert!(drain::<ShowStorage>(&mut app).is_empty());
    }

    #[test]
    fn command_without_backpack_reopens_last_storage() {
        let mut app = app();
        let player = spawn_player(&mut app, 1, None);
        app.world_mut()
            .resource_mut::<StorageAssociation>()
            .record_opened(SessionId(1), StorageHandle(7));

        command(&mut app, player, "/bp open");
        app.update();

        assert_eq!(
            drain::<ShowStorage>(&mut app),
            vec![ShowStorage {
                player,
                handle: StorageHandle(7),
            }]
        );
        let association = app.world().resource::<StorageAssociation>();
        assert_eq!(association.last_opened(SessionId(1)), Some(StorageHandle(7)));
        assert_eq!(app.world().resource::<StorageWorld>().len(), 0);
    }

    #[test]
    fn command_with_nothing_to_open_is_silent() {
        let mut app = app();
        let player = spawn_player(&mut app, 2, None);

        command(&mut app, player, "/bp open");
        app.update();

        assert!(drain::<ShowStorage>(&mut app).is_empty());
        assert!(drain::<StatusMessage>(&mut app).is_empty());
        assert!(drain::<PlaySound>(&mut app).is_empty());
    }

    #[test]
    fn doubled_space_is_not_the_open_command() {
        let mut app = app();
        let bag = spawn_backpack(&mut app, ItemAttributes::default());
        let player = spawn_player(&mut app, 1, Some(bag));

        command(&mut app, player, "/bp  open");
        command(&mut app, player, " /bp open");
        app.update();

        assert!(drain::<ShowStorage>(&mut app).is_empty());
        assert!(app.world().resource::<StorageWorld>().is_empty());
    }

    #[test]
    fn wrong_arity_is_ignored() {
        let mut app = app();
        let bag = spawn_backpack(&mut app, ItemAttributes::default());
        let player = spawn_player(&mut app, 1, Some(bag));

        command(&mut app, player, "/bp");
        command(&mut app, player, "/bp open please");
        app.update();

        assert!(drain::<ShowStorage>(&mut app).is_empty());
        assert_eq!(app.world().resource::<StorageWorld>().len(), 0);
    }

    #[test]
    fn broken_backpack_shows_status_and_keeps_value() {
        let mut app = app();
        let mut attrs = ItemAttributes::default();
        attrs.set("backpack_id", "abc".into());
        let bag = spawn_backpack(&mut app, attrs);
        let player = spawn_player(&mut app, 1, Some(bag));
        app.world_mut()
            .resource_mut::<StorageAssociation>()
            .record_opened(SessionId(1), StorageHandle(7));

        command(&mut app, player, "/bp open");
        app.update();

        assert!(drain::<ShowStorage>(&mut app).is_empty());
        let status = drain::<StatusMessage>(&mut app);
        assert_eq!(
            status,
            vec![StatusMessage {
                player,
                text: "This backpack is broken!".into(),
                seconds: 2.0,
            }]
        );
        let attrs = app.world().get::<ItemAttributes>(bag).unwrap();
        assert_eq!(attrs.get("backpack_id"), Some("abc"));
    }

    #[test]
    fn disconnect_clears_last_opened() {
        let mut app = app();
        let bag = spawn_backpack(&mut app, ItemAttributes::default());
        let player = spawn_player(&mut app, 1, Some(bag));

        command(&mut app, player, "/bp open");
        app.update();
        assert!(
            app.world()
                .resource::<StorageAssociation>()
                .last_opened(SessionId(1))
                .is_some()
        );

        app.world_mut().send_event(PlayerDisconnected { player });
        app.update();
        app.update();

        let association = app.world().resource::<StorageAssociation>();
        assert_eq!(association.last_opened(SessionId(1)), None);
        assert_eq!(association.tracked_sessions(), 0);
    }
}
