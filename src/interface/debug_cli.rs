//! 文字 CLI：读取 stdin → 解析命令 → 以宿主事件的形式驱动插件

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::backpack::events::{PlayerCommand, SecondaryAction};
use crate::backpack::service::StorageAssociation;
use crate::core::resources::BackpackConfig;
use crate::core::{events::LogEvent, states::AppState};
use crate::equipment::components::Equipment;
use crate::equipment::events::{EquipEvent, UnequipEvent};
use crate::host::attributes::{AttributeStore, ItemAttributes};
use crate::host::components::Player;
use crate::host::events::{PlayerConnected, PlayerDisconnected};
use crate::host::storage::{StorageHandle, StorageHost, StorageWorld};
use crate::inventory::events::{GiveItemEvent, InventoryToChestEvent, ListInventoryEvent};
use crate::registry::{ItemRegistry, RecipeRegistry};

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

const HELP: &str = "命令列表:
  help                              查看帮助
  status                            查看当前状态
  exit / quit                       退出程序
  items [token]                     列出 / 查询已注册物品
  recipes                           列出已注册配方
  connect <name>                    玩家上线
  disconnect <name>                 玩家下线
  give <name> <id> [count] [var]    给予物品
  inv <name>                        查看物品栏
  equip <name> <index>              手持物品栏某格
  unequip <name>                    收起手持物品
  use <name>                        右键手持物品
  say <name> <text..>               以玩家身份输入聊天命令，例如 say bob /bp open
  chest [capacity]                  新建一个普通箱子
  stash <name> <index> <storage>    把物品栏某格放进存储
  storages                          列出所有存储
  inspect <name>                    查看手持物品的属性
  tamper <name> <value>             改写手持物品的 backpack_id（模拟其他插件）";

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match buffer.lock() {
                        Ok(mut buf) => buf.push_back(line.to_string()),
                        Err(_) => break,
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                execute_cli_commands.run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 id/uuid/name 查询
    Recipes,
    Connect(String),
    Disconnect(String),
    Give {
        name: String,
        id: String,
        count: u32,
        variation: u8,
    },
    Inventory(String),
    Equip { name: String, index: usize },
    Unequip(String),
    Use(String),
    Say { name: String, text: String },
    Chest(u32),
    Stash {
        name: String,
        index: usize,
        storage: u32,
    },
    Storages,
    Inspect(String),
    Tamper { name: String, value: String },
    Usage(&'static str),
    Unsupported(String),
}

/// 命令执行时要写的所有事件
#[derive(SystemParam)]
struct CliWriters<'w> {
    log: EventWriter<'w, LogEvent>,
    connect: EventWriter<'w, PlayerConnected>,
    disconnect: EventWriter<'w, PlayerDisconnected>,
    give: EventWriter<'w, GiveItemEvent>,
    list: EventWriter<'w, ListInventoryEvent>,
    equip: EventWriter<'w, EquipEvent>,
    unequip: EventWriter<'w, UnequipEvent>,
    stash: EventWriter<'w, InventoryToChestEvent>,
    action: EventWriter<'w, SecondaryAction>,
    say: EventWriter<'w, PlayerCommand>,
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

fn item_lines(registry: &ItemRegistry) -> Vec<String> {
    if registry.is_empty() {
        return vec!["(没有已注册的物品)".into()];
    }
    registry
        .iter()
        .map(|entry| format!("{} | {} | {}", entry.uuid, entry.id, entry.display_name()))
        .collect()
}

fn recipe_lines(recipes: &RecipeRegistry) -> Vec<String> {
    if recipes.is_empty() {
        return vec!["(没有已注册的配方)".into()];
    }
    recipes
        .iter()
        .map(|r| {
            let ingredients: Vec<String> =
                r.ingredients.iter().map(ToString::to_string).collect();
            format!(
                "{} @ {} [{}] 预览 {}x\n  材料: {}\n  {}",
                r.names.get("en").unwrap_or(&r.item),
                r.workbench,
                r.categories.get("en").map_or("-", String::as_str),
                r.preview_size,
                ingredients.join(", "),
                r.descriptions.get("en").map_or("", String::as_str)
            )
        })
        .collect()
}

fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut next: ResMut<NextState<AppState>>,
    mut out: CliWriters,
    state: Res<State<AppState>>,
    config: Res<BackpackConfig>,
    registry: Res<ItemRegistry>,
    recipes: Res<RecipeRegistry>,
    association: Res<StorageAssociation>,
    mut storages: ResMut<StorageWorld>,
    players: Query<(Entity, &Player, &Equipment)>,
    mut attributes: Query<&mut ItemAttributes>,
) {
    for CliLine(input) in line_reader.read() {
        let find = |name: &str| players.iter().find(|(_, p, _)| p.name == name);
        macro_rules! player_or_skip {
            ($name:expr) => {
                match find(&$name) {
                    Some(found) => found,
                    None => {
                        out.log.write(LogEvent(format!("玩家 {} 不在线", $name)));
                        continue;
                    }
                }
            };
        }

        match parse_command(input) {
            Command::Help => {
                out.log.write(LogEvent(HELP.into()));
            }

            Command::Status => {
                out.log.write(LogEvent(format!(
                    "State: {:?}, Items: {}, Players: {}, Storages: {}, Tracked sessions: {}",
                    state.get(),
                    registry.len(),
                    players.iter().count(),
                    storages.len(),
                    association.tracked_sessions()
                )));
            }

            Command::Exit => {
                out.log.write(LogEvent("Bye~".into()));
                next.set(AppState::Shutdown);
            }

            Command::Items(token) => match token {
                None => {
                    // 全部列出
                    for line in item_lines(&registry) {
                        out.log.write(LogEvent(line));
                    }
                }
                Some(t) => match registry.find(&t) {
                    Some(e) => {
                        out.log.write(LogEvent(format!(
                            "==================================================
UUID       : {}
ID         : {}
Name       : {}
Max stack  : {}
Model scale: {}
Idle anim  : {}
Variations : {:?}
Assets     : {}
==================================================",
                            e.uuid,
                            e.id,
                            e.display_name(),
                            e.max_stack,
                            e.model_scale,
                            e.idle_animation.as_deref().unwrap_or("-"),
                            e.variations,
                            e.assets.join(", ")
                        )));
                    }
                    None => {
                        out.log.write(LogEvent("未找到匹配物品".into()));
                    }
                },
            },

            Command::Recipes => {
                for line in recipe_lines(&recipes) {
                    out.log.write(LogEvent(line));
                }
            }

            Command::Connect(name) => {
                if find(&name).is_some() {
                    out.log.write(LogEvent(format!("{name} 已经在线")));
                } else {
                    out.connect.write(PlayerConnected { name });
                }
            }

            Command::Disconnect(name) => {
                let (player, _, _) = player_or_skip!(name);
                out.disconnect.write(PlayerDisconnected { player });
            }

            Command::Give {
                name,
                id,
                count,
                variation,
            } => {
                let (player, _, _) = player_or_skip!(name);
                out.give.write(GiveItemEvent {
                    player,
                    id,
                    count,
                    variation,
                });
            }

            Command::Inventory(name) => {
                let (player, _, _) = player_or_skip!(name);
                out.list.write(ListInventoryEvent { player });
            }

            Command::Equip { name, index } => {
                let (player, _, _) = player_or_skip!(name);
                out.equip.write(EquipEvent { player, index });
            }

            Command::Unequip(name) => {
                let (player, _, _) = player_or_skip!(name);
                out.unequip.write(UnequipEvent { player });
            }

            Command::Use(name) => {
                let (player, _, _) = player_or_skip!(name);
                out.action.write(SecondaryAction { player });
            }

            Command::Say { name, text } => {
                let (player, _, _) = player_or_skip!(name);
                out.say.write(PlayerCommand {
                    player,
                    command: text,
                });
            }

            Command::Chest(capacity) => match storages.create_storage(capacity) {
                Ok(handle) => {
                    out.log.write(LogEvent(format!("新建箱子 #{handle}（{capacity} 格）")));
                }
                Err(e) => {
                    out.log.write(LogEvent(format!("无法新建箱子：{e}")));
                }
            },

            Command::Stash {
                name,
                index,
                storage,
            } => {
                let (player, _, _) = player_or_skip!(name);
                out.stash.write(InventoryToChestEvent {
                    player,
                    index,
                    chest: StorageHandle(storage),
                });
            }

            Command::Storages => {
                if storages.is_empty() {
                    out.log.write(LogEvent("  (no storages)".into()));
                }
                for (handle, container) in storages.iter() {
                    out.log.write(LogEvent(format!(
                        "#{handle}: {}/{}",
                        container.occupied(),
                        container.capacity()
                    )));
                }
            }

            Command::Inspect(name) => {
                let (_, _, equipment) = player_or_skip!(name);
                let attrs = equipment.hand.and_then(|item| attributes.get(item).ok());
                match attrs.map(|a| serde_json::to_string_pretty(&*a)) {
                    Some(Ok(json)) => {
                        out.log.write(LogEvent(json));
                    }
                    Some(Err(e)) => {
                        out.log.write(LogEvent(format!("无法序列化属性：{e}")));
                    }
                    None => {
                        out.log.write(LogEvent(format!("{name} 手上没有物品")));
                    }
                }
            }

            Command::Tamper { name, value } => {
                let (_, _, equipment) = player_or_skip!(name);
                match equipment.hand.and_then(|item| attributes.get_mut(item).ok()) {
                    Some(mut attrs) => {
                        attrs.set(&config.attribute_key, value.clone());
                        out.log.write(LogEvent(format!(
                            "{} = {value:?}",
                            config.attribute_key
                        )));
                    }
                    None => {
                        out.log.write(LogEvent(format!("{name} 手上没有物品")));
                    }
                }
            }

            Command::Usage(usage) => {
                out.log.write(LogEvent(format!("用法: {usage}")));
            }

            Command::Unsupported(cmd) => {
                out.log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let mut arg = || parts.next().map(str::to_string);

    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => Command::Items(arg()),
        "recipes" | "recipe" => Command::Recipes,
        "connect" => arg().map_or(Command::Usage("connect <name>"), Command::Connect),
        "disconnect" => arg().map_or(Command::Usage("disconnect <name>"), Command::Disconnect),
        "give" => match (arg(), arg()) {
            (Some(name), Some(id)) => {
                let count = arg().and_then(|c| c.parse().ok()).unwrap_or(1);
                let variation = arg().and_then(|v| v.parse().ok()).unwrap_or(0);
                Command::Give {
                    name,
                    id,
                    count,
                    variation,
                }
            }
            _ => Command::Usage("give <name> <id> [count] [variation]"),
        },
        "inventory" | "inv" => arg().map_or(Command::Usage("inv <name>"), Command::Inventory),
        "equip" => match (arg(), arg().and_then(|i| i.parse().ok())) {
            (Some(name), Some(index)) => Command::Equip { name, index },
            _ => Command::Usage("equip <name> <index>"),
        },
        "unequip" => arg().map_or(Command::Usage("unequip <name>"), Command::Unequip),
        "use" => arg().map_or(Command::Usage("use <name>"), Command::Use),
        "say" => match arg() {
            Some(name) => {
                let text: Vec<String> = std::iter::from_fn(&mut arg).collect();
                if text.is_empty() {
                    Command::Usage("say <name> <text..>")
                } else {
                    Command::Say {
                        name,
                        text: text.join(" "),
                    }
                }
            }
            None => Command::Usage("say <name> <text..>"),
        },
        "chest" => match arg() {
            None => Command::Chest(27),
            Some(c) => c.parse().map_or(Command::Usage("chest [capacity]"), Command::Chest),
        },
        "stash" => match (
            arg(),
            arg().and_then(|i| i.parse().ok()),
            arg().and_then(|s| s.parse().ok()),
        ) {
            (Some(name), Some(index), Some(storage)) => Command::Stash {
                name,
                index,
                storage,
            },
            _ => Command::Usage("stash <name> <index> <storage>"),
        },
        "storages" => Command::Storages,
        "inspect" => arg().map_or(Command::Usage("inspect <name>"), Command::Inspect),
        "tamper" => match (arg(), arg()) {
            (Some(name), Some(value)) => Command::Tamper { name, value },
            _ => Command::Usage("tamper <name> <value>"),
        },
        other => Command::Unsupported(other.into()),
    }
}
