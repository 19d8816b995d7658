// 遊戲事件流程示範
//
// 展示分發器的完整使用方式：優先級排序的即時分發、
// 跨線程的延遲入列與排空、擁有者銷毀後的自動清理，
// 以及最後的統計信息輸出。

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

use eventcore::config;
use eventcore::logging::init_logging;
use eventcore::{Event, EventDispatcher, EventPriority};
use tracing::info;

// 示範事件類型
#[derive(Debug, Clone)]
struct PlayerDied {
    player_id: u32,
    damage: f32,
    cause: String,
}
impl Event for PlayerDied {}

#[derive(Debug, Clone)]
struct PlayerLevelUp {
    player_id: u32,
    new_level: u32,
}
impl Event for PlayerLevelUp {}

// 示範監聽者
struct Player {
    id: u32,
}

impl Player {
    fn on_player_died(&self, event: &PlayerDied) {
        if event.player_id == self.id {
            info!(
                "玩家 {} 收到自己的死亡事件：{} 點傷害，死因 {}",
                self.id, event.damage, event.cause
            );
        } else {
            info!("玩家 {} 得知玩家 {} 死亡", self.id, event.player_id);
        }
    }

    fn on_level_up(&self, event: &PlayerLevelUp) {
        info!(
            "玩家 {} 看到玩家 {} 升到 {} 級",
            self.id, event.player_id, event.new_level
        );
    }
}

struct GameManager {
    dead_players: AtomicU32,
}

impl GameManager {
    fn on_player_died(&self, event: &PlayerDied) {
        self.dead_players.fetch_add(1, Ordering::Relaxed);
        info!("遊戲管理器：玩家 {} 已淘汰", event.player_id);
    }
}

fn main() -> anyhow::Result<()> {
    let app_config = config::ApplicationConfig::load_from_env()?;
    init_logging(&app_config.log)?;

    let dispatcher = Arc::new(EventDispatcher::with_config(&app_config.dispatcher));

    // 建立監聽者：管理器以高優先級訂閱，先於玩家收到死亡事件
    let game_manager = Arc::new(GameManager {
        dead_players: AtomicU32::new(0),
    });
    dispatcher.subscribe_with_priority(
        &game_manager,
        GameManager::on_player_died,
        EventPriority::High,
    );

    let players: Vec<Arc<Player>> = (1..=3).map(|id| Arc::new(Player { id })).collect();
    for player in &players {
        dispatcher.subscribe(player, Player::on_player_died);
        dispatcher.subscribe(player, Player::on_level_up);
    }

    info!("目前共 {} 個監聽者", dispatcher.total_listener_count());

    // 即時分發：同步執行，回傳時所有存活監聽者都已處理完畢
    dispatcher.dispatch(&PlayerDied {
        player_id: 2,
        damage: 87.5,
        cause: "墜落".to_string(),
    });

    // 跨線程延遲分發：生產者線程無鎖入列
    let producers: Vec<_> = (0..2)
        .map(|t| {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                for level in 1..=5 {
                    dispatcher.enqueue(PlayerLevelUp {
                        player_id: t + 1,
                        new_level: level,
                    });
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().expect("producer thread panicked");
    }

    // 消費者按批次排空佇列（模擬每幀處理）
    let batch = app_config.dispatcher.drain_batch_size;
    loop {
        if dispatcher.drain(batch) == 0 {
            break;
        }
    }

    // 銷毀一個玩家，其訂閱在下一次分發中被略過、隨後清理
    drop(players);
    dispatcher.dispatch(&PlayerDied {
        player_id: 1,
        damage: 10.0,
        cause: "中毒".to_string(),
    });
    let pruned = dispatcher.prune_expired();
    info!("清理了 {} 個過期監聽者", pruned);

    let stats = dispatcher.stats();
    info!(
        "統計：監聽者 {}，分發 {} 次，佇列餘 {}，事件類型 {}",
        stats.total_listeners, stats.total_dispatches, stats.queued_events, stats.event_types
    );
    info!(
        "淘汰玩家數：{}",
        game_manager.dead_players.load(Ordering::Relaxed)
    );

    Ok(())
}
