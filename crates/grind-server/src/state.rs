use std::sync::Arc;

use grind_core::character::CharacterService;
use grind_core::client::{ActionClient, GameClient};
use grind_core::config::Config;
use grind_core::db::GrindDb;
use grind_core::map::{LocationProvider, MapService};
use grind_core::routine::{FightRoutine, GatherRoutine, RoutineRegistry};
use grind_core::scheduler::CooldownScheduler;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub characters: Arc<CharacterService>,
    pub map: Arc<MapService>,
    pub registry: Arc<RoutineRegistry>,
}

impl AppState {
    /// Wire the full service graph: one database, one game client, one
    /// process-wide scheduler shared by every routine.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let db = Arc::new(GrindDb::open(&config.db_path)?);
        let client = Arc::new(GameClient::new(&config.api_url, &config.api_token)?);
        let scheduler = CooldownScheduler::new();

        let characters = Arc::new(CharacterService::new(
            Arc::clone(&client) as Arc<dyn ActionClient>,
            Arc::clone(&db),
            scheduler.clone(),
        ));
        let map = Arc::new(MapService::new(Arc::clone(&client)));

        let mut registry = RoutineRegistry::new(Arc::clone(&db));
        registry.register(Arc::new(GatherRoutine::new(
            Arc::clone(&characters),
            Arc::clone(&map) as Arc<dyn LocationProvider>,
            Arc::clone(&db),
            scheduler.clone(),
        )));
        registry.register(Arc::new(FightRoutine::new(
            Arc::clone(&characters),
            Arc::clone(&map) as Arc<dyn LocationProvider>,
            Arc::clone(&db),
            scheduler,
        )));

        Ok(Self {
            characters,
            map,
            registry: Arc::new(registry),
        })
    }
}
