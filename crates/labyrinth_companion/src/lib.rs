//! Labyrinth Companion Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: LLM-driven спутник игрока в лабиринте.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = decision layer (DecisionState, timers, steering)
//! - Host (движок) = rendering, анимация, физика; отдаёт Transform и obstacle probe
//! - LLM = внешний decision source, ответ приходит асинхронно

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod llm;
pub mod logger;
pub mod movement;
pub mod physics;

// Re-export базовых типов для удобства
pub use ai::{
    CompanionConfig, CompanionDecisionEvent, CompanionPlugin, CompanionSpoke, DecisionState,
    Directive, ObstacleBackend,
};
pub use components::*;
pub use llm::{DecisionBackend, DecisionError, DecisionSource};
pub use logger::{log, log_error, log_info, log_warning, init_logger, LogLevel, LogPrinter};
pub use physics::{ObstacleBox, ObstacleProbe, StaticObstacles};

/// Частота simulation tick
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub obstacles: ObstacleBackend,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .add_plugins(CompanionPlugin {
                obstacles: self.obstacles,
            });

        // Seed мог задать create_headless_app — не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ)); // 60Hz FixedUpdate

    app
}

/// Companion bundle
///
/// Config фиксируется при spawn: chat session получает persona и history limit,
/// patrol точка генерируется из DeterministicRng.
pub fn companion_bundle(
    position: Vec3,
    config: CompanionConfig,
    rng: &mut DeterministicRng,
) -> impl Bundle {
    let session = ai::prompt::ChatSession::new(config.persona.clone(), config.history_limit);
    let patrol = PatrolArea::generate(position, config.patrol_range, &mut rng.rng);

    (
        Companion,
        Transform::from_translation(position),
        config,
        session,
        patrol,
    )
}

/// Spawn helper для companion (из систем)
pub fn spawn_companion(
    commands: &mut Commands,
    position: Vec3,
    config: CompanionConfig,
    rng: &mut DeterministicRng,
) -> Entity {
    commands.spawn(companion_bundle(position, config, rng)).id()
}

/// Spawn helper для companion (прямой доступ к World: setup, тесты)
pub fn spawn_companion_in_world(world: &mut World, position: Vec3, config: CompanionConfig) -> Entity {
    let bundle = {
        let mut rng = world.get_resource_or_insert_with(|| DeterministicRng::new(42));
        companion_bundle(position, config, &mut rng)
    };
    world.spawn(bundle).id()
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
