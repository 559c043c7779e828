//! Headless симуляция companion
//!
//! Игрок ходит по кругу, companion решает через LLM (Ollama, если задан
//! `OLLAMA_BASE_URL`, иначе scripted ответы) и следует/убегает.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use labyrinth_companion::llm::{OllamaDecisionSource, ScriptedDecisionSource};
use labyrinth_companion::{
    create_headless_app, log_error, log_info, spawn_companion_in_world, CompanionConfig,
    CompanionSpoke, DecisionBackend, DecisionState, ObstacleBox, Player, SimulationPlugin,
    StaticObstacles, SIMULATION_HZ,
};

const TICKS: usize = 3600;

/// Игрок идёт по кругу радиуса 8 вокруг центра
fn walk_player(time: Res<Time<Fixed>>, mut players: Query<&mut Transform, With<Player>>) {
    let t = time.elapsed_secs() * 0.3;
    for mut transform in players.iter_mut() {
        transform.translation = Vec3::new(t.cos() * 8.0, 0.0, t.sin() * 8.0);
    }
}

fn print_dialogue(mut spoke: EventReader<CompanionSpoke>) {
    for event in spoke.read() {
        println!("Companion {:?} says: {}", event.entity, event.message);
    }
}

fn decision_backend() -> DecisionBackend {
    if std::env::var("OLLAMA_BASE_URL").is_ok() {
        match OllamaDecisionSource::from_env() {
            Ok(source) => return DecisionBackend::new(source),
            Err(error) => log_error(&format!("Ollama client init failed: {}", error)),
        }
    }

    log_info("Using scripted decision source");
    DecisionBackend::new(ScriptedDecisionSource::cycle([
        "3,t,Wait for me! I don't want to be left behind!",
        "0,p,Did you hear that? Maybe we should be more careful...",
        "6,a,This is too scary! I need a moment to calm down!",
        "2,t,Okay... I think I'm ready to follow you again.",
    ]))
}

fn main() {
    let seed = 42;
    println!("Starting labyrinth companion headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::default())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )))
        .insert_resource(decision_backend())
        .insert_resource(StaticObstacles::default().with_box(ObstacleBox::from_center(
            Vec3::new(4.0, 1.0, 4.0),
            Vec3::new(0.5, 1.0, 2.0),
        )))
        .add_systems(FixedUpdate, walk_player)
        .add_systems(Update, print_dialogue);

    app.world_mut()
        .spawn((Player, Transform::from_translation(Vec3::new(8.0, 0.0, 0.0))));

    let companion = spawn_companion_in_world(
        app.world_mut(),
        Vec3::new(14.0, 0.0, 0.0),
        CompanionConfig::default(),
    );

    for tick in 0..TICKS {
        app.update();

        if tick % 300 == 0 {
            let world = app.world();
            if let (Some(transform), Some(state)) = (
                world.get::<Transform>(companion),
                world.get::<DecisionState>(companion),
            ) {
                println!(
                    "Tick {}: companion at {:.2?}, speed {:.1}, {:?}, stopped: {}",
                    tick,
                    transform.translation,
                    state.speed(),
                    state.directive(),
                    state.is_stopped()
                );
            }
        }
    }

    println!("Simulation complete!");
}
