use anyhow::Context;
use log::{error, info};
use macroquad::prelude::*;
use macroquad_tiled_runtime::{EngineConfig, MacroquadTarget, Session, TileAtlas};

const SPEED: f32 = 120.0; // pixels per second

fn window_conf() -> Conf {
    Conf {
        window_title: "Walkabout".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn input_direction() -> Vec2 {
    let mut dir = Vec2::ZERO;
    if is_key_down(KeyCode::Left) {
        dir.x -= 1.0;
    }
    if is_key_down(KeyCode::Right) {
        dir.x += 1.0;
    }
    if is_key_down(KeyCode::Up) {
        dir.y -= 1.0;
    }
    if is_key_down(KeyCode::Down) {
        dir.y += 1.0;
    }
    dir
}

async fn run() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/config.json".to_string());
    let config = EngineConfig::load(&config_path)
        .with_context(|| format!("loading config {config_path}"))?;

    let mut session = Session::start(config).context("starting session")?;
    let atlas = TileAtlas::load(session.tileset())
        .await
        .context("uploading tileset atlas")?;
    info!("Walkabout started on a {}x{} map", session.map().width, session.map().height);

    loop {
        clear_background(BLACK);

        let delta = input_direction() * SPEED * get_frame_time();
        if let Some(target) = session.tick(delta)?.warped {
            info!("Entered {}", target.map);
        }

        let now_ms = (get_time() * 1000.0) as u64;
        let mut target = MacroquadTarget::new(&atlas);
        session.draw(now_ms, &mut target);

        draw_text(
            &format!("FPS: {}", get_fps()),
            screen_width() - 135.0,
            55.0,
            30.0,
            RED,
        );

        if is_key_pressed(KeyCode::Escape) {
            return Ok(());
        }
        next_frame().await;
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        error!("{err:?}");
        std::process::exit(1);
    }
}
