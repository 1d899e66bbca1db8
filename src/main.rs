//! ToMiGE demo
//!
//! A tiny headless shooter: the player strafes on a scripted input track and
//! auto-fires stars at the closest enemy while a spawner drops enemies from
//! the top. Frames are rendered to a recording surface and the outcome is
//! logged.

use glam::Vec2;

use tomige::engine::{
    Aabb, Behavior, Collider, Ctx, Entity, EntityId, Game, Sprite, Timer, TimerNode,
};
use tomige::renderer::{Color, RecordingSurface};
use tomige::{EngineSettings, ImageData, direction_to};

const FRAMES: u32 = 600;
const FRAME_MS: f64 = 1000.0 / 60.0;

const LAYER_PLAYER: u8 = 0;
const LAYER_STAR: u8 = 1;
const LAYER_ENEMY: u8 = 2;

const PLAYER_SPEED: f32 = 240.0;
const STAR_SPEED: f32 = 420.0;
const ENEMY_SPEED: f32 = 90.0;
const SHOT_COOLDOWN: f32 = 0.35;
const SPAWN_COOLDOWN: f32 = 0.8;

#[derive(Debug, Default)]
struct Score {
    points: u32,
    shots: u32,
    kills: u32,
    escaped: u32,
    player_hits: u32,
}

struct Player {
    width: f32,
}

impl Behavior<Score> for Player {
    fn update(&mut self, ctx: &mut Ctx<'_, Score>, dt: f32) {
        let mut dir = 0.0;
        if ctx.input().any_held(&["ArrowLeft", "a"]) {
            dir -= 1.0;
        }
        if ctx.input().any_held(&["ArrowRight", "d"]) {
            dir += 1.0;
        }
        let Some(x) = ctx.position().map(|p| p.x) else { return };
        let dx = (x + dir * PLAYER_SPEED * dt).clamp(16.0, self.width - 16.0) - x;
        ctx.translate(Vec2::new(dx, 0.0));
    }

    fn on_collision(&mut self, ctx: &mut Ctx<'_, Score>, other: EntityId) {
        if ctx.name_of(other) != Some("Enemy") {
            return;
        }
        if let Some(pos) = ctx.global_position(other) {
            ctx.emit_particles(pos, 24, Color::RED);
        }
        ctx.kill(other);
        ctx.state_mut().player_hits += 1;
        ctx.play("hurt");
    }
}

struct Star {
    velocity: Vec2,
    bounds: Aabb,
}

impl Behavior<Score> for Star {
    fn update(&mut self, ctx: &mut Ctx<'_, Score>, dt: f32) {
        ctx.translate(self.velocity * dt);
        if let Some(sprite) = ctx.entity_mut().and_then(|e| e.sprite.as_mut()) {
            sprite.rotation += 6.0 * dt;
        }
        match ctx.position() {
            Some(p) if self.bounds.contains_point(p) => {}
            _ => ctx.kill_self(),
        }
    }

    fn on_collision(&mut self, ctx: &mut Ctx<'_, Score>, other: EntityId) {
        if ctx.name_of(other) != Some("Enemy") {
            return;
        }
        if let Some(pos) = ctx.global_position(other) {
            ctx.emit_particles(pos, 16, Color::ORANGE);
        }
        ctx.kill(other);
        ctx.kill_self();
        let score = ctx.state_mut();
        score.kills += 1;
        score.points += 10;
        ctx.play("hit");
    }
}

struct Enemy {
    floor: f32,
}

impl Behavior<Score> for Enemy {
    fn update(&mut self, ctx: &mut Ctx<'_, Score>, dt: f32) {
        ctx.translate(Vec2::new(0.0, ENEMY_SPEED * dt));
        if ctx.position().is_some_and(|p| p.y > self.floor) {
            ctx.kill_self();
            ctx.state_mut().escaped += 1;
        }
    }
}

/// Fires a star from the parent toward the closest enemy
fn shoot(ctx: &mut Ctx<'_, Score>, bounds: Aabb) {
    let Some(player) = ctx.entity().and_then(|e| e.parent()) else { return };
    let Some(from) = ctx.global_position(player) else { return };
    let Some(target) = ctx
        .nearest_named(from, "Enemy")
        .and_then(|id| ctx.global_position(id))
    else {
        return;
    };

    let heading = direction_to(from, target);
    if !heading.is_finite() {
        return;
    }
    let image = ctx.assets().get_image("star");
    ctx.spawn(
        Entity::new("Star")
            .with_collider(
                Collider::new(Aabb::new(from.x, from.y - 20.0, 10.0, 10.0))
                    .with_layer(LAYER_STAR)
                    .with_mask(1 << LAYER_ENEMY),
            )
            .with_sprite(Sprite::new(image))
            .with_behavior(Star {
                velocity: heading * STAR_SPEED,
                bounds,
            }),
    );
    ctx.state_mut().shots += 1;
    ctx.play("shoot");
}

fn enemy(x: f32, floor: f32, image: &tomige::ImageHandle) -> Entity<Score> {
    Entity::new("Enemy")
        .with_collider(
            Collider::new(Aabb::new(x, -20.0, 28.0, 28.0))
                .with_layer(LAYER_ENEMY)
                .with_mask(0),
        )
        .with_sprite(Sprite::new(image.clone()))
        .with_behavior(Enemy { floor })
}

/// Scripted strafing: right, hold, left, hold
fn script_input(game: &mut Game<Score>, frame: u32) {
    let input = game.input_mut();
    input.clear();
    match frame % 240 {
        0..60 => input.press("ArrowRight"),
        120..180 => input.press("ArrowLeft"),
        _ => {}
    }
}

fn main() {
    env_logger::init();

    let settings = EngineSettings::load_or_default("tomige.json");
    let (w, h) = (settings.width as f32, settings.height as f32);
    let bounds = Aabb::new(w / 2.0, h / 2.0, w + 100.0, h + 100.0);

    let mut game = Game::new("Star Shooter", settings, Score::default());

    {
        let assets = game.assets_mut();
        let star = ImageData::new("star", 1, 1, vec![255, 230, 0, 255]);
        let enemy = ImageData::new("enemy", 1, 1, vec![200, 0, 200, 255]);
        let ship = ImageData::new("ship", 1, 1, vec![0, 120, 255, 255]);
        for (name, image) in [("star", star), ("enemy", enemy), ("ship", ship)] {
            if let Err(e) = assets.register_image(name, image) {
                log::error!("{}", e);
            }
        }
        for name in ["shoot", "hit", "hurt"] {
            let path = format!("assets/{}.wav", name);
            if let Err(e) = assets.register_audio_from_path(name, path) {
                log::error!("{}", e);
            }
        }
    }

    let ship = game.assets_mut().get_image("ship");
    let player = game.add_entity(
        Entity::new("Player")
            .with_collider(
                Collider::new(Aabb::new(w / 2.0, h - 40.0, 32.0, 32.0))
                    .with_layer(LAYER_PLAYER)
                    .with_mask(1 << LAYER_ENEMY),
            )
            .with_sprite(Sprite::new(ship))
            .with_behavior(Player { width: w }),
    );

    let gun = TimerNode::new(Timer::repeating(SHOT_COOLDOWN), move |ctx: &mut Ctx<'_, Score>| {
        shoot(ctx, bounds)
    });
    if game
        .add_child(player, Entity::new("Gun").with_behavior(gun))
        .is_none()
    {
        log::error!("Player vanished before its gun was attached");
        return;
    }

    let enemy_image = game.assets_mut().get_image("enemy");
    let mut wave = 0u32;
    let spawner = TimerNode::new(Timer::repeating(SPAWN_COOLDOWN), move |ctx: &mut Ctx<'_, Score>| {
        wave += 1;
        let x = 40.0 + ((wave * 137) % 720) as f32 / 720.0 * (w - 80.0);
        ctx.spawn(enemy(x, h + 20.0, &enemy_image));
    });
    game.add_entity(Entity::new("Spawner").with_behavior(spawner));

    let mut surface = RecordingSurface::new(w, h);
    let mut sounds = 0;
    for frame in 0..FRAMES {
        script_input(&mut game, frame);
        surface.clear();
        game.advance(frame as f64 * FRAME_MS, &mut surface);
        sounds += game.drain_sounds().len();

        if frame % 120 == 0 {
            log::info!(
                "frame {:>4}: {} entities, {} particles, {} draw commands",
                frame,
                game.entity_count(),
                game.particles().len(),
                surface.commands().len()
            );
        }
    }

    let score = game.state();
    log::info!(
        "Done after {} frames: {} points, {} kills from {} shots, {} escaped, {} player hits, \
         {} sounds queued",
        game.frame_count(),
        score.points,
        score.kills,
        score.shots,
        score.escaped,
        score.player_hits,
        sounds
    );
}
