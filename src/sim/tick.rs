//! Per-frame simulation tick
//!
//! Processing order:
//!   1. Timers due this frame (warm-up spikes, spawn cycle, surface debounce)
//!   2. Progression (phase change retunes the spawn timer)
//!   3. Obstacle scroll and eviction, at this frame's speed
//!   4. Surface velocity enforcement
//!   5. Player integration and collision resolution
//!   6. Input (flip)
//!
//! A fatal collision ends the run mid-tick; nothing after it runs.

use super::event::GameEvent;
use super::physics::{detect_collisions, touching_platform};
use super::state::GameSession;
use super::timer::TimerAction;

/// Input edges for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Flip key pressed or pointer went down since the last tick
    pub flip: bool,
    /// Restart requested from the game-over screen
    pub restart: bool,
}

/// Advance the run by `dt` seconds. Returns every event dispatched, in order.
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut out = Vec::new();
    if session.is_over() {
        return out;
    }
    let dt = dt.max(0.0);
    session.time_ticks += 1;

    session.scheduler.advance(dt as f64 * 1000.0);
    while let Some((_, action)) = session.scheduler.pop_due() {
        run_timer(session, action, &mut out);
    }
    dispatch(session, &mut out);

    if let Some(change) = session.progression.tick() {
        session.queue.push_back(GameEvent::PhaseAdvanced {
            from: change.from,
            to: change.to,
        });
        dispatch(session, &mut out);
    }

    let speed = session.progression.current_speed();
    session.obstacles.advance(speed, dt);
    for id in session.obstacles.evict_offscreen(session.tuning.evict_x) {
        log::trace!("Obstacle {} evicted", id);
        out.push(GameEvent::ObstacleEvicted { id });
    }

    let velocity = session.progression.current_player_velocity();
    session.player.enforce_surface_velocity(velocity);

    session.player.integrate(dt);
    let contacts = detect_collisions(
        &session.player,
        session.obstacles.obstacles(),
        &session.hitboxes,
    );
    session.queue.extend(contacts);
    dispatch(session, &mut out);
    if session.is_over() {
        return out;
    }

    if input.flip {
        session.queue.push_back(GameEvent::FlipRequested);
        dispatch(session, &mut out);
    }

    out
}

/// Timer callback bodies
fn run_timer(session: &mut GameSession, action: TimerAction, out: &mut Vec<GameEvent>) {
    let phase = session.progression.current_phase();
    match action {
        TimerAction::WarmupSpawn { index } => {
            let o = session
                .obstacles
                .spawn_warmup(&session.tuning, index, &mut session.rng);
            out.push(GameEvent::ObstacleSpawned {
                id: o.id,
                lane: o.lane,
                x: o.pos.x,
            });
        }
        TimerAction::SpawnCycle => {
            let now = session.scheduler.now_ms();
            let spawned =
                session
                    .obstacles
                    .spawn_cycle(&session.tuning, phase, now, &mut session.rng);
            for o in spawned {
                log::debug!("Obstacle {} spawned ({:?} lane, x={})", o.id, o.lane, o.pos.x);
                out.push(GameEvent::ObstacleSpawned {
                    id: o.id,
                    lane: o.lane,
                    x: o.pos.x,
                });
            }
        }
        TimerAction::SurfaceDebounce => {
            let body = session.player.hitbox(session.hitboxes.player);
            let touching = touching_platform(&body, &session.hitboxes).is_some();
            if session.player.on_debounce(touching) {
                session.queue.push_back(GameEvent::SurfaceLost);
            }
        }
    }
}

/// Drain the event queue, applying each event to the session
fn dispatch(session: &mut GameSession, out: &mut Vec<GameEvent>) {
    while let Some(event) = session.queue.pop_front() {
        match event {
            GameEvent::PhaseAdvanced { to, .. } => {
                let delay = session
                    .obstacles
                    .retune(&mut session.scheduler, &session.tuning, to);
                log::info!("Phase {}: obstacle delay: {}ms", to, delay);
                out.push(event);
            }
            GameEvent::SurfaceContacted { surface } => {
                let velocity = session.progression.current_player_velocity();
                let landed = session.player.on_surface_contact(
                    velocity,
                    &mut session.scheduler,
                    session.tuning.surface_debounce_ms,
                );
                if landed {
                    log::debug!("Landed on {}", surface.as_str());
                    out.push(event);
                }
            }
            GameEvent::FatalCollision { cause } => {
                out.push(event);
                // end() also empties the queue
                if let Some(final_score) = session.end(cause) {
                    out.push(GameEvent::GameOver { final_score });
                }
            }
            GameEvent::FlipRequested => {
                let velocity = session.progression.current_player_velocity();
                match session.player.flip(velocity) {
                    Some(to) => out.push(GameEvent::Flipped { to }),
                    None => log::trace!("Flip ignored: airborne"),
                }
            }
            other => out.push(other),
        }
    }
}
