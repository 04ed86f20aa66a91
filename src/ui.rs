//! HUD snapshot and transient feedback
//!
//! The simulation never reads any of this back. Hosts render the snapshot
//! however they like (DOM text on the web, log lines natively).

use serde::Serialize;

use crate::consts::CONTROLS_HINT_DISTANCE;
use crate::platform::ScoreEntry;
use crate::sim::GameSession;

/// How long the "PHASE N" banner stays up (seconds)
pub const PHASE_BANNER_SECS: f32 = 1.0;
/// Phase flash fade time (seconds)
pub const PHASE_FLASH_SECS: f32 = 0.3;
/// Rows in the top-scores block
pub const TOP_SCORES_SHOWN: usize = 5;

pub const CONTROLS_HINT: &str = "Press SPACE or CLICK\nwhen on surface to flip";

/// Phase-advance banner and screen flash
#[derive(Debug, Clone, Default)]
pub struct Feedback {
    banner: Option<(u32, f32)>,
    flash: f32,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// New phase reached. `flash` is false under reduced motion.
    pub fn phase_up(&mut self, phase: u32, flash: bool) {
        self.banner = Some((phase, PHASE_BANNER_SECS));
        if flash {
            self.flash = PHASE_FLASH_SECS;
        }
    }

    /// Fade by wall-clock `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.flash = (self.flash - dt).max(0.0);
        if let Some((phase, remaining)) = self.banner {
            let remaining = remaining - dt;
            self.banner = (remaining > 0.0).then_some((phase, remaining));
        }
    }

    pub fn banner(&self) -> Option<u32> {
        self.banner.map(|(phase, _)| phase)
    }

    /// Flash opacity, 0.0 when idle
    pub fn flash_alpha(&self) -> f32 {
        self.flash / PHASE_FLASH_SECS
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub distance: u64,
    pub phase: u32,
    /// Scroll speed magnitude, floored
    pub speed: u32,
    pub speed_multiplier: f32,
    pub on_surface: bool,
    pub obstacle_count: usize,
    pub player_velocity: i64,
    pub high_score: u64,
    pub controls_hint: bool,
    /// Final distance once the run is over
    pub game_over: Option<u64>,
    pub top_scores: Vec<u64>,
    pub phase_banner: Option<u32>,
    pub flash_alpha: f32,
}

impl Hud {
    pub fn new(
        session: &GameSession,
        high_score: u64,
        top_scores: &[ScoreEntry],
        feedback: &Feedback,
    ) -> Self {
        let progression = &session.progression;
        let distance = progression.display_distance();
        Self {
            distance,
            phase: progression.current_phase(),
            speed: speed_magnitude(progression.current_speed()),
            speed_multiplier: progression.speed_multiplier(),
            on_surface: session.player.is_on_surface,
            obstacle_count: session.obstacles.active_count(),
            player_velocity: progression.current_player_velocity().round() as i64,
            high_score,
            controls_hint: controls_hint_visible(distance),
            game_over: session.final_score(),
            top_scores: top_scores
                .iter()
                .take(TOP_SCORES_SHOWN)
                .map(|e| e.score)
                .collect(),
            phase_banner: feedback.banner(),
            flash_alpha: feedback.flash_alpha(),
        }
    }

    pub fn distance_text(&self) -> String {
        format!("Distance: {}", self.distance)
    }

    pub fn speed_text(&self) -> String {
        format!("Speed: {}", self.speed)
    }

    pub fn phase_text(&self) -> String {
        format!("Phase: {}", self.phase)
    }

    pub fn multiplier_text(&self) -> String {
        format!("Multiplier: {:.2}x", self.speed_multiplier)
    }

    pub fn surface_text(&self) -> String {
        format!("On Surface: {}", if self.on_surface { "Yes" } else { "No" })
    }

    pub fn debug_text(&self) -> String {
        format!(
            "Phase: {} | Obstacles: {} | Player Speed: {}",
            self.phase, self.obstacle_count, self.player_velocity
        )
    }

    pub fn scoreboard_text(&self) -> String {
        scoreboard_text(self.high_score, self.distance)
    }

    pub fn top_scores_text(&self) -> Option<String> {
        top_scores_text(&self.top_scores)
    }

    pub fn banner_text(&self) -> Option<String> {
        self.phase_banner.map(|phase| format!("PHASE {}", phase))
    }

    pub fn game_over_text(&self) -> Option<String> {
        self.game_over
            .map(|d| format!("GAME OVER\nDistance: {}\nTap to Restart", d))
    }
}

/// `|floor(speed)|`, ignoring float noise below 1e-4
pub fn speed_magnitude(speed: f32) -> u32 {
    let speed = (speed as f64 * 1e4).round() / 1e4;
    speed.floor().abs() as u32
}

/// `HI 00030 00042`
pub fn scoreboard_text(high_score: u64, distance: u64) -> String {
    format!("HI {:05} {:05}", high_score, distance)
}

/// `Top Scores:\n1. 42\n...`, or None when there is nothing to show
pub fn top_scores_text(scores: &[u64]) -> Option<String> {
    if scores.is_empty() {
        return None;
    }
    let mut text = String::from("Top Scores:\n");
    for (i, score) in scores.iter().take(TOP_SCORES_SHOWN).enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, score));
    }
    Some(text)
}

pub fn controls_hint_visible(distance: u64) -> bool {
    distance < CONTROLS_HINT_DISTANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Hitboxes;
    use crate::tuning::Tuning;

    #[test]
    fn test_scoreboard_padding() {
        assert_eq!(scoreboard_text(30, 42), "HI 00030 00042");
        assert_eq!(scoreboard_text(123456, 0), "HI 123456 00000");
    }

    #[test]
    fn test_top_scores_block() {
        assert_eq!(top_scores_text(&[]), None);
        assert_eq!(
            top_scores_text(&[42, 30]).as_deref(),
            Some("Top Scores:\n1. 42\n2. 30\n")
        );
        let many = top_scores_text(&[9, 8, 7, 6, 5, 4]).unwrap();
        assert!(many.ends_with("5. 5\n"));
        assert!(!many.contains("6. "));
    }

    #[test]
    fn test_controls_hint_hides_at_25() {
        assert!(controls_hint_visible(24));
        assert!(!controls_hint_visible(25));
    }

    #[test]
    fn test_speed_magnitude() {
        assert_eq!(speed_magnitude(-300.0), 300);
        assert_eq!(speed_magnitude(-300.0 * 1.2), 360);
        assert_eq!(speed_magnitude(-360.5), 361);
    }

    #[test]
    fn test_feedback_fades() {
        let mut fb = Feedback::new();
        fb.phase_up(2, true);
        assert_eq!(fb.banner(), Some(2));
        assert!((fb.flash_alpha() - 1.0).abs() < 1e-6);

        fb.update(0.5);
        assert_eq!(fb.flash_alpha(), 0.0);
        assert_eq!(fb.banner(), Some(2));

        fb.update(0.6);
        assert_eq!(fb.banner(), None);
    }

    #[test]
    fn test_feedback_without_flash() {
        let mut fb = Feedback::new();
        fb.phase_up(1, false);
        assert_eq!(fb.banner(), Some(1));
        assert_eq!(fb.flash_alpha(), 0.0);
    }

    #[test]
    fn test_hud_snapshot() {
        let mut session = crate::sim::GameSession::new(1, Tuning::default(), Hitboxes::default());
        for _ in 0..500 {
            session.progression.tick();
        }
        let hud = Hud::new(
            &session,
            30,
            &[ScoreEntry { score: 200 }],
            &Feedback::new(),
        );
        assert_eq!(hud.distance, 100);
        assert_eq!(hud.phase, 1);
        assert_eq!(hud.speed, 360);
        assert_eq!(hud.player_velocity, 315);
        assert_eq!(hud.multiplier_text(), "Multiplier: 1.20x");
        assert_eq!(hud.scoreboard_text(), "HI 00030 00100");
        assert!(!hud.controls_hint);
        assert_eq!(hud.game_over, None);
        assert_eq!(hud.surface_text(), "On Surface: No");
    }
}
