//! Gameplay constants and the optional on-disk configuration.
//!
//! Every number the simulation uses lives in [`Tuning`]; one `Tuning` exists
//! per ruleset.  [`ArcadeConfig`] bundles them with host settings and can be
//! read from a RON file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Environment variable naming a RON config file.
pub const CONFIG_ENV: &str = "ARCADE_CONFIG";

/// Defines [`Tuning`] together with `TuningSection`, its partial form read
/// from config files.
macro_rules! tuning {
    ($($(#[$meta:meta])* $field:ident: $ty:ty,)*) => {
        #[derive(Clone, Debug, PartialEq, Serialize)]
        pub struct Tuning {
            $($(#[$meta])* pub $field: $ty,)*
        }

        /// One config section.  Only the fields it names replace the preset's.
        #[derive(Debug, Deserialize)]
        struct TuningSection {
            $(#[serde(default, deserialize_with = "present")] $field: Option<$ty>,)*
        }

        impl TuningSection {
            fn over(self, mut preset: Tuning) -> Tuning {
                $(if let Some(value) = self.$field {
                    preset.$field = value;
                })*
                preset
            }
        }
    };
}

tuning! {
    // ── Kinematics ──
    accel: f32,
    friction: f32,
    /// |vx| below this snaps to zero.
    stop_epsilon: f32,
    max_speed: f32,
    powered_max_speed: f32,
    gravity: f32,
    /// Upward (negative) velocity applied when a jump starts.
    jump_impulse: f32,
    /// Early-release damping only applies while vy is below this.
    release_threshold: f32,
    release_damping: f32,
    player_half_width: f32,
    /// Keep x >= 0.
    clamp_left_edge: bool,

    // ── Hazard scripts ──
    ground_step: f32,
    flying_step: f32,
    flight_amplitude: f32,
    /// Milliseconds per radian of the flight wave.
    flight_period_ms: f32,

    // ── Contact and pickup ──
    hazard_reach_x: f32,
    hazard_reach_y: f32,
    /// Lifts the player's feet position to approximate the body centre.
    body_offset: f32,
    pickup_reach_x: f32,
    pickup_reach_y: f32,
    coin_bonus: u32,
    power_bonus: u32,
    defeat_bonus: u32,
    power_duration_ms: u64,
    /// Falling below this y ends the run.
    fall_limit: f32,

    // ── Camera ──
    camera_lead: f32,
    camera_smoothing: f32,

    // ── Variant specific ──
    /// Height of the opening in a pipe (flappy).
    pipe_gap: f32,
    /// Forced forward speed at run start (flappy, lane runner).
    run_speed: f32,
    /// Forced forward speed ceiling (lane runner).
    run_speed_max: f32,
    /// Speed added per second of run time (lane runner).
    run_speed_ramp: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::platformer()
    }
}

impl Tuning {
    pub fn platformer() -> Self {
        Self {
            accel: 0.15,
            friction: 0.85,
            stop_epsilon: 0.05,
            max_speed: 1.2,
            powered_max_speed: 1.8,
            gravity: 0.12,
            jump_impulse: -2.6,
            release_threshold: -0.5,
            release_damping: 0.5,
            player_half_width: 2.0,
            clamp_left_edge: true,
            ground_step: 0.3,
            flying_step: 0.4,
            flight_amplitude: 6.0,
            flight_period_ms: 400.0,
            hazard_reach_x: 4.0,
            hazard_reach_y: 6.0,
            body_offset: 3.0,
            pickup_reach_x: 5.0,
            pickup_reach_y: 8.0,
            coin_bonus: 100,
            power_bonus: 1000,
            defeat_bonus: 500,
            power_duration_ms: 5000,
            fall_limit: 110.0,
            camera_lead: 30.0,
            camera_smoothing: 0.1,
            pipe_gap: 0.0,
            run_speed: 0.0,
            run_speed_max: 0.0,
            run_speed_ramp: 0.0,
        }
    }

    pub fn flappy() -> Self {
        Self {
            gravity: 0.09,
            jump_impulse: -1.6,
            hazard_reach_x: 4.0,
            pipe_gap: 30.0,
            run_speed: 0.6,
            run_speed_max: 0.6,
            fall_limit: 100.0,
            camera_lead: 25.0,
            ..Self::platformer()
        }
    }

    pub fn lane_runner() -> Self {
        Self {
            jump_impulse: -2.4,
            max_speed: 1.6,
            powered_max_speed: 2.2,
            run_speed: 0.7,
            run_speed_max: 1.6,
            run_speed_ramp: 0.02,
            camera_lead: 20.0,
            ..Self::platformer()
        }
    }

    pub fn power_duration(&self) -> Duration {
        Duration::from_millis(self.power_duration_ms)
    }

    /// Horizontal speed ceiling for the player's current power state.
    pub fn speed_cap(&self, powered: bool) -> f32 {
        if powered {
            self.powered_max_speed
        } else {
            self.max_speed
        }
    }
}

// ── Host configuration ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub frame_ms: u64,
    pub snapshot_interval_ms: u64,
    pub hold_window_frames: u64,
    pub leaderboard_path: Option<PathBuf>,
    // A section overrides only the fields it names; the rest keep that
    // ruleset's preset.
    #[serde(deserialize_with = "platformer_section")]
    pub platformer: Tuning,
    #[serde(deserialize_with = "flappy_section")]
    pub flappy: Tuning,
    #[serde(deserialize_with = "lane_runner_section")]
    pub lane_runner: Tuning,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn platformer_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tuning, D::Error> {
    Ok(TuningSection::deserialize(deserializer)?.over(Tuning::platformer()))
}

fn flappy_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tuning, D::Error> {
    Ok(TuningSection::deserialize(deserializer)?.over(Tuning::flappy()))
}

fn lane_runner_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tuning, D::Error> {
    Ok(TuningSection::deserialize(deserializer)?.over(Tuning::lane_runner()))
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            snapshot_interval_ms: 33,
            hold_window_frames: 4,
            leaderboard_path: None,
            platformer: Tuning::platformer(),
            flappy: Tuning::flappy(),
            lane_runner: Tuning::lane_runner(),
        }
    }
}

impl ArcadeConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Loads the file named by [`CONFIG_ENV`], or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                tracing::info!(path = %path.display(), "loading arcade config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_millis(self.snapshot_interval_ms)
    }

    /// Configured leaderboard file, or `$HOME/.portfolio_arcade_scores.json`.
    pub fn leaderboard_file(&self) -> PathBuf {
        if let Some(path) = &self.leaderboard_path {
            return path.clone();
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".portfolio_arcade_scores.json")
    }
}
