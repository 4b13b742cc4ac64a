//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The simulation only emits `GameEvent`s; this module decides what they
//! sound like.

use crate::sim::{BlockKind, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Block destroyed
    BlockBreak,
    /// Reinforced block cracked but still standing
    ReinforcedHit,
    /// Ball glances off an indestructible block
    IndestructibleHit,
    /// Ball launched
    Launch,
    /// Level cleared
    LevelClear,
    /// Ball fell past the paddle
    BallLost,
    /// Last level cleared
    RunComplete,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match *event {
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::BallLaunched => Some(SoundEffect::Launch),
            GameEvent::BlockHit {
                destroyed: true, ..
            } => Some(SoundEffect::BlockBreak),
            GameEvent::BlockHit {
                kind: BlockKind::Gold,
                ..
            } => Some(SoundEffect::IndestructibleHit),
            GameEvent::BlockHit { .. } => Some(SoundEffect::ReinforcedHit),
            GameEvent::LevelCleared { .. } => Some(SoundEffect::LevelClear),
            GameEvent::BallLost => Some(SoundEffect::BallLost),
            GameEvent::RunCompleted => Some(SoundEffect::RunComplete),
            GameEvent::LevelStarted { .. } | GameEvent::ScoreChanged { .. } => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        settings: Settings,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let mut manager = Self {
                ctx,
                settings: Settings::default(),
            };
            manager.apply_settings(settings);
            manager
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.settings = settings.clone();
            self.settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.settings.muted = muted;
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.settings.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::PaddleHit => self.play_paddle_hit(ctx, vol),
                SoundEffect::BlockBreak => self.play_block_break(ctx, vol),
                SoundEffect::ReinforcedHit => self.play_reinforced_hit(ctx, vol),
                SoundEffect::IndestructibleHit => self.play_indestructible_hit(ctx, vol),
                SoundEffect::Launch => self.play_launch(ctx, vol),
                SoundEffect::LevelClear => {
                    self.play_arpeggio(ctx, vol, &[523.0, 659.0, 784.0, 1046.0], 0.09)
                }
                SoundEffect::BallLost => {
                    self.play_arpeggio(ctx, vol, &[392.0, 330.0, 262.0, 196.0], 0.15)
                }
                SoundEffect::RunComplete => self.play_arpeggio(
                    ctx,
                    vol,
                    &[523.0, 659.0, 784.0, 1046.0, 784.0, 1046.0],
                    0.08,
                ),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Single square-wave blip with a pitch drop
        fn blip(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32, length: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + length)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + length + 0.02).ok();
        }

        fn play_paddle_hit(&self, ctx: &AudioContext, vol: f32) {
            self.blip(ctx, vol, 440.0, 220.0, 0.08);
        }

        fn play_block_break(&self, ctx: &AudioContext, vol: f32) {
            self.blip(ctx, vol, 880.0, 440.0, 0.06);
        }

        /// Metallic double ping
        fn play_reinforced_hit(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (i, freq) in [1200.0, 1500.0].iter().enumerate() {
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let start = t + i as f64 * 0.03;
                    gain.gain().set_value_at_time(vol * 0.2, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, start + 0.12)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(start + 0.15).ok();
                }
            }
        }

        /// Dull clank
        fn play_indestructible_hit(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.12).ok();
        }

        /// Whoosh up
        fn play_launch(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Notes played one after another, `spacing` seconds apart
        fn play_arpeggio(&self, ctx: &AudioContext, vol: f32, notes: &[f32], spacing: f64) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * spacing;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.2, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + spacing * 2.0)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + spacing * 2.0 + 0.05).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_hits_pick_sound_by_outcome() {
        let broke = GameEvent::BlockHit {
            kind: BlockKind::Silver,
            destroyed: true,
        };
        let cracked = GameEvent::BlockHit {
            kind: BlockKind::Silver,
            destroyed: false,
        };
        let clank = GameEvent::BlockHit {
            kind: BlockKind::Gold,
            destroyed: false,
        };
        assert_eq!(SoundEffect::for_event(&broke), Some(SoundEffect::BlockBreak));
        assert_eq!(
            SoundEffect::for_event(&cracked),
            Some(SoundEffect::ReinforcedHit)
        );
        assert_eq!(
            SoundEffect::for_event(&clank),
            Some(SoundEffect::IndestructibleHit)
        );
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ScoreChanged {
                score: 1,
                best_score: 1
            }),
            None
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LevelStarted { level: 1 }),
            None
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::RunCompleted),
            Some(SoundEffect::RunComplete)
        );
    }
}
