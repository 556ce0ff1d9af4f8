//! Audio feedback using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundEffect {
    /// Putter strikes the ball; louder with more power (0..1)
    Putt { power: f32 },
    /// Ball drops into the cup
    Cup,
    /// Ball lost off the course
    OutOfBounds,
}

impl SoundEffect {
    /// Sound for a simulation event
    pub fn for_event(event: &GameEvent) -> Self {
        match *event {
            GameEvent::Shot { power } => SoundEffect::Putt { power },
            GameEvent::Holed { .. } => SoundEffect::Cup,
            GameEvent::OutOfBounds => SoundEffect::OutOfBounds,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(volume: f32) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set volume (0.0 - 1.0); 0 mutes
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Play the sound for each event raised this frame
    pub fn play_events(&self, events: &[GameEvent]) {
        for event in events {
            self.play(SoundEffect::for_event(event));
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Putt { power } => self.play_putt(ctx, vol, power),
            SoundEffect::Cup => self.play_cup(ctx, vol),
            SoundEffect::OutOfBounds => self.play_out_of_bounds(ctx, vol),
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

    /// Putt - short wooden click with a low body
    fn play_putt(&self, ctx: &AudioContext, vol: f32, power: f32) {
        let t = ctx.current_time();
        let strength = 0.3 + 0.7 * power.clamp(0.0, 1.0);

        if let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.35 * strength, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.04)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.05).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.4 * strength, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(90.0, t + 0.12)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    /// Cup - hollow rattle then a rising chime
    fn play_cup(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 320.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(320.0, t).ok();
            osc.frequency().set_value_at_time(260.0, t + 0.05).ok();
            osc.frequency().set_value_at_time(300.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(240.0, t + 0.15).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.26).ok();
        }

        // C5, E5, G5
        for (i, freq) in [523.25_f32, 659.25, 783.99].into_iter().enumerate() {
            let start = t + 0.3 + i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) {
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.3, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.4)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.45).ok();
            }
        }
    }

    /// Out of bounds - descending buzz
    fn play_out_of_bounds(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
    }
}
