//! Fire-and-forget sound cues, synthesised on the fly.
//!
//! Gameplay only writes [`SoundCue`] events. If the audio stack is missing (headless run,
//! no output device) the cue is dropped; nothing upstream ever waits on playback.

use std::f32::consts::TAU;
use std::time::Duration;

use bevy::audio::{AddAudioSource, AudioPlugin, Decodable, Source};
use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// A block was picked up.
    Grab,
    /// A held block was released into the simulation.
    Drop,
    /// The tower collapsed.
    Fail,
}

/// Exponential frequency and gain sweep of a sine wave.
#[derive(Asset, TypePath, Debug, Clone, Copy, PartialEq)]
pub struct ToneCue {
    pub start_hz: f32,
    pub end_hz: f32,
    pub start_gain: f32,
    pub end_gain: f32,
    pub duration_secs: f32,
}

impl ToneCue {
    pub const SAMPLE_RATE: u32 = 44_100;

    pub fn for_cue(cue: SoundCue) -> Self {
        match cue {
            SoundCue::Grab => Self {
                start_hz: 320.0,
                end_hz: 640.0,
                start_gain: 0.12,
                end_gain: 0.01,
                duration_secs: 0.08,
            },
            SoundCue::Drop => Self {
                start_hz: 150.0,
                end_hz: 40.0,
                start_gain: 0.2,
                end_gain: 0.01,
                duration_secs: 0.2,
            },
            SoundCue::Fail => Self {
                start_hz: 220.0,
                end_hz: 55.0,
                start_gain: 0.25,
                end_gain: 0.01,
                duration_secs: 0.6,
            },
        }
    }

    pub fn sample_count(&self) -> usize {
        (self.duration_secs.max(0.0) * Self::SAMPLE_RATE as f32).round() as usize
    }
}

pub struct ToneDecoder {
    tone: ToneCue,
    index: usize,
    total: usize,
    phase: f32,
}

/// `start * (end / start)^t`, clamped away from zero so the ramp stays defined.
fn exp_ramp(start: f32, end: f32, t: f32) -> f32 {
    let start = start.max(1e-4);
    let end = end.max(1e-4);
    start * (end / start).powf(t)
}

impl Iterator for ToneDecoder {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total {
            return None;
        }
        let t = self.index as f32 / self.total as f32;
        let freq = exp_ramp(self.tone.start_hz, self.tone.end_hz, t);
        let gain = exp_ramp(self.tone.start_gain, self.tone.end_gain, t);
        let sample = self.phase.sin() * gain;
        self.phase = (self.phase + TAU * freq / ToneCue::SAMPLE_RATE as f32) % TAU;
        self.index += 1;
        Some(sample)
    }
}

impl Source for ToneDecoder {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total - self.index)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        ToneCue::SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(self.tone.duration_secs.max(0.0)))
    }
}

impl Decodable for ToneCue {
    type DecoderItem = <ToneDecoder as Iterator>::Item;
    type Decoder = ToneDecoder;

    fn decoder(&self) -> Self::Decoder {
        ToneDecoder {
            tone: *self,
            index: 0,
            total: self.sample_count(),
            phase: 0.0,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct CueSounds {
    pub grab: Handle<ToneCue>,
    pub drop: Handle<ToneCue>,
    pub fail: Handle<ToneCue>,
}

impl CueSounds {
    pub fn handle(&self, cue: SoundCue) -> Handle<ToneCue> {
        match cue {
            SoundCue::Grab => self.grab.clone(),
            SoundCue::Drop => self.drop.clone(),
            SoundCue::Fail => self.fail.clone(),
        }
    }
}

/// Cleared by teardown; once closed, cues are discarded.
#[derive(Resource, Debug)]
pub struct AudioGate {
    pub enabled: bool,
}

impl Default for AudioGate {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AudioGate {
    /// Returns whether this call changed anything.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.enabled, false)
    }
}

/// Playing cue entity.
#[derive(Component)]
pub struct CueVoice;

pub struct SoundCuePlugin;

impl Plugin for SoundCuePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SoundCue>()
            .init_resource::<AudioGate>()
            .add_systems(Update, play_sound_cues);
        if app.is_plugin_added::<AudioPlugin>() {
            app.add_audio_source::<ToneCue>()
                .add_systems(Startup, build_cue_sounds);
        } else {
            info!(target: "audio", "no audio plugin; sound cues disabled");
        }
    }
}

fn build_cue_sounds(mut commands: Commands, assets: Option<ResMut<Assets<ToneCue>>>) {
    let Some(mut assets) = assets else {
        warn!(target: "audio", "tone assets unavailable; sound cues disabled");
        return;
    };
    commands.insert_resource(CueSounds {
        grab: assets.add(ToneCue::for_cue(SoundCue::Grab)),
        drop: assets.add(ToneCue::for_cue(SoundCue::Drop)),
        fail: assets.add(ToneCue::for_cue(SoundCue::Fail)),
    });
}

fn play_sound_cues(
    mut commands: Commands,
    mut cues: EventReader<SoundCue>,
    sounds: Option<Res<CueSounds>>,
    gate: Res<AudioGate>,
) {
    if !gate.enabled {
        cues.clear();
        return;
    }
    let Some(sounds) = sounds else {
        for cue in cues.read() {
            debug!(target: "audio", "dropped {cue:?}: no audio output");
        }
        return;
    };
    for &cue in cues.read() {
        commands.spawn((
            AudioPlayer(sounds.handle(cue)),
            PlaybackSettings::DESPAWN,
            CueVoice,
        ));
    }
}

/// Silence everything in flight and refuse further cues. Safe to call repeatedly.
pub fn shut_down_audio(
    commands: &mut Commands,
    gate: &mut AudioGate,
    voices: &Query<Entity, With<CueVoice>>,
) -> bool {
    let closed = gate.close();
    for e in voices.iter() {
        commands.entity(e).despawn();
    }
    if closed {
        info!(target: "audio", "audio output released");
    }
    closed
}
