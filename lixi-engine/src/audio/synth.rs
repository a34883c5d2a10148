//! Procedural cue synthesis
//!
//! Every cue is rendered algorithmically from oscillators and shaped noise,
//! with no audio asset dependency. Buffers are mono f32 at the working sample rate; the
//! mixer interleaves them onto the device stream.
//!
//! Cue recipes:
//! - tick: 50 ms sine sweep 600→100 Hz, exponential decay, caller-scaled gain
//! - pop: 100 ms sine sweep 400→10 Hz, exponential decay
//! - shuffle: 200 ms lowpass-filtered noise, decaying gain
//! - chime: four-note ascending arpeggio (C5 E5 G5 C6), 100 ms stagger
//! - fireworks: three lowpass noise booms interleaved with square-wave
//!   crackle bursts, laid out on a fixed timeline

use rand::Rng;
use std::f32::consts::TAU;

/// Working sample rate for all synthesis
pub const SAMPLE_RATE: u32 = 44_100;

/// Chime arpeggio: C5, E5, G5, C6
const CHIME_NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.50];

/// Fireworks timeline offsets in seconds: (boom, volume), (crackle, volume)
const BOOMS: [(f32, f32); 3] = [(0.0, 0.4), (0.4, 0.3), (0.8, 0.5)];
const CRACKLES: [(f32, f32); 3] = [(0.1, 0.15), (0.5, 0.1), (0.9, 0.2)];

fn frames(seconds: f32) -> usize {
    (seconds * SAMPLE_RATE as f32).round() as usize
}

/// Exponential interpolation from `from` to `to` at normalized position `t`
///
/// Matches an exponential gain/frequency ramp: both endpoints must be > 0.
fn exp_ramp(from: f32, to: f32, t: f32) -> f32 {
    from * (to / from).powf(t)
}

/// Sine sweep with exponentially ramped frequency and decaying gain
fn sine_sweep(duration_s: f32, freq_from: f32, freq_to: f32, gain_from: f32, gain_to: f32) -> Vec<f32> {
    let len = frames(duration_s);
    let mut out = Vec::with_capacity(len);
    let mut phase = 0.0f32;
    for i in 0..len {
        let t = i as f32 / len as f32;
        let freq = exp_ramp(freq_from, freq_to, t);
        phase = (phase + TAU * freq / SAMPLE_RATE as f32) % TAU;
        out.push(phase.sin() * exp_ramp(gain_from, gain_to, t));
    }
    out
}

/// White noise through a one-pole lowpass with decaying gain
///
/// The cutoff ramps exponentially from `cutoff_from` to `cutoff_to`.
fn filtered_noise<R: Rng + ?Sized>(
    rng: &mut R,
    duration_s: f32,
    cutoff_from: f32,
    cutoff_to: f32,
    gain_from: f32,
    gain_to: f32,
) -> Vec<f32> {
    let len = frames(duration_s);
    let mut out = Vec::with_capacity(len);
    let mut y = 0.0f32;
    for i in 0..len {
        let t = i as f32 / len as f32;
        let cutoff = exp_ramp(cutoff_from, cutoff_to, t);
        let alpha = 1.0 - (-TAU * cutoff / SAMPLE_RATE as f32).exp();
        let x: f32 = rng.gen_range(-1.0..1.0);
        y += alpha * (x - y);
        out.push(y * exp_ramp(gain_from, gain_to, t));
    }
    out
}

/// Add `src` into `dest` starting at `offset` frames, growing `dest` as needed
fn mix_at(dest: &mut Vec<f32>, src: &[f32], offset: usize) {
    let needed = offset + src.len();
    if dest.len() < needed {
        dest.resize(needed, 0.0);
    }
    for (i, &s) in src.iter().enumerate() {
        dest[offset + i] += s;
    }
}

/// Pointer tick: short descending blip whose volume the caller scales down
/// as the wheel decelerates
pub fn render_tick(volume: f32) -> Vec<f32> {
    let volume = volume.clamp(0.001, 1.0);
    sine_sweep(0.05, 600.0, 100.0, volume, 0.001)
}

/// Envelope-pick pop: deeper and slightly longer than a tick
pub fn render_pop() -> Vec<f32> {
    sine_sweep(0.1, 400.0, 10.0, 0.2, 0.01)
}

/// Shuffle rustle: 200 ms of lowpassed noise
pub fn render_shuffle<R: Rng + ?Sized>(rng: &mut R) -> Vec<f32> {
    filtered_noise(rng, 0.2, 1000.0, 1000.0, 0.05, 0.01)
}

/// Celebration chime: ascending four-note arpeggio, notes staggered 100 ms
/// with individual half-second decays
pub fn render_chime() -> Vec<f32> {
    let mut out = Vec::new();
    for (i, &freq) in CHIME_NOTES.iter().enumerate() {
        let note = sine_sweep(0.5, freq, freq, 0.1, 0.001);
        mix_at(&mut out, &note, frames(0.1) * i);
    }
    out
}

/// One firework boom: long lowpass noise with the cutoff falling away
fn render_boom<R: Rng + ?Sized>(rng: &mut R, volume: f32) -> Vec<f32> {
    filtered_noise(rng, 1.5, 150.0, 40.0, volume, 0.001)
}

/// One crackle burst: twenty very short square-wave blips at randomized
/// frequencies and offsets inside a half-second window
fn render_crackle<R: Rng + ?Sized>(rng: &mut R, volume: f32) -> Vec<f32> {
    let mut out = vec![0.0; frames(0.52)];
    for _ in 0..20 {
        let offset = frames(rng.gen_range(0.0..0.5));
        let freq: f32 = rng.gen_range(2000.0..5000.0);
        let gain = volume * rng.gen::<f32>();
        let len = frames(0.02);
        let mut blip = Vec::with_capacity(len);
        for i in 0..len {
            let t = i as f32 / len as f32;
            let period = SAMPLE_RATE as f32 / freq;
            let square = if (i as f32 % period) < period / 2.0 { 1.0 } else { -1.0 };
            blip.push(square * exp_ramp(gain.max(0.001), 0.001, t));
        }
        mix_at(&mut out, &blip, offset);
    }
    out
}

/// The fireworks celebration as a fixed multi-event timeline
///
/// Returns `(delay_frames, samples)` pairs the mixer schedules
/// sample-accurately: three booms with a crackle burst trailing each.
pub fn fireworks_timeline<R: Rng + ?Sized>(rng: &mut R) -> Vec<(usize, Vec<f32>)> {
    let mut timeline = Vec::with_capacity(BOOMS.len() + CRACKLES.len());
    for &(offset, volume) in &BOOMS {
        timeline.push((frames(offset), render_boom(rng, volume)));
    }
    for &(offset, volume) in &CRACKLES {
        timeline.push((frames(offset), render_crackle(rng, volume)));
    }
    timeline
}
