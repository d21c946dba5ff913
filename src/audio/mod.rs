//! Audio Helpers
//!
//! PCM16 WAV encoding plus the deterministic placeholder waveforms used by
//! the in-process engine adapters.

/// Sample rate used by all placeholder adapters
pub const PLACEHOLDER_SAMPLE_RATE: u32 = 22050;

/// Encode mono f32 samples as a 16-bit PCM WAV file
pub fn encode_wav_pcm16(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let num_channels = 1u16;
    let bits_per_sample = 16u16;
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = num_channels * (bits_per_sample / 8);
    let data_size = (samples.len() * (bits_per_sample as usize / 8)) as u32;

    let mut wav = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt subchunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data subchunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());

    for &sample in samples {
        let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        wav.extend_from_slice(&sample_i16.to_le_bytes());
    }

    wav
}

/// Duration scaled to the text length, clamped at `max_secs`
fn scaled_duration(text: &str, secs_per_char: f32, max_secs: f32) -> f32 {
    (text.chars().count() as f32 * secs_per_char).clamp(0.1, max_secs)
}

/// Plain 440 Hz sine, the mock engine's output
pub fn mock_tone(text: &str) -> Vec<f32> {
    let sample_rate = PLACEHOLDER_SAMPLE_RATE as f32;
    let duration = scaled_duration(text, 0.1, 5.0);
    let num_samples = (sample_rate * duration) as usize;

    let frequency = 440.0;
    (0..num_samples)
        .map(|i| (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate).sin() * 0.3)
        .collect()
}

/// Low-frequency modulated sine, standing in for formant synthesis
pub fn formant_tone(text: &str) -> Vec<f32> {
    let sample_rate = PLACEHOLDER_SAMPLE_RATE as f32;
    let duration = scaled_duration(text, 0.08, 5.0);
    let num_samples = (sample_rate * duration) as usize;

    let frequency = 200.0;
    (0..num_samples)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / sample_rate;
            (phase * frequency).sin() * 0.2 * (phase * frequency * 2.5).sin() * 0.1
        })
        .collect()
}

/// Harmonic stack with a slowly varying fundamental, standing in for neural
/// synthesis output
pub fn harmonic_tone(text: &str) -> Vec<f32> {
    let sample_rate = PLACEHOLDER_SAMPLE_RATE as f32;
    let duration = scaled_duration(text, 0.1, 6.0);
    let num_samples = (sample_rate * duration) as usize;

    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            let fundamental = 150.0 + (t * 2.0).sin() * 20.0;
            let phase = 2.0 * std::f32::consts::PI * fundamental * t;
            let harmonic1 = phase.sin() * 0.4;
            let harmonic2 = (phase * 2.0).sin() * 0.2;
            let harmonic3 = (phase * 3.0).sin() * 0.1;
            (harmonic1 + harmonic2 + harmonic3) * 0.3
        })
        .collect()
}
