//! Sample-rate conversion using rubato.

use crate::error::{Error, Result};
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};

const CHUNK_SIZE: usize = 1024;

/// Resample a mono signal to the target rate.
///
/// Returns the input unchanged when the rates already match. The final
/// partial chunk is zero-padded through the resampler and the output is
/// trimmed back to the proportional length, so no audible tail of
/// silence is appended.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples);
    }

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        1,
        1,
        FixedSync::Both,
    )
    .map_err(|e| Error::Resample {
        reason: e.to_string(),
    })?;

    let frames_in = resampler.input_frames_next();
    let mut output = Vec::with_capacity(scaled_len(samples.len(), from_rate, to_rate) + frames_in);

    let mut pos = 0;
    while pos + frames_in <= samples.len() {
        process_chunk(&mut resampler, &samples[pos..pos + frames_in], &mut output)?;
        pos += frames_in;
    }

    if pos < samples.len() {
        let remaining = samples.len() - pos;
        let mut padded = samples[pos..].to_vec();
        padded.resize(frames_in, 0.0);

        let mut tail = Vec::new();
        process_chunk(&mut resampler, &padded, &mut tail)?;

        let keep = scaled_len(remaining, from_rate, to_rate).min(tail.len());
        output.extend_from_slice(&tail[..keep]);
    }

    Ok(output)
}

fn process_chunk(resampler: &mut Fft<f32>, chunk: &[f32], output: &mut Vec<f32>) -> Result<()> {
    let input = SequentialSlice::new(chunk, 1, chunk.len()).map_err(|e| Error::Resample {
        reason: format!("failed to wrap input chunk: {e}"),
    })?;

    let resampled = resampler
        .process(&input, 0, None)
        .map_err(|e| Error::Resample {
            reason: e.to_string(),
        })?;

    output.extend_from_slice(&resampled.take_data());
    Ok(())
}

/// Length of `input_len` samples after conversion between the two rates.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn scaled_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    ((input_len as f64) * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize
}
