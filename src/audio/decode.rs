//! Audio decoding using symphonia.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded audio clip, already mixed down to mono.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono f32 samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz, as stored in the file.
    pub sample_rate: u32,
    /// Channel count of the source before mixdown.
    pub channels: usize,
    /// Clip duration in seconds.
    pub duration_secs: f32,
}

/// Decode an audio file to mono f32 samples.
///
/// Supports WAV, FLAC, MP3, and AAC containers. Multi-channel audio is
/// averaged into a single channel.
pub fn decode_audio(path: &Path) -> Result<DecodedAudio> {
    let file = File::open(path).map_err(|e| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioOpen {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::AudioDecode {
            path: path.to_path_buf(),
            source: "missing sample rate".into(),
        })?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(Error::AudioDecode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        mix_to_mono(&decoded, channels, &mut samples);
    }

    #[allow(clippy::cast_precision_loss)]
    let duration_secs = samples.len() as f32 / sample_rate as f32;

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
        duration_secs,
    })
}

/// Downmix one decoded packet into the mono output buffer.
///
/// `$to_f32` converts one source sample to f32 full scale.
macro_rules! downmix {
    ($buf:expr, $channels:expr, $output:expr, $to_f32:expr) => {{
        let buf = $buf;
        let to_f32 = $to_f32;
        if $channels == 1 {
            $output.extend(buf.chan(0).iter().map(|&s| to_f32(s)));
        } else {
            #[allow(clippy::cast_precision_loss)]
            let inv = 1.0f32 / $channels as f32;
            for i in 0..buf.frames() {
                let mut sum = 0.0f32;
                for ch in 0..$channels {
                    sum += to_f32(buf.chan(ch)[i]);
                }
                $output.push(sum * inv);
            }
        }
    }};
}

#[allow(clippy::cast_precision_loss)]
fn mix_to_mono(buffer: &AudioBufferRef, channels: usize, output: &mut Vec<f32>) {
    match buffer {
        AudioBufferRef::F32(buf) => downmix!(buf, channels, output, |s: f32| s),
        AudioBufferRef::S16(buf) => {
            downmix!(buf, channels, output, |s: i16| f32::from(s) / 32_768.0);
        }
        AudioBufferRef::S32(buf) => {
            downmix!(buf, channels, output, |s: i32| s as f32 / 2_147_483_648.0);
        }
        _ => {
            // Other sample formats are not produced by the enabled codecs.
        }
    }
}
