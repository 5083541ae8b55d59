//! Waveform segmentation into overlapping analysis windows.

use crate::error::{Error, Result};
use std::borrow::Cow;

/// Policy for samples left over after the last full window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailPolicy {
    /// Discard the partial tail. Window counts then follow
    /// `floor((L - S) / H) + 1` exactly.
    #[default]
    Drop,
    /// Emit one final window zero-padded to the full segment length.
    /// Adds at most one window compared to [`TailPolicy::Drop`].
    ZeroPad,
}

/// Slices a waveform into fixed-length windows with fractional overlap.
///
/// Windows start at `0, hop, 2*hop, ...` where
/// `hop = floor(segment_len * (1 - overlap))`. With [`TailPolicy::Drop`]
/// a window is emitted only while it fits entirely inside the waveform;
/// a waveform shorter than one segment yields no windows at all.
#[derive(Debug, Clone)]
pub struct Segmenter {
    segment_len: usize,
    hop_len: usize,
    sample_rate: u32,
    tail: TailPolicy,
}

impl Segmenter {
    /// Build a segmenter for the given sample rate.
    ///
    /// `segment_duration` is in seconds, `overlap` is a fraction in
    /// `[0.0, 1.0)`. Fails with `InvalidConfiguration` if the resulting
    /// segment length is zero or the hop length rounds down to zero.
    pub fn new(
        sample_rate: u32,
        segment_duration: f32,
        overlap: f32,
        tail: TailPolicy,
    ) -> Result<Self> {
        if !(0.0..1.0).contains(&overlap) {
            return Err(Error::InvalidConfiguration {
                message: format!("overlap must be in [0.0, 1.0), got {overlap}"),
            });
        }

        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let segment_len = (segment_duration * sample_rate as f32) as usize;
        if segment_len == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "segment duration {segment_duration}s is below one sample at {sample_rate} Hz"
                ),
            });
        }

        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let hop_len = (segment_len as f32 * (1.0 - overlap)) as usize;
        if hop_len == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "overlap {overlap} leaves a hop of zero samples for {segment_len}-sample segments"
                ),
            });
        }

        Ok(Self {
            segment_len,
            hop_len,
            sample_rate,
            tail,
        })
    }

    /// Segment length in samples.
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Hop between consecutive window starts, in samples.
    pub fn hop_len(&self) -> usize {
        self.hop_len
    }

    /// Convert a window start offset in samples to seconds.
    pub fn offset_secs(&self, start: usize) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let secs = start as f32 / self.sample_rate as f32;
        secs
    }

    /// Number of windows that [`Self::windows`] will emit for `total` samples.
    pub fn window_count(&self, total: usize) -> usize {
        let full = if total >= self.segment_len {
            (total - self.segment_len) / self.hop_len + 1
        } else {
            0
        };
        match self.tail {
            TailPolicy::Drop => full,
            TailPolicy::ZeroPad => {
                if full * self.hop_len < total {
                    full + 1
                } else {
                    full
                }
            }
        }
    }

    /// Iterate over the windows of `samples`.
    ///
    /// The iterator borrows the waveform; full windows are zero-copy views
    /// and only a zero-padded tail allocates. Calling this again restarts
    /// from the beginning.
    pub fn windows<'a>(&self, samples: &'a [f32]) -> Windows<'a> {
        Windows {
            samples,
            segment_len: self.segment_len,
            hop_len: self.hop_len,
            pos: 0,
            tail: self.tail,
            tail_emitted: false,
        }
    }
}

/// One analysis window: a fixed-length view into the waveform.
#[derive(Debug, Clone)]
pub struct Window<'a> {
    /// Start offset in samples from the beginning of the waveform.
    pub start: usize,
    /// Window samples, exactly one segment length long.
    pub samples: Cow<'a, [f32]>,
}

/// Iterator over the windows of a waveform. Created by [`Segmenter::windows`].
#[derive(Debug)]
pub struct Windows<'a> {
    samples: &'a [f32],
    segment_len: usize,
    hop_len: usize,
    pos: usize,
    tail: TailPolicy,
    tail_emitted: bool,
}

impl<'a> Iterator for Windows<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos + self.segment_len <= self.samples.len() {
            let start = self.pos;
            let view = &self.samples[start..start + self.segment_len];
            self.pos += self.hop_len;
            return Some(Window {
                start,
                samples: Cow::Borrowed(view),
            });
        }

        if self.tail == TailPolicy::ZeroPad && !self.tail_emitted && self.pos < self.samples.len() {
            self.tail_emitted = true;
            let start = self.pos;
            let mut padded = self.samples[start..].to_vec();
            padded.resize(self.segment_len, 0.0);
            return Some(Window {
                start,
                samples: Cow::Owned(padded),
            });
        }

        None
    }
}
