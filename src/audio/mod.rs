//! Audio loading and preparation pipeline.

mod decode;
mod normalize;
mod resample;
mod segment;

pub use decode::{decode_audio, DecodedAudio};
pub use normalize::normalize_peak;
pub use resample::resample;
pub use segment::{Segmenter, TailPolicy, Window, Windows};
