//! Audio loading and mono down-mixing.
//!
//! WAV files are read directly with hound. Anything else is decoded by ffmpeg
//! into a temporary 32-bit float WAV at the source's native rate and channel
//! count, then read the same way. Sample rates are never changed.

use crate::error::{Result, VectorscopeError};
use crate::video::ffmpeg::{locate_ffmpeg, run_ffmpeg};
use crate::video::temp::TempArtifact;
use hound::{SampleFormat, WavReader};
use std::ffi::OsStr;
use std::path::Path;

/// Mono audio samples with their sample rate. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wraps mono samples.
    ///
    /// # Errors
    /// Returns a `Load` error if `samples` is empty or `sample_rate` is zero.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(VectorscopeError::Load("sample rate must be positive".into()));
        }
        if samples.is_empty() {
            return Err(VectorscopeError::Load("audio contains no samples".into()));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Loads an audio file as a mono waveform at its native sample rate.
///
/// # Arguments
/// * `path` - Audio file to decode
/// * `ffmpeg_override` - Explicit ffmpeg binary for non-WAV input
///
/// # Errors
/// Returns a `Load` error if the file is missing, cannot be decoded, or holds no samples.
pub fn load_waveform(path: &Path, ffmpeg_override: Option<&Path>) -> Result<Waveform> {
    if !path.exists() {
        return Err(VectorscopeError::Load(format!(
            "audio file not found: {}",
            path.display()
        )));
    }

    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    let waveform = if is_wav {
        read_wav(path)?
    } else {
        decode_with_ffmpeg(path, ffmpeg_override)?
    };

    tracing::info!(
        "Loaded {}: {} samples at {}Hz ({:.2}s)",
        path.display(),
        waveform.len(),
        waveform.sample_rate(),
        waveform.duration_secs()
    );
    Ok(waveform)
}

/// Reads a WAV file and down-mixes it to mono, normalizing to [-1, 1].
pub fn read_wav(path: &Path) -> Result<Waveform> {
    let load_err =
        |e: hound::Error| VectorscopeError::Load(format!("cannot read {}: {e}", path.display()));

    let mut reader = WavReader::open(path).map_err(load_err)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(load_err)?,
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(load_err)?
        }
    };

    tracing::debug!(
        "WAV {}: {} channels, {} bits, {:?}",
        path.display(),
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    let mono = downmix_to_mono(&interleaved, spec.channels as usize);
    Waveform::new(mono, spec.sample_rate).map_err(|e| match e {
        VectorscopeError::Load(msg) => {
            VectorscopeError::Load(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Averages interleaved multi-channel frames into one channel.
///
/// A trailing partial frame is dropped.
pub fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        _ => interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect(),
    }
}

/// Decodes any ffmpeg-readable file to float WAV, then reads it.
fn decode_with_ffmpeg(path: &Path, ffmpeg_override: Option<&Path>) -> Result<Waveform> {
    let ffmpeg = locate_ffmpeg(ffmpeg_override).map_err(|e| {
        VectorscopeError::Load(format!("cannot decode {}: {e}", path.display()))
    })?;

    let decoded = TempArtifact::create(".wav")
        .map_err(|e| VectorscopeError::Load(format!("cannot create temporary WAV: {e}")))?;

    let input = path.as_os_str();
    let output = decoded.path().as_os_str();
    let args: [&OsStr; 6] = [
        "-i".as_ref(),
        input,
        "-vn".as_ref(),
        "-acodec".as_ref(),
        "pcm_f32le".as_ref(),
        output,
    ];

    run_ffmpeg(&ffmpeg, &args).map_err(|e| {
        VectorscopeError::Load(format!("cannot decode {}: {e}", path.display()))
    })?;

    tracing::debug!("Decoded {} via ffmpeg", path.display());
    read_wav(decoded.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use hound::{WavSpec, WavWriter};

    fn write_int_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_downmix_averages_channels() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix_to_mono(&stereo, 2), vec![0.5, 0.5, 0.0]);

        let mono = [0.1, 0.2];
        assert_eq!(downmix_to_mono(&mono, 1), vec![0.1, 0.2]);

        let quad = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 4.0];
        assert_eq!(downmix_to_mono(&quad, 4), vec![1.0, 1.0]);
    }

    #[test]
    fn test_downmix_drops_partial_frame() {
        assert_eq!(downmix_to_mono(&[0.25, 0.75, 0.5], 2), vec![0.5]);
    }

    #[test]
    fn test_waveform_rejects_empty_and_zero_rate() {
        assert_eq!(
            Waveform::new(vec![], 44100).unwrap_err().kind(),
            ErrorKind::Load
        );
        assert_eq!(
            Waveform::new(vec![0.0], 0).unwrap_err().kind(),
            ErrorKind::Load
        );
    }

    #[test]
    fn test_read_mono_int_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_int_wav(&path, 1, &[0, 16384, -16384, i16::MIN]);

        let waveform = read_wav(&path).unwrap();
        assert_eq!(waveform.sample_rate(), 8000);
        assert_eq!(waveform.samples(), &[0.0, 0.5, -0.5, -1.0]);
    }

    #[test]
    fn test_read_stereo_wav_downmixes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_int_wav(&path, 2, &[16384, 0, -16384, -16384]);

        let waveform = read_wav(&path).unwrap();
        assert_eq!(waveform.len(), 2);
        assert_eq!(waveform.samples(), &[0.25, -0.5]);
    }

    #[test]
    fn test_read_float_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for s in [0.25f32, -0.75, 0.125] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let waveform = load_waveform(&path, None).unwrap();
        assert_eq!(waveform.sample_rate(), 44100);
        assert_eq!(waveform.samples(), &[0.25, -0.75, 0.125]);
    }

    #[test]
    fn test_empty_wav_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_int_wav(&path, 1, &[]);

        let err = load_waveform(&path, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = load_waveform(Path::new("/nonexistent/audio.mp3"), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_garbage_wav_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.WAV");
        std::fs::write(&path, b"definitely not RIFF").unwrap();

        let err = load_waveform(&path, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }
}
