//! RIFF/WAV container at the PCM boundary. This is the only place the
//! core touches a file format; everything else operates on plain `f32`
//! sample buffers.

use crate::error::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Encodes `samples` (expected in `[-1.0, 1.0]`) as a 16-bit PCM mono WAV
/// buffer at `sample_rate`. Samples are clamped before quantization so an
/// out-of-range caller input cannot panic or wrap.
pub fn write_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut buffer, spec)?;
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            let quantized = (clamped * i16::MAX as f32) as i16;
            writer.write_sample(quantized)?;
        }
        writer.finalize()?;
    }
    Ok(buffer.into_inner())
}

/// Reads a WAV buffer back into `f32` samples normalized to `[-1.0,
/// 1.0]`, along with the file's sample rate and channel count. Handles
/// both 16-bit integer and 32-bit float PCM; multi-channel data is
/// returned interleaved (callers downmix with
/// `resample::stereo_to_mono`).
pub fn read_wav(bytes: &[u8]) -> Result<(Vec<f32>, u32, u16)> {
    let cursor = Cursor::new(bytes);
    let mut reader = hound::WavReader::new(cursor)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Int => {
            let max_amplitude = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_amplitude))
                .collect::<std::result::Result<_, _>>()?
        }
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
    };

    Ok((samples, spec.sample_rate, spec.channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_16_bit_pcm() {
        let samples = vec![0.0, 0.5, -0.5, 1.0, -1.0];
        let wav = write_wav(&samples, 16000).unwrap();
        let (decoded, rate, channels) = read_wav(&wav).unwrap();
        assert_eq!(rate, 16000);
        assert_eq!(channels, 1);
        assert_eq!(decoded.len(), samples.len());
        for (a, b) in decoded.iter().zip(samples.iter()) {
            assert!((a - b).abs() < 1e-3, "{a} != {b}");
        }
    }

    #[test]
    fn clamps_out_of_range_input() {
        let samples = vec![2.0, -3.0];
        let wav = write_wav(&samples, 16000).unwrap();
        let (decoded, _, _) = read_wav(&wav).unwrap();
        assert!((decoded[0] - 1.0).abs() < 1e-3);
        assert!((decoded[1] - (-1.0)).abs() < 1e-3);
    }

    #[test]
    fn rejects_truncated_buffer() {
        assert!(read_wav(b"not a wav file").is_err());
    }
}
