//! Canonical WAV encoding and decoding.
//!
//! Output layout: 44-byte RIFF/WAVE/fmt/data header followed by
//! interleaved little-endian signed 16-bit samples.

use super::PcmBuffer;
use crate::error::{Result, SkrivError};

const HEADER_LEN: usize = 44;
const FMT_CHUNK_LEN: u32 = 16;
const PCM_FORMAT_TAG: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Encode a PCM buffer as an uncompressed 16-bit WAV byte stream.
pub fn encode_wav(buffer: &PcmBuffer) -> Result<Vec<u8>> {
    let channels = buffer.channel_count();
    let frames = buffer.frames();
    let sample_rate = buffer.sample_rate();
    let data_len = frames * channels * 2;

    let channels_u16 = u16::try_from(channels)
        .map_err(|_| SkrivError::Audio(format!("too many channels: {}", channels)))?;
    let data_len_u32 = u32::try_from(data_len)
        .map_err(|_| SkrivError::Audio(format!("audio data too large: {} bytes", data_len)))?;

    let mut out = Vec::with_capacity(HEADER_LEN + data_len);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len_u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    out.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    out.extend_from_slice(&channels_u16.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * channels_u16 as u32 * 2).to_le_bytes());
    out.extend_from_slice(&(channels_u16 * 2).to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len_u32.to_le_bytes());

    for frame in 0..frames {
        for ch in 0..channels {
            let sample = quantize(buffer.channel(ch)[frame]);
            out.extend_from_slice(&sample.to_le_bytes());
        }
    }

    Ok(out)
}

/// Quantize a normalized float sample to signed 16 bits.
///
/// Asymmetric full-scale mapping: negative samples use the full -32768
/// range, positive samples top out at 32767, so that -1.0 -> -32768 and
/// 1.0 -> 32767 exactly.
fn quantize(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0) as f64;
    let scaled = if s < 0.0 { s * 32768.0 } else { s * 32767.0 };
    (0.5 + scaled).floor() as i16
}

/// Decode an uncompressed 16-bit WAV byte stream into a PCM buffer.
pub fn decode_wav(data: &[u8]) -> Result<PcmBuffer> {
    if data.len() < HEADER_LEN {
        return Err(SkrivError::Audio(format!(
            "WAV stream too short: {} bytes",
            data.len()
        )));
    }
    if &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(SkrivError::Audio("missing RIFF/WAVE magic".to_string()));
    }

    let mut fmt: Option<(u16, u32)> = None;
    let mut samples: Option<&[u8]> = None;

    // Walk the chunk list after the RIFF header.
    let mut pos = 12;
    while pos + 8 <= data.len() {
        let id = &data[pos..pos + 4];
        let size = u32::from_le_bytes([data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]])
            as usize;
        let body_start = pos + 8;
        let body_end = body_start.checked_add(size).filter(|&end| end <= data.len());
        let Some(body_end) = body_end else {
            return Err(SkrivError::Audio("truncated WAV chunk".to_string()));
        };
        let body = &data[body_start..body_end];

        match id {
            b"fmt " => {
                if body.len() < 16 {
                    return Err(SkrivError::Audio("fmt chunk too short".to_string()));
                }
                let format_tag = u16::from_le_bytes([body[0], body[1]]);
                if format_tag != PCM_FORMAT_TAG {
                    return Err(SkrivError::Audio(format!(
                        "unsupported format tag {}",
                        format_tag
                    )));
                }
                let channels = u16::from_le_bytes([body[2], body[3]]);
                let sample_rate = u32::from_le_bytes([body[4], body[5], body[6], body[7]]);
                let bits = u16::from_le_bytes([body[14], body[15]]);
                if bits != BITS_PER_SAMPLE {
                    return Err(SkrivError::Audio(format!("unsupported bit depth {}", bits)));
                }
                fmt = Some((channels, sample_rate));
            }
            b"data" => {
                samples = Some(body);
            }
            _ => {}
        }

        // Chunk bodies are word-aligned.
        pos = body_end + (size % 2);
    }

    let (channels, sample_rate) =
        fmt.ok_or_else(|| SkrivError::Audio("missing fmt chunk".to_string()))?;
    let samples = samples.ok_or_else(|| SkrivError::Audio("missing data chunk".to_string()))?;

    super::decode_pcm16(samples, sample_rate, channels as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(samples: Vec<f32>) -> PcmBuffer {
        PcmBuffer::new(24_000, vec![samples]).unwrap()
    }

    #[test]
    fn test_quantize_boundaries() {
        assert_eq!(quantize(1.0), 32767);
        assert_eq!(quantize(-1.0), -32768);
        assert_eq!(quantize(0.0), 0);
    }

    #[test]
    fn test_quantize_clamps_out_of_range() {
        assert_eq!(quantize(1.5), 32767);
        assert_eq!(quantize(-2.0), -32768);
    }

    #[test]
    fn test_header_invariants() {
        let buffer = PcmBuffer::new(24_000, vec![vec![0.0; 10], vec![0.0; 10]]).unwrap();
        let wav = encode_wav(&buffer).unwrap();

        assert_eq!(wav.len(), 44 + 10 * 2 * 2);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");
        // PCM tag, channel count, sample rate, bit depth
        assert_eq!(u16::from_le_bytes([wav[20], wav[21]]), 1);
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 2);
        assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 24_000);
        assert_eq!(u16::from_le_bytes([wav[34], wav[35]]), 16);
    }

    #[test]
    fn test_full_scale_sample_bytes() {
        let wav = encode_wav(&mono(vec![1.0, -1.0, 0.0])).unwrap();
        let first = i16::from_le_bytes([wav[44], wav[45]]);
        let second = i16::from_le_bytes([wav[46], wav[47]]);
        let third = i16::from_le_bytes([wav[48], wav[49]]);
        assert_eq!(first, 32767);
        assert_eq!(second, -32768);
        assert_eq!(third, 0);
    }

    #[test]
    fn test_round_trip_within_quantization_error() {
        let left: Vec<f32> = (0..480).map(|i| ((i as f32) / 480.0) * 2.0 - 1.0).collect();
        let right: Vec<f32> = (0..480).map(|i| 1.0 - ((i as f32) / 480.0) * 2.0).collect();
        let original = PcmBuffer::new(44_100, vec![left, right]).unwrap();

        let decoded = decode_wav(&encode_wav(&original).unwrap()).unwrap();

        assert_eq!(decoded.sample_rate(), 44_100);
        assert_eq!(decoded.channel_count(), 2);
        assert_eq!(decoded.frames(), 480);
        let bound = 1.0 / 32768.0;
        for ch in 0..2 {
            for (a, b) in original.channel(ch).iter().zip(decoded.channel(ch)) {
                assert!((a - b).abs() <= bound, "sample drifted: {} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut wav = encode_wav(&mono(vec![0.0; 4])).unwrap();
        wav[0] = b'X';
        assert!(matches!(decode_wav(&wav), Err(SkrivError::Audio(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_stream() {
        let wav = encode_wav(&mono(vec![0.0; 4])).unwrap();
        assert!(matches!(decode_wav(&wav[..20]), Err(SkrivError::Audio(_))));
    }
}
