// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Sample decoding.
//!
//! Samples are decoded entirely into memory with symphonia, converted to
//! 16-bit PCM and downmixed to mono.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, info, warn};

use super::AudioSample;
use crate::error::DrumError;

/// Loads and decodes a sample from a file. The extension is used as a probe hint.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<AudioSample, DrumError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DrumError::io(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    decode(mss, &hint, &path.display().to_string())
}

/// Decodes a sample from an in-memory file image.
pub fn load_buffer(data: Vec<u8>) -> Result<AudioSample, DrumError> {
    let length = data.len();
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());
    decode(mss, &Hint::new(), &format!("buffer ({} bytes)", length))
}

fn decode(mss: MediaSourceStream, hint: &Hint, origin: &str) -> Result<AudioSample, DrumError> {
    let decode_error = |source: SymphoniaError| DrumError::Decode {
        origin: origin.to_string(),
        source,
    };

    let probed = get_probe()
        .format(
            hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(decode_error)?;
    let mut format_reader = probed.format;

    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DrumError::Argument(format!("{}: no audio track found", origin)))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;

    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(decode_error)?;

    let mut mono: Vec<i16> = Vec::new();
    let mut channel_count = 0;
    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            // Some readers report a decode error at the end of the stream.
            Err(SymphoniaError::DecodeError(_)) => break,
            Err(e) => return Err(decode_error(e)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(err)) => {
                warn!(origin, err, "Skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(decode_error(e)),
        };

        let spec = *decoded.spec();
        channel_count = spec.channels.count();
        sample_rate.get_or_insert(spec.rate);

        let mut interleaved = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
        interleaved.copy_interleaved_ref(decoded);
        downmix_into(&mut mono, interleaved.samples(), channel_count);
    }

    let sample_rate = sample_rate
        .ok_or_else(|| DrumError::Argument(format!("{}: sample rate not specified", origin)))?;
    if mono.is_empty() {
        return Err(DrumError::Argument(format!(
            "{}: no audio frames found",
            origin
        )));
    }

    if channel_count > 1 {
        debug!(origin, channels = channel_count, "Downmixed sample to mono");
    }
    info!(
        origin,
        sample_rate,
        frames = mono.len(),
        "Sample loaded"
    );

    AudioSample::new(sample_rate, mono)
}

/// Appends interleaved frames to `mono`, averaging across channels.
fn downmix_into(mono: &mut Vec<i16>, interleaved: &[i16], channels: usize) {
    if channels <= 1 {
        mono.extend_from_slice(interleaved);
        return;
    }

    mono.extend(interleaved.chunks_exact(channels).map(|frame| {
        let sum: i32 = frame.iter().map(|&s| i32::from(s)).sum();
        (sum / channels as i32) as i16
    }));
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::{downmix_into, load_buffer, load_file};
    use crate::error::DrumError;
    use crate::testutil::write_wav;

    #[test]
    fn test_downmix_mono_passthrough() {
        let mut mono = vec![];
        downmix_into(&mut mono, &[1, 2, 3], 1);
        assert_eq!(vec![1, 2, 3], mono);
    }

    #[test]
    fn test_downmix_stereo_average() {
        let mut mono = vec![7];
        downmix_into(&mut mono, &[100, 300, -10, -20, i16::MAX, i16::MAX], 2);
        assert_eq!(vec![7, 200, -15, i16::MAX], mono);
    }

    #[test]
    fn test_load_mono_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kick.wav");
        write_wav(&path, vec![vec![1, -2, 3, -4, 5]], 44100).unwrap();

        let sample = load_file(&path).unwrap();
        assert_eq!(44100, sample.sample_rate());
        assert_eq!(&[1, -2, 3, -4, 5], sample.pcm16());
    }

    #[test]
    fn test_load_stereo_wav_downmixes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snare.wav");
        write_wav(&path, vec![vec![100, 200, 300], vec![300, 0, -300]], 48000).unwrap();

        let sample = load_file(&path).unwrap();
        assert_eq!(48000, sample.sample_rate());
        assert_eq!(&[200, 100, 0], sample.pcm16());
    }

    #[test]
    fn test_load_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hat.wav");
        write_wav(&path, vec![vec![10, 20, 30, 40]], 22050).unwrap();

        let sample = load_buffer(fs::read(&path).unwrap()).unwrap();
        assert_eq!(22050, sample.sample_rate());
        assert_eq!(4, sample.frames());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.wav");
        match load_file(&path) {
            Err(DrumError::Io { path: err_path, .. }) => assert_eq!(path, err_path),
            other => panic!("expected IO error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_garbage_buffer() {
        let result = load_buffer(b"definitely not audio".to_vec());
        assert!(matches!(result, Err(DrumError::Decode { .. })));
    }
}
