use std::io::Cursor;

/// RIFF header plus `fmt ` and `data` chunk headers for 16-bit PCM.
pub const WAV_HEADER_LEN: usize = 44;

/// Float sample to 16-bit PCM. Clamped to `[-1, 1]`, scaled asymmetrically
/// (negative by 32768, positive by 32767) and truncated toward zero.
pub fn quantize_sample(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Encode mono samples as a 16-bit PCM WAV file in memory.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(WAV_HEADER_LEN + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(quantize_sample(sample))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Format of an encoded WAV, read back from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Samples per channel
    pub frames: u32,
}

impl WavInfo {
    pub fn parse(bytes: &[u8]) -> Result<Self, hound::Error> {
        let reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        Ok(Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            frames: reader.duration(),
        })
    }

    pub fn data_bytes(&self) -> u64 {
        self.frames as u64 * self.channels as u64 * (self.bits_per_sample as u64 / 8)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }
}
