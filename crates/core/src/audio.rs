//! Audio payload types

use serde::{Deserialize, Serialize};

/// Container formats exchanged with remote speech services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Webm,
    Ogg,
    M4a,
    Flac,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::M4a => "m4a",
            Self::Flac => "flac",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::M4a => "audio/mp4",
            Self::Flac => "audio/flac",
        }
    }

    /// Guess a format from a file name, falling back to WAV
    pub fn from_filename(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
        match ext.as_str() {
            "mp3" | "mpeg" => Self::Mp3,
            "webm" => Self::Webm,
            "ogg" | "oga" | "opus" => Self::Ogg,
            "m4a" | "mp4" => Self::M4a,
            "flac" => Self::Flac,
            _ => Self::Wav,
        }
    }
}

/// Recorded audio submitted for transcription
#[derive(Debug, Clone)]
pub struct AudioInput {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioInput {
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File name presented to upload-style APIs
    pub fn file_name(&self) -> String {
        format!("audio.{}", self.format.extension())
    }
}

/// Speech produced by a synthesis service
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

impl SynthesizedAudio {
    pub fn mp3(data: Vec<u8>) -> Self {
        Self {
            data,
            format: AudioFormat::Mp3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(AudioFormat::from_filename("recording.webm"), AudioFormat::Webm);
        assert_eq!(AudioFormat::from_filename("VOICE.MP3"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_filename("blob"), AudioFormat::Wav);
    }

    #[test]
    fn test_file_name() {
        let input = AudioInput::new(vec![1, 2, 3], AudioFormat::Ogg);
        assert_eq!(input.file_name(), "audio.ogg");
        assert!(!input.is_empty());
    }
}
