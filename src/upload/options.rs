use std::fmt;

/// Inclusive bounds of a numeric form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub fn clamp(self, value: i64) -> u32 {
        value.clamp(self.min as i64, self.max as i64) as u32
    }
}

pub const NUM_SHORTS_BOUNDS: Bounds = Bounds { min: 1, max: 10 };
pub const MIN_DURATION_BOUNDS: Bounds = Bounds { min: 5, max: 60 };
pub const MAX_DURATION_BOUNDS: Bounds = Bounds { min: 10, max: 180 };

/// Gap forced between min and max duration when they cross.
const DURATION_GAP_SECS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhisperModel {
    #[default]
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl WhisperModel {
    pub const ALL: [WhisperModel; 5] = [
        WhisperModel::Tiny,
        WhisperModel::Base,
        WhisperModel::Small,
        WhisperModel::Medium,
        WhisperModel::Large,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WhisperModel::Tiny => "tiny",
            WhisperModel::Base => "base",
            WhisperModel::Small => "small",
            WhisperModel::Medium => "medium",
            WhisperModel::Large => "large",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WhisperModel::Tiny => "Tiny (fastest)",
            WhisperModel::Base => "Base",
            WhisperModel::Small => "Small",
            WhisperModel::Medium => "Medium",
            WhisperModel::Large => "Large (most accurate)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    French,
    English,
    Spanish,
    German,
    Italian,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::French,
        Language::English,
        Language::Spanish,
        Language::German,
        Language::Italian,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::English => "en",
            Language::Spanish => "es",
            Language::German => "de",
            Language::Italian => "it",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::French => "Français",
            Language::English => "English",
            Language::Spanish => "Español",
            Language::German => "Deutsch",
            Language::Italian => "Italiano",
        };
        f.write_str(name)
    }
}

/// Processing options sent along with the video.
///
/// Numeric fields are only reachable through the `set_*` methods, which
/// clamp to their bounds and keep `min_duration < max_duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    num_shorts: u32,
    min_duration: u32,
    max_duration: u32,
    pub whisper_model: WhisperModel,
    pub language: Language,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            num_shorts: 3,
            min_duration: 10,
            max_duration: 60,
            whisper_model: WhisperModel::default(),
            language: Language::default(),
        }
    }
}

impl UploadOptions {
    pub fn num_shorts(&self) -> u32 {
        self.num_shorts
    }

    pub fn min_duration(&self) -> u32 {
        self.min_duration
    }

    pub fn max_duration(&self) -> u32 {
        self.max_duration
    }

    pub fn set_num_shorts(&mut self, value: i64) {
        self.num_shorts = NUM_SHORTS_BOUNDS.clamp(value);
    }

    pub fn set_min_duration(&mut self, value: i64) {
        self.min_duration = MIN_DURATION_BOUNDS.clamp(value);
        self.enforce_duration_order();
    }

    pub fn set_max_duration(&mut self, value: i64) {
        self.max_duration = MAX_DURATION_BOUNDS.clamp(value);
        self.enforce_duration_order();
    }

    fn enforce_duration_order(&mut self) {
        if self.min_duration >= self.max_duration {
            self.max_duration = self.min_duration + DURATION_GAP_SECS;
        }
    }

    /// Text fields of the multipart upload form.
    pub fn form_fields(&self) -> [(&'static str, String); 5] {
        [
            ("num_shorts", self.num_shorts.to_string()),
            ("min_duration", self.min_duration.to_string()),
            ("max_duration", self.max_duration.to_string()),
            ("whisper_model", self.whisper_model.as_str().to_string()),
            ("language", self.language.code().to_string()),
        ]
    }
}
