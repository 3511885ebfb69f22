//! What gets generated and where it lands on disk.

use crate::content::{extract_requirements, GameContent};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single asset to produce.
///
/// `key` names the file (after slugging); `text` is what the backend
/// speaks or draws. For game items the two are the same label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub key: String,
    pub text: String,
}

impl Requirement {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            key: label.clone(),
            text: label,
        }
    }
}

/// Naming scheme for one flat output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    pub dir: PathBuf,
    pub prefix: Option<&'static str>,
    pub extension: &'static str,
}

impl AssetLayout {
    pub fn new(dir: impl Into<PathBuf>, prefix: Option<&'static str>, extension: &'static str) -> Self {
        Self {
            dir: dir.into(),
            prefix,
            extension,
        }
    }

    /// `<prefix>-<slug>.<ext>`, or `<slug>.<ext>` without a prefix.
    pub fn file_name(&self, slug: &str) -> String {
        match self.prefix {
            Some(prefix) => format!("{}-{}.{}", prefix, slug, self.extension),
            None => format!("{}.{}", slug, self.extension),
        }
    }

    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(self.file_name(slug))
    }

    /// Inverse of [`file_name`](Self::file_name) applied to a file stem.
    pub fn slug_from_stem<'a>(&self, stem: &'a str) -> Option<&'a str> {
        match self.prefix {
            Some(prefix) => stem
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('-'))
                .filter(|slug| !slug.is_empty()),
            None => Some(stem),
        }
    }

    pub fn images(dir: &Path) -> Self {
        Self::new(dir, None, "png")
    }
}

const INSTRUCTIONS: &[(&str, &str)] = &[
    ("welcome", "مرحباً بك في لعبة السندباد لتدريب الذاكرة"),
    ("get_ready", "استعد! سنبدأ الآن"),
    ("watch_carefully", "شاهد بعناية وحاول أن تتذكر"),
    ("time_to_answer", "حان وقت الإجابة"),
    ("select_items", "اختر العناصر التي شاهدتها"),
    ("correct", "أحسنت! إجابة صحيحة"),
    ("incorrect", "حاول مرة أخرى"),
    ("excellent", "ممتاز! أنت رائع"),
    ("good_job", "عمل جيد"),
    ("keep_trying", "استمر في المحاولة"),
    ("level_complete", "أحسنت! لقد أتممت المستوى"),
    ("next_question", "السؤال التالي"),
    ("game_over", "انتهت اللعبة"),
];

const ENCOURAGEMENT: &[(&str, &str)] = &[
    ("great", "رائع"),
    ("amazing", "مذهل"),
    ("fantastic", "خيالي"),
    ("wonderful", "رائع جداً"),
    ("you_can_do_it", "أنت تستطيع"),
    ("keep_going", "استمر"),
    ("almost_there", "أنت قريب جداً"),
    ("one_more_try", "محاولة أخرى"),
];

const NUMBER_RANGE: std::ops::RangeInclusive<u32> = 1..=20;

/// Groups of audio clips the game plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCategory {
    Instructions,
    Encouragement,
    Numbers,
    Items,
}

impl AudioCategory {
    pub const ALL: [AudioCategory; 4] = [
        AudioCategory::Instructions,
        AudioCategory::Encouragement,
        AudioCategory::Numbers,
        AudioCategory::Items,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            AudioCategory::Instructions => "instruction",
            AudioCategory::Encouragement => "encouragement",
            AudioCategory::Numbers => "number",
            AudioCategory::Items => "item",
        }
    }

    pub fn layout(&self, audio_dir: &Path) -> AssetLayout {
        AssetLayout::new(audio_dir, Some(self.prefix()), "mp3")
    }

    /// Fixed phrases for this category. Items come from the game content
    /// instead, see [`requirements`](Self::requirements).
    pub fn fixed_phrases(&self) -> Vec<Requirement> {
        match self {
            AudioCategory::Instructions => pairs(INSTRUCTIONS),
            AudioCategory::Encouragement => pairs(ENCOURAGEMENT),
            AudioCategory::Numbers => NUMBER_RANGE
                .map(|n| Requirement::new(n.to_string(), n.to_string()))
                .collect(),
            AudioCategory::Items => Vec::new(),
        }
    }

    pub fn requirements(&self, content: Option<&GameContent>) -> Vec<Requirement> {
        match self {
            AudioCategory::Items => content
                .map(|c| {
                    extract_requirements(c)
                        .into_iter()
                        .map(Requirement::label)
                        .collect()
                })
                .unwrap_or_default(),
            _ => self.fixed_phrases(),
        }
    }
}

impl fmt::Display for AudioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioCategory::Instructions => write!(f, "instructions"),
            AudioCategory::Encouragement => write!(f, "encouragement"),
            AudioCategory::Numbers => write!(f, "numbers"),
            AudioCategory::Items => write!(f, "items"),
        }
    }
}

fn pairs(table: &[(&str, &str)]) -> Vec<Requirement> {
    table
        .iter()
        .map(|(key, text)| Requirement::new(*key, *text))
        .collect()
}
