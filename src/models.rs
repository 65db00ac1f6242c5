use super::store::Store;
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

/// Opaque, stable note identifier. The item service may hand out numeric or
/// string ids; both are kept as strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Str(String),
        }
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(i) => NoteId(i.to_string()),
            RawId::Str(s) => NoteId(s),
        })
    }
}

/// Ordinal priority of a note. The rank is also the wire and form encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    pub const ALL: [Importance; 3] =
        [Importance::High, Importance::Medium, Importance::Low];

    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
    pub fn get_display_name(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl TryFrom<u8> for Importance {
    type Error = String;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Self::High),
            2 => Ok(Self::Medium),
            1 => Ok(Self::Low),
            _ => Err(format!("{value} is not a valid importance")),
        }
    }
}

impl From<Importance> for u8 {
    fn from(value: Importance) -> Self {
        value.rank()
    }
}

/// Lifecycle state of a note, encoded by rank like [Importance].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    Active,
    Completed,
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 3] =
        [Status::Active, Status::Completed, Status::Cancelled];

    pub fn rank(&self) -> u8 {
        match self {
            Self::Active => 3,
            Self::Completed => 2,
            Self::Cancelled => 1,
        }
    }
    pub fn get_display_name(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = String;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Self::Active),
            2 => Ok(Self::Completed),
            1 => Ok(Self::Cancelled),
            _ => Err(format!("{value} is not a valid status")),
        }
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.rank()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    pub importance: Importance,
    pub status: Status,
    #[serde(default)]
    pub time: String,
}

/// The editable part of a note, as submitted by the editor form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteDraft {
    pub text: String,
    pub importance: Importance,
    pub status: Status,
}

impl NoteDraft {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            text: String::new(),
            importance: Importance::High,
            status: Status::Active,
        }
    }
}

impl From<&Note> for NoteDraft {
    fn from(note: &Note) -> Self {
        Self {
            text: note.text.clone(),
            importance: note.importance,
            status: note.status,
        }
    }
}

/// Body of a create or update request to the item service. It never carries
/// the id; that lives in the URL.
#[derive(Debug, Serialize)]
pub struct NotePayload<'a> {
    pub text: &'a str,
    pub importance: Importance,
    pub status: Status,
    pub time: &'a str,
}

impl<'a> NotePayload<'a> {
    pub fn new(draft: &'a NoteDraft, time: &'a str) -> Self {
        Self {
            text: &draft.text,
            importance: draft.importance,
            status: draft.status,
            time,
        }
    }
}

/// Current moment as stored in `Note::time`.
pub fn now_stamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Locale layouts older clients wrote into `time`, tried after RFC 3339.
const LOCALE_STAMP_FORMATS: [&str; 4] = [
    "%d.%m.%Y, %H:%M:%S",
    "%m/%d/%Y, %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a stored stamp for comparison and display. `None` when the string
/// matches none of the known layouts.
pub fn parse_stamp(stamp: &str) -> Option<DateTime<Utc>> {
    let stamp = stamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(stamp) {
        return Some(dt.with_timezone(&Utc));
    }
    LOCALE_STAMP_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(stamp, fmt).ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// Human-facing rendering of a stored stamp; unknown layouts are shown as-is.
pub fn display_stamp(stamp: &str) -> String {
    match parse_stamp(stamp) {
        Some(dt) => {
            dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
        }
        None => stamp.to_string(),
    }
}
