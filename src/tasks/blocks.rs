use chrono::NaiveDate;

/// Marker of the due date field, `[🗓:: [[YYYY-MM-DD]]]`
pub const DUE_MARKER: &str = "🗓";
/// Marker of the completion date field, `[✅:: [[YYYY-MM-DD]]]`
pub const COMPLETED_MARKER: &str = "✅";
/// Marker of the recurrence rule field, `[🔁:: every 2 days!@]`
pub const RECURRING_MARKER: &str = "🔁";

/// Unit of a recurrence interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Month,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Month => "month",
        }
    }
}

/// When and how a task repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub period: Period,
    pub count: u32,
    /// Count from the current due date (`!`) instead of from today
    pub strict: bool,
    /// Keep history in the originating note (`@`) instead of the shared log
    pub log_in_place: bool,
}

/// A date carried by a `🗓` or `✅` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateField {
    pub date: NaiveDate,
    /// Path of the note the date links to, when known from the index
    pub source_file_path: Option<String>,
}

impl DateField {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            source_file_path: None,
        }
    }
}

/// One semantic token of a task line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Checkbox { is_checked: bool, indent: usize },
    Text { content: String },
    Link { target: String, alias: Option<String> },
    Due(DateField),
    Completed(DateField),
    Recurring(RecurrenceRule),
}

impl Block {
    /// Field marker for field blocks
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Block::Due(_) => Some(DUE_MARKER),
            Block::Completed(_) => Some(COMPLETED_MARKER),
            Block::Recurring(_) => Some(RECURRING_MARKER),
            _ => None,
        }
    }
}
