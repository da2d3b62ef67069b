use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Maximum length of a task title, in characters.
pub const TITLE_MAX: usize = 100;
/// Maximum length of a task description, in characters.
pub const DESCRIPTION_MAX: usize = 1000;

/// Workflow state of a task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(ValidationError::new(
                "status",
                format!("unknown status '{other}', expected pending, in_progress or completed"),
            )),
        }
    }
}

/// A single task record as persisted in the task database.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier, assigned by the repository.
    pub id: u64,
    /// Short summary of the task.
    pub title: String,
    /// Optional free-form details.
    #[serde(default)]
    pub description: Option<String>,
    /// Current workflow state.
    #[serde(default)]
    pub status: TaskStatus,
    /// Optional due date (calendar date, no time component).
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Timestamp when the task was created. Immutable after creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update, null until the first update.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Validates raw input fields and constructs a new record.
    ///
    /// Fails when the title is empty or longer than [`TITLE_MAX`], the
    /// description exceeds [`DESCRIPTION_MAX`], the status is not a
    /// recognized value, or the due date is not a well-formed
    /// `YYYY-MM-DD` date.
    pub fn new(
        id: u64,
        fields: NewTask,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let NewTask {
            title,
            description,
            status,
            due_date,
        } = fields;
        validate_title(&title)?;
        if let Some(d) = &description {
            validate_description(d)?;
        }
        let status = status
            .map(|s| s.parse::<TaskStatus>())
            .transpose()?
            .unwrap_or_default();
        let due_date = due_date.map(|d| parse_due_date(&d)).transpose()?;
        Ok(Self {
            id,
            title,
            description,
            status,
            due_date,
            created_at,
            updated_at: None,
        })
    }

    /// Merges the supplied patch fields onto this record and stamps
    /// `updated_at`.
    ///
    /// Fields absent from the patch are left unchanged; `description` and
    /// `due_date` are cleared when the patch carries an explicit null.
    /// Every supplied field is validated before anything is assigned.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let TaskPatch {
            title,
            description,
            status,
            due_date,
        } = patch;
        if let Some(t) = &title {
            validate_title(t)?;
        }
        if let Some(Some(d)) = &description {
            validate_description(d)?;
        }
        let status = status.map(|s| s.parse::<TaskStatus>()).transpose()?;
        let due_date = due_date
            .map(|d| d.map(|raw| parse_due_date(&raw)).transpose())
            .transpose()?;
        if let Some(t) = title {
            self.title = t;
        }
        if let Some(d) = description {
            self.description = d;
        }
        if let Some(s) = status {
            self.status = s;
        }
        if let Some(d) = due_date {
            self.due_date = d;
        }
        self.updated_at = Some(now);
        Ok(())
    }
}

/// Payload for creating a task.
///
/// `status` and `due_date` arrive as raw strings and are parsed during
/// construction so that error responses can name the offending field.
#[derive(Deserialize, Debug, Clone)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Status name; defaults to `pending` when omitted.
    #[serde(default)]
    pub status: Option<String>,
    /// Due date in `YYYY-MM-DD` form.
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Payload for partially updating a task.
///
/// `title` and `status` can only be replaced. For `description` and
/// `due_date` three shapes are distinguished: omitted (leave unchanged),
/// explicit null (clear), and a value (replace).
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

/// A present-but-null field deserializes to `Some(None)`; an omitted field
/// stays `None` through `#[serde(default)]`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if len == 0 {
        return Err(ValidationError::new("title", "must not be empty"));
    }
    if len > TITLE_MAX {
        return Err(ValidationError::new(
            "title",
            format!("must be at most {TITLE_MAX} characters, got {len}"),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    let len = description.chars().count();
    if len > DESCRIPTION_MAX {
        return Err(ValidationError::new(
            "description",
            format!("must be at most {DESCRIPTION_MAX} characters, got {len}"),
        ));
    }
    Ok(())
}

fn parse_due_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        ValidationError::new(
            "due_date",
            format!("invalid date '{raw}': {e}. Use YYYY-MM-DD."),
        )
    })
}
