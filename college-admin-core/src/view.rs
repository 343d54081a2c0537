//! View-layer contract: immutable snapshots out, intents in
//!
//! A front end renders [`Snapshot`]s and turns user actions into
//! [`Intent`]s for [`crate::controller::AdminController::dispatch`]. Nothing
//! here touches the network or the credential store.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::filter::FilterQuery;
use crate::form::CollegeForm;
use crate::model::College;

/// How long a notice stays visible
pub const NOTICE_TTL_SECS: i64 = 5;

/// Which section of the panel is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Unauthenticated login form
    #[default]
    Login,
    /// College list with search and district filter
    List,
    /// Add/edit form
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.raised_at >= Duration::seconds(NOTICE_TTL_SECS)
    }
}

/// State of the last list fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum ListStatus {
    #[default]
    NotLoaded,
    Loaded,
    Failed(String),
}

/// Result of running one flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The flow ran to completion
    Done,
    /// The flow hit an error; a notice describes it
    Failed,
    /// Nothing was attempted (declined confirmation, nothing to resume)
    Skipped,
}

impl Outcome {
    pub fn is_done(self) -> bool {
        self == Outcome::Done
    }
}

/// Top-level form fields addressable by an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    District,
    Address,
    MapLink,
    EmbedUrl,
    Phone,
    Email,
    Website,
}

impl FormField {
    pub fn apply(self, form: &mut CollegeForm, value: String) {
        let slot = match self {
            FormField::Name => &mut form.name,
            FormField::District => &mut form.district,
            FormField::Address => &mut form.address,
            FormField::MapLink => &mut form.map_link,
            FormField::EmbedUrl => &mut form.embed_url,
            FormField::Phone => &mut form.phone,
            FormField::Email => &mut form.email,
            FormField::Website => &mut form.website,
        };
        *slot = value;
    }
}

/// Fields of one program row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramField {
    Name,
    Cutoff,
    Eligibility,
    Medium,
}

/// A user action emitted by the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Login { username: String, password: String },
    Logout,
    ResumeSession,
    Reload,
    SearchChanged(String),
    DistrictChanged(Option<String>),
    Navigate(View),
    SetField(FormField, String),
    ToggleFacility { facility: String, checked: bool },
    AddProgramRow,
    RemoveProgramRow(usize),
    SetProgramField {
        row: usize,
        field: ProgramField,
        value: String,
    },
    SubmitForm,
    Edit(String),
    CancelEdit,
    /// The view has already asked the user; `confirmed` carries the answer
    Delete { id: String, confirmed: bool },
    Export { dir: PathBuf },
}

impl Intent {
    /// Short label for logs; never includes field values
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Login { .. } => "login",
            Intent::Logout => "logout",
            Intent::ResumeSession => "resume_session",
            Intent::Reload => "reload",
            Intent::SearchChanged(_) => "search_changed",
            Intent::DistrictChanged(_) => "district_changed",
            Intent::Navigate(_) => "navigate",
            Intent::SetField(..) => "set_field",
            Intent::ToggleFacility { .. } => "toggle_facility",
            Intent::AddProgramRow => "add_program_row",
            Intent::RemoveProgramRow(_) => "remove_program_row",
            Intent::SetProgramField { .. } => "set_program_field",
            Intent::SubmitForm => "submit_form",
            Intent::Edit(_) => "edit",
            Intent::CancelEdit => "cancel_edit",
            Intent::Delete { .. } => "delete",
            Intent::Export { .. } => "export",
        }
    }
}

/// Immutable copy of everything a front end needs to render
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub view: View,
    pub username: Option<String>,
    pub visible: Vec<College>,
    pub total: usize,
    pub districts: Vec<String>,
    pub query: FilterQuery,
    pub list_status: ListStatus,
    pub form: CollegeForm,
    pub editing: Option<String>,
    pub loading: bool,
    pub notices: Vec<Notice>,
    pub login_error: Option<String>,
}

impl Snapshot {
    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    /// Placeholder shown instead of the list, if any
    pub fn empty_state(&self) -> Option<&'static str> {
        match self.list_status {
            ListStatus::Failed(_) => Some("Failed to load colleges"),
            _ if self.visible.is_empty() => Some("No colleges found"),
            _ => None,
        }
    }

    pub fn form_title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit College"
        } else {
            "Add New College"
        }
    }
}
