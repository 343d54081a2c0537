//! Admin panel controller
//!
//! Owns the session, the list cache, the edit cursor and the form, and runs
//! every flow against an injected [`CollegeApi`] and [`CredentialStore`].
//! Flows catch errors at their own boundary: they log, raise a notice and
//! return an [`Outcome`], never an error. Flow methods take `&mut self`, so
//! one controller never has two mutating requests in flight.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::client::CollegeApi;
use crate::error::AdminError;
use crate::filter::{districts, filter_colleges, FilterQuery};
use crate::form::{CollegeForm, ValidationError};
use crate::model::College;
use crate::session::{CredentialStore, Credentials};
use crate::view::{
    Intent, ListStatus, Notice, NoticeLevel, Outcome, ProgramField, Snapshot, View,
};

/// Fixed filename for the spreadsheet export
pub const EXPORT_FILENAME: &str = "colleges-export.xlsx";

/// Question put to the user before a delete
pub const DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this college? This action cannot be undone.";

pub struct AdminController<A, S> {
    api: A,
    store: S,
    session: Option<Credentials>,
    colleges: Vec<College>,
    list_status: ListStatus,
    query: FilterQuery,
    form: CollegeForm,
    editing: Option<String>,
    view: View,
    loading: u32,
    notices: Vec<Notice>,
    login_error: Option<String>,
}

impl<A: CollegeApi, S: CredentialStore> AdminController<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            session: None,
            colleges: Vec::new(),
            list_status: ListStatus::NotLoaded,
            query: FilterQuery::default(),
            form: CollegeForm::new(),
            editing: None,
            view: View::Login,
            loading: 0,
            notices: Vec::new(),
            login_error: None,
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|c| c.username.as_str())
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// The cached list, exactly as last fetched
    pub fn colleges(&self) -> &[College] {
        &self.colleges
    }

    /// The cached list filtered by the current query
    pub fn visible(&self) -> Vec<&College> {
        filter_colleges(&self.colleges, &self.query)
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn form(&self) -> &CollegeForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CollegeForm {
        &mut self.form
    }

    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain every pending notice
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Drop notices older than their display window
    pub fn prune_notices(&mut self, now: DateTime<Utc>) {
        self.notices.retain(|n| !n.is_expired(now));
    }

    /// Drain the notices still inside their display window
    pub fn take_live_notices(&mut self) -> Vec<Notice> {
        self.prune_notices(Utc::now());
        self.take_notices()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            view: self.view,
            username: self.username().map(str::to_string),
            visible: self.visible().into_iter().cloned().collect(),
            total: self.colleges.len(),
            districts: districts(&self.colleges),
            query: self.query.clone(),
            list_status: self.list_status.clone(),
            form: self.form.clone(),
            editing: self.editing.clone(),
            loading: self.is_loading(),
            notices: self.notices.clone(),
            login_error: self.login_error.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Intent dispatch
    // ------------------------------------------------------------------

    pub async fn dispatch(&mut self, intent: Intent) -> Outcome {
        debug!(intent = intent.name(), "dispatch");
        match intent {
            Intent::Login { username, password } => self.login(&username, &password).await,
            Intent::Logout => {
                self.logout();
                Outcome::Done
            }
            Intent::ResumeSession => self.resume_session().await,
            Intent::Reload => self.load_colleges().await,
            Intent::SearchChanged(search) => {
                self.set_search(search);
                Outcome::Done
            }
            Intent::DistrictChanged(district) => {
                self.set_district(district);
                Outcome::Done
            }
            Intent::Navigate(view) => self.switch_view(view),
            Intent::SetField(field, value) => {
                field.apply(&mut self.form, value);
                Outcome::Done
            }
            Intent::ToggleFacility { facility, checked } => {
                self.form.set_facility(&facility, checked);
                Outcome::Done
            }
            Intent::AddProgramRow => {
                self.form.programs.add_empty();
                Outcome::Done
            }
            Intent::RemoveProgramRow(index) => {
                if self.form.programs.remove(index) {
                    Outcome::Done
                } else {
                    Outcome::Skipped
                }
            }
            Intent::SetProgramField { row, field, value } => {
                self.set_program_field(row, field, value)
            }
            Intent::SubmitForm => self.submit_form().await,
            Intent::Edit(id) => self.edit_college(&id).await,
            Intent::CancelEdit => {
                self.cancel_edit();
                self.switch_view(View::List)
            }
            Intent::Delete { id, confirmed } => self.delete_college(&id, |_| confirmed).await,
            Intent::Export { dir } => match self.export_colleges(&dir).await {
                Some(_) => Outcome::Done,
                None => Outcome::Failed,
            },
        }
    }

    fn set_program_field(&mut self, row: usize, field: ProgramField, value: String) -> Outcome {
        let Some(program) = self.form.programs.row_mut(row) else {
            return Outcome::Skipped;
        };
        let slot = match field {
            ProgramField::Name => &mut program.name,
            ProgramField::Cutoff => &mut program.cutoff,
            ProgramField::Eligibility => &mut program.eligibility,
            ProgramField::Medium => &mut program.medium,
        };
        *slot = value;
        Outcome::Done
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Check the pair against the API, then store, persist and load
    pub async fn login(&mut self, username: &str, password: &str) -> Outcome {
        self.login_error = None;
        if username.trim().is_empty() {
            let err = ValidationError::Empty { field: "username" };
            self.login_error = Some(err.to_string());
            return Outcome::Failed;
        }

        let credentials = Credentials::new(username, password);
        self.show_loading();
        let result = self.api.validate_credentials(&credentials).await;
        self.hide_loading();

        if let Err(err) = result {
            error!(error = %err, username, "login failed");
            self.login_error = Some(match err {
                AdminError::Unauthorized => "Invalid credentials".to_string(),
                other => other.to_string(),
            });
            return Outcome::Failed;
        }

        if let Err(err) = self.store.save(&credentials) {
            warn!(error = %err, "could not persist session");
            self.notify(
                NoticeLevel::Error,
                format!("Session will not be remembered: {}", err),
            );
        }
        info!(username, "logged in");
        self.session = Some(credentials);
        self.view = View::List;
        self.notify(NoticeLevel::Success, "Logged in successfully!");
        self.load_colleges().await;
        Outcome::Done
    }

    pub fn logout(&mut self) {
        self.clear_session();
        self.notify(NoticeLevel::Info, "Logged out successfully!");
    }

    /// Restore a persisted session, or fall back to a full logout
    pub async fn resume_session(&mut self) -> Outcome {
        let stored = match self.store.load() {
            Ok(Some(credentials)) => credentials,
            Ok(None) => {
                debug!("no stored session");
                self.view = View::Login;
                return Outcome::Skipped;
            }
            Err(err) => {
                warn!(error = %err, "stored session unreadable, discarding");
                self.clear_session();
                return Outcome::Failed;
            }
        };

        self.show_loading();
        let result = self.api.validate_credentials(&stored).await;
        self.hide_loading();

        match result {
            Ok(()) => {
                info!(username = %stored.username, "session resumed");
                self.session = Some(stored);
                self.view = View::List;
                self.load_colleges().await;
                Outcome::Done
            }
            Err(err) => {
                warn!(error = %err, "stored session rejected, logging out");
                self.clear_session();
                self.notify(
                    NoticeLevel::Info,
                    "Saved session is no longer valid. Please log in again.",
                );
                Outcome::Failed
            }
        }
    }

    /// Forget credentials (memory and storage) and reset all panel state
    fn clear_session(&mut self) {
        self.session = None;
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "could not clear stored session");
        }
        self.cancel_edit();
        self.colleges.clear();
        self.list_status = ListStatus::NotLoaded;
        self.query = FilterQuery::default();
        self.login_error = None;
        self.view = View::Login;
    }

    // ------------------------------------------------------------------
    // List + filter
    // ------------------------------------------------------------------

    /// Replace the cache from the public list endpoint
    pub async fn load_colleges(&mut self) -> Outcome {
        self.show_loading();
        let result = self.api.list_colleges().await;
        self.hide_loading();

        match result {
            Ok(colleges) => {
                info!(count = colleges.len(), "loaded colleges");
                self.notify(
                    NoticeLevel::Success,
                    format!("Loaded {} colleges", colleges.len()),
                );
                self.colleges = colleges;
                self.list_status = ListStatus::Loaded;
                Outcome::Done
            }
            Err(err) => {
                self.list_status = ListStatus::Failed(err.to_string());
                self.fail("Error loading colleges", err)
            }
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_district(&mut self, district: Option<String>) {
        self.query.district = district.filter(|d| !d.is_empty());
    }

    pub fn switch_view(&mut self, view: View) -> Outcome {
        let allowed = match view {
            View::Login => !self.is_authenticated(),
            View::List | View::Form => self.is_authenticated(),
        };
        if !allowed {
            debug!(?view, "navigation ignored");
            return Outcome::Skipped;
        }
        self.view = view;
        Outcome::Done
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Collect the form and save it; validation failures send nothing
    pub async fn submit_form(&mut self) -> Outcome {
        match self.form.collect() {
            Ok(college) => self.save_college(college).await,
            Err(err) => self.fail("Error saving college", err.into()),
        }
    }

    /// Update the record under the edit cursor, or create a new one
    pub async fn save_college(&mut self, college: College) -> Outcome {
        let Some(credentials) = self.session.clone() else {
            return self.fail("Error saving college", AdminError::NotAuthenticated);
        };

        self.show_loading();
        let result = match self.editing.clone() {
            Some(id) => self
                .api
                .update_college(&credentials, &id, &college)
                .await
                .map(|()| "College updated successfully!"),
            None => self
                .api
                .create_college(&credentials, &college)
                .await
                .map(|()| "College added successfully!"),
        };

        let outcome = match result {
            Ok(message) => {
                info!(name = %college.name, "college saved");
                self.notify(NoticeLevel::Success, message);
                self.cancel_edit();
                self.load_colleges().await;
                self.switch_view(View::List);
                Outcome::Done
            }
            Err(err) => self.fail("Error saving college", err),
        };
        self.hide_loading();
        outcome
    }

    /// Fetch the full record without touching the form or cursor
    pub async fn fetch_college(&mut self, id: &str) -> Option<College> {
        let Some(credentials) = self.session.clone() else {
            self.fail("Error loading college", AdminError::NotAuthenticated);
            return None;
        };

        self.show_loading();
        let result = self.api.get_college(&credentials, id).await;
        self.hide_loading();

        match result {
            Ok(college) => Some(college),
            Err(err) => {
                self.fail("Error loading college", err);
                None
            }
        }
    }

    /// Fetch a record and open it in the form
    pub async fn edit_college(&mut self, id: &str) -> Outcome {
        let Some(college) = self.fetch_college(id).await else {
            return Outcome::Failed;
        };
        self.form = CollegeForm::from_college(&college);
        self.editing = Some(id.to_string());
        self.view = View::Form;
        self.notify(NoticeLevel::Info, "College loaded for editing");
        Outcome::Done
    }

    /// Clear the edit cursor and reset the form to one empty program row
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form = CollegeForm::new();
    }

    /// Delete after `confirm` approves [`DELETE_CONFIRMATION`]
    pub async fn delete_college<F>(&mut self, id: &str, confirm: F) -> Outcome
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_CONFIRMATION) {
            debug!(id, "delete declined");
            return Outcome::Skipped;
        }
        let Some(credentials) = self.session.clone() else {
            return self.fail("Error deleting college", AdminError::NotAuthenticated);
        };

        self.show_loading();
        let result = self.api.delete_college(&credentials, id).await;

        let outcome = match result {
            Ok(()) => {
                info!(id, "college deleted");
                self.notify(NoticeLevel::Success, "College deleted successfully!");
                if self.editing.as_deref() == Some(id) {
                    self.cancel_edit();
                }
                self.load_colleges().await;
                Outcome::Done
            }
            Err(err) => self.fail("Error deleting college", err),
        };
        self.hide_loading();
        outcome
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Download the spreadsheet into `dir` under [`EXPORT_FILENAME`]
    pub async fn export_colleges(&mut self, dir: &Path) -> Option<PathBuf> {
        let Some(credentials) = self.session.clone() else {
            self.fail("Error exporting colleges", AdminError::NotAuthenticated);
            return None;
        };

        self.show_loading();
        let result = match self.api.export_colleges(&credentials).await {
            Ok(bytes) => {
                let path = dir.join(EXPORT_FILENAME);
                tokio::fs::write(&path, &bytes)
                    .await
                    .map(|()| path)
                    .map_err(AdminError::from)
            }
            Err(err) => Err(err),
        };
        self.hide_loading();

        match result {
            Ok(path) => {
                info!(path = %path.display(), "export written");
                self.notify(NoticeLevel::Success, "Excel file downloaded successfully!");
                Some(path)
            }
            Err(err) => {
                self.fail("Error exporting colleges", err);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn show_loading(&mut self) {
        self.loading += 1;
    }

    fn hide_loading(&mut self) {
        self.loading = self.loading.saturating_sub(1);
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice::new(level, message));
    }

    /// Report a failed flow; a rejected credential pair also ends the session
    fn fail(&mut self, context: &str, err: AdminError) -> Outcome {
        error!(error = %err, "{}", context);
        self.notify(NoticeLevel::Error, format!("{}: {}", context, err));
        if err.is_auth_failure() && self.session.is_some() {
            warn!("credentials rejected by API, logging out");
            self.clear_session();
        }
        Outcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::NOTICE_TTL_SECS;

    #[test]
    fn delete_prompt_mentions_irreversibility() {
        assert!(DELETE_CONFIRMATION.contains("cannot be undone"));
        assert_eq!(EXPORT_FILENAME, "colleges-export.xlsx");
        assert_eq!(NOTICE_TTL_SECS, 5);
    }
}
