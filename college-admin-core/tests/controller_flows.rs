//! Controller flows against an in-memory fake of the remote API

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use college_admin_core::view::{FormField, ProgramField, NOTICE_TTL_SECS};
use college_admin_core::{
    AdminController, AdminError, College, CollegeApi, CredentialStore, Credentials,
    FileCredentialStore, Intent, ListStatus, MemoryCredentialStore, NoticeLevel, Outcome, Result,
    View, EXPORT_FILENAME,
};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List,
    Validate(String),
    Get(String),
    Create(College),
    Update(String, College),
    Delete(String),
    Export,
}

struct FakeState {
    colleges: Vec<College>,
    calls: Vec<Call>,
    fail_list: bool,
    fail_mutations: Option<u16>,
    unreachable: bool,
    next_id: usize,
}

struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    fn with(colleges: Vec<College>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                colleges,
                calls: Vec::new(),
                fail_list: false,
                fail_mutations: None,
                unreachable: false,
                next_id: 100,
            }),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    fn fail_mutations(&self, status: Option<u16>) {
        self.state.lock().unwrap().fail_mutations = status;
    }

    fn unreachable(&self, down: bool) {
        self.state.lock().unwrap().unreachable = down;
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn authorize(&self, credentials: &Credentials) -> Result<()> {
        if credentials.username == "admin" && credentials.password == "secret" {
            Ok(())
        } else {
            Err(AdminError::Unauthorized)
        }
    }

    fn mutation_failure(&self) -> Result<()> {
        match self.state.lock().unwrap().fail_mutations {
            Some(401) => Err(AdminError::Unauthorized),
            Some(status) => Err(AdminError::http(status, "Internal Server Error")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CollegeApi for FakeApi {
    async fn list_colleges(&self) -> Result<Vec<College>> {
        self.record(Call::List);
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(AdminError::http(503, "Service Unavailable"));
        }
        Ok(state.colleges.clone())
    }

    async fn validate_credentials(&self, credentials: &Credentials) -> Result<()> {
        self.record(Call::Validate(credentials.username.clone()));
        let down = self.state.lock().unwrap().unreachable;
        if down {
            // Nothing listens on port 1, so this is a real connect error
            reqwest::get("http://127.0.0.1:1/colleges").await?;
        }
        self.authorize(credentials)
    }

    async fn get_college(&self, credentials: &Credentials, id: &str) -> Result<College> {
        self.record(Call::Get(id.to_string()));
        self.authorize(credentials)?;
        let state = self.state.lock().unwrap();
        state
            .colleges
            .iter()
            .find(|c| c.id_str() == id)
            .cloned()
            .ok_or_else(|| AdminError::http(404, "Not Found"))
    }

    async fn create_college(&self, credentials: &Credentials, college: &College) -> Result<()> {
        self.record(Call::Create(college.clone()));
        self.authorize(credentials)?;
        self.mutation_failure()?;
        let mut state = self.state.lock().unwrap();
        let mut stored = college.clone();
        stored.id = Some(format!("c{}", state.next_id));
        state.next_id += 1;
        state.colleges.push(stored);
        Ok(())
    }

    async fn update_college(
        &self,
        credentials: &Credentials,
        id: &str,
        college: &College,
    ) -> Result<()> {
        self.record(Call::Update(id.to_string(), college.clone()));
        self.authorize(credentials)?;
        self.mutation_failure()?;
        let mut state = self.state.lock().unwrap();
        let slot = state
            .colleges
            .iter_mut()
            .find(|c| c.id_str() == id)
            .ok_or_else(|| AdminError::http(404, "Not Found"))?;
        let mut stored = college.clone();
        stored.id = Some(id.to_string());
        *slot = stored;
        Ok(())
    }

    async fn delete_college(&self, credentials: &Credentials, id: &str) -> Result<()> {
        self.record(Call::Delete(id.to_string()));
        self.authorize(credentials)?;
        self.mutation_failure()?;
        let mut state = self.state.lock().unwrap();
        let before = state.colleges.len();
        state.colleges.retain(|c| c.id_str() != id);
        if state.colleges.len() == before {
            return Err(AdminError::http(404, "Not Found"));
        }
        Ok(())
    }

    async fn export_colleges(&self, credentials: &Credentials) -> Result<Vec<u8>> {
        self.record(Call::Export);
        self.authorize(credentials)?;
        Ok(b"PK\x03\x04 spreadsheet".to_vec())
    }
}

fn college(id: &str, name: &str, district: &str) -> College {
    College {
        id: Some(id.to_string()),
        name: name.to_string(),
        district: district.to_string(),
        address: format!("{} Main Road", district),
        location: Default::default(),
        contact: Default::default(),
        programs: vec![],
        facilities: vec!["Library".to_string()],
    }
}

fn seed() -> Vec<College> {
    vec![
        college("a1", "Maharani College", "Mysuru"),
        college("b2", "St Joseph's", "Bengaluru"),
    ]
}

type Controller = AdminController<FakeApi, MemoryCredentialStore>;

fn controller() -> Controller {
    AdminController::new(FakeApi::with(seed()), MemoryCredentialStore::new())
}

async fn logged_in() -> Controller {
    let mut ctl = controller();
    assert_eq!(ctl.login("admin", "secret").await, Outcome::Done);
    ctl.api().clear_calls();
    ctl.take_notices();
    ctl
}

fn fill_form(ctl: &mut Controller, name: &str, district: &str) {
    let form = ctl.form_mut();
    form.name = name.to_string();
    form.district = district.to_string();
    form.address = "College Road".to_string();
}

// === Session ===

#[tokio::test]
async fn login_persists_credentials_and_loads_list() {
    let mut ctl = controller();
    assert_eq!(ctl.login("admin", "secret").await, Outcome::Done);

    assert!(ctl.is_authenticated());
    assert_eq!(ctl.view(), View::List);
    assert_eq!(ctl.colleges().len(), 2);
    assert_eq!(
        ctl.store().load().unwrap(),
        Some(Credentials::new("admin", "secret"))
    );
    assert_eq!(
        ctl.api().calls(),
        vec![Call::Validate("admin".into()), Call::List]
    );
    assert!(!ctl.is_loading());
}

#[tokio::test]
async fn login_with_wrong_password_stays_logged_out() {
    let mut ctl = controller();
    assert_eq!(ctl.login("admin", "wrong").await, Outcome::Failed);

    let snapshot = ctl.snapshot();
    assert!(!snapshot.is_authenticated());
    assert_eq!(snapshot.view, View::Login);
    assert_eq!(snapshot.login_error.as_deref(), Some("Invalid credentials"));
    assert_eq!(ctl.store().load().unwrap(), None);
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn resume_without_stored_session_shows_login() {
    let mut ctl = controller();
    assert_eq!(ctl.resume_session().await, Outcome::Skipped);
    assert_eq!(ctl.view(), View::Login);
    assert!(ctl.api().calls().is_empty());
}

#[tokio::test]
async fn resume_with_valid_stored_session_restores_list() {
    let store = MemoryCredentialStore::with(Credentials::new("admin", "secret"));
    let mut ctl = AdminController::new(FakeApi::with(seed()), store);

    assert_eq!(ctl.dispatch(Intent::ResumeSession).await, Outcome::Done);
    assert_eq!(ctl.username(), Some("admin"));
    assert_eq!(ctl.view(), View::List);
    assert_eq!(ctl.colleges().len(), 2);
}

#[tokio::test]
async fn resume_with_rejected_credentials_fully_logs_out() {
    let store = MemoryCredentialStore::with(Credentials::new("admin", "stale"));
    let mut ctl = AdminController::new(FakeApi::with(seed()), store);

    assert_eq!(ctl.resume_session().await, Outcome::Failed);
    assert!(!ctl.is_authenticated());
    assert_eq!(ctl.view(), View::Login);
    assert_eq!(ctl.store().load().unwrap(), None);
    assert!(ctl.colleges().is_empty());
}

#[tokio::test]
async fn resume_with_unreachable_api_logs_out() {
    let store = MemoryCredentialStore::with(Credentials::new("admin", "secret"));
    let api = FakeApi::with(seed());
    api.unreachable(true);
    let mut ctl = AdminController::new(api, store);

    assert_eq!(ctl.resume_session().await, Outcome::Failed);
    assert!(!ctl.is_authenticated());
    assert_eq!(ctl.view(), View::Login);
    assert_eq!(ctl.store().load().unwrap(), None);
    assert!(!ctl.is_loading());
}

#[tokio::test]
async fn resume_with_malformed_stored_session_logs_out() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::in_dir(dir.path());
    std::fs::write(store.path(), r#"{"adminAuth": 42}"#).unwrap();
    let mut ctl = AdminController::new(FakeApi::with(seed()), store);

    assert_eq!(ctl.resume_session().await, Outcome::Failed);
    assert!(!ctl.is_authenticated());
    assert_eq!(ctl.view(), View::Login);
    assert!(ctl.api().calls().is_empty());
    assert!(!ctl.store().path().exists());
    assert_eq!(ctl.store().load().unwrap(), None);
}

#[tokio::test]
async fn notices_expire_after_their_display_window() {
    let mut ctl = logged_in().await;
    ctl.logout();
    assert_eq!(ctl.notices().len(), 1);

    ctl.prune_notices(Utc::now());
    assert_eq!(ctl.notices().len(), 1);

    ctl.prune_notices(Utc::now() + Duration::seconds(NOTICE_TTL_SECS));
    assert!(ctl.notices().is_empty());
    assert!(ctl.take_live_notices().is_empty());
}

#[tokio::test]
async fn live_notices_keep_fresh_messages() {
    let mut ctl = logged_in().await;
    ctl.logout();
    let notices = ctl.take_live_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Logged out successfully!");
    assert!(ctl.notices().is_empty());
}

#[tokio::test]
async fn logout_clears_persisted_credentials() {
    let mut ctl = logged_in().await;
    ctl.dispatch(Intent::Logout).await;

    assert!(!ctl.is_authenticated());
    assert_eq!(ctl.view(), View::Login);
    assert!(ctl.colleges().is_empty());
    assert_eq!(ctl.editing(), None);

    // A fresh start finds nothing to resume
    assert_eq!(ctl.resume_session().await, Outcome::Skipped);
    assert_eq!(ctl.view(), View::Login);
}

// === List + filter ===

#[tokio::test]
async fn load_failure_marks_list_failed_and_keeps_cache() {
    let mut ctl = logged_in().await;
    ctl.api().fail_list(true);

    assert_eq!(ctl.load_colleges().await, Outcome::Failed);
    let snapshot = ctl.snapshot();
    assert!(matches!(snapshot.list_status, ListStatus::Failed(_)));
    assert_eq!(snapshot.empty_state(), Some("Failed to load colleges"));
    assert_eq!(ctl.colleges().len(), 2);
    assert!(snapshot
        .notices
        .iter()
        .any(|n| n.level == NoticeLevel::Error && n.message.contains("503")));
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn filter_intents_never_touch_the_cache() {
    let mut ctl = logged_in().await;
    ctl.dispatch(Intent::SearchChanged("maharani".into())).await;
    assert_eq!(ctl.snapshot().visible.len(), 1);

    ctl.dispatch(Intent::DistrictChanged(Some("Bengaluru".into())))
        .await;
    let snapshot = ctl.snapshot();
    assert!(snapshot.visible.is_empty());
    assert_eq!(snapshot.empty_state(), Some("No colleges found"));
    assert_eq!(snapshot.total, 2);
    assert_eq!(snapshot.districts, ["Bengaluru", "Mysuru"]);

    ctl.dispatch(Intent::SearchChanged(String::new())).await;
    ctl.dispatch(Intent::DistrictChanged(None)).await;
    assert_eq!(ctl.snapshot().visible.len(), 2);
    assert!(ctl.api().calls().is_empty());
}

// === Create / update ===

#[tokio::test]
async fn save_without_cursor_creates_then_reloads() {
    let mut ctl = logged_in().await;
    fill_form(&mut ctl, "New College", "X");

    assert_eq!(ctl.dispatch(Intent::SubmitForm).await, Outcome::Done);

    let calls = ctl.api().calls();
    assert!(matches!(&calls[0], Call::Create(c) if c.district == "X"));
    assert_eq!(calls[1], Call::List);
    assert!(ctl
        .colleges()
        .iter()
        .any(|c| c.name == "New College" && c.district == "X"));
    assert_eq!(ctl.view(), View::List);
    assert_eq!(ctl.form().name, "");
    assert_eq!(ctl.form().programs.len(), 1);
    assert!(!ctl.is_loading());
}

#[tokio::test]
async fn edit_sets_cursor_so_save_updates_that_id() {
    let mut ctl = logged_in().await;
    assert_eq!(ctl.dispatch(Intent::Edit("b2".into())).await, Outcome::Done);

    assert_eq!(ctl.editing(), Some("b2"));
    assert_eq!(ctl.view(), View::Form);
    assert_eq!(ctl.form().name, "St Joseph's");
    assert!(ctl.form().has_facility("Library"));
    assert_eq!(ctl.form().programs.len(), 1);
    assert_eq!(ctl.snapshot().form_title(), "Edit College");

    ctl.dispatch(Intent::SetField(FormField::Name, "St Joseph's University".into()))
        .await;
    assert_eq!(ctl.dispatch(Intent::SubmitForm).await, Outcome::Done);

    let calls = ctl.api().calls();
    assert!(matches!(
        &calls[1],
        Call::Update(id, c) if id == "b2" && c.name == "St Joseph's University"
    ));
    assert_eq!(ctl.editing(), None);

    // The cursor is gone, so the next save creates
    fill_form(&mut ctl, "Another", "Udupi");
    ctl.api().clear_calls();
    ctl.submit_form().await;
    assert!(matches!(ctl.api().calls()[0], Call::Create(_)));
}

#[tokio::test]
async fn cancel_edit_makes_next_save_a_create() {
    let mut ctl = logged_in().await;
    ctl.edit_college("a1").await;
    ctl.dispatch(Intent::CancelEdit).await;

    assert_eq!(ctl.editing(), None);
    assert_eq!(ctl.view(), View::List);
    assert_eq!(ctl.snapshot().form_title(), "Add New College");

    fill_form(&mut ctl, "Fresh", "Mandya");
    ctl.api().clear_calls();
    ctl.submit_form().await;
    assert!(matches!(ctl.api().calls()[0], Call::Create(_)));
}

#[tokio::test]
async fn save_failure_preserves_form_and_cursor() {
    let mut ctl = logged_in().await;
    ctl.edit_college("a1").await;
    ctl.form_mut().address = "Changed Address".into();
    ctl.api().fail_mutations(Some(500));

    assert_eq!(ctl.submit_form().await, Outcome::Failed);
    assert_eq!(ctl.editing(), Some("a1"));
    assert_eq!(ctl.form().address, "Changed Address");
    assert_eq!(ctl.view(), View::Form);
    assert!(ctl
        .notices()
        .iter()
        .any(|n| n.message.starts_with("Error saving college: API Error: 500")));
    assert!(!ctl.is_loading());
}

#[tokio::test]
async fn invalid_form_sends_no_request() {
    let mut ctl = logged_in().await;
    fill_form(&mut ctl, "   ", "X");

    assert_eq!(ctl.submit_form().await, Outcome::Failed);
    assert!(ctl.api().calls().is_empty());
    assert!(ctl
        .notices()
        .iter()
        .any(|n| n.message.contains("name cannot be empty")));
}

#[tokio::test]
async fn blank_program_rows_are_dropped_on_submit() {
    let mut ctl = logged_in().await;
    fill_form(&mut ctl, "Program College", "Udupi");
    ctl.dispatch(Intent::SetProgramField {
        row: 0,
        field: ProgramField::Name,
        value: "CS".into(),
    })
    .await;
    ctl.dispatch(Intent::SetProgramField {
        row: 0,
        field: ProgramField::Cutoff,
        value: "90".into(),
    })
    .await;
    ctl.dispatch(Intent::AddProgramRow).await;
    ctl.dispatch(Intent::SetProgramField {
        row: 1,
        field: ProgramField::Name,
        value: "  ".into(),
    })
    .await;

    ctl.submit_form().await;
    match &ctl.api().calls()[0] {
        Call::Create(c) => {
            assert_eq!(c.programs.len(), 1);
            assert_eq!(c.programs[0].name, "CS");
            assert_eq!(c.programs[0].cutoff, 90);
        }
        other => panic!("expected create, got {:?}", other),
    }
}

#[tokio::test]
async fn removing_last_program_row_keeps_one_row() {
    let mut ctl = logged_in().await;
    assert_eq!(
        ctl.dispatch(Intent::RemoveProgramRow(0)).await,
        Outcome::Done
    );
    assert_eq!(ctl.form().programs.len(), 1);
    assert_eq!(
        ctl.dispatch(Intent::RemoveProgramRow(3)).await,
        Outcome::Skipped
    );
}

#[tokio::test]
async fn rejected_credentials_during_save_force_logout() {
    let mut ctl = logged_in().await;
    fill_form(&mut ctl, "New", "X");
    ctl.api().fail_mutations(Some(401));

    assert_eq!(ctl.submit_form().await, Outcome::Failed);
    assert!(!ctl.is_authenticated());
    assert_eq!(ctl.view(), View::Login);
    assert_eq!(ctl.store().load().unwrap(), None);
}

#[tokio::test]
async fn fetch_leaves_form_and_cursor_alone() {
    let mut ctl = logged_in().await;
    let college = ctl.fetch_college("b2").await.unwrap();

    assert_eq!(college.name, "St Joseph's");
    assert_eq!(ctl.editing(), None);
    assert_eq!(ctl.form().name, "");
    assert_eq!(ctl.view(), View::List);
}

#[tokio::test]
async fn edit_failure_leaves_view_unchanged() {
    let mut ctl = logged_in().await;
    assert_eq!(ctl.edit_college("missing").await, Outcome::Failed);
    assert_eq!(ctl.view(), View::List);
    assert_eq!(ctl.editing(), None);
}

// === Delete ===

#[tokio::test]
async fn delete_requires_confirmation() {
    let mut ctl = logged_in().await;

    let outcome = ctl.delete_college("a1", |_| false).await;
    assert_eq!(outcome, Outcome::Skipped);
    assert!(ctl.api().calls().is_empty());

    let mut asked = String::new();
    let outcome = ctl
        .delete_college("a1", |question| {
            asked = question.to_string();
            true
        })
        .await;
    assert_eq!(outcome, Outcome::Done);
    assert!(asked.contains("cannot be undone"));
    assert_eq!(
        ctl.api().calls(),
        vec![Call::Delete("a1".into()), Call::List]
    );
    assert_eq!(ctl.colleges().len(), 1);
}

#[tokio::test]
async fn delete_failure_leaves_cache_untouched() {
    let mut ctl = logged_in().await;
    ctl.api().fail_mutations(Some(500));

    let outcome = ctl
        .dispatch(Intent::Delete {
            id: "a1".into(),
            confirmed: true,
        })
        .await;
    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(ctl.colleges().len(), 2);
    assert_eq!(ctl.api().calls(), vec![Call::Delete("a1".into())]);
}

// === Export ===

#[tokio::test]
async fn export_writes_fixed_filename() {
    let mut ctl = logged_in().await;
    let dir = TempDir::new().unwrap();

    let path = ctl.export_colleges(dir.path()).await.unwrap();
    assert_eq!(path, dir.path().join(EXPORT_FILENAME));
    assert!(std::fs::read(&path).unwrap().starts_with(b"PK"));
    assert_eq!(ctl.api().calls(), vec![Call::Export]);
}

#[tokio::test]
async fn flows_requiring_a_session_fail_cleanly_when_logged_out() {
    let mut ctl = controller();
    let dir = TempDir::new().unwrap();

    assert!(ctl.export_colleges(dir.path()).await.is_none());
    assert_eq!(ctl.edit_college("a1").await, Outcome::Failed);
    assert!(ctl.api().calls().is_empty());
    assert!(ctl
        .take_notices()
        .iter()
        .all(|n| n.message.ends_with("Not logged in")));
}

#[tokio::test]
async fn navigation_respects_authentication() {
    let mut ctl = controller();
    assert_eq!(
        ctl.dispatch(Intent::Navigate(View::Form)).await,
        Outcome::Skipped
    );

    let mut ctl = logged_in().await;
    assert_eq!(
        ctl.dispatch(Intent::Navigate(View::Form)).await,
        Outcome::Done
    );
    assert_eq!(ctl.view(), View::Form);
    assert_eq!(
        ctl.dispatch(Intent::Navigate(View::Login)).await,
        Outcome::Skipped
    );
}
