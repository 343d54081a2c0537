//! college-admin-core: state and flows for the college admin panel
//!
//! - [`model`]: college records as the remote API exchanges them
//! - [`filter`]: pure search/district filtering over the cached list
//! - [`form`]: raw form state and the collector that validates it
//! - [`session`]: credential pair and its persisted copy
//! - [`client`]: the remote API, behind the [`CollegeApi`] trait
//! - [`controller`]: session, cache, edit cursor and every user flow
//! - [`view`]: snapshots handed to a front end and intents it emits back

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod form;
pub mod model;
pub mod session;
pub mod view;

pub use client::{CollegeApi, HttpCollegeApi};
pub use config::AdminConfig;
pub use controller::{AdminController, DELETE_CONFIRMATION, EXPORT_FILENAME};
pub use error::{AdminError, Result};
pub use filter::{districts, filter_colleges, FilterQuery};
pub use form::{CollegeForm, ProgramRow, ProgramRows, ValidationError};
pub use model::{College, Contact, Location, Medium, Program};
pub use session::{CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore};
pub use view::{Intent, ListStatus, Notice, NoticeLevel, Outcome, Snapshot, View};
