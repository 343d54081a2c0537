//! Editable college form and its collector
//!
//! The form holds raw text exactly as typed. [`CollegeForm::collect`] is the
//! only place free-form input becomes a [`College`]: top-level fields are
//! trimmed and required-checked, program rows with a blank name are dropped,
//! cutoffs are parsed leniently and media default to English.

use std::str::FromStr;

use thiserror::Error;

use crate::model::{College, Contact, Location, Medium, Program};

/// Validation error for form contents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required field is empty after trimming
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Numeric field outside its allowed range
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Invalid enum variant
    #[error("invalid {field} value: '{value}'")]
    InvalidVariant { field: &'static str, value: String },
}

/// One row of the repeatable program sub-form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramRow {
    pub name: String,
    pub cutoff: String,
    pub eligibility: String,
    pub medium: String,
}

impl ProgramRow {
    pub fn from_program(program: &Program) -> Self {
        Self {
            name: program.name.clone(),
            // A zero cutoff shows as a blank field
            cutoff: if program.cutoff == 0 {
                String::new()
            } else {
                program.cutoff.to_string()
            },
            eligibility: program.eligibility.clone(),
            medium: program.medium.to_string(),
        }
    }

    /// Collect this row, or `None` when the name is blank
    fn collect(&self) -> Result<Option<Program>, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let cutoff = parse_cutoff(&self.cutoff);
        if !(0..=i64::from(Program::MAX_CUTOFF)).contains(&cutoff) {
            return Err(ValidationError::OutOfRange {
                field: "cutoff",
                value: cutoff,
                min: 0,
                max: i64::from(Program::MAX_CUTOFF),
            });
        }

        Ok(Some(Program {
            name: name.to_string(),
            cutoff: cutoff as u32,
            eligibility: self.eligibility.clone(),
            medium: self.medium.parse::<Medium>()?,
        }))
    }
}

impl FromStr for ProgramRow {
    type Err = ValidationError;

    /// Parse `name=..;cutoff=..;eligibility=..;medium=..`; missing keys stay empty
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut row = ProgramRow::default();
        for part in spec.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| ValidationError::InvalidVariant {
                    field: "program",
                    value: part.to_string(),
                })?;
            let value = value.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "name" => row.name = value,
                "cutoff" => row.cutoff = value,
                "eligibility" => row.eligibility = value,
                "medium" => row.medium = value,
                other => {
                    return Err(ValidationError::InvalidVariant {
                        field: "program field",
                        value: other.to_string(),
                    })
                }
            }
        }
        Ok(row)
    }
}

/// Parse the leading integer of `raw`, falling back to 0.
///
/// `"90"` and `"90.5"` give 90; `""` and `"abc"` give 0. A digit run too
/// long for `i64` saturates so range checks still reject it.
pub fn parse_cutoff(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<i64>().map_or(sign * i64::MAX, |n| sign * n)
}

/// The repeatable program sub-form. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRows {
    rows: Vec<ProgramRow>,
}

impl Default for ProgramRows {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramRows {
    /// Exactly one empty row
    pub fn new() -> Self {
        Self {
            rows: vec![ProgramRow::default()],
        }
    }

    /// One row per program, or one empty row if there are none
    pub fn from_programs(programs: &[Program]) -> Self {
        if programs.is_empty() {
            return Self::new();
        }
        Self {
            rows: programs.iter().map(ProgramRow::from_program).collect(),
        }
    }

    pub fn rows(&self) -> &[ProgramRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; kept for the `len` convention
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut ProgramRow> {
        self.rows.get_mut(index)
    }

    /// Append a row and return its index
    pub fn add(&mut self, row: ProgramRow) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    pub fn add_empty(&mut self) -> usize {
        self.add(ProgramRow::default())
    }

    /// Remove a row; removing the last one leaves a fresh empty row.
    /// Returns false if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        if self.rows.is_empty() {
            self.rows.push(ProgramRow::default());
        }
        true
    }

    /// Replace every row; an empty input leaves one empty row
    pub fn replace(&mut self, rows: Vec<ProgramRow>) {
        self.rows = rows;
        if self.rows.is_empty() {
            self.rows.push(ProgramRow::default());
        }
    }
}

/// Raw form state for adding or editing a college
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollegeForm {
    pub name: String,
    pub district: String,
    pub address: String,
    pub map_link: String,
    pub embed_url: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    facilities: Vec<String>,
    pub programs: ProgramRows,
}

impl CollegeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the form from an existing record
    pub fn from_college(college: &College) -> Self {
        let mut form = Self {
            name: college.name.clone(),
            district: college.district.clone(),
            address: college.address.clone(),
            map_link: college.location.map_link.clone(),
            embed_url: college.location.embed_url.clone(),
            phone: college.contact.phone.clone(),
            email: college.contact.email.clone(),
            website: college.contact.website.clone(),
            facilities: Vec::new(),
            programs: ProgramRows::from_programs(&college.programs),
        };
        for facility in &college.facilities {
            form.set_facility(facility, true);
        }
        form
    }

    /// Checked facility toggles, in the order they were checked
    pub fn facilities(&self) -> &[String] {
        &self.facilities
    }

    pub fn has_facility(&self, facility: &str) -> bool {
        self.facilities.iter().any(|f| f == facility)
    }

    /// Check or uncheck a facility toggle
    pub fn set_facility(&mut self, facility: &str, checked: bool) {
        let facility = facility.trim();
        if facility.is_empty() {
            return;
        }
        match (checked, self.has_facility(facility)) {
            (true, false) => self.facilities.push(facility.to_string()),
            (false, true) => self.facilities.retain(|f| f != facility),
            _ => {}
        }
    }

    pub fn clear_facilities(&mut self) {
        self.facilities.clear();
    }

    /// Build a college record from the current form state
    pub fn collect(&self) -> Result<College, ValidationError> {
        let name = required("name", &self.name)?;
        let district = required("district", &self.district)?;
        let address = required("address", &self.address)?;

        let mut programs = Vec::with_capacity(self.programs.len());
        for row in self.programs.rows() {
            if let Some(program) = row.collect()? {
                programs.push(program);
            }
        }

        Ok(College {
            id: None,
            name,
            district,
            address,
            location: Location {
                map_link: self.map_link.trim().to_string(),
                embed_url: self.embed_url.trim().to_string(),
            },
            contact: Contact {
                phone: self.phone.trim().to_string(),
                email: self.email.trim().to_string(),
                website: self.website.trim().to_string(),
            },
            programs,
            facilities: self.facilities.clone(),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}
