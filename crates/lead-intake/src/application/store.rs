//! Form state store
//!
//! Owns the draft behind an `Arc` and applies edits copy-on-write: a
//! snapshot handed out earlier is never mutated, so hosts detect changes
//! with `Arc::ptr_eq`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{
    BasicField, BusinessField, ContactField, DraftError, LeadDraft, QualificationUpdate,
};
use crate::domain::value_objects::AddressField;

/// One edit to the draft
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FormAction {
    SetBasic { field: BasicField, value: String },
    SetAddress { field: AddressField, value: String },
    SetBusiness { field: BusinessField, value: String },
    SetQualification { update: QualificationUpdate },
    AddContact,
    RemoveContact { index: usize },
    SetPrimaryContact { index: usize },
    UpdateContact { index: usize, field: ContactField, value: String },
}

/// Holder of the in-progress draft
#[derive(Clone, Debug)]
pub struct FormStateStore {
    draft: Arc<LeadDraft>,
}

impl FormStateStore {
    /// Mount a fresh draft: new lead id, one empty primary contact
    pub fn new<Tz>(prefix: &str, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self::from_draft(LeadDraft::new(prefix, now))
    }

    pub fn from_draft(draft: LeadDraft) -> Self {
        Self { draft: Arc::new(draft) }
    }

    /// Current draft; cheap to clone and immutable once handed out
    pub fn snapshot(&self) -> Arc<LeadDraft> {
        Arc::clone(&self.draft)
    }

    pub fn draft(&self) -> &LeadDraft {
        &self.draft
    }

    /// Apply one action. On error the draft is left as it was.
    pub fn dispatch(&mut self, action: FormAction) -> Result<(), DraftError> {
        match action {
            FormAction::SetBasic { field, value } => self.set_basic(field, value),
            FormAction::SetAddress { field, value } => {
                self.set_address(field, value);
                Ok(())
            }
            FormAction::SetBusiness { field, value } => {
                self.set_business(field, value);
                Ok(())
            }
            FormAction::SetQualification { update } => {
                self.set_qualification(update);
                Ok(())
            }
            FormAction::AddContact => {
                self.add_contact();
                Ok(())
            }
            FormAction::RemoveContact { index } => self.remove_contact(index),
            FormAction::SetPrimaryContact { index } => self.set_primary(index),
            FormAction::UpdateContact { index, field, value } => self.update_contact(index, field, value),
        }
    }

    // =========================================================================
    // Section setters
    // =========================================================================

    pub fn set_basic(&mut self, field: BasicField, value: impl Into<String>) -> Result<(), DraftError> {
        let value = value.into();
        self.try_edit(|draft| draft.set_basic(field, value))
    }

    pub fn set_address(&mut self, field: AddressField, value: impl Into<String>) {
        Arc::make_mut(&mut self.draft).set_address(field, value);
    }

    pub fn set_business(&mut self, field: BusinessField, value: impl Into<String>) {
        Arc::make_mut(&mut self.draft).set_business(field, value);
    }

    pub fn set_qualification(&mut self, update: QualificationUpdate) {
        Arc::make_mut(&mut self.draft).set_qualification(update);
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    /// Append an empty secondary contact, returning its index
    pub fn add_contact(&mut self) -> usize {
        Arc::make_mut(&mut self.draft).add_contact()
    }

    pub fn remove_contact(&mut self, index: usize) -> Result<(), DraftError> {
        self.try_edit(|draft| draft.remove_contact(index))
    }

    pub fn set_primary(&mut self, index: usize) -> Result<(), DraftError> {
        self.try_edit(|draft| draft.set_primary_contact(index))
    }

    pub fn update_contact(
        &mut self,
        index: usize,
        field: ContactField,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        let value = value.into();
        self.try_edit(|draft| draft.update_contact(index, field, value))
    }

    /// Run a fallible edit on a private copy and publish it only on success
    fn try_edit<F>(&mut self, edit: F) -> Result<(), DraftError>
    where
        F: FnOnce(&mut LeadDraft) -> Result<(), DraftError>,
    {
        let mut next = LeadDraft::clone(&self.draft);
        edit(&mut next)?;
        self.draft = Arc::new(next);
        Ok(())
    }
}
