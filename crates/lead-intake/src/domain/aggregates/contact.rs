//! Contact list
//!
//! Ordered contacts attached to a lead draft. The list is never empty and
//! exactly one entry is primary after every operation.

use serde::Serialize;
use std::str::FromStr;

use crate::domain::value_objects::{ContactId, UnknownField};

/// A person attached to the lead
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Contact {
    id: ContactId,
    full_name: String,
    email: String,
    phone: Option<String>,
    role: Option<String>,
    is_primary: bool,
}

impl Contact {
    fn empty(is_primary: bool) -> Self {
        Self {
            id: ContactId::new(),
            full_name: String::new(),
            email: String::new(),
            phone: None,
            role: None,
            is_primary,
        }
    }

    pub fn id(&self) -> &ContactId { &self.id }
    pub fn full_name(&self) -> &str { &self.full_name }
    pub fn email(&self) -> &str { &self.email }
    pub fn phone(&self) -> Option<&str> { self.phone.as_deref() }
    pub fn role(&self) -> Option<&str> { self.role.as_deref() }
    pub fn is_primary(&self) -> bool { self.is_primary }

    /// Name and email are both present (after trimming)
    pub fn has_name_and_email(&self) -> bool {
        !self.full_name.trim().is_empty() && !self.email.trim().is_empty()
    }

    fn set(&mut self, field: ContactField, value: String) {
        match field {
            ContactField::FullName => self.full_name = value,
            ContactField::Email => self.email = value,
            ContactField::Phone => self.phone = non_empty(value),
            ContactField::Role => self.role = non_empty(value),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

/// Editable contact fields. `is_primary` only changes through
/// [`ContactList::set_primary`] and removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    FullName,
    Email,
    Phone,
    Role,
}

impl FromStr for ContactField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full_name" | "fullname" | "name" => Ok(Self::FullName),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "role" => Ok(Self::Role),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Ordered, never-empty contact collection with exactly one primary
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContactList {
    contacts: Vec<Contact>,
}

impl ContactList {
    /// A list holding one empty primary contact
    pub fn new() -> Self {
        Self { contacts: vec![Contact::empty(true)] }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn len(&self) -> usize { self.contacts.len() }
    pub fn is_empty(&self) -> bool { self.contacts.is_empty() }
    pub fn get(&self, index: usize) -> Option<&Contact> { self.contacts.get(index) }
    pub fn iter(&self) -> std::slice::Iter<'_, Contact> { self.contacts.iter() }
    pub fn as_slice(&self) -> &[Contact] { &self.contacts }

    pub fn primary_count(&self) -> usize {
        self.contacts.iter().filter(|c| c.is_primary).count()
    }

    pub fn primary_index(&self) -> Option<usize> {
        self.contacts.iter().position(|c| c.is_primary)
    }

    pub fn primary(&self) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.is_primary)
    }

    /// Non-empty with exactly one primary
    pub fn invariant_holds(&self) -> bool {
        !self.contacts.is_empty() && self.primary_count() == 1
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Append an empty, non-primary contact and return its index
    pub fn add_contact(&mut self) -> usize {
        self.contacts.push(Contact::empty(false));
        debug_assert!(self.invariant_holds());
        self.contacts.len() - 1
    }

    /// Remove the contact at `index`.
    ///
    /// Removing the primary promotes the first remaining contact; removing
    /// the last contact leaves a fresh empty primary in its place.
    pub fn remove_contact(&mut self, index: usize) -> Result<Contact, ContactError> {
        self.check_index(index)?;
        let removed = self.contacts.remove(index);

        if self.contacts.is_empty() {
            self.contacts.push(Contact::empty(true));
        } else if removed.is_primary {
            self.contacts[0].is_primary = true;
        }

        debug_assert!(self.invariant_holds());
        Ok(removed)
    }

    /// Make `index` the only primary contact
    pub fn set_primary(&mut self, index: usize) -> Result<(), ContactError> {
        self.check_index(index)?;
        for (i, contact) in self.contacts.iter_mut().enumerate() {
            contact.is_primary = i == index;
        }
        debug_assert!(self.invariant_holds());
        Ok(())
    }

    /// Replace one field of one contact
    pub fn update_field(
        &mut self,
        index: usize,
        field: ContactField,
        value: impl Into<String>,
    ) -> Result<(), ContactError> {
        self.check_index(index)?;
        self.contacts[index].set(field, value.into());
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), ContactError> {
        if index < self.contacts.len() {
            Ok(())
        } else {
            Err(ContactError::IndexOutOfRange { index, len: self.contacts.len() })
        }
    }
}

impl Default for ContactList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ContactList {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.contacts.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("No contact at index {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_list_has_one_empty_primary() {
        let list = ContactList::new();
        assert_eq!(list.len(), 1);
        assert!(list.primary().unwrap().is_primary());
        assert_eq!(list.primary().unwrap().full_name(), "");
    }

    #[test]
    fn test_add_contact_is_not_primary() {
        let mut list = ContactList::new();
        let idx = list.add_contact();
        assert_eq!(idx, 1);
        assert!(!list.get(1).unwrap().is_primary());
        assert_eq!(list.primary_index(), Some(0));
    }

    #[test]
    fn test_remove_primary_promotes_first_remaining() {
        let mut list = ContactList::new();
        list.add_contact();
        list.add_contact();
        list.set_primary(1).unwrap();
        list.update_field(0, ContactField::FullName, "Asha").unwrap();

        let removed = list.remove_contact(1).unwrap();
        assert!(removed.is_primary());
        assert_eq!(list.len(), 2);
        assert_eq!(list.primary_index(), Some(0));
        assert_eq!(list.primary().unwrap().full_name(), "Asha");
    }

    #[test]
    fn test_remove_non_primary_keeps_primary() {
        let mut list = ContactList::new();
        list.add_contact();
        list.remove_contact(1).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.primary_index(), Some(0));
    }

    #[test]
    fn test_remove_last_contact_reinserts_empty_primary() {
        let mut list = ContactList::new();
        list.update_field(0, ContactField::Email, "raj@x.com").unwrap();
        let old_id = list.get(0).unwrap().id().clone();

        list.remove_contact(0).unwrap();

        assert_eq!(list.len(), 1);
        let primary = list.primary().unwrap();
        assert_eq!(primary.email(), "");
        assert_ne!(primary.id(), &old_id);
    }

    #[test]
    fn test_set_primary_is_exclusive() {
        let mut list = ContactList::new();
        list.add_contact();
        list.add_contact();
        list.set_primary(2).unwrap();
        assert_eq!(list.primary_count(), 1);
        assert_eq!(list.primary_index(), Some(2));
    }

    #[test]
    fn test_update_optional_fields() {
        let mut list = ContactList::new();
        list.update_field(0, ContactField::Phone, "+91 98765 43210").unwrap();
        list.update_field(0, ContactField::Role, "CTO").unwrap();
        assert_eq!(list.get(0).unwrap().phone(), Some("+91 98765 43210"));
        list.update_field(0, ContactField::Role, "  ").unwrap();
        assert_eq!(list.get(0).unwrap().role(), None);
    }

    #[test]
    fn test_out_of_range_leaves_list_unchanged() {
        let mut list = ContactList::new();
        let before = list.clone();
        assert_eq!(
            list.remove_contact(3),
            Err(ContactError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert!(list.set_primary(1).is_err());
        assert!(list.update_field(5, ContactField::Email, "x").is_err());
        assert_eq!(list, before);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("name".parse::<ContactField>(), Ok(ContactField::FullName));
        assert!("is_primary".parse::<ContactField>().is_err());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add,
        Remove(usize),
        SetPrimary(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Add),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8).prop_map(Op::SetPrimary),
        ]
    }

    proptest! {
        #[test]
        fn prop_exactly_one_primary_after_every_op(ops in proptest::collection::vec(op(), 0..64)) {
            let mut list = ContactList::new();
            for op in ops {
                let _ = match op {
                    Op::Add => { list.add_contact(); Ok(()) }
                    Op::Remove(i) => list.remove_contact(i).map(|_| ()),
                    Op::SetPrimary(i) => list.set_primary(i),
                };
                prop_assert!(list.len() >= 1);
                prop_assert_eq!(list.primary_count(), 1);
            }
        }
    }
}
