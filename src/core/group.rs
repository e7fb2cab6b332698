use crate::core::currency::CurrencyCode;
use crate::core::expense::Expense;
use crate::core::person::{Person, PersonId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors arising from group registry operations.
#[derive(Debug, Error)]
pub enum GroupError {
    #[error("a group named \"{name}\" already exists")]
    DuplicateName { name: String },
    #[error("no group with id {id}")]
    UnknownGroup { id: Uuid },
}

/// A group of people sharing expenses, accounted in one base currency.
///
/// The group is a plain value: mutations are explicit command functions
/// that consume a snapshot and return a new one. Callers that cache a
/// derived settlement view re-derive it after applying a command; the
/// group itself publishes nothing.
///
/// Participant order and expense order are irrelevant to settlement.
/// Every `paid_by` and split member should reference a participant at
/// calculation time; dangling references are a caller-side invariant
/// that the accumulator tolerates by balancing over whoever appears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseGroup {
    id: Uuid,
    name: String,
    base_currency: CurrencyCode,
    participants: Vec<Person>,
    expenses: Vec<Expense>,
    created_at: DateTime<Utc>,
}

impl ExpenseGroup {
    /// Create a new empty group.
    pub fn new(name: impl Into<String>, base_currency: CurrencyCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            base_currency,
            participants: Vec::new(),
            expenses: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Return a snapshot with `person` added to the participant set.
    pub fn with_participant(mut self, person: Person) -> Self {
        self.participants.push(person);
        self
    }

    /// Return a snapshot with the given participant removed.
    ///
    /// Expenses referencing the removed person are left untouched; it is
    /// the caller's job not to settle a group with dangling references.
    pub fn without_participant(mut self, id: PersonId) -> Self {
        self.participants.retain(|p| p.id() != id);
        self
    }

    /// Return a snapshot with `expense` appended.
    pub fn with_expense(mut self, expense: Expense) -> Self {
        self.expenses.push(expense);
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    pub fn participants(&self) -> &[Person] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Look up a participant by id.
    pub fn participant(&self, id: PersonId) -> Option<&Person> {
        self.participants.iter().find(|p| p.id() == id)
    }
}

/// The collection of all known expense groups.
///
/// Like [`ExpenseGroup`], the registry is an immutable snapshot with
/// explicit command functions. Group names are unique within a registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupRegistry {
    groups: Vec<ExpenseGroup>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a snapshot with `group` added.
    ///
    /// Fails if a group with the same name already exists.
    pub fn with_group(mut self, group: ExpenseGroup) -> Result<Self, GroupError> {
        if self.groups.iter().any(|g| g.name() == group.name()) {
            return Err(GroupError::DuplicateName {
                name: group.name().to_string(),
            });
        }
        self.groups.push(group);
        Ok(self)
    }

    /// Return a snapshot with the given group removed.
    pub fn without_group(mut self, id: Uuid) -> Self {
        self.groups.retain(|g| g.id() != id);
        self
    }

    /// Return a snapshot with the group of the same id replaced.
    ///
    /// Fails if no group with that id exists.
    pub fn with_replaced_group(mut self, group: ExpenseGroup) -> Result<Self, GroupError> {
        let slot = self
            .groups
            .iter_mut()
            .find(|g| g.id() == group.id())
            .ok_or(GroupError::UnknownGroup { id: group.id() })?;
        *slot = group;
        Ok(self)
    }

    pub fn get(&self, id: Uuid) -> Option<&ExpenseGroup> {
        self.groups.iter().find(|g| g.id() == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&ExpenseGroup> {
        self.groups.iter().find(|g| g.name() == name)
    }

    pub fn groups(&self) -> &[ExpenseGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sek() -> CurrencyCode {
        CurrencyCode::new("SEK")
    }

    #[test]
    fn test_group_commands_return_new_snapshots() {
        let alice = Person::new("Alice");
        let bob = Person::new("Bob");
        let alice_id = alice.id();

        let group = ExpenseGroup::new("Trip", sek())
            .with_participant(alice)
            .with_participant(bob);
        assert_eq!(group.participants().len(), 2);

        let group = group.without_participant(alice_id);
        assert_eq!(group.participants().len(), 1);
        assert!(group.participant(alice_id).is_none());
    }

    #[test]
    fn test_group_with_expense() {
        let alice = Person::new("Alice");
        let id = alice.id();
        let group = ExpenseGroup::new("Trip", sek()).with_participant(alice);
        let group = group.with_expense(Expense::new(
            "Taxi",
            dec!(120),
            sek(),
            id,
            vec![id],
        ));
        assert_eq!(group.expenses().len(), 1);
        assert_eq!(group.expenses()[0].title(), "Taxi");
    }

    #[test]
    fn test_registry_rejects_duplicate_names() {
        let registry = GroupRegistry::new()
            .with_group(ExpenseGroup::new("Trip", sek()))
            .unwrap();
        let result = registry.with_group(ExpenseGroup::new("Trip", sek()));
        assert!(matches!(result, Err(GroupError::DuplicateName { .. })));
    }

    #[test]
    fn test_registry_replace_and_remove() {
        let group = ExpenseGroup::new("Trip", sek());
        let id = group.id();
        let registry = GroupRegistry::new().with_group(group).unwrap();

        let updated = registry
            .get(id)
            .cloned()
            .unwrap()
            .with_participant(Person::new("Alice"));
        let registry = registry.with_replaced_group(updated).unwrap();
        assert_eq!(registry.get(id).unwrap().participants().len(), 1);

        let registry = registry.without_group(id);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_replace_unknown_group_fails() {
        let registry = GroupRegistry::new();
        let result = registry.with_replaced_group(ExpenseGroup::new("Ghost", sek()));
        assert!(matches!(result, Err(GroupError::UnknownGroup { .. })));
    }
}
