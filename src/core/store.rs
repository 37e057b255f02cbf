use crate::domain::model::{EntityKind, Subject, Tutor};
use crate::utils::error::{Result, SchoolError};
use std::collections::{HashMap, HashSet};

/// Insertion-ordered rows with a unique key index.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Entity> Table<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&pos| &self.rows[pos])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn push(&mut self, entity: T) -> Result<usize> {
        if self.index.contains_key(entity.key()) {
            return Err(SchoolError::DuplicateKey {
                entity: T::KIND,
                key: entity.key().to_string(),
            });
        }
        let pos = self.rows.len();
        self.index.insert(entity.key().to_string(), pos);
        self.rows.push(entity);
        Ok(pos)
    }
}

/// A record type the [`EntityStore`] keeps a table for.
pub trait Entity: Sized {
    const KIND: EntityKind;

    fn key(&self) -> &str;

    fn table(store: &EntityStore) -> &Table<Self>;

    fn table_mut(store: &mut EntityStore) -> &mut Table<Self>;

    /// Referential checks run before the row is stored.
    fn check_insert(&self, _store: &EntityStore) -> Result<()> {
        Ok(())
    }

    /// Index maintenance run after the row is stored at `position`.
    fn after_insert(_store: &mut EntityStore, _position: usize) {}
}

impl Entity for Subject {
    const KIND: EntityKind = EntityKind::Subject;

    fn key(&self) -> &str {
        &self.name
    }

    fn table(store: &EntityStore) -> &Table<Self> {
        &store.subjects
    }

    fn table_mut(store: &mut EntityStore) -> &mut Table<Self> {
        &mut store.subjects
    }
}

impl Entity for Tutor {
    const KIND: EntityKind = EntityKind::Tutor;

    fn key(&self) -> &str {
        self.code()
    }

    fn table(store: &EntityStore) -> &Table<Self> {
        &store.tutors
    }

    fn table_mut(store: &mut EntityStore) -> &mut Table<Self> {
        &mut store.tutors
    }

    // A tutor copied from another store may already carry associations.
    fn check_insert(&self, store: &EntityStore) -> Result<()> {
        for subject in self.subjects() {
            store.get::<Subject>(subject)?;
        }
        let mut ids = HashSet::new();
        for student in self.teaching_group() {
            if store.contains_student(student.id()) || !ids.insert(student.id()) {
                return Err(SchoolError::DuplicateKey {
                    entity: EntityKind::Student,
                    key: student.id().to_string(),
                });
            }
        }
        Ok(())
    }

    fn after_insert(store: &mut EntityStore, position: usize) {
        let ids: Vec<String> = store.tutors.rows[position]
            .teaching_group()
            .iter()
            .map(|s| s.id().to_string())
            .collect();
        for id in ids {
            store.student_owners.insert(id, position);
        }
    }
}

/// In-memory store for tutors and subjects.
///
/// Students are not a table of their own: they live inside their tutor's
/// teaching group, and the store only keeps an id → owner index so ids stay
/// unique across all groups. Single owner, no interior locking.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    tutors: Table<Tutor>,
    subjects: Table<Subject>,
    student_owners: HashMap<String, usize>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new tutor or subject.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if an entity with the same key exists.
    pub fn insert<T: Entity>(&mut self, entity: T) -> Result<()> {
        entity.check_insert(self)?;
        let kind = T::KIND;
        let key = entity.key().to_string();
        let position = T::table_mut(self).push(entity)?;
        T::after_insert(self, position);
        tracing::debug!(entity = %kind, key = %key, "inserted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no entity of this type has the key.
    pub fn get<T: Entity>(&self, key: &str) -> Result<&T> {
        T::table(self).get(key).ok_or_else(|| SchoolError::NotFound {
            entity: T::KIND,
            key: key.to_string(),
        })
    }

    /// All entities of one type in insertion order. Call again to restart.
    pub fn all<T: Entity>(&self) -> std::slice::Iter<'_, T> {
        T::table(self).iter()
    }

    pub fn len<T: Entity>(&self) -> usize {
        T::table(self).len()
    }

    pub fn is_empty<T: Entity>(&self) -> bool {
        T::table(self).is_empty()
    }

    pub fn student_count(&self) -> usize {
        self.student_owners.len()
    }

    pub fn contains_student(&self, student_id: &str) -> bool {
        self.student_owners.contains_key(student_id)
    }

    /// The tutor whose teaching group holds the student.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no teaching group holds a student with this id.
    pub fn owner_of(&self, student_id: &str) -> Result<&Tutor> {
        self.student_owners
            .get(student_id)
            .and_then(|&pos| self.tutors.rows.get(pos))
            .ok_or_else(|| SchoolError::NotFound {
                entity: EntityKind::Student,
                key: student_id.to_string(),
            })
    }

    pub(crate) fn tutor_mut(&mut self, code: &str) -> Result<(usize, &mut Tutor)> {
        let pos = self
            .tutors
            .position(code)
            .ok_or_else(|| SchoolError::NotFound {
                entity: EntityKind::Tutor,
                key: code.to_string(),
            })?;
        Ok((pos, &mut self.tutors.rows[pos]))
    }

    pub(crate) fn register_student(&mut self, student_id: &str, owner: usize) {
        self.student_owners.insert(student_id.to_string(), owner);
    }
}
