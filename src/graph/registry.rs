//! Name-keyed lookup over a raw person list.
//!
//! The registry borrows the input records; it is rebuilt for every
//! construction call and never outlives it.

use std::collections::HashMap;

use super::person::Person;

/// Name → person lookup preserving first-occurrence order.
///
/// When a name appears more than once, the last record wins but keeps
/// the position of the first occurrence.
#[derive(Debug, Default)]
pub struct Registry<'a> {
    entries: Vec<&'a Person>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Registry<'a> {
    /// Build a registry from a person slice.
    pub fn new(persons: &'a [Person]) -> Self {
        let mut entries = Vec::with_capacity(persons.len());
        let mut index = HashMap::with_capacity(persons.len());

        for person in persons {
            match index.get(person.name.as_str()).copied() {
                Some(slot) => {
                    log::debug!("duplicate person name {:?}, keeping last record", person.name);
                    entries[slot] = person;
                }
                None => {
                    index.insert(person.name.as_str(), entries.len());
                    entries.push(person);
                }
            }
        }

        Self { entries, index }
    }

    /// Look up a person by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&'a Person> {
        self.index.get(name).map(|&slot| self.entries[slot])
    }

    /// Dense position of a name in registry order.
    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether a name resolves to a person.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate over persons in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Person> + '_ {
        self.entries.iter().copied()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no persons.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
