//! Reference resolution with placeholder ("former") entities.
//!
//! Log entries point at boats, persons and destinations either by stable id
//! or by free text. [`Resolver::resolve`] always returns an id that exists
//! in the target registry: unresolvable tokens get a placeholder entity,
//! minted once per distinct text and reused afterwards.
//!
//! Placeholder ids come from one counter shared by all three kinds, so the
//! result depends on the order references are resolved in. Callers must
//! feed records in a fixed order for reproducible output.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{split_variant_id, variant_id, Boat, Destination, Person, UNKNOWN_NAME};
use crate::registry::{Registries, Registry};
use crate::utils::{is_stable_id, split_name};

/// Prefix of synthesized placeholder ids
pub const PLACEHOLDER_PREFIX: &str = "former-";

/// The three kinds of entity a log entry can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Boat,
    Person,
    Destination,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Boat => write!(f, "boat"),
            EntityKind::Person => write!(f, "person"),
            EntityKind::Destination => write!(f, "destination"),
        }
    }
}

/// Per-run resolution state: the shared placeholder counter and one
/// text-to-id memo per entity kind.
#[derive(Debug, Default)]
pub struct Resolver {
    counter: u32,
    boats_by_name: HashMap<String, String>,
    persons_by_name: HashMap<String, String>,
    destinations_by_name: HashMap<String, String>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a raw reference token to a canonical id, creating a
    /// placeholder entity in `registries` when nothing matches.
    pub fn resolve(&mut self, token: &str, kind: EntityKind, registries: &mut Registries) -> String {
        if is_stable_id(token) {
            let found = match kind {
                EntityKind::Boat => find_boat_variant(&registries.boats, token),
                EntityKind::Person => registries.persons.contains(token).then(|| token.to_string()),
                EntityKind::Destination => registries
                    .destinations
                    .contains(token)
                    .then(|| token.to_string()),
            };
            if let Some(id) = found {
                return id;
            }
            debug!(%kind, id = token, "Identifier not in registry, using placeholder");
        }

        if let Some(id) = self.memo(kind).get(token) {
            return id.clone();
        }

        let id = self.next_id(registries);
        self.memo_mut(kind).insert(token.to_string(), id.clone());
        match kind {
            EntityKind::Boat => {
                registries.boats.insert(Boat::placeholder(&id, token));
            }
            EntityKind::Person => {
                let (first_name, last_name) = placeholder_person_name(token);
                registries
                    .persons
                    .insert(Person::placeholder(&id, first_name, last_name));
            }
            EntityKind::Destination => {
                registries
                    .destinations
                    .insert(Destination::placeholder(&id, token));
            }
        }
        debug!(%kind, name = token, %id, "Created placeholder");
        id
    }

    /// Next counter value whose id is not already taken by a loaded entity
    fn next_id(&mut self, registries: &Registries) -> String {
        loop {
            self.counter += 1;
            let id = format!("{}{:06}", PLACEHOLDER_PREFIX, self.counter);
            if !registries.contains_id(&id) {
                return id;
            }
            debug!(%id, "Placeholder id already in use, skipping");
        }
    }

    fn memo(&self, kind: EntityKind) -> &HashMap<String, String> {
        match kind {
            EntityKind::Boat => &self.boats_by_name,
            EntityKind::Person => &self.persons_by_name,
            EntityKind::Destination => &self.destinations_by_name,
        }
    }

    fn memo_mut(&mut self, kind: EntityKind) -> &mut HashMap<String, String> {
        match kind {
            EntityKind::Boat => &mut self.boats_by_name,
            EntityKind::Person => &mut self.persons_by_name,
            EntityKind::Destination => &mut self.destinations_by_name,
        }
    }
}

/// Variant 1 of a base boat id if it exists, else its lowest existing variant
pub fn find_boat_variant(boats: &Registry<Boat>, base_id: &str) -> Option<String> {
    let first = variant_id(base_id, 1);
    if boats.contains(&first) {
        return Some(first);
    }
    boats
        .iter()
        .filter(|b| !b.is_placeholder)
        .filter_map(|b| split_variant_id(&b.id))
        .filter(|(base, _)| *base == base_id)
        .map(|(_, variant)| variant)
        .min()
        .map(|variant| variant_id(base_id, variant))
}

/// Name parts for a person placeholder. Tokens without a usable name
/// (blank, or a bare identifier) become "Unknown".
fn placeholder_person_name(token: &str) -> (Option<String>, Option<String>) {
    match split_name(token) {
        (None, Some(only)) if is_stable_id(&only) => (None, Some(UNKNOWN_NAME.to_string())),
        (None, None) => (None, Some(UNKNOWN_NAME.to_string())),
        parts => parts,
    }
}
