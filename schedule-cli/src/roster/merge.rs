//! Merge policies for combining imports with the existing roster
//!
//! These are kept as named functions so the direction of each policy is
//! explicit at the call site:
//! - civil ids are first-non-empty-wins
//! - imported types never replace an assigned (imported or manual) type
//! - the type map always mirrors the roster, with no orphans

use std::collections::{HashMap, HashSet};

use super::model::{Employee, EmployeeType, TypeMap, TypeSource};

/// First-non-empty-wins: keep `existing` unless it is empty.
pub fn merge_civil_id(existing: &str, incoming: &str) -> String {
    if !existing.trim().is_empty() {
        existing.to_string()
    } else {
        incoming.trim().to_string()
    }
}

/// Merge incoming employees into the roster by name.
///
/// New names are appended in incoming order. Known names only get their
/// civil id filled if it is currently empty.
/// Returns `(added, civil_ids_filled)`.
pub fn merge_employees(roster: &mut Vec<Employee>, incoming: &[Employee]) -> (usize, usize) {
    let mut index: HashMap<String, usize> = roster
        .iter()
        .enumerate()
        .map(|(i, e)| (e.name.clone(), i))
        .collect();

    let mut added = 0;
    let mut filled = 0;

    for employee in incoming {
        let name = employee.name.trim();
        if name.is_empty() {
            continue;
        }

        match index.get(name) {
            Some(&i) => {
                let existing = &mut roster[i];
                let merged = merge_civil_id(&existing.civil_id, &employee.civil_id);
                if merged != existing.civil_id {
                    existing.civil_id = merged;
                    filled += 1;
                }
            }
            None => {
                index.insert(name.to_string(), roster.len());
                roster.push(Employee::new(name, employee.civil_id.as_str()));
                added += 1;
            }
        }
    }

    (added, filled)
}

/// Apply types inferred by an import.
///
/// Only names that are in the roster and whose type is still a default are
/// touched. Returns the number of entries changed.
pub fn merge_imported_types(types: &mut TypeMap, imported: &HashMap<String, EmployeeType>) -> usize {
    let mut applied = 0;

    for (name, kind) in imported {
        if !types.contains(name) || types.is_assigned(name) {
            continue;
        }
        types.set(name, *kind, TypeSource::Imported);
        applied += 1;
    }

    applied
}

/// Give every roster employee a type entry (default local) and prune
/// entries for names no longer in the roster.
pub fn sync_types_with_roster(types: &mut TypeMap, employees: &[Employee]) {
    let names: HashSet<&str> = employees.iter().map(|e| e.name.as_str()).collect();

    for name in &names {
        if !types.contains(name) {
            types.set(name, EmployeeType::Local, TypeSource::Default);
        }
    }

    types.retain(|name| names.contains(name));
}
