//! Roster data model: employees, their local/overseas type, and the
//! operator-facing edits on both

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::ingest::ImportOutput;
use super::merge::{merge_employees, merge_imported_types, sync_types_with_roster};

/// One roster entry. `name` is the identity key and is always trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    #[serde(default)]
    pub civil_id: String,
}

impl Employee {
    pub fn new(name: impl Into<String>, civil_id: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            civil_id: civil_id.into().trim().to_string(),
        }
    }

    pub fn has_civil_id(&self) -> bool {
        !self.civil_id.trim().is_empty()
    }
}

/// Employee classification used by the scheduler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeType {
    #[default]
    Local,
    Overseas,
}

impl EmployeeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Overseas => "overseas",
        }
    }
}

impl fmt::Display for EmployeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "overseas" => Ok(Self::Overseas),
            other => Err(format!("unknown employee type '{}' (expected local or overseas)", other)),
        }
    }
}

/// Where a type entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSource {
    /// Filled in because the employee had no type yet
    Default,
    /// Recognized from an origin column during CSV import
    Imported,
    /// Set by the operator
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeEntry {
    pub kind: EmployeeType,
    pub source: TypeSource,
}

impl TypeEntry {
    /// Imported or operator-set types are "assigned"; defaults are not.
    pub fn is_assigned(&self) -> bool {
        self.source != TypeSource::Default
    }
}

/// Name → type mapping kept in lockstep with the roster
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    entries: HashMap<String, TypeEntry>,
}

impl TypeMap {
    pub fn get(&self, name: &str) -> Option<EmployeeType> {
        self.entries.get(name).map(|e| e.kind)
    }

    pub fn is_assigned(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(TypeEntry::is_assigned)
    }

    pub fn set(&mut self, name: &str, kind: EmployeeType, source: TypeSource) {
        self.entries.insert(name.to_string(), TypeEntry { kind, source });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|name, _| keep(name));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Type filter for roster listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TypeFilter {
    #[default]
    All,
    Local,
    Overseas,
}

impl TypeFilter {
    pub fn matches(&self, kind: EmployeeType) -> bool {
        match self {
            Self::All => true,
            Self::Local => kind == EmployeeType::Local,
            Self::Overseas => kind == EmployeeType::Overseas,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub all: usize,
    pub local: usize,
    pub overseas: usize,
}

/// Counts of what an import changed in the roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub civil_ids_filled: usize,
    pub types_applied: usize,
}

/// The deduplicated employee roster and its type map
#[derive(Debug, Clone, Default)]
pub struct Roster {
    employees: Vec<Employee>,
    types: TypeMap,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    #[cfg(test)]
    pub fn types(&self) -> &TypeMap {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Employee> {
        let name = name.trim();
        self.employees.iter().find(|e| e.name == name)
    }

    /// Effective type of an employee; absent entries count as local
    pub fn type_of(&self, name: &str) -> EmployeeType {
        self.types.get(name.trim()).unwrap_or_default()
    }

    /// Reconcile one CSV import into the roster.
    ///
    /// Employees merge first-non-empty-wins on civil id; imported types only
    /// land on names whose type has not been assigned yet.
    pub fn apply_import(&mut self, import: &ImportOutput) -> MergeStats {
        let (added, civil_ids_filled) = merge_employees(&mut self.employees, &import.employees);
        sync_types_with_roster(&mut self.types, &self.employees);
        let types_applied = merge_imported_types(&mut self.types, &import.types);

        log::debug!(
            "Import merged: {} added, {} civil ids filled, {} types applied",
            added,
            civil_ids_filled,
            types_applied
        );

        MergeStats {
            added,
            civil_ids_filled,
            types_applied,
        }
    }

    /// Add an employee by hand. Blank names are ignored and an existing name
    /// only has its empty civil id filled. Returns true if the name was new.
    pub fn add_manual(&mut self, name: &str, civil_id: &str) -> bool {
        let employee = Employee::new(name, civil_id);
        if employee.name.is_empty() {
            return false;
        }

        let (added, _) = merge_employees(&mut self.employees, std::slice::from_ref(&employee));
        sync_types_with_roster(&mut self.types, &self.employees);
        added > 0
    }

    /// Operator edit of a civil id; unlike imports this may overwrite.
    pub fn set_civil_id(&mut self, name: &str, civil_id: &str) -> bool {
        let name = name.trim();
        match self.employees.iter_mut().find(|e| e.name == name) {
            Some(employee) => {
                employee.civil_id = civil_id.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Operator edit of one employee's type
    pub fn set_type(&mut self, name: &str, kind: EmployeeType) -> bool {
        let name = name.trim();
        if self.get(name).is_none() {
            return false;
        }
        self.types.set(name, kind, TypeSource::Manual);
        true
    }

    /// Operator edit of every employee's type
    pub fn set_all(&mut self, kind: EmployeeType) {
        for employee in &self.employees {
            self.types.set(&employee.name, kind, TypeSource::Manual);
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let name = name.trim();
        let before = self.employees.len();
        self.employees.retain(|e| e.name != name);
        let removed = self.employees.len() != before;
        if removed {
            sync_types_with_roster(&mut self.types, &self.employees);
        }
        removed
    }

    /// Employees matching a type filter and a case-insensitive search over
    /// name and civil id
    pub fn filter(&self, filter: TypeFilter, search: &str) -> Vec<&Employee> {
        let needle = search.trim().to_lowercase();

        self.employees
            .iter()
            .filter(|e| filter.matches(self.type_of(&e.name)))
            .filter(|e| {
                needle.is_empty()
                    || format!("{} {}", e.name, e.civil_id)
                        .to_lowercase()
                        .contains(&needle)
            })
            .collect()
    }

    pub fn counts(&self) -> TypeCounts {
        let mut counts = TypeCounts {
            all: self.employees.len(),
            ..Default::default()
        };
        for employee in &self.employees {
            match self.type_of(&employee.name) {
                EmployeeType::Local => counts.local += 1,
                EmployeeType::Overseas => counts.overseas += 1,
            }
        }
        counts
    }

    pub fn missing_civil_ids(&self) -> Vec<&Employee> {
        self.employees.iter().filter(|e| !e.has_civil_id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn import(employees: &[(&str, &str)], types: &[(&str, EmployeeType)]) -> ImportOutput {
        ImportOutput {
            employees: employees.iter().map(|(n, c)| Employee::new(*n, *c)).collect(),
            types: types
                .iter()
                .map(|(n, t)| (n.to_string(), *t))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_employee_type_parse() {
        assert_eq!("Overseas".parse::<EmployeeType>(), Ok(EmployeeType::Overseas));
        assert_eq!(" local ".parse::<EmployeeType>(), Ok(EmployeeType::Local));
        assert!("o".parse::<EmployeeType>().is_err());
    }

    #[test]
    fn test_apply_import_defaults_types() {
        let mut roster = Roster::new();
        let stats = roster.apply_import(&import(&[("Ann", "1"), ("Bob", "")], &[]));

        assert_eq!(stats.added, 2);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.types().len(), 2);
        assert_eq!(roster.type_of("Ann"), EmployeeType::Local);
        assert!(!roster.types().is_assigned("Ann"));
    }

    #[test]
    fn test_imported_type_first_wins() {
        let mut roster = Roster::new();
        roster.apply_import(&import(&[("Bob", "")], &[("Bob", EmployeeType::Overseas)]));
        roster.apply_import(&import(&[("Bob", "")], &[("Bob", EmployeeType::Local)]));

        assert_eq!(roster.type_of("Bob"), EmployeeType::Overseas);
    }

    #[test]
    fn test_manual_type_never_overwritten_by_import() {
        let mut roster = Roster::new();
        roster.apply_import(&import(&[("Bob", "")], &[("Bob", EmployeeType::Overseas)]));
        assert!(roster.set_type("Bob", EmployeeType::Local));
        roster.apply_import(&import(&[("Bob", "")], &[("Bob", EmployeeType::Overseas)]));

        assert_eq!(roster.type_of("Bob"), EmployeeType::Local);
    }

    #[test]
    fn test_manual_type_before_any_import_type() {
        let mut roster = Roster::new();
        roster.add_manual("Cy", "");
        roster.set_type("Cy", EmployeeType::Overseas);
        roster.apply_import(&import(&[("Cy", "")], &[("Cy", EmployeeType::Local)]));

        assert_eq!(roster.type_of("Cy"), EmployeeType::Overseas);
    }

    #[test]
    fn test_import_type_applies_over_default() {
        let mut roster = Roster::new();
        roster.add_manual("Dee", "");
        assert_eq!(roster.type_of("Dee"), EmployeeType::Local);

        roster.apply_import(&import(&[("Dee", "")], &[("Dee", EmployeeType::Overseas)]));
        assert_eq!(roster.type_of("Dee"), EmployeeType::Overseas);
    }

    #[test]
    fn test_civil_id_first_non_empty_wins_across_imports() {
        let mut roster = Roster::new();
        roster.apply_import(&import(&[("A", "123")], &[]));
        roster.apply_import(&import(&[("A", "")], &[]));
        assert_eq!(roster.get("A").map(|e| e.civil_id.as_str()), Some("123"));

        roster.apply_import(&import(&[("A", "999")], &[]));
        assert_eq!(roster.get("A").map(|e| e.civil_id.as_str()), Some("123"));
    }

    #[test]
    fn test_civil_id_filled_when_empty() {
        let mut roster = Roster::new();
        roster.apply_import(&import(&[("A", "")], &[]));
        let stats = roster.apply_import(&import(&[("A", "456")], &[]));

        assert_eq!(stats.added, 0);
        assert_eq!(stats.civil_ids_filled, 1);
        assert_eq!(roster.get("A").map(|e| e.civil_id.as_str()), Some("456"));
    }

    #[test]
    fn test_add_manual() {
        let mut roster = Roster::new();
        assert!(roster.add_manual("  Eve  ", ""));
        assert!(!roster.add_manual("Eve", "777"));
        assert!(!roster.add_manual("   ", "1"));

        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get("Eve").map(|e| e.civil_id.as_str()), Some("777"));
        assert!(roster.types().contains("Eve"));
    }

    #[test]
    fn test_set_civil_id_overwrites() {
        let mut roster = Roster::new();
        roster.add_manual("Eve", "1");
        assert!(roster.set_civil_id("Eve", "2"));
        assert!(!roster.set_civil_id("Nobody", "3"));
        assert_eq!(roster.get("Eve").map(|e| e.civil_id.as_str()), Some("2"));
    }

    #[test]
    fn test_remove_prunes_type() {
        let mut roster = Roster::new();
        roster.add_manual("Ann", "");
        roster.add_manual("Bob", "");
        roster.set_type("Bob", EmployeeType::Overseas);

        assert!(roster.remove("Bob"));
        assert!(!roster.remove("Bob"));
        assert_eq!(roster.len(), 1);
        assert!(!roster.types().contains("Bob"));
        assert_eq!(roster.types().len(), 1);
    }

    #[test]
    fn test_set_all_and_counts() {
        let mut roster = Roster::new();
        roster.add_manual("Ann", "");
        roster.add_manual("Bob", "");
        roster.add_manual("Cy", "");
        roster.set_type("Cy", EmployeeType::Overseas);

        assert_eq!(roster.counts(), TypeCounts { all: 3, local: 2, overseas: 1 });

        roster.set_all(EmployeeType::Overseas);
        assert_eq!(roster.counts(), TypeCounts { all: 3, local: 0, overseas: 3 });
        assert!(roster.types().is_assigned("Ann"));
    }

    #[test]
    fn test_filter_by_type_and_search() {
        let mut roster = Roster::new();
        roster.add_manual("Ann Lee", "A-100");
        roster.add_manual("Bob Stone", "B-200");
        roster.set_type("Bob Stone", EmployeeType::Overseas);

        let names = |v: Vec<&Employee>| v.iter().map(|e| e.name.clone()).collect::<Vec<_>>();

        assert_eq!(names(roster.filter(TypeFilter::All, "")), vec!["Ann Lee", "Bob Stone"]);
        assert_eq!(names(roster.filter(TypeFilter::Overseas, "")), vec!["Bob Stone"]);
        assert_eq!(names(roster.filter(TypeFilter::All, "a-1")), vec!["Ann Lee"]);
        assert_eq!(names(roster.filter(TypeFilter::Local, "stone")), Vec::<String>::new());
    }

    #[test]
    fn test_missing_civil_ids() {
        let mut roster = Roster::new();
        roster.add_manual("Ann", "1");
        roster.add_manual("Bob", "");
        let missing = roster.missing_civil_ids();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "Bob");
    }
}
