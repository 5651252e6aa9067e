//! Request payload for `POST /schedule/generate`

use serde::Serialize;

use super::error::ValidationError;
use super::rules::ScheduleRules;
use crate::roster::{EmployeeType, Roster};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeePayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EmployeeType,
    pub civil_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub employees: Vec<EmployeePayload>,
    #[serde(flatten)]
    pub rules: ScheduleRules,
}

/// Check the roster can be submitted: at least one employee, and every
/// employee has a civil id.
pub fn validate_roster(roster: &Roster) -> Result<(), ValidationError> {
    if roster.is_empty() {
        return Err(ValidationError::NoEmployees);
    }

    let missing = roster.missing_civil_ids();
    if !missing.is_empty() {
        return Err(ValidationError::MissingCivilIds {
            count: missing.len(),
            names: missing.iter().map(|e| e.name.clone()).collect(),
        });
    }

    Ok(())
}

/// Validate roster and rules and assemble the request body
pub fn build_request(roster: &Roster, rules: &ScheduleRules) -> Result<GenerateRequest, ValidationError> {
    validate_roster(roster)?;
    rules.validate()?;

    let employees = roster
        .employees()
        .iter()
        .map(|e| EmployeePayload {
            name: e.name.clone(),
            kind: roster.type_of(&e.name),
            civil_id: e.civil_id.clone(),
        })
        .collect();

    Ok(GenerateRequest {
        employees,
        rules: rules.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;

    fn rules() -> ScheduleRules {
        ScheduleRules::from_config(&RulesConfig::default(), 2025, "march")
    }

    #[test]
    fn test_empty_roster_blocks_submission() {
        let roster = Roster::new();
        assert_eq!(build_request(&roster, &rules()), Err(ValidationError::NoEmployees));
    }

    #[test]
    fn test_missing_civil_id_reports_exact_count() {
        let mut roster = Roster::new();
        roster.add_manual("Ann", "");

        let err = build_request(&roster, &rules()).unwrap_err();
        match &err {
            ValidationError::MissingCivilIds { count, names } => {
                assert_eq!(*count, 1);
                assert_eq!(names, &vec!["Ann".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().starts_with("1 employee(s) missing Civil ID"));
    }

    #[test]
    fn test_invalid_rules_block_submission() {
        let mut roster = Roster::new();
        roster.add_manual("Ann", "1");
        let mut rules = rules();
        rules.start_day = 40;
        assert!(matches!(
            build_request(&roster, &rules),
            Err(ValidationError::InvalidRule { .. })
        ));
    }

    #[test]
    fn test_request_json_shape() {
        let mut roster = Roster::new();
        roster.add_manual("Ann", "100");
        roster.add_manual("Bob", "200");
        roster.set_type("Bob", EmployeeType::Overseas);

        let mut rules = rules();
        rules.add_holiday("2025-03-30");

        let request = build_request(&roster, &rules).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["year"], 2025);
        assert_eq!(json["month"], "march");
        assert_eq!(json["start_day"], 1);
        assert_eq!(json["local_off_days"], 2);
        assert_eq!(json["overseas_off_days"], 2);
        assert_eq!(json["driver_percentage_cap"], 0.5);
        assert_eq!(json["excluded_weekdays"], serde_json::json!(["friday"]));
        assert_eq!(json["public_holidays"], serde_json::json!(["2025-03-30"]));
        assert_eq!(
            json["employees"],
            serde_json::json!([
                {"name": "Ann", "type": "local", "civil_id": "100"},
                {"name": "Bob", "type": "overseas", "civil_id": "200"},
            ])
        );
    }
}
