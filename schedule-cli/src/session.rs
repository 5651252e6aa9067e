//! One operator session: roster, rules, credentials and the last schedule
//!
//! Everything session-scoped (token, service location, defaults) is handed
//! in at construction and dropped with the session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::export::ScheduleExporter;
use crate::roster::{ColumnSelection, CsvImport, MergeStats, Roster};
use crate::schedule::{
    GenerateRequest, ScheduleClient, SchedulePayload, ScheduleRules, ServiceError, build_request,
};

/// Column choices that override inference for an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOverrides {
    pub name: Option<String>,
    pub civil_id: Option<String>,
    pub origin: Option<String>,
}

impl ColumnOverrides {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.civil_id.is_none() && self.origin.is_none()
    }

    fn apply(&self, inferred: &ColumnSelection) -> ColumnSelection {
        ColumnSelection {
            name: self.name.clone().unwrap_or_else(|| inferred.name.clone()),
            civil_id: self.civil_id.clone().unwrap_or_else(|| inferred.civil_id.clone()),
            origin: self.origin.clone().unwrap_or_else(|| inferred.origin.clone()),
        }
    }
}

/// A validated request that has been marked in flight
#[derive(Debug)]
pub struct PendingRequest {
    pub request: GenerateRequest,
    pub token: String,
}

pub struct Session {
    config: Config,
    token: Option<String>,
    pub roster: Roster,
    pub rules: ScheduleRules,
    import: CsvImport,
    last_schedule: Option<SchedulePayload>,
    pending: bool,
}

impl Session {
    pub fn new(config: Config, token: Option<String>) -> Self {
        let rules = ScheduleRules::current_month(&config.rules);
        Self {
            config,
            token: token.filter(|t| !t.trim().is_empty()),
            roster: Roster::new(),
            rules,
            import: CsvImport::new(),
            last_schedule: None,
            pending: false,
        }
    }

    #[cfg(test)]
    pub fn import(&self) -> &CsvImport {
        &self.import
    }

    #[cfg(test)]
    pub fn last_schedule(&self) -> Option<&SchedulePayload> {
        self.last_schedule.as_ref()
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Replace the session token; `None` logs out
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    /// Read a CSV file and merge it into the roster.
    ///
    /// On a parse failure the roster is left untouched.
    pub async fn import_csv(&mut self, path: &Path, columns: &ColumnOverrides) -> Result<MergeStats> {
        self.import
            .load_path(path)
            .await
            .with_context(|| format!("Failed to import {}", path.display()))?;

        if !columns.is_empty() {
            let inferred = self.import.selection().cloned().unwrap_or_default();
            self.import
                .select_columns(columns.apply(&inferred))
                .with_context(|| format!("Invalid column selection for {}", path.display()))?;
        }

        self.merge_current_import()
    }

    /// Same as [`import_csv`](Self::import_csv) for CSV text already in memory
    #[cfg(test)]
    pub fn import_csv_str(&mut self, source: &str, text: &str) -> Result<MergeStats> {
        self.import
            .load_str(source, text)
            .with_context(|| format!("Failed to import {}", source))?;
        self.merge_current_import()
    }

    fn merge_current_import(&mut self) -> Result<MergeStats> {
        let output = self
            .import
            .output()
            .context("CSV import produced no output")?;
        let stats = self.roster.apply_import(output);

        log::info!(
            "Merged import: {} added, {} civil ids filled, {} types applied ({} employees total)",
            stats.added,
            stats.civil_ids_filled,
            stats.types_applied,
            self.roster.len()
        );
        Ok(stats)
    }

    /// Validate roster and rules and mark a request as in flight.
    ///
    /// Fails while another request is pending, and when no token is set.
    pub fn begin_generate(&mut self) -> Result<PendingRequest> {
        if self.pending {
            return Err(ServiceError::RequestPending.into());
        }

        let request = build_request(&self.roster, &self.rules)?;
        let token = self.token.clone().ok_or(ServiceError::MissingToken)?;

        self.pending = true;
        Ok(PendingRequest { request, token })
    }

    /// Clear the in-flight mark and keep the schedule on success. A failure
    /// leaves the previous schedule in place.
    pub fn finish_generate(
        &mut self,
        result: Result<SchedulePayload, ServiceError>,
    ) -> Result<&SchedulePayload> {
        self.pending = false;

        match result {
            Ok(payload) => {
                log::info!(
                    "Schedule generated: {} issue(s), sheets for {}",
                    payload.issues.len(),
                    payload.meta.export_filename()
                );
                let stored = self.last_schedule.insert(payload);
                Ok(&*stored)
            }
            Err(e) => {
                if matches!(e, ServiceError::Status { status: 401, .. }) {
                    self.token = None;
                }
                Err(e.into())
            }
        }
    }

    /// Submit the roster and rules to the scheduling service
    pub async fn generate(&mut self) -> Result<&SchedulePayload> {
        let api_base = self
            .config
            .api_base
            .clone()
            .ok_or(ServiceError::MissingApiBase)?;
        let client = ScheduleClient::new(&api_base, self.config.timeout())?;

        let pending = self.begin_generate()?;
        let result = client.generate(&pending.token, &pending.request).await;
        self.finish_generate(result)
    }

    /// Write the last schedule to a workbook. Returns the written path.
    pub async fn export(&self, out: Option<&Path>, open: bool) -> Result<PathBuf> {
        let payload = self
            .last_schedule
            .as_ref()
            .context("No schedule to export. Generate one first.")?;
        export_payload(&self.config, payload, out, open).await
    }
}

/// Export a payload to the configured directory (or `out`)
pub async fn export_payload(
    config: &Config,
    payload: &SchedulePayload,
    out: Option<&Path>,
    open: bool,
) -> Result<PathBuf> {
    let dir = match out {
        Some(_) => PathBuf::new(),
        None => config.export_dir()?,
    };

    if open || config.open_after_export {
        ScheduleExporter::export_and_open(payload, &dir, out).await
    } else {
        ScheduleExporter::export(payload, &dir, out).await
    }
}
