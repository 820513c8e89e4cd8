use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::catalog::QuestionCatalog;
use super::repository::{SubmissionId, SubmissionRecord};
use super::summary::DriverEntry;

const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelledRow {
    pub id: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagLine {
    pub label: &'static str,
    pub raised: bool,
}

/// Read-only projection of a stored submission for the clinician page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicianView {
    pub id: SubmissionId,
    pub created_at: DateTime<Utc>,
    pub total_score: f64,
    pub total_display: String,
    pub risk_text: String,
    pub chief_complaint: String,
    pub duration: String,
    pub comments: Vec<LabelledRow>,
    pub top_drivers: Vec<DriverEntry>,
    pub hint: String,
    pub focus_hints: Vec<String>,
    pub flags: Vec<FlagLine>,
    pub raw_rows: Vec<LabelledRow>,
    pub score_rows: Vec<LabelledRow>,
}

impl ClinicianView {
    pub fn from_record(record: &SubmissionRecord, catalog: &QuestionCatalog) -> Self {
        let label = |id: &str| {
            catalog
                .label(id)
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string())
        };
        let row = |id: &str, value: String| LabelledRow {
            id: id.to_string(),
            label: label(id),
            value,
        };

        Self {
            id: record.id.clone(),
            created_at: record.created_at,
            total_score: record.total_score,
            total_display: format!("{} / {MAX_SCORE}", record.total_score),
            risk_text: record.interpretation.risk_text.clone(),
            chief_complaint: record.summary.chief_complaint.clone(),
            duration: record.summary.duration.clone(),
            comments: record
                .summary
                .extra_comments
                .iter()
                .map(|comment| row(&comment.id, comment.text.clone()))
                .collect(),
            top_drivers: record.summary.top_drivers.clone(),
            hint: record.interpretation.hint.clone(),
            focus_hints: record.summary.focus_hints.clone(),
            flags: record
                .interpretation
                .flags
                .labelled()
                .into_iter()
                .map(|(label, raised)| FlagLine { label, raised })
                .collect(),
            raw_rows: record
                .raw_answers
                .iter()
                .map(|(id, value)| row(id, value.to_string()))
                .collect(),
            score_rows: record
                .scored
                .iter()
                .map(|(id, score)| row(id, score.map(|value| value.to_string()).unwrap_or_default()))
                .collect(),
        }
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ClinicianView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Tid: {}", self.created_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "Total score: {}", self.total_display)?;
        writeln!(f, "{}", self.risk_text)?;
        writeln!(f)?;
        writeln!(f, "Hovedplage: {}", self.chief_complaint)?;
        writeln!(f, "Varighet: {}", self.duration)?;

        if !self.comments.is_empty() {
            writeln!(f)?;
            writeln!(f, "Ekstra kommentarer:")?;
            for comment in &self.comments {
                writeln!(f, "  {}: {}", comment.label, comment.value)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Top 3 drivere:")?;
        for driver in &self.top_drivers {
            writeln!(f, "  {} = {}", driver.label, driver.score)?;
        }

        writeln!(f)?;
        writeln!(f, "Pekepinne: {}", self.hint)?;
        writeln!(f, "Fokus:")?;
        for hint in &self.focus_hints {
            writeln!(f, "  - {hint}")?;
        }

        writeln!(f)?;
        writeln!(f, "Profiler:")?;
        for flag in &self.flags {
            let mark = if flag.raised { "✅" } else { "—" };
            writeln!(f, "  {mark} {}", flag.label)?;
        }

        writeln!(f)?;
        writeln!(f, "Score per item:")?;
        for row in &self.score_rows {
            writeln!(f, "  {}: {}", row.label, row.value)?;
        }
        Ok(())
    }
}
