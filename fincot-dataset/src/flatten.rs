//! Flattening nested records into per-question evaluation rows.

use tracing::{debug, error, info};

use fincot_core::{EvaluationRow, QaPair, RawRecord};

use crate::normalize::parse_table;

const PRE_TEXT_HEADER: &str = "### Pre-Text";
const TABLE_HEADER: &str = "### Table";
const POST_TEXT_HEADER: &str = "### Post-Text";

/// Expands [`RawRecord`]s into flat [`EvaluationRow`]s, one per question.
///
/// Each row carries a serialized context string built from the record's
/// pre-text, table, and post-text under fixed section headers. Records
/// with multiple keyed questions produce one row per question, all sharing
/// the same context.
#[derive(Debug, Clone)]
pub struct Flattener {
    parse_tables: bool,
}

impl Flattener {
    /// Create a flattener that parses embedded tables into structured rows.
    #[must_use]
    pub fn new() -> Self {
        Self { parse_tables: true }
    }

    /// Control whether tables are parsed into structured rows or serialized
    /// verbatim into the context.
    #[must_use]
    pub fn with_parse_tables(mut self, parse_tables: bool) -> Self {
        self.parse_tables = parse_tables;
        self
    }

    /// Flatten records into evaluation rows.
    ///
    /// Record order is preserved, and within a record the keyed questions
    /// are emitted in ascending key order. An empty input produces an empty
    /// output rather than an error.
    pub fn flatten(&self, records: &[RawRecord]) -> Vec<EvaluationRow> {
        if records.is_empty() {
            error!("No records provided to flatten");
            return Vec::new();
        }

        let mut rows = Vec::new();
        for record in records {
            self.flatten_record(record, &mut rows);
        }
        info!(
            "Flattened {} records into {} evaluation rows",
            records.len(),
            rows.len()
        );
        rows
    }

    fn flatten_record(&self, record: &RawRecord, rows: &mut Vec<EvaluationRow>) {
        let context = self.build_context(record);
        let reasoning_steps = record
            .annotation
            .as_ref()
            .map(|annotation| annotation.dialogue_break.clone())
            .unwrap_or_default();

        let keyed = record.keyed_qa_pairs();
        if keyed.is_empty() {
            let qa = record.qa.clone().unwrap_or_default();
            let steps = self.step_list(record, &qa, None);
            rows.push(build_row(record, &qa, context, reasoning_steps, steps));
        } else {
            debug!("Record {} carries {} questions", record.id, keyed.len());
            for (suffix, qa) in keyed {
                let steps = self.step_list(record, &qa, Some(&suffix));
                rows.push(build_row(
                    record,
                    &qa,
                    context.clone(),
                    reasoning_steps.clone(),
                    steps,
                ));
            }
        }
    }

    /// Resolve the computation-step slice for one question.
    ///
    /// Keyed questions look for `step_list_<key>` first, then the generic
    /// `step_list`, then the pair's own steps. Unkeyed questions start at
    /// the generic slice. Absent everywhere means an empty sequence.
    fn step_list(&self, record: &RawRecord, qa: &QaPair, key: Option<&str>) -> Vec<String> {
        let annotation = record.annotation.as_ref();
        if let Some(key) = key {
            let keyed_slice =
                annotation.and_then(|annotation| annotation.step_slice(&format!("step_list_{key}")));
            if let Some(steps) = keyed_slice {
                return steps;
            }
        }
        if let Some(steps) = annotation.and_then(|annotation| annotation.step_slice("step_list")) {
            return steps;
        }
        qa.steps.clone()
    }

    /// Assemble the serialized context for one record.
    ///
    /// Sections appear in fixed order (pre-text, table, post-text) and are
    /// omitted entirely when their source is empty.
    fn build_context(&self, record: &RawRecord) -> String {
        let pre_text = record.pre_text.join(" ");
        let post_text = record.post_text.join(" ");

        let mut context = String::new();
        if !pre_text.is_empty() {
            push_section(&mut context, PRE_TEXT_HEADER, &pre_text);
        }
        if let Some(table_text) = self.serialize_table(record) {
            push_section(&mut context, TABLE_HEADER, &table_text);
        }
        if !post_text.is_empty() {
            push_section(&mut context, POST_TEXT_HEADER, &post_text);
        }
        context
    }

    fn serialize_table(&self, record: &RawRecord) -> Option<String> {
        if record.table.is_empty() {
            return None;
        }
        if self.parse_tables {
            let parsed = parse_table(&record.table);
            if parsed.is_empty() {
                return None;
            }
            serde_json::to_string_pretty(&parsed).ok()
        } else {
            Some(format!("{:?}", record.table))
        }
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new()
    }
}

fn push_section(context: &mut String, header: &str, body: &str) {
    context.push_str(header);
    context.push('\n');
    context.push_str(body);
    context.push_str("\n\n");
}

fn build_row(
    record: &RawRecord,
    qa: &QaPair,
    context: String,
    reasoning_steps: Vec<String>,
    step_list: Vec<String>,
) -> EvaluationRow {
    EvaluationRow {
        id: record.id.clone(),
        context,
        question: qa.question.clone(),
        reference_answer: qa.answer.clone(),
        reference_derived_answer: qa.derived_answer(),
        reference_reasoning_steps: reasoning_steps,
        step_list,
    }
}
