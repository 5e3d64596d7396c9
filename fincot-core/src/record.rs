//! Raw dataset records.
//!
//! A [`RawRecord`] is one source document from the dataset file: report text
//! before and after a table, the table itself, and one or more
//! question/answer pairs with an optional reasoning annotation. Records are
//! immutable once loaded; flattening them into evaluation rows is the
//! dataset crate's job.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One question/answer pair with optional derived answer and steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaPair {
    /// The question text.
    #[serde(default)]
    pub question: String,
    /// The reference answer, raw and uncleaned.
    #[serde(default)]
    pub answer: String,
    /// Machine-computed reference answer, when present. Kept as a JSON
    /// value because the source data mixes numbers and strings here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exe_ans: Option<serde_json::Value>,
    /// Per-question computation steps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
}

impl QaPair {
    /// The derived answer rendered as text, when present.
    #[must_use]
    pub fn derived_answer(&self) -> Option<String> {
        self.exe_ans.as_ref().map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Reasoning annotation attached to a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Annotation {
    /// Ground-truth reasoning trace as dialogue turns.
    #[serde(default)]
    pub dialogue_break: Vec<String>,
    /// Remaining annotation fields, including the `step_list` and
    /// `step_list_<n>` slices.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Annotation {
    /// Look up a step-list slice by key, if present and array-valued.
    #[must_use]
    pub fn step_slice(&self, key: &str) -> Option<Vec<String>> {
        let value = self.extra.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// One source document before flattening.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    /// Stable document identifier.
    #[serde(default)]
    pub id: String,
    /// Report text preceding the table, one line per entry.
    #[serde(default)]
    pub pre_text: Vec<String>,
    /// Report text following the table, one line per entry.
    #[serde(default)]
    pub post_text: Vec<String>,
    /// Table rows; the first row holds the headers.
    #[serde(default)]
    pub table: Vec<Vec<String>>,
    /// The single unkeyed question/answer pair, when the record has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qa: Option<QaPair>,
    /// Reasoning annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
    /// Remaining fields, including keyed `qa_<n>` pairs.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RawRecord {
    /// Keyed `qa_<n>` pairs in ascending lexicographic key order.
    ///
    /// Each entry is `(suffix, pair)` where the suffix is the part of the
    /// key after `qa_`. Values that do not deserialize as a pair are
    /// skipped.
    #[must_use]
    pub fn keyed_qa_pairs(&self) -> Vec<(String, QaPair)> {
        self.extra
            .iter()
            .filter_map(|(key, value)| {
                let suffix = key.strip_prefix("qa_")?;
                let pair: QaPair = serde_json::from_value(value.clone()).ok()?;
                Some((suffix.to_string(), pair))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn multi_qa_record() -> RawRecord {
        serde_json::from_str(
            r#"{
                "id": "doc-1",
                "pre_text": ["revenue grew strongly ."],
                "post_text": ["see note 4 ."],
                "table": [["", "2017", "2018"], ["revenue", "$100", "$120"]],
                "qa_0": {"question": "what was revenue in 2017?", "answer": "$100", "exe_ans": 100.0},
                "qa_1": {"question": "and in 2018?", "answer": "$120", "exe_ans": "120"},
                "annotation": {
                    "dialogue_break": ["what was revenue in 2017?", "and in 2018?"],
                    "step_list_0": ["read 2017 column"],
                    "step_list_1": ["read 2018 column"]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_keyed_qa_pairs_in_order() {
        let record = multi_qa_record();
        let pairs = record.keyed_qa_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "0");
        assert_eq!(pairs[0].1.question, "what was revenue in 2017?");
        assert_eq!(pairs[1].0, "1");
        assert_eq!(pairs[1].1.answer, "$120");
    }

    #[test]
    fn test_derived_answer_renders_numbers_and_strings() {
        let record = multi_qa_record();
        let pairs = record.keyed_qa_pairs();
        assert_eq!(pairs[0].1.derived_answer(), Some("100.0".to_string()));
        assert_eq!(pairs[1].1.derived_answer(), Some("120".to_string()));
    }

    #[test]
    fn test_annotation_step_slice() {
        let record = multi_qa_record();
        let annotation = record.annotation.unwrap();
        assert_eq!(
            annotation.step_slice("step_list_1"),
            Some(vec!["read 2018 column".to_string()])
        );
        assert_eq!(annotation.step_slice("step_list_9"), None);
    }

    #[test]
    fn test_single_qa_record() {
        let record: RawRecord = serde_json::from_str(
            r#"{
                "id": "doc-2",
                "qa": {"question": "total?", "answer": "42", "steps": ["add the rows"]},
                "annotation": {"dialogue_break": ["total?"]}
            }"#,
        )
        .unwrap();

        assert!(record.keyed_qa_pairs().is_empty());
        let qa = record.qa.unwrap();
        assert_eq!(qa.steps, vec!["add the rows".to_string()]);
        assert_eq!(qa.derived_answer(), None);
    }

    #[test]
    fn test_missing_fields_default() {
        let record: RawRecord = serde_json::from_str(r#"{"id": "doc-3"}"#).unwrap();
        assert!(record.pre_text.is_empty());
        assert!(record.table.is_empty());
        assert!(record.qa.is_none());
        assert!(record.annotation.is_none());
    }
}
