//! Task category inference for records that lack one

use crate::notation::compile;
use regex::Regex;
use serde_json::Value;
use tunetag_core::{Record, Result, TaskKind};

/// Fields consulted, in order, before falling back to marker tokens
const TASK_FIELDS: [&str; 3] = ["task", "type", "label"];

/// Resolves a record's task from its fields or embedded `%%<task>` markers
#[derive(Debug, Clone)]
pub struct TaskInferencer {
    markers: Vec<(TaskKind, Regex)>,
}

impl TaskInferencer {
    pub fn new() -> Result<Self> {
        let markers = TaskKind::ALL
            .into_iter()
            .map(|kind| {
                let pattern = format!(r"(?i)%%\s*{}", kind.as_str());
                compile(&pattern, kind.as_str()).map(|re| (kind, re))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { markers })
    }

    /// First task kind whose marker appears in `text`
    pub fn detect(&self, text: &str) -> Option<TaskKind> {
        self.markers
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(kind, _)| *kind)
    }

    /// Task for `record`: an existing `task`, then `type`, then `label`, then
    /// a marker found in `output_text` or the input, then `cataloging`.
    pub fn infer(&self, record: &Record, output_text: &str) -> String {
        if let Some(value) = TASK_FIELDS
            .iter()
            .find(|field| record.has_truthy(field))
            .and_then(|field| record.get(field))
        {
            return task_text(value);
        }

        let haystack = format!("{}\n{}", output_text, record.text_or_empty("input"));
        self.detect(&haystack).unwrap_or_default().to_string()
    }
}

/// Non-string task values as the dataset tooling spells them
fn task_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}
