use crate::errors::DataError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    pub fn file_name(&self) -> &'static str {
        match self {
            Split::Train => "train.jsonl",
            Split::Validation => "validation.jsonl",
            Split::Test => "test.jsonl",
        }
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "validation" => Ok(Split::Validation),
            "test" => Ok(Split::Test),
            other => Err(format!("unknown split {other}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    TextList(Vec<String>),
}

/// One labeled benchmark example: an ordered mapping from field name to
/// value, immutable once loaded.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Example {
    fields: IndexMap<String, FieldValue>,
}

impl Example {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.fields
            .insert(name.to_string(), FieldValue::Text(value.to_string()));
        self
    }

    pub fn with_int(mut self, name: &str, value: i64) -> Self {
        self.fields
            .insert(name.to_string(), FieldValue::Int(value));
        self
    }

    pub fn with_text_list(mut self, name: &str, values: &[&str]) -> Self {
        self.fields.insert(
            name.to_string(),
            FieldValue::TextList(values.iter().map(|v| v.to_string()).collect()),
        );
        self
    }

    fn get(&self, name: &str) -> Result<&FieldValue, DataError> {
        self.fields
            .get(name)
            .ok_or_else(|| DataError::MissingField(name.to_string()))
    }

    pub fn get_text(&self, name: &str) -> Result<&str, DataError> {
        match self.get(name)? {
            FieldValue::Text(value) => Ok(value),
            _ => Err(DataError::FieldType {
                field: name.to_string(),
                expected: "text",
            }),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i64, DataError> {
        match self.get(name)? {
            FieldValue::Int(value) => Ok(*value),
            _ => Err(DataError::FieldType {
                field: name.to_string(),
                expected: "integer",
            }),
        }
    }

    pub fn get_text_list(&self, name: &str) -> Result<&[String], DataError> {
        match self.get(name)? {
            FieldValue::TextList(values) => Ok(values),
            _ => Err(DataError::FieldType {
                field: name.to_string(),
                expected: "text list",
            }),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn from_json_object(
        object: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, DataError> {
        let mut fields = IndexMap::with_capacity(object.len());
        for (name, value) in object {
            let field = match value {
                serde_json::Value::String(text) => FieldValue::Text(text),
                serde_json::Value::Bool(flag) => FieldValue::Int(flag as i64),
                serde_json::Value::Number(number) => match number.as_i64() {
                    Some(int) => FieldValue::Int(int),
                    None => return Err(DataError::UnsupportedValue(name)),
                },
                serde_json::Value::Array(items) => {
                    let mut texts = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            serde_json::Value::String(text) => texts.push(text),
                            _ => return Err(DataError::UnsupportedValue(name)),
                        }
                    }
                    FieldValue::TextList(texts)
                }
                _ => return Err(DataError::UnsupportedValue(name)),
            };
            fields.insert(name, field);
        }
        Ok(Example { fields })
    }
}

/// Loads a full split from a JSON-lines file, one example object per line.
pub fn load_jsonl(path: &Path) -> Result<Vec<Example>, DataError> {
    let reader = BufReader::new(File::open(path)?);
    let mut examples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(&line)?;
        let object = match value {
            serde_json::Value::Object(object) => object,
            _ => {
                return Err(DataError::MalformedLine {
                    path: path.to_path_buf(),
                    line: index + 1,
                })
            }
        };
        examples.push(Example::from_json_object(object)?);
    }
    tracing::info!(path = ?path, examples = examples.len(), "loaded split");
    Ok(examples)
}

pub fn load_split(dir: &Path, split: Split) -> Result<Vec<Example>, DataError> {
    load_jsonl(&dir.join(split.file_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let example = Example::new()
            .with_text("sentence1", "a")
            .with_int("label", 1)
            .with_text_list("choices", &["x", "y"]);

        assert_eq!(example.get_text("sentence1").unwrap(), "a");
        assert_eq!(example.get_int("label").unwrap(), 1);
        assert_eq!(example.get_text_list("choices").unwrap().len(), 2);
        assert!(matches!(
            example.get_text("label"),
            Err(DataError::FieldType { .. })
        ));
        assert!(matches!(
            example.get_int("missing"),
            Err(DataError::MissingField(_))
        ));
    }

    #[test]
    fn split_names_round_trip() {
        assert_eq!("validation".parse::<Split>().unwrap(), Split::Validation);
        assert_eq!(Split::Test.file_name(), "test.jsonl");
        assert_eq!("Train".parse::<Split>().unwrap(), Split::Train);
        assert!("dev".parse::<Split>().is_err());
    }

    #[test]
    fn field_order_is_preserved() {
        let example = Example::new()
            .with_text("sentence1", "a")
            .with_text("sentence2", "b")
            .with_int("label", 0);
        let names: Vec<&str> = example.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["sentence1", "sentence2", "label"]);
    }
}
