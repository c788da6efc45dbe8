use std::{io::BufRead, path::{Path, PathBuf}};

use anyhow::bail;
use itertools::Itertools;
use serde::{de::{Error, Visitor}, Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestOutput {
    Anything, // `null`: evaluation must succeed but the rendering is not checked
    Rendered(String),
}

impl TestOutput {
    pub fn matches(&self, rendered: &str) -> bool {
        match self {
            Self::Anything => true,
            Self::Rendered(expected) => expected == rendered,
        }
    }
}

/// Expected outcome of one input line: a rendered value, or the kind of
/// parse error the line is rejected with.
#[derive(Debug, Clone)]
pub struct TestEvaluationResult(Result<TestOutput, String>);

impl From<TestEvaluationResult> for Result<TestOutput, String> {
    fn from(value: TestEvaluationResult) -> Self {
        value.0
    }
}

struct TestEvaluationResultVisitor {}

impl<'de> Deserialize<'de> for TestEvaluationResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de> {

        deserializer.deserialize_map(TestEvaluationResultVisitor {})
    }
}

impl<'de> Visitor<'de> for TestEvaluationResultVisitor {
    type Value = TestEvaluationResult;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "A structure containing the boolean key 'ok'. If it's okay, contains the key 'output', otherwise the key 'type'")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>, {

        if map.next_key::<String>()? != Some("ok".to_owned()) {
            return Err(A::Error::custom("First key should be 'ok'"))
        }

        let ok: bool = map.next_value()?;
        let expected_key = if ok { "output" } else { "type" };
        match map.next_key::<String>()? {
            None => return Err(A::Error::custom("Must have two keys")),
            Some(key) if key != expected_key
                => return Err(A::Error::custom(format!("Second key should be '{}'", expected_key))),
            _ => {}
        }

        let result = if ok {
            TestEvaluationResult(Ok(map.next_value::<TestOutput>()?))
        } else {
            TestEvaluationResult(Err(map.next_value::<String>()?))
        };

        if map.next_key::<String>()?.is_some() {
            return Err(A::Error::custom("Only two keys should be present"));
        }

        Ok(result)
    }
}

fn load_input_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<String>> {
    let source = std::fs::read(path)?;
    Ok(source.lines().collect::<Result<Vec<String>, _>>()?)
}

fn load_output_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<TestEvaluationResult>> {
    let source = std::fs::read(path)?;
    let result: Vec<TestEvaluationResult> = serde_json::from_slice(&source)?;
    Ok(result)
}

const TESTCASES: usize = 8;

pub fn load_test_pair(testcase: usize) -> anyhow::Result<Vec<(String, TestEvaluationResult)>> {
    if testcase < 1 || testcase > TESTCASES { bail!("Testcase out of bounds"); }

    let base_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let input = load_input_file(base_path.join("test_inputs").join(format!("{}.lispy", testcase)))?;
    let output = load_output_file(base_path.join("test_outputs").join(format!("{}.json", testcase)))?;

    if input.len() != output.len() { bail!("Input and output of testcase {} do not match", testcase); }
    Ok(input.into_iter().zip(output.into_iter()).collect_vec())
}

pub fn all_testcases() -> impl Iterator<Item = usize> {
    1..=TESTCASES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_both_shapes() -> anyhow::Result<()> {
        let entries: Vec<TestEvaluationResult> = serde_json::from_str(
            r#"[{"ok": true, "output": "{1 2}"}, {"ok": true, "output": null}, {"ok": false, "type": "UnexpectedEnd"}]"#
        )?;
        let entries: Vec<Result<TestOutput, String>> = entries.into_iter().map(Into::into).collect();

        assert!(matches!(&entries[0], Ok(output) if output.matches("{1 2}")));
        assert!(matches!(&entries[1], Ok(TestOutput::Anything)));
        assert!(matches!(&entries[2], Err(kind) if kind == "UnexpectedEnd"));
        Ok(())
    }

    #[test]
    fn rejects_mismatched_keys() {
        assert!(serde_json::from_str::<TestEvaluationResult>(r#"{"ok": true, "type": "x"}"#).is_err());
        assert!(serde_json::from_str::<TestEvaluationResult>(r#"{"output": "x", "ok": true}"#).is_err());
    }
}
