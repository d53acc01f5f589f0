#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HexError {
    #[error("hex string has odd length {0}")]
    OddLength(usize),
    #[error("invalid hex character: {0}")]
    InvalidDigit(char),
}

#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(hex_digit(byte >> 4));
        out.push(hex_digit(byte & 0x0f));
    }
    out
}

pub fn hex_decode(value: &str) -> Result<Vec<u8>, HexError> {
    if !value.len().is_multiple_of(2) {
        return Err(HexError::OddLength(value.len()));
    }
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(value.len() / 2);
    for idx in (0..bytes.len()).step_by(2) {
        let high = hex_value(bytes[idx])?;
        let low = hex_value(bytes[idx + 1])?;
        out.push((high << 4) | low);
    }
    Ok(out)
}

fn hex_digit(value: u8) -> char {
    match value {
        0..=9 => (b'0' + value) as char,
        10..=15 => (b'a' + (value - 10)) as char,
        _ => unreachable!("nibble out of range"),
    }
}

fn hex_value(byte: u8) -> Result<u8, HexError> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(HexError::InvalidDigit(byte as char)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Roundtrip,
    InvalidIn,
    InvalidOut,
    Encode,
    Decode,
    Invalid,
}

/// A validated, hex-decoded test vector. The first three variants are the
/// canonical fixture dialect; the last three are the legacy dialect with
/// split `input`/`output` payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestVector {
    Roundtrip { data: Vec<u8> },
    InvalidIn { data: Vec<u8> },
    InvalidOut { data: Vec<u8> },
    Encode { input: Vec<u8>, output: Vec<u8> },
    Decode { input: Vec<u8> },
    Invalid { input: Vec<u8> },
}

impl TestVector {
    #[must_use]
    pub fn kind(&self) -> TestKind {
        match self {
            Self::Roundtrip { .. } => TestKind::Roundtrip,
            Self::InvalidIn { .. } => TestKind::InvalidIn,
            Self::InvalidOut { .. } => TestKind::InvalidOut,
            Self::Encode { .. } => TestKind::Encode,
            Self::Decode { .. } => TestKind::Decode,
            Self::Invalid { .. } => TestKind::Invalid,
        }
    }
}

/// One test case as it appears on disk, before hex decoding and
/// type validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTestCase {
    #[serde(rename = "type")]
    pub test_type: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VectorError {
    #[error("unknown test type '{0}'")]
    UnknownTestType(String),
    #[error("test type '{test_type}' requires a '{field}' field")]
    MissingField {
        test_type: &'static str,
        field: &'static str,
    },
    #[error("field '{field}' is not valid hex: {source}")]
    Hex {
        field: &'static str,
        source: HexError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub id: Option<String>,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub tags: BTreeSet<String>,
    pub vector: TestVector,
}

impl TestCase {
    pub fn from_raw(raw: RawTestCase) -> Result<Self, VectorError> {
        let vector = match raw.test_type.as_str() {
            "roundtrip" => TestVector::Roundtrip {
                data: require_hex("roundtrip", "data", raw.data.as_deref())?,
            },
            "invalid_in" => TestVector::InvalidIn {
                data: require_hex("invalid_in", "data", raw.data.as_deref())?,
            },
            "invalid_out" => TestVector::InvalidOut {
                data: require_hex("invalid_out", "data", raw.data.as_deref())?,
            },
            "encode" => TestVector::Encode {
                input: require_hex("encode", "input", raw.input.as_deref())?,
                output: require_hex("encode", "output", raw.output.as_deref())?,
            },
            "decode" => TestVector::Decode {
                input: require_hex("decode", "input", raw.input.as_deref())?,
            },
            "invalid" => TestVector::Invalid {
                input: require_hex("invalid", "input", raw.input.as_deref())?,
            },
            other => return Err(VectorError::UnknownTestType(other.to_owned())),
        };

        Ok(Self {
            id: raw.id,
            name: raw.name,
            desc: raw.desc,
            tags: raw.tags,
            vector,
        })
    }
}

fn require_hex(
    test_type: &'static str,
    field: &'static str,
    value: Option<&str>,
) -> Result<Vec<u8>, VectorError> {
    let value = value.ok_or(VectorError::MissingField { test_type, field })?;
    hex_decode(value).map_err(|source| VectorError::Hex { field, source })
}

/// Verdict for one test case. `pass` is always serialized (`null` marks a
/// skipped case); `error` and `output` are mutually exclusive diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub pass: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl TestResult {
    #[must_use]
    pub fn passed() -> Self {
        Self {
            pass: Some(true),
            error: None,
            output: None,
        }
    }

    // Passing invalid_* cases record the expected rejection message.
    #[must_use]
    pub fn passed_with_error(error: impl Into<String>) -> Self {
        Self {
            pass: Some(true),
            error: Some(error.into()),
            output: None,
        }
    }

    #[must_use]
    pub fn failed() -> Self {
        Self {
            pass: Some(false),
            error: None,
            output: None,
        }
    }

    #[must_use]
    pub fn failed_with_error(error: impl Into<String>) -> Self {
        Self {
            pass: Some(false),
            error: Some(error.into()),
            output: None,
        }
    }

    #[must_use]
    pub fn failed_with_output(output: &[u8]) -> Self {
        Self {
            pass: Some(false),
            error: None,
            output: Some(hex_encode(output)),
        }
    }

    #[must_use]
    pub fn skipped() -> Self {
        Self {
            pass: None,
            error: None,
            output: None,
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.pass.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub link: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunTally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    pub metadata: RunMetadata,
    pub files: BTreeMap<String, Vec<TestResult>>,
}

impl Results {
    // Skipped cases are counted separately and never enter pass/fail totals.
    #[must_use]
    pub fn tally(&self) -> RunTally {
        let mut tally = RunTally::default();
        for result in self.files.values().flatten() {
            match result.pass {
                Some(true) => tally.passed += 1,
                Some(false) => tally.failed += 1,
                None => tally.skipped += 1,
            }
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{
        HexError, RawTestCase, Results, RunMetadata, TestCase, TestKind, TestResult, TestVector,
        VectorError, hex_decode, hex_encode,
    };

    #[test]
    fn hex_round_trips_lowercase() {
        let bytes = vec![0x00, 0x1f, 0xa5, 0xff];
        let encoded = hex_encode(&bytes);
        assert_eq!(encoded, "001fa5ff");
        assert_eq!(hex_decode(&encoded).expect("decode"), bytes);
    }

    #[test]
    fn hex_decode_accepts_uppercase_and_empty() {
        assert_eq!(hex_decode("A5FF").expect("decode"), vec![0xa5, 0xff]);
        assert_eq!(hex_decode("").expect("decode"), Vec::<u8>::new());
    }

    #[test]
    fn hex_decode_rejects_odd_length_and_bad_digits() {
        assert_eq!(hex_decode("abc").expect_err("odd"), HexError::OddLength(3));
        assert_eq!(
            hex_decode("zz").expect_err("digit"),
            HexError::InvalidDigit('z')
        );
    }

    #[test]
    fn canonical_dialect_parses_with_metadata() {
        let raw: RawTestCase = serde_json::from_str(
            r#"{"type":"roundtrip","data":"8102","id":"array_one","name":"small array","tags":["array"],"desc":"[2]"}"#,
        )
        .expect("raw json");
        let case = TestCase::from_raw(raw).expect("case");
        assert_eq!(case.id.as_deref(), Some("array_one"));
        assert!(case.tags.contains("array"));
        assert_eq!(
            case.vector,
            TestVector::Roundtrip {
                data: vec![0x81, 0x02]
            }
        );
        assert_eq!(case.vector.kind(), TestKind::Roundtrip);
    }

    #[test]
    fn legacy_dialect_splits_input_and_output() {
        let raw: RawTestCase =
            serde_json::from_str(r#"{"type":"encode","input":"1800","output":"00"}"#)
                .expect("raw json");
        let case = TestCase::from_raw(raw).expect("case");
        assert_eq!(
            case.vector,
            TestVector::Encode {
                input: vec![0x18, 0x00],
                output: vec![0x00]
            }
        );
    }

    #[test]
    fn unknown_test_type_is_rejected() {
        let raw = RawTestCase {
            test_type: "bogus".to_owned(),
            data: Some("00".to_owned()),
            ..RawTestCase::default()
        };
        assert_eq!(
            TestCase::from_raw(raw).expect_err("must fail"),
            VectorError::UnknownTestType("bogus".to_owned())
        );
    }

    #[test]
    fn missing_payload_field_is_rejected() {
        let raw = RawTestCase {
            test_type: "encode".to_owned(),
            input: Some("00".to_owned()),
            ..RawTestCase::default()
        };
        let err = TestCase::from_raw(raw).expect_err("must fail");
        assert_eq!(
            err.to_string(),
            "test type 'encode' requires a 'output' field"
        );
    }

    #[test]
    fn malformed_hex_names_the_field() {
        let raw = RawTestCase {
            test_type: "invalid_in".to_owned(),
            data: Some("0".to_owned()),
            ..RawTestCase::default()
        };
        let err = TestCase::from_raw(raw).expect_err("must fail");
        assert!(matches!(err, VectorError::Hex { field: "data", .. }));
    }

    #[test]
    fn result_serialization_omits_absent_diagnostics() {
        let json = serde_json::to_string(&TestResult::passed()).expect("json");
        assert_eq!(json, r#"{"pass":true}"#);

        let json = serde_json::to_string(&TestResult::skipped()).expect("json");
        assert_eq!(json, r#"{"pass":null}"#);

        let json =
            serde_json::to_string(&TestResult::failed_with_output(&[0x00, 0x00])).expect("json");
        assert_eq!(json, r#"{"pass":false,"output":"0000"}"#);

        let json = serde_json::to_string(&TestResult::passed_with_error("rejected")).expect("json");
        assert_eq!(json, r#"{"pass":true,"error":"rejected"}"#);
    }

    #[test]
    fn tally_excludes_skipped_cases() {
        let results = Results {
            metadata: RunMetadata {
                link: "https://example.invalid".to_owned(),
                version: "0.0.0".to_owned(),
            },
            files: [(
                "basic.json".to_owned(),
                vec![
                    TestResult::passed(),
                    TestResult::failed(),
                    TestResult::skipped(),
                ],
            )]
            .into_iter()
            .collect(),
        };
        let tally = results.tally();
        assert_eq!(tally.passed, 1);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.skipped, 1);
    }

    proptest! {
        #[test]
        fn hex_encode_decode_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let encoded = hex_encode(&bytes);
            prop_assert_eq!(hex_decode(&encoded).expect("decode"), bytes);
        }

        #[test]
        fn odd_length_hex_never_decodes(len in (1usize..128).prop_map(|n| n * 2 - 1)) {
            let value = "a".repeat(len);
            prop_assert_eq!(hex_decode(&value).expect_err("odd"), HexError::OddLength(len));
        }
    }
}
