#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use dgc_codec::CodecAdapter;
use dgc_types::{
    RawTestCase, Results, RunMetadata, TestCase, TestResult, TestVector, VectorError, hex_encode,
};
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub fixture_root: PathBuf,
    pub skip: BTreeSet<String>,
}

impl RunConfig {
    #[must_use]
    pub fn default_paths() -> Self {
        Self {
            fixture_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/cbor"),
            skip: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_fixture_root(root: impl Into<PathBuf>) -> Self {
        Self {
            fixture_root: root.into(),
            skip: BTreeSet::new(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::default_paths()
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("fixture {path} is not valid JSON: {source}")]
    FixtureJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("fixture {path} case {index}: {source}")]
    FixtureFormat {
        path: PathBuf,
        index: usize,
        source: VectorError,
    },
    #[error("duplicate fixture file name '{0}'")]
    DuplicateFixtureFile(String),
    #[error("unrecognized codec selector '{0}'")]
    UnknownCodec(String),
    #[error("lenient decode rejected invalid_out payload {data_hex}: {message}")]
    LenientSourceRejected { data_hex: String, message: String },
}

impl HarnessError {
    fn fixture_json(path: &Path, source: serde_json::Error) -> Self {
        Self::FixtureJson {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFile {
    pub name: String,
    pub path: PathBuf,
    pub cases: Vec<TestCase>,
}

/// Walks `root` recursively and loads every `*.json` file as an ordered list
/// of test cases. Non-JSON files are ignored; anything else that goes wrong
/// (unreadable directory, bad JSON, bad hex, unknown test type, duplicate
/// base file name) aborts the run.
pub fn load_fixture_tree(root: &Path) -> Result<Vec<FixtureFile>, HarnessError> {
    let paths = list_fixture_files(root)?;

    #[cfg(feature = "tracing")]
    debug!(root = %root.display(), files = paths.len(), "discovered fixture files");

    let mut seen = BTreeSet::new();
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = load_fixture_file(&path)?;
        if !seen.insert(file.name.clone()) {
            return Err(HarnessError::DuplicateFixtureFile(file.name));
        }
        files.push(file);
    }
    Ok(files)
}

fn list_fixture_files(root: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(current) = stack.pop() {
        for entry in fs::read_dir(current)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn load_fixture_file(path: &Path) -> Result<FixtureFile, HarnessError> {
    let body = fs::read_to_string(path)?;
    let raw: Vec<RawTestCase> =
        serde_json::from_str(&body).map_err(|source| HarnessError::fixture_json(path, source))?;

    let mut cases = Vec::with_capacity(raw.len());
    for (index, raw_case) in raw.into_iter().enumerate() {
        let case = TestCase::from_raw(raw_case).map_err(|source| HarnessError::FixtureFormat {
            path: path.to_path_buf(),
            index,
            source,
        })?;
        cases.push(case);
    }

    Ok(FixtureFile {
        name: fixture_name(path),
        path: path.to_path_buf(),
        cases,
    })
}

fn fixture_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Runs one test vector against the codec. Pure: the verdict depends only on
/// the vector and the adapter's observable behavior. The single fatal escape
/// is an `invalid_out` payload the lenient decoder itself rejects, which
/// means the fixture's premise is broken rather than the codec.
pub fn run_case<C: CodecAdapter>(codec: &C, vector: &TestVector) -> Result<TestResult, HarnessError> {
    let result = match vector {
        TestVector::Roundtrip { data } => roundtrip_outcome(codec, data, data),
        TestVector::Decode { input } => roundtrip_outcome(codec, input, input),
        TestVector::Encode { input, output } => match codec.lenient_decode(input) {
            Ok(value) => match codec.encode(&value) {
                Ok(out) if out == *output => TestResult::passed(),
                Ok(out) => TestResult::failed_with_output(&out),
                Err(err) => TestResult::failed_with_error(err.to_string()),
            },
            Err(err) => TestResult::failed_with_error(err.to_string()),
        },
        TestVector::InvalidIn { data } | TestVector::Invalid { input: data } => {
            match codec.decode(data) {
                Ok(_) => TestResult::failed(),
                Err(err) => TestResult::passed_with_error(err.to_string()),
            }
        }
        TestVector::InvalidOut { data } => {
            let value =
                codec
                    .lenient_decode(data)
                    .map_err(|err| HarnessError::LenientSourceRejected {
                        data_hex: hex_encode(data),
                        message: err.to_string(),
                    })?;
            match codec.encode(&value) {
                Ok(_) => TestResult::failed(),
                Err(err) => TestResult::passed_with_error(err.to_string()),
            }
        }
    };
    Ok(result)
}

fn roundtrip_outcome<C: CodecAdapter>(codec: &C, input: &[u8], expected: &[u8]) -> TestResult {
    let value = match codec.decode(input) {
        Ok(value) => value,
        Err(err) => return TestResult::failed_with_error(err.to_string()),
    };
    match codec.encode(&value) {
        Ok(out) if out.as_slice() == expected => TestResult::passed(),
        Ok(out) => TestResult::failed_with_output(&out),
        Err(err) => TestResult::failed_with_error(err.to_string()),
    }
}

/// Skip-aware wrapper: a case whose `id` is in the skip set is recorded as
/// `pass: null` without ever invoking the codec.
pub fn run_case_with_skips<C: CodecAdapter>(
    codec: &C,
    case: &TestCase,
    skip: &BTreeSet<String>,
) -> Result<TestResult, HarnessError> {
    if case.id.as_ref().is_some_and(|id| skip.contains(id)) {
        return Ok(TestResult::skipped());
    }
    run_case(codec, &case.vector)
}

#[derive(Debug, Clone)]
pub struct ResultsBuilder {
    metadata: RunMetadata,
    files: BTreeMap<String, Vec<TestResult>>,
}

impl ResultsBuilder {
    #[must_use]
    pub fn new(metadata: RunMetadata) -> Self {
        Self {
            metadata,
            files: BTreeMap::new(),
        }
    }

    // One result list per file key; a second record for the same key is
    // refused, never merged.
    pub fn record_file(
        &mut self,
        name: String,
        results: Vec<TestResult>,
    ) -> Result<(), HarnessError> {
        if self.files.contains_key(&name) {
            return Err(HarnessError::DuplicateFixtureFile(name));
        }
        self.files.insert(name, results);
        Ok(())
    }

    #[must_use]
    pub fn finish(self) -> Results {
        Results {
            metadata: self.metadata,
            files: self.files,
        }
    }
}

/// Full run: load the fixture tree, execute every case in file-array order,
/// and assemble the Results document. Position `i` of each file's result
/// list is the verdict for case `i` of that file.
pub fn run_harness<C: CodecAdapter>(
    codec: &C,
    config: &RunConfig,
) -> Result<Results, HarnessError> {
    let files = load_fixture_tree(&config.fixture_root)?;
    let metadata = RunMetadata {
        link: codec.link().to_owned(),
        version: codec.version().to_owned(),
    };

    let mut builder = ResultsBuilder::new(metadata);
    for file in &files {
        let mut results = Vec::with_capacity(file.cases.len());
        for case in &file.cases {
            results.push(run_case_with_skips(codec, case, &config.skip)?);
        }

        #[cfg(feature = "tracing")]
        debug!(file = %file.name, cases = results.len(), "executed fixture file");

        builder.record_file(file.name.clone(), results)?;
    }
    Ok(builder.finish())
}
