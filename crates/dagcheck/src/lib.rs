#![forbid(unsafe_code)]

pub use dgc_adapters::{AdapterValue, SerdeIpldDagCbor};
pub use dgc_codec::{CodecAdapter, DecodeError, EncodeError};
pub use dgc_harness::{
    FixtureFile, HarnessError, ResultsBuilder, RunConfig, load_fixture_tree, run_case,
    run_case_with_skips, run_harness,
};
pub use dgc_types::{
    HexError, RawTestCase, Results, RunMetadata, RunTally, TestCase, TestKind, TestResult,
    TestVector, VectorError, hex_decode, hex_encode,
};
