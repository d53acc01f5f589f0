#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::path::PathBuf;

use dgc_adapters::SerdeIpldDagCbor;
use dgc_harness::{HarnessError, RunConfig, run_harness};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut codec_token: Option<String> = None;
    let mut fixture_root: Option<PathBuf> = None;
    let mut skip = BTreeSet::new();
    let mut pretty = false;
    let mut bare = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fixtures" => {
                let value = args.next().ok_or("--fixtures requires a directory")?;
                fixture_root = Some(PathBuf::from(value));
            }
            "--skip" => {
                let value = args.next().ok_or("--skip requires a test id")?;
                skip.insert(value);
            }
            "--pretty" => {
                pretty = true;
            }
            "--bare" => {
                bare = true;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown argument: {other}").into());
            }
            other => {
                if codec_token.is_some() {
                    return Err(format!("unexpected extra argument: {other}").into());
                }
                codec_token = Some(other.to_owned());
            }
        }
    }

    let token =
        codec_token.ok_or("a codec selector is required (e.g. serde-ipld-dagcbor)")?;

    let mut config = RunConfig::default_paths();
    if let Some(root) = fixture_root {
        config.fixture_root = root;
    }
    config.skip = skip;

    let results = match token.as_str() {
        "serde-ipld-dagcbor" => run_harness(&SerdeIpldDagCbor::new(), &config)?,
        _ => return Err(HarnessError::UnknownCodec(token).into()),
    };

    let rendered = match (bare, pretty) {
        (true, true) => serde_json::to_string_pretty(&results.files)?,
        (true, false) => serde_json::to_string(&results.files)?,
        (false, true) => serde_json::to_string_pretty(&results)?,
        (false, false) => serde_json::to_string(&results)?,
    };
    println!("{rendered}");

    let tally = results.tally();
    eprintln!(
        "codec={token} files={} passed={} failed={} skipped={}",
        results.files.len(),
        tally.passed,
        tally.failed,
        tally.skipped
    );

    Ok(())
}

fn print_help() {
    println!(
        "dagcheck-cli\n\
         Usage:\n\
         \tdagcheck-cli <codec> [--fixtures <dir>] [--skip <id>]... [--pretty] [--bare]\n\
         Codecs:\n\
         \tserde-ipld-dagcbor   serde_ipld_dagcbor strict + ciborium lenient\n\
         Options:\n\
         \t--fixtures <dir>     Fixture root directory (default: bundled fixtures/cbor)\n\
         \t--skip <id>          Skip the test case with this id (repeatable)\n\
         \t--pretty             Pretty-print the Results document\n\
         \t--bare               Emit the files map without run metadata (legacy form)\n\
         \t-h, --help           Show this help"
    );
}
