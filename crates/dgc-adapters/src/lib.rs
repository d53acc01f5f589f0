#![forbid(unsafe_code)]

use ciborium::value::Value as RawCbor;
use dgc_codec::{CodecAdapter, DecodeError, EncodeError};
use ipld_core::ipld::Ipld;

// Must track the serde_ipld_dagcbor pin in the workspace manifest.
const SERDE_IPLD_DAGCBOR_VERSION: &str = "0.6.3";

/// Value shape produced by [`SerdeIpldDagCbor`]: strict decodes land in the
/// IPLD data model, lenient decodes keep the raw CBOR structure so that
/// non-canonical shapes (tags, non-string map keys, NaN floats) survive to
/// the encode probe.
#[derive(Debug, Clone)]
pub enum AdapterValue {
    Strict(Ipld),
    Lenient(RawCbor),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeIpldDagCbor;

impl SerdeIpldDagCbor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CodecAdapter for SerdeIpldDagCbor {
    type Value = AdapterValue;

    fn link(&self) -> &str {
        "https://github.com/ipld/serde_ipld_dagcbor"
    }

    fn version(&self) -> &str {
        SERDE_IPLD_DAGCBOR_VERSION
    }

    fn decode(&self, bytes: &[u8]) -> Result<AdapterValue, DecodeError> {
        serde_ipld_dagcbor::from_slice::<Ipld>(bytes)
            .map(AdapterValue::Strict)
            .map_err(DecodeError::new)
    }

    fn encode(&self, value: &AdapterValue) -> Result<Vec<u8>, EncodeError> {
        match value {
            AdapterValue::Strict(ipld) => {
                serde_ipld_dagcbor::to_vec(ipld).map_err(EncodeError::new)
            }
            AdapterValue::Lenient(raw) => serde_ipld_dagcbor::to_vec(raw).map_err(EncodeError::new),
        }
    }

    fn lenient_decode(&self, bytes: &[u8]) -> Result<AdapterValue, DecodeError> {
        ciborium::de::from_reader::<RawCbor, _>(bytes)
            .map(AdapterValue::Lenient)
            .map_err(DecodeError::new)
    }
}
