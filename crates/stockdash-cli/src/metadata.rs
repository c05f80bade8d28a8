use std::fmt::{Display, Formatter};

use stockdash_core::{EnvelopeMeta, ProviderId, ValidationError};
use uuid::Uuid;

/// Request identifier (UUID v4) for one CLI invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// W3C-style 16-byte hex trace id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId(String);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Envelope metadata for a finished command.
pub fn envelope_meta(
    source_chain: Vec<ProviderId>,
    latency_ms: u64,
    warnings: Vec<String>,
) -> Result<EnvelopeMeta, ValidationError> {
    let mut meta = EnvelopeMeta::new(RequestId::new_v4().to_string(), source_chain, latency_ms)?
        .with_trace_id(TraceId::new().as_str())?;
    for warning in warnings {
        meta.push_warning(warning);
    }
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_is_uuid_v4() {
        let request_id = RequestId::new_v4();
        assert_eq!(request_id.0.get_version_num(), 4);
    }

    #[test]
    fn meta_carries_ids_and_warnings() {
        let meta = envelope_meta(vec![ProviderId::Fixture], 12, vec!["offline".into()])
            .expect("valid metadata");

        assert_eq!(meta.trace_id.as_deref().map(str::len), Some(32));
        assert_eq!(meta.request_id.len(), 36);
        assert_eq!(meta.warnings, ["offline"]);
        assert_eq!(meta.latency_ms, 12);
    }

    #[test]
    fn empty_source_chain_is_rejected() {
        assert!(envelope_meta(Vec::new(), 0, Vec::new()).is_err());
    }
}
