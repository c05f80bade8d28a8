//! Response envelope wrapped around every machine-readable payload.
//!
//! Both hosts emit the same shape: `{meta, data, errors}`. `meta` records who
//! asked (`request_id`, optional `trace_id`), which providers answered and how
//! long the render took.

use serde::{Deserialize, Serialize};

use crate::{ProviderId, UtcDateTime, ValidationError};

/// Envelope schema version emitted by this build.
pub const SCHEMA_VERSION: &str = "v1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data,
            errors: Vec::new(),
        }
    }

    /// Envelope carrying a failure; `data` is usually `()` or an empty payload.
    pub fn failure(meta: EnvelopeMeta, data: T, error: EnvelopeError) -> Result<Self, ValidationError> {
        error.validate()?;
        Ok(Self {
            meta,
            data,
            errors: vec![error],
        })
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    pub source_chain: Vec<ProviderId>,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        source_chain: Vec<ProviderId>,
        latency_ms: u64,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            trace_id: None,
            schema_version: SCHEMA_VERSION.to_owned(),
            generated_at: UtcDateTime::now(),
            source_chain,
            latency_ms,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Result<Self, ValidationError> {
        let trace_id = trace_id.into();
        if !is_valid_trace_id(&trace_id) {
            return Err(ValidationError::InvalidTraceId);
        }
        self.trace_id = Some(trace_id);
        Ok(self)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().len() < 8 {
            return Err(ValidationError::InvalidRequestId);
        }
        if let Some(trace_id) = &self.trace_id {
            if !is_valid_trace_id(trace_id) {
                return Err(ValidationError::InvalidTraceId);
            }
        }
        if !is_valid_schema_version(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }
        if self.source_chain.is_empty() {
            return Err(ValidationError::EmptySourceChain);
        }
        Ok(())
    }
}

/// Structured error entry, `code` is a stable dotted identifier such as
/// `source.not_found`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ProviderId>,
}

impl EnvelopeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Result<Self, ValidationError> {
        let error = Self {
            code: code.into(),
            message: message.into(),
            source: None,
        };
        error.validate()?;
        Ok(error)
    }

    pub fn with_source(mut self, source: ProviderId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyErrorCode);
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyErrorMessage);
        }
        Ok(())
    }
}

fn is_valid_schema_version(value: &str) -> bool {
    let Some(version) = value.strip_prefix('v') else {
        return false;
    };
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
}

fn is_valid_trace_id(value: &str) -> bool {
    value.len() == 32
        && value.chars().all(|ch| ch.is_ascii_hexdigit())
        && value.chars().any(|ch| ch != '0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_meta_uses_current_schema() {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Fixture], 4)
            .expect("meta should be valid");
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn empty_source_chain_is_rejected() {
        let err = EnvelopeMeta::new("request-12345", Vec::new(), 0).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySourceChain);
    }

    #[test]
    fn short_request_id_is_rejected() {
        let err = EnvelopeMeta::new("abc", vec![ProviderId::Yahoo], 0).expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidRequestId);
    }

    #[test]
    fn trace_id_must_be_hex() {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Yahoo], 1).expect("meta");
        let err = meta.with_trace_id("not-a-trace-id").expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidTraceId);
    }

    #[test]
    fn failure_envelope_serializes_errors() {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Fixture], 2).expect("meta");
        let error = EnvelopeError::new("source.not_found", "no such symbol").expect("error");
        let envelope = Envelope::failure(meta, (), error).expect("envelope");

        assert!(!envelope.is_success());
        let json = serde_json::to_value(&envelope).expect("json");
        assert_eq!(json["errors"][0]["code"], "source.not_found");
    }

    #[test]
    fn blank_error_message_is_rejected() {
        let err = EnvelopeError::new("x.y", "  ").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyErrorMessage);
    }
}
