use shared_types::RequestId;
use time::{Duration, OffsetDateTime};

use crate::config::ResponseProcessingConfig;
use crate::proto::dss::{
    ResultWire, SignRequestWire, SignResponseWire, RESULT_MAJOR_SUCCESS, RESULT_MINOR_USER_CANCEL,
};
use crate::proto::version::ProtocolVersion;
use crate::service::error::{ProtocolError, SignResponseError};

use super::SignResponseProcessingParameters;

/// Thresholds effective for one processing call, after applying per-call
/// overrides to the policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ResolvedProcessingThresholds {
    pub max_response_age: Duration,
    pub allowed_clock_skew: Duration,
    pub max_processing_time: Duration,
    pub strict_processing: bool,
}

pub(super) fn resolve_thresholds(
    config: &ResponseProcessingConfig,
    parameters: &SignResponseProcessingParameters,
) -> ResolvedProcessingThresholds {
    ResolvedProcessingThresholds {
        max_response_age: parameters.max_response_age.unwrap_or(config.max_response_age),
        allowed_clock_skew: parameters
            .allowed_clock_skew
            .unwrap_or(config.allowed_clock_skew),
        max_processing_time: parameters
            .max_processing_time
            .unwrap_or(config.max_processing_time),
        strict_processing: parameters
            .strict_processing
            .unwrap_or(config.strict_processing),
    }
}

/// Dispatches on the response result: success continues processing, a
/// user cancellation and remote errors terminate it.
pub(super) fn validate_result(
    result: Option<&ResultWire>,
    request_id: &RequestId,
) -> Result<(), SignResponseError> {
    let result = result.ok_or_else(|| SignResponseError::Protocol {
        request_id: request_id.clone(),
        source: ProtocolError::MissingResult,
    })?;

    if result.major == RESULT_MAJOR_SUCCESS {
        return Ok(());
    }

    if result.minor.as_deref() == Some(RESULT_MINOR_USER_CANCEL) {
        return Err(SignResponseError::Cancelled {
            request_id: request_id.clone(),
            message: result.message.clone(),
        });
    }

    Err(SignResponseError::RemoteError {
        request_id: request_id.clone(),
        major: result.major.clone(),
        minor: result.minor.clone(),
        message: result.message.clone(),
    })
}

/// The response must declare exactly the version the request was issued
/// under; an absent version field on either side means the base version.
pub(super) fn validate_version(
    request: &SignRequestWire,
    response: &SignResponseWire,
) -> Result<(), ProtocolError> {
    let request_version = parse_version(request.version.as_deref())?;
    let response_version = parse_version(response.version.as_deref())?;

    if request_version != response_version {
        return Err(ProtocolError::VersionMismatch {
            request: request_version.to_string(),
            response: response_version.to_string(),
        });
    }

    Ok(())
}

fn parse_version(version: Option<&str>) -> Result<ProtocolVersion, ProtocolError> {
    match version {
        None => Ok(ProtocolVersion::base()),
        Some(version) => version.parse().map_err(|_| {
            ProtocolError::InvalidResponse(format!("unparseable version `{version}`"))
        }),
    }
}

/// Freshness checks on the response. Clock skew is granted only where the
/// remote clock is compared against ours; the processing-time bound compares
/// two local timestamps and gets none.
pub(super) fn validate_timing(
    response_time: OffsetDateTime,
    request_time: OffsetDateTime,
    now: OffsetDateTime,
    thresholds: &ResolvedProcessingThresholds,
) -> Result<(), ProtocolError> {
    let age = now - response_time;
    if age - thresholds.allowed_clock_skew > thresholds.max_response_age {
        return Err(ProtocolError::StaleResponse {
            age_seconds: age.whole_seconds(),
            allowed_seconds: thresholds.max_response_age.whole_seconds(),
        });
    }

    if response_time - thresholds.allowed_clock_skew > now {
        return Err(ProtocolError::NotYetValid);
    }

    let elapsed = now - request_time;
    if elapsed > thresholds.max_processing_time {
        return Err(ProtocolError::ProcessingTimeExceeded {
            elapsed_seconds: elapsed.whole_seconds(),
            allowed_seconds: thresholds.max_processing_time.whole_seconds(),
        });
    }

    Ok(())
}
