use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    error::{ApiError, NetworkError},
    logger::Logger,
    ManapoolError, Result,
};

/// Reads the body and decodes it into `T`.
///
/// `Ok(None)` means a 2xx response with an empty body.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    logger: &dyn Logger,
) -> Result<Option<T>> {
    let (status, body) = read_body(response, logger).await?;
    decode_body(status, &body)
}

/// Reads the body and only checks the status.
pub(crate) async fn decode_empty(response: reqwest::Response, logger: &dyn Logger) -> Result<()> {
    let (status, body) = read_body(response, logger).await?;
    check_status(status, &body)
}

async fn read_body(response: reqwest::Response, logger: &dyn Logger) -> Result<(u16, Vec<u8>)> {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|err| NetworkError::new("failed to read response body", err))?
        .to_vec();

    logger.debug(format_args!(
        "API response: status={status}, body={}",
        String::from_utf8_lossy(&body)
    ));

    Ok((status, body))
}

pub(crate) fn decode_body<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<Option<T>> {
    check_status(status, body)?;
    if body.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(ManapoolError::Decode)
}

pub(crate) fn check_status(status: u16, body: &[u8]) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    Err(ApiError::new(status, error_message(body)).into())
}

/// Prefers the `error`, then `message`, string of a JSON object body and
/// falls back to the raw body.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Map<String, Value>>(body)
        .ok()
        .and_then(|envelope| {
            ["error", "message"].into_iter().find_map(|key| {
                envelope
                    .get(key)
                    .and_then(Value::as_str)
                    .filter(|message| !message.is_empty())
                    .map(str::to_owned)
            })
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
