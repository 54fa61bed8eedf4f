//! Business error reclassification
//!
//! DataArts answers HTTP 400 both for malformed requests and for resources
//! that no longer exist. The two are told apart by the business error code
//! in the response body, checked against a per-resource list of codes that
//! mean "not found".

use crate::error::Error;
use crate::jsonpath::search_string;
use tracing::debug;

/// Default location of the business error code in an error body
pub const DEFAULT_ERROR_CODE_PATH: &str = "error_code";

/// Status DataArts uses for business errors
const BUSINESS_ERROR_STATUS: u16 = 400;

/// Rewrite a 400 carrying one of `codes` into `Error::ResourceNotFound`
///
/// Anything else, including bodies that are not JSON or have no code at
/// `code_path`, is returned unchanged.
pub fn reclassify<S: AsRef<str>>(err: Error, code_path: &str, codes: &[S]) -> Error {
    reclassify_status(err, BUSINESS_ERROR_STATUS, code_path, codes)
}

/// Same as [`reclassify`] for services that use another status for business errors
pub fn reclassify_status<S: AsRef<str>>(
    err: Error,
    status: u16,
    code_path: &str,
    codes: &[S],
) -> Error {
    let code = match &err {
        Error::HttpStatus { status: actual, body } if *actual == status && !codes.is_empty() => {
            business_code(body, code_path)
        }
        _ => None,
    };

    match (code, err) {
        (Some(code), Error::HttpStatus { body, .. })
            if codes.iter().any(|known| known.as_ref() == code) =>
        {
            debug!(status, code = %code, "Treating business error as not found");
            Error::not_found(code, body)
        }
        (_, err) => err,
    }
}

/// Extract the business error code from a raw error body
pub fn business_code(body: &str, code_path: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    search_string(&parsed, &normalize_code_path(code_path))
}

/// Accept the pipe form `errors|[0].error_code` for nested code lists
fn normalize_code_path(code_path: &str) -> String {
    code_path.replace("|[", "[").replace('|', ".")
}
