//! C-compatible mirrors of the `intercom-core` request and result types.
//!
//! # Design
//! Strings become NUL-terminated `*mut c_char`, the header list becomes a
//! pointer plus length, and enums carry explicit discriminants. Decoded
//! values cross as JSON text; the host parses them with its own JSON
//! library.

use std::ffi::CString;
use std::os::raw::c_char;

use intercom_core::{ApiResponse, ClientError, HttpMethod, HttpRequest};

/// Opaque handle to an `IntercomClient`, passed back into every call.
pub struct FfiIntercomClient {
    pub(crate) inner: intercom_core::IntercomClient,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request method. Discriminants are part of the C ABI.
#[repr(C)]
#[derive(Debug)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Delete = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// One request header.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request ready for the host to send.
///
/// Returned by `intercom_build_*`; release with `intercom_free_request`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    /// Null when the request has no body.
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Move `req` onto the heap as C strings. Null on an interior NUL byte.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let Ok(url) = CString::new(req.url) else {
            return std::ptr::null_mut();
        };
        let Ok(body) = req.body.map(CString::new).transpose() else {
            return std::ptr::null_mut();
        };
        let headers: Option<Vec<(CString, CString)>> = req
            .headers
            .into_iter()
            .map(|(k, v)| Some((CString::new(k).ok()?, CString::new(v).ok()?)))
            .collect();
        let Some(headers) = headers else {
            return std::ptr::null_mut();
        };

        let headers_len = headers.len() as u32;
        let headers = if headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: k.into_raw(),
                    value: v.into_raw(),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: url.into_raw(),
            headers,
            headers_len,
            body: body.map_or(std::ptr::null_mut(), CString::into_raw),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input, owned by the host
// ---------------------------------------------------------------------------

/// What the host received: status and body text.
///
/// Only borrowed for the duration of an `intercom_parse_*` call. A null
/// `body` is an empty body.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome codes returned in `FfiIntercomResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    /// The API answered with an `errors` payload; `json` holds it.
    Api = 1,
    Decode = 2,
    Panic = 3,
    NullArg = 4,
    /// The host reported a failure below HTTP.
    Transport = 5,
}

/// Outcome of `intercom_parse_*`; release with `intercom_free_result`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `json` is
/// the decoded value as JSON text (`null` for an empty body).
/// On `Api`, `json` holds the API's `errors` value. On local failures
/// `json` is null and `error_message` describes the problem.
#[repr(C)]
pub struct FfiIntercomResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub json: *mut c_char,
}

fn c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

impl FfiIntercomResult {
    fn boxed(error_code: FfiErrorCode, error_message: *mut c_char, http_status: u16, json: *mut c_char) -> *mut Self {
        Box::into_raw(Box::new(FfiIntercomResult {
            error_code,
            error_message,
            http_status,
            json,
        }))
    }

    /// Build a result from a decoded response.
    pub(crate) fn from_response(response: ApiResponse, http_status: u16) -> *mut Self {
        match response {
            ApiResponse::Success(value) => Self::boxed(
                FfiErrorCode::Ok,
                std::ptr::null_mut(),
                http_status,
                c_string(value.to_string()),
            ),
            ApiResponse::ApiError(errors) => Self::boxed(
                FfiErrorCode::Api,
                c_string("API reported errors".to_string()),
                http_status,
                c_string(errors.to_string()),
            ),
            ApiResponse::TransportError(msg) => {
                Self::boxed(FfiErrorCode::Transport, c_string(msg), http_status, std::ptr::null_mut())
            }
        }
    }

    /// Build an error result from a `ClientError`.
    pub(crate) fn from_error(err: ClientError) -> *mut Self {
        let http_status = match &err {
            ClientError::Decode { status, .. } => *status,
            _ => 0,
        };
        Self::boxed(
            FfiErrorCode::Decode,
            c_string(err.to_string()),
            http_status,
            std::ptr::null_mut(),
        )
    }

    /// A body that cannot be read as text, reported with its HTTP status.
    pub(crate) fn decode(http_status: u16, msg: String) -> *mut Self {
        Self::boxed(FfiErrorCode::Decode, c_string(msg), http_status, std::ptr::null_mut())
    }

    /// A required pointer argument was null.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            c_string(format!("null argument: {name}")),
            0,
            std::ptr::null_mut(),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, c_string(msg.to_string()), 0, std::ptr::null_mut())
    }
}
