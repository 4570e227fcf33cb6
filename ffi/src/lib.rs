//! C-ABI wrapper around `intercom-core`.
//!
//! # Overview
//! Exposes every Intercom operation through `extern "C"` functions so a host
//! written in any language with a C FFI can build authenticated requests,
//! execute them with its own HTTP stack, and decode the responses.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One `intercom_build_*` per operation mirrors the core API 1:1. Parsing
//!   is uniform, so there is a single `intercom_parse_response` plus the
//!   two list variants that reduce a listing to its array.
//! - Payloads go in and come out as JSON text.
//! - The C caller owns all returned pointers and must call the matching
//!   `intercom_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;
use std::str::Utf8Error;

use intercom_core::{ClientConfig, Event, HttpResponse, IntercomClient, ListUsers, SortOrder, Template};
use serde_json::{Map, Value};

use types::*;

/// Borrow a C string as UTF-8. `None` for null or invalid UTF-8.
///
/// The pointer must be null or point at a NUL-terminated string that
/// outlives `'a`.
fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn c_json(ptr: *const c_char) -> Option<Value> {
    c_str(ptr).and_then(|s| serde_json::from_str(s).ok())
}

/// Shared shape of the build functions: null client or failed build → null.
fn build_with(
    client: *const FfiIntercomClient,
    f: impl FnOnce(&IntercomClient) -> Option<intercom_core::HttpRequest>,
) -> *mut FfiHttpRequest {
    catch_unwind(std::panic::AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match f(&client.inner) {
            Some(req) => FfiHttpRequest::from_core(req),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client.
///
/// `endpoint` may be null to use the production API. Returns null if
/// `app_id` or `api_key` is null, or the configuration is invalid.
/// The caller must free the returned pointer with `intercom_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_client_new(
    endpoint: *const c_char,
    app_id: *const c_char,
    api_key: *const c_char,
) -> *mut FfiIntercomClient {
    catch_unwind(|| {
        let (Some(app_id), Some(api_key)) = (c_str(app_id), c_str(api_key)) else {
            return std::ptr::null_mut();
        };
        let mut config = ClientConfig::new(app_id, api_key);
        if let Some(endpoint) = c_str(endpoint) {
            config = config.with_endpoint(endpoint);
        }
        match IntercomClient::new(&config) {
            Ok(inner) => Box::into_raw(Box::new(FfiIntercomClient { inner })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `intercom_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_client_free(client: *mut FfiIntercomClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build `GET admins/`.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `intercom_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_build_list_admins(client: *const FfiIntercomClient) -> *mut FfiHttpRequest {
    build_with(client, |c| Some(c.build_list_admins()))
}

/// Build a user lookup. `identifier` is an email address or a user_id.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_build_get_user(
    client: *const FfiIntercomClient,
    identifier: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| c_str(identifier).map(|id| c.build_get_user(id)))
}

/// Build a user listing.
///
/// `per_page` of 0 leaves the page size to the server. `order` may be null
/// (descending); otherwise it must be `"asc"` or `"desc"` or null is
/// returned.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_build_list_users(
    client: *const FfiIntercomClient,
    page: u32,
    per_page: u32,
    order: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let order = if order.is_null() {
            SortOrder::Desc
        } else {
            match c_str(order)? {
                "asc" => SortOrder::Asc,
                "desc" => SortOrder::Desc,
                _ => return None,
            }
        };
        let mut params = ListUsers::page(page).order(order);
        if per_page > 0 {
            params = params.per_page(per_page);
        }
        Some(c.build_list_users(&params))
    })
}

/// Build `GET segments/<id>`.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_build_get_segment(
    client: *const FfiIntercomClient,
    id: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| c_str(id).map(|id| c.build_get_segment(id)))
}

/// Build a user upsert from a JSON object.
///
/// Returns null if `user_json` is null or not valid JSON.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_build_create_user(
    client: *const FfiIntercomClient,
    user_json: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| c.build_create_user(&c_json(user_json)?).ok())
}

/// Identical to `intercom_build_create_user`.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_build_update_user(
    client: *const FfiIntercomClient,
    user_json: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| c.build_update_user(&c_json(user_json)?).ok())
}

/// Build a user deletion. `identifier` is an email address or a user_id.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_build_delete_user(
    client: *const FfiIntercomClient,
    identifier: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| c_str(identifier).map(|id| c.build_delete_user(id)))
}

/// Build `POST messages/` from a JSON object.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_build_create_conversation(
    client: *const FfiIntercomClient,
    conversation_json: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| c.build_create_conversation(&c_json(conversation_json)?).ok())
}

/// Build an admin-to-user email conversation.
///
/// `template` is `"plain"` or `"personal"`. Returns null if any argument
/// is null or `template` is unknown.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_build_admin_email(
    client: *const FfiIntercomClient,
    subject: *const c_char,
    body: *const c_char,
    template: *const c_char,
    user_id: *const c_char,
    admin_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let template = match c_str(template)? {
            "plain" => Template::Plain,
            "personal" => Template::Personal,
            _ => return None,
        };
        c.build_admin_email(
            c_str(subject)?,
            c_str(body)?,
            template,
            c_str(user_id)?,
            c_str(admin_id)?,
        )
        .ok()
    })
}

/// Build an event submission.
///
/// `metadata_json` may be null (empty metadata); otherwise it must be a
/// JSON object. A `created_at` of 0 or less is replaced with the current
/// time.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_build_create_event(
    client: *const FfiIntercomClient,
    user_id: *const c_char,
    event_name: *const c_char,
    metadata_json: *const c_char,
    created_at: i64,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let metadata = if metadata_json.is_null() {
            Map::new()
        } else {
            match c_json(metadata_json)? {
                Value::Object(map) => map,
                _ => return None,
            }
        };
        let mut event = Event::new(c_str(user_id)?, c_str(event_name)?).metadata(metadata);
        if created_at > 0 {
            event = event.created_at(created_at);
        }
        c.build_create_event(&event).ok()
    })
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
///
/// A null body is empty. A body that is not UTF-8 is an error, never an
/// empty body.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, Utf8Error> {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }.to_str()?.to_string()
    };
    Ok(HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    })
}

fn parse_with(
    client: *const FfiIntercomClient,
    response: *const FfiHttpResponse,
    name: &str,
    f: impl FnOnce(&IntercomClient, HttpResponse) -> intercom_core::ClientResult<intercom_core::ApiResponse>,
) -> *mut FfiIntercomResult {
    catch_unwind(std::panic::AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiIntercomResult::null_arg("client");
        }
        if response.is_null() {
            return FfiIntercomResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let status = resp.status;
        let core = match ffi_response_to_core(resp) {
            Ok(core) => core,
            Err(e) => {
                return FfiIntercomResult::decode(status, format!("HTTP {status}: response body is not UTF-8: {e}"))
            }
        };
        match f(&client.inner, core) {
            Ok(decoded) => FfiIntercomResult::from_response(decoded, status),
            Err(e) => FfiIntercomResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiIntercomResult::panic(&format!("panic in {name}")))
}

/// Decode the response to any `intercom_build_*` request.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_parse_response(
    client: *const FfiIntercomClient,
    response: *const FfiHttpResponse,
) -> *mut FfiIntercomResult {
    parse_with(client, response, "intercom_parse_response", |c, r| c.parse_response(r))
}

/// Decode a list-admins response into the bare `admins` array.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_parse_list_admins(
    client: *const FfiIntercomClient,
    response: *const FfiHttpResponse,
) -> *mut FfiIntercomResult {
    parse_with(client, response, "intercom_parse_list_admins", |c, r| c.parse_list_admins(r))
}

/// Decode a list-users response into the bare `users` array.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_parse_list_users(
    client: *const FfiIntercomClient,
    response: *const FfiHttpResponse,
) -> *mut FfiIntercomResult {
    parse_with(client, response, "intercom_parse_list_users", |c, r| c.parse_list_users(r))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `intercom_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiIntercomResult` returned by any `intercom_parse_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn intercom_free_result(result: *mut FfiIntercomResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.json.is_null() {
            drop(unsafe { CString::from_raw(result.json) });
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
