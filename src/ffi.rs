//! FFI bindings for Surfcast
//!
//! This module provides C-compatible functions for calling Surfcast from other
//! languages. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using
//! `surfcast_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::alerts::AlertProfile;
use crate::pipeline::SurfAnalyzer;
use crate::schema::SpotForecastDocument;
use crate::scorer::SurfPreferences;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Parse preferences JSON; a null pointer selects the defaults
unsafe fn prefs_from_ptr(prefs_json: *const c_char) -> Result<SurfPreferences, String> {
    if prefs_json.is_null() {
        return Ok(SurfPreferences::default());
    }
    let json = match cstr_to_string(prefs_json) {
        Some(s) => s,
        None => return Err("Invalid preferences string pointer".to_string()),
    };
    serde_json::from_str(&json).map_err(|e| format!("Invalid preferences JSON: {e}"))
}

/// Parse an optional alert profile; a null pointer means no profile
unsafe fn profile_from_ptr(profile_json: *const c_char) -> Result<Option<AlertProfile>, String> {
    if profile_json.is_null() {
        return Ok(None);
    }
    let json = match cstr_to_string(profile_json) {
        Some(s) => s,
        None => return Err("Invalid alert profile string pointer".to_string()),
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| format!("Invalid alert profile JSON: {e}"))
}

fn analyze_to_cstr(
    analyzer: &SurfAnalyzer,
    forecast_json: &str,
    profile: Option<&AlertProfile>,
) -> *mut c_char {
    let doc = match SpotForecastDocument::parse_json(forecast_json) {
        Ok(doc) => doc,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let report = analyzer.analyze(&doc.into_forecast(), profile);
    match report.to_json() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Analyze a surf.spot_forecast.v1 document and return a surf.report.v1 JSON
/// string.
///
/// # Safety
/// - `forecast_json` must be a valid null-terminated C string.
/// - `prefs_json` may be NULL (default preferences) or a valid
///   null-terminated C string with a preferences document.
/// - `profile_json` may be NULL (no alert profile) or a valid
///   null-terminated C string with an alert profile document.
/// - Returns a newly allocated string that must be freed with
///   `surfcast_free_string`.
/// - Returns NULL on error; call `surfcast_last_error` to get the message.
#[no_mangle]
pub unsafe extern "C" fn surfcast_analyze_spot(
    forecast_json: *const c_char,
    prefs_json: *const c_char,
    profile_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let forecast_str = match cstr_to_string(forecast_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid forecast string pointer");
            return ptr::null_mut();
        }
    };

    let prefs = match prefs_from_ptr(prefs_json) {
        Ok(p) => p,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    let profile = match profile_from_ptr(profile_json) {
        Ok(p) => p,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    let analyzer = SurfAnalyzer::new(prefs);
    analyze_to_cstr(&analyzer, &forecast_str, profile.as_ref())
}

// ============================================================================
// Stateful Analyzer API
// ============================================================================

/// Opaque handle to a SurfAnalyzer
pub struct SurfAnalyzerHandle {
    analyzer: SurfAnalyzer,
}

/// Create a new SurfAnalyzer with the given preferences.
///
/// # Safety
/// - `prefs_json` may be NULL (default preferences) or a valid
///   null-terminated C string with a preferences document.
/// - Returns a pointer to a newly allocated SurfAnalyzer.
/// - Must be freed with `surfcast_analyzer_free`.
/// - Returns NULL on error; call `surfcast_last_error` to get the message.
#[no_mangle]
pub unsafe extern "C" fn surfcast_analyzer_new(
    prefs_json: *const c_char,
) -> *mut SurfAnalyzerHandle {
    clear_last_error();

    let prefs = match prefs_from_ptr(prefs_json) {
        Ok(p) => p,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    let handle = Box::new(SurfAnalyzerHandle {
        analyzer: SurfAnalyzer::new(prefs),
    });
    Box::into_raw(handle)
}

/// Free a SurfAnalyzer.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `surfcast_analyzer_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn surfcast_analyzer_free(analyzer: *mut SurfAnalyzerHandle) {
    if !analyzer.is_null() {
        drop(Box::from_raw(analyzer));
    }
}

/// Analyze a forecast with a stateful analyzer.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `surfcast_analyzer_new`.
/// - `forecast_json` must be a valid null-terminated C string.
/// - `profile_json` may be NULL (no alert profile) or a valid
///   null-terminated C string with an alert profile document.
/// - Returns a newly allocated string that must be freed with
///   `surfcast_free_string`.
/// - Returns NULL on error; call `surfcast_last_error` to get the message.
#[no_mangle]
pub unsafe extern "C" fn surfcast_analyzer_analyze(
    analyzer: *mut SurfAnalyzerHandle,
    forecast_json: *const c_char,
    profile_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if analyzer.is_null() {
        set_last_error("Null analyzer pointer");
        return ptr::null_mut();
    }

    let handle = &*analyzer;

    let forecast_str = match cstr_to_string(forecast_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid forecast string pointer");
            return ptr::null_mut();
        }
    };

    let profile = match profile_from_ptr(profile_json) {
        Ok(p) => p,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    analyze_to_cstr(&handle.analyzer, &forecast_str, profile.as_ref())
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Surfcast functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Surfcast function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn surfcast_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Surfcast function call on
///   this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn surfcast_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Surfcast library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn surfcast_version() -> *const c_char {
    // Use a static CString to avoid allocation
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_forecast_json() -> CString {
        CString::new(
            r#"{
            "schemaVersion": "surf.spot_forecast.v1",
            "spotId": "mavericks",
            "name": "Mavericks",
            "slots": [
                {
                    "dayKey": "2025-06-01",
                    "offsetHours": 9,
                    "dayPart": "morning",
                    "waveHeightM": 1.4,
                    "windSpeedKmh": 8.0,
                    "windDirectionDeg": 90.0,
                    "swellPeriodS": 12.0
                },
                {
                    "dayKey": "2025-06-01",
                    "offsetHours": 15,
                    "dayPart": "afternoon",
                    "waveHeightM": 1.2,
                    "windSpeedKmh": 14.0,
                    "swellPeriodS": 11.0
                }
            ]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_analyze_spot() {
        let forecast = sample_forecast_json();

        unsafe {
            let result = surfcast_analyze_spot(forecast.as_ptr(), ptr::null(), ptr::null());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("surf.report.v1"));
            assert!(result_str.contains("mavericks"));

            surfcast_free_string(result);
        }
    }

    #[test]
    fn test_ffi_analyze_spot_with_prefs_and_profile() {
        let forecast = sample_forecast_json();
        let prefs = CString::new(
            r#"{"minWaveHeightM": 1.0, "maxWaveHeightM": 2.0, "maxWindSpeedKmh": 25.0}"#,
        )
        .unwrap();
        let profile =
            CString::new(r#"{"spotId": "mavericks", "minRatingBucket": "fair"}"#).unwrap();

        unsafe {
            let result = surfcast_analyze_spot(forecast.as_ptr(), prefs.as_ptr(), profile.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("\"alerts\""));
            assert!(result_str.contains("2025-06-01"));

            surfcast_free_string(result);
        }
    }

    #[test]
    fn test_ffi_analyzer_lifecycle() {
        unsafe {
            let analyzer = surfcast_analyzer_new(ptr::null());
            assert!(!analyzer.is_null());

            let forecast = sample_forecast_json();
            let result = surfcast_analyzer_analyze(analyzer, forecast.as_ptr(), ptr::null());
            assert!(!result.is_null());
            surfcast_free_string(result);

            surfcast_analyzer_free(analyzer);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let invalid = CString::new("not json").unwrap();
            let result = surfcast_analyze_spot(invalid.as_ptr(), ptr::null(), ptr::null());
            assert!(result.is_null());

            let error = surfcast_last_error();
            assert!(!error.is_null());

            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(!error_str.is_empty());
        }
    }

    #[test]
    fn test_ffi_null_forecast_pointer() {
        unsafe {
            let result = surfcast_analyze_spot(ptr::null(), ptr::null(), ptr::null());
            assert!(result.is_null());
            assert!(!surfcast_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = surfcast_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
