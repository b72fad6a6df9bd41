//! FFI bindings for WellnessForge
//!
//! This module provides C-compatible functions for calling the engines from
//! the host app. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `forge_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::{TimeZone, Utc};

use crate::coach::respond;
use crate::pipeline::{briefing_from_json, checked_hour, score_from_json};
use crate::snapshot::{ScoreBoard, ScoreSnapshot};
use crate::types::{MetricsFrame, UserContext};

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

// ============================================================================
// Stateless API
// ============================================================================

/// Compute the wellness score for a metrics frame JSON.
///
/// # Safety
/// - `metrics_json` must be a valid null-terminated C string.
/// - Returns the score (0-100), or -1 on error; call `forge_last_error` for
///   the message.
#[no_mangle]
pub unsafe extern "C" fn forge_score(metrics_json: *const c_char) -> i32 {
    clear_last_error();

    let json_str = match cstr_to_string(metrics_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid metrics string pointer");
            return -1;
        }
    };

    match score_from_json(&json_str) {
        Ok(score) => i32::from(score),
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Build a daily briefing from a briefing request JSON.
///
/// # Safety
/// - `request_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `forge_free_string`.
/// - Returns NULL on error; call `forge_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn forge_briefing(request_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(request_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid request string pointer");
            return ptr::null_mut();
        }
    };

    match briefing_from_json(json_str) {
        Ok(briefing) => string_to_cstr(&briefing),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Answer a chat message immediately. The host animates its own thinking
/// state; no delay is applied here.
///
/// # Safety
/// - `text` and `metrics_json` must be valid null-terminated C strings.
/// - `user_json` may be NULL when no profile exists.
/// - Returns a newly allocated string that must be freed with `forge_free_string`.
/// - Returns NULL on error; call `forge_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn forge_coach_reply(
    text: *const c_char,
    metrics_json: *const c_char,
    user_json: *const c_char,
    hour: i32,
) -> *mut c_char {
    clear_last_error();

    let text_str = match cstr_to_string(text) {
        Some(s) => s,
        None => {
            set_last_error("Invalid text string pointer");
            return ptr::null_mut();
        }
    };

    let metrics_str = match cstr_to_string(metrics_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid metrics string pointer");
            return ptr::null_mut();
        }
    };

    let frame: MetricsFrame = match serde_json::from_str(&metrics_str) {
        Ok(frame) => frame,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let user: Option<UserContext> = match cstr_to_string(user_json) {
        None => None,
        Some(s) => match serde_json::from_str(&s) {
            Ok(user) => Some(user),
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        },
    };

    let hour = match checked_hour(i64::from(hour)) {
        Ok(h) => h,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    string_to_cstr(&respond(&text_str, &frame, user.as_ref(), hour))
}

// ============================================================================
// Score Board API
// ============================================================================

/// Opaque handle to a ScoreBoard
pub struct ScoreBoardHandle {
    board: ScoreBoard,
}

/// Create a new, empty score board.
///
/// # Safety
/// - Returns a pointer to a newly allocated board.
/// - Must be freed with `forge_scoreboard_free`.
#[no_mangle]
pub unsafe extern "C" fn forge_scoreboard_new() -> *mut ScoreBoardHandle {
    clear_last_error();

    let handle = Box::new(ScoreBoardHandle {
        board: ScoreBoard::new(),
    });
    Box::into_raw(handle)
}

/// Free a score board.
///
/// # Safety
/// - `board` must be a valid pointer returned by `forge_scoreboard_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn forge_scoreboard_free(board: *mut ScoreBoardHandle) {
    if !board.is_null() {
        drop(Box::from_raw(board));
    }
}

/// Publish a score stamped with a Unix timestamp (seconds).
///
/// # Safety
/// - `board` must be a valid pointer returned by `forge_scoreboard_new`.
/// - Returns 0 on success, -1 on error; call `forge_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn forge_scoreboard_publish(
    board: *mut ScoreBoardHandle,
    score: i32,
    published_at_unix: i64,
) -> i32 {
    clear_last_error();

    if board.is_null() {
        set_last_error("Null score board pointer");
        return -1;
    }

    let score = match u8::try_from(score) {
        Ok(s) if s <= 100 => s,
        _ => {
            set_last_error("Score must be between 0 and 100");
            return -1;
        }
    };

    let published_at = match Utc.timestamp_opt(published_at_unix, 0).single() {
        Some(at) => at,
        None => {
            set_last_error("Invalid publish timestamp");
            return -1;
        }
    };

    let handle = &*board;
    handle
        .board
        .publish(ScoreSnapshot::new(score, published_at));
    0
}

/// Fetch the latest snapshot as JSON.
///
/// # Safety
/// - `board` must be a valid pointer returned by `forge_scoreboard_new`.
/// - Returns a newly allocated string that must be freed with `forge_free_string`.
/// - Returns NULL when nothing has been published or on error; on error,
///   `forge_last_error` is set.
#[no_mangle]
pub unsafe extern "C" fn forge_scoreboard_latest(board: *mut ScoreBoardHandle) -> *mut c_char {
    clear_last_error();

    if board.is_null() {
        set_last_error("Null score board pointer");
        return ptr::null_mut();
    }

    let handle = &*board;
    match handle.board.latest() {
        Some(snapshot) => match serde_json::to_string(&snapshot) {
            Ok(json) => string_to_cstr(&json),
            Err(e) => {
                set_last_error(&e.to_string());
                ptr::null_mut()
            }
        },
        None => ptr::null_mut(),
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by any forge function.
///
/// # Safety
/// - `s` must be a pointer returned by a forge function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn forge_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to the last error message, or NULL if no error.
/// - The returned pointer is valid until the next forge function call.
/// - Do NOT free this pointer.
#[no_mangle]
pub unsafe extern "C" fn forge_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}
