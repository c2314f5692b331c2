//! # Moderation Response Interpreter
//!
//! Classifies a raw create-post response into a [`ModerationOutcome`].
//!
//! The backend has signaled rejection two ways over its lifetime: a body
//! sentinel on a 2xx response, and later a plain HTTP 403. Both signals are
//! live simultaneously (which one a client observes depends on the backend
//! version), so both are recognized here and neither is ever treated as
//! success.

use domains::{ApiResponse, ModerationOutcome};

/// Legacy body sentinel marking flagged content on an otherwise successful
/// response. The match is exact: a bare "yes" without the trailing newline
/// is not the sentinel.
const FLAGGED_SENTINEL: &str = "yes\n";

/// Classification rules, first match wins:
/// 1. 403 → `Forbidden`, regardless of body.
/// 2. 2xx with the exact sentinel body → `FlaggedContent`.
/// 3. 2xx declaring a non-JSON content type → `Failed`. An absent content
///    type is treated as JSON.
/// 4. 2xx with a JSON body → `Accepted` (posts attached by the caller).
/// 5. 2xx with an unparseable body → `Failed`.
/// 6. Anything else → `Failed` carrying status and raw text.
pub fn interpret(status: u16, content_type: Option<&str>, body: &str) -> ModerationOutcome {
    if status == 403 {
        return ModerationOutcome::Forbidden;
    }

    if (200..=299).contains(&status) {
        if body == FLAGGED_SENTINEL {
            return ModerationOutcome::FlaggedContent;
        }
        if let Some(ct) = content_type {
            if !ct.contains("application/json") {
                return ModerationOutcome::Failed {
                    message: format!("unexpected response format: {ct}"),
                };
            }
        }
        return match serde_json::from_str::<serde_json::Value>(body) {
            Ok(_) => ModerationOutcome::Accepted { posts: Vec::new() },
            Err(err) => ModerationOutcome::Failed {
                message: format!("unexpected response shape ({status}): {err}"),
            },
        };
    }

    ModerationOutcome::Failed {
        message: format!("request failed: {status} - {body}"),
    }
}

/// Convenience wrapper over a raw [`ApiResponse`].
pub fn interpret_response(response: &ApiResponse) -> ModerationOutcome {
    interpret(response.status, response.content_type.as_deref(), &response.body)
}
