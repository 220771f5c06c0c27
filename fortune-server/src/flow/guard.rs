//! Loading-screen access guard.
//!
//! The loading screen may only be reached as the direct continuation of the
//! intro button. Each rendered intro carries a one-time token next to the
//! `from_intro` marker; the guard admits a request only while the flow sits
//! on that intro and the token matches. A bookmark, a typed URL, a reload or
//! a replayed request is sent back to the intro, replacing the history entry
//! so the back button cannot return to it.

use crate::routes::util::get_param;

/// Query/form key the intro button attaches to its request.
pub const FROM_INTRO_PARAM: &str = "from_intro";
/// Query/form key carrying the intro's one-time token.
pub const INTRO_TOKEN_PARAM: &str = "intro_token";

/// Marker attached to the intro → loading transition. Never persisted and
/// never part of the pushed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationIntent {
    pub from_intro: bool,
    pub token: Option<u64>,
}

impl NavigationIntent {
    pub fn from_intro(token: u64) -> Self {
        Self {
            from_intro: true,
            token: Some(token),
        }
    }

    /// Read the marker from request parameters; absent when the key is missing.
    pub fn from_params(params: &[(String, String)]) -> Option<Self> {
        get_param(params, FROM_INTRO_PARAM).map(|v| Self {
            from_intro: v == "true",
            token: get_param(params, INTRO_TOKEN_PARAM).and_then(|t| t.parse().ok()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Go to the intro, replacing the current history entry.
    RedirectToIntro,
}

/// `issued` is the token of the intro currently on screen, `None` when the
/// flow is not on the intro.
pub fn guard_loading(intent: Option<NavigationIntent>, issued: Option<u64>) -> GuardDecision {
    match (intent, issued) {
        (
            Some(NavigationIntent {
                from_intro: true,
                token: Some(token),
            }),
            Some(issued),
        ) if token == issued => GuardDecision::Allow,
        _ => GuardDecision::RedirectToIntro,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::util::parse_query;

    #[test]
    fn intro_intent_with_issued_token_is_allowed() {
        assert_eq!(
            guard_loading(Some(NavigationIntent::from_intro(7)), Some(7)),
            GuardDecision::Allow
        );
    }

    #[test]
    fn missing_intent_redirects() {
        assert_eq!(guard_loading(None, Some(7)), GuardDecision::RedirectToIntro);
    }

    #[test]
    fn false_intent_redirects() {
        let intent = NavigationIntent {
            from_intro: false,
            token: Some(7),
        };
        assert_eq!(guard_loading(Some(intent), Some(7)), GuardDecision::RedirectToIntro);
    }

    #[test]
    fn marker_without_token_redirects() {
        let intent = NavigationIntent {
            from_intro: true,
            token: None,
        };
        assert_eq!(guard_loading(Some(intent), Some(7)), GuardDecision::RedirectToIntro);
    }

    #[test]
    fn wrong_token_redirects() {
        assert_eq!(
            guard_loading(Some(NavigationIntent::from_intro(6)), Some(7)),
            GuardDecision::RedirectToIntro
        );
    }

    #[test]
    fn nothing_issued_redirects() {
        assert_eq!(
            guard_loading(Some(NavigationIntent::from_intro(7)), None),
            GuardDecision::RedirectToIntro
        );
    }

    #[test]
    fn intent_from_params() {
        let params = parse_query("?from_intro=true&intro_token=42");
        assert_eq!(
            NavigationIntent::from_params(&params),
            Some(NavigationIntent::from_intro(42))
        );

        let params = parse_query("from_intro=1");
        assert_eq!(
            NavigationIntent::from_params(&params),
            Some(NavigationIntent {
                from_intro: false,
                token: None
            })
        );

        assert_eq!(NavigationIntent::from_params(&parse_query("")), None);
    }
}
