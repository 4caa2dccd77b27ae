//! Request shaping: provider ordering, model resolution and strict-JSON
//! prompt wrapping.

use std::borrow::Cow;

use crate::types::{ProviderId, Task};

/// Instruction prepended to the prompt of every strict-JSON task.
pub const STRICT_JSON_PREAMBLE: &str =
    "SYSTEM: Respond ONLY with valid JSON. No markdown. No explanations.\n\n";

/// Order in which provider slots are tried.
///
/// `[Primary, Secondary]` unless the caller prefers the secondary, in which
/// case the order is reversed.
pub fn provider_order(prefer: Option<ProviderId>) -> [ProviderId; 2] {
    let mut order = [ProviderId::Primary, ProviderId::Secondary];
    if let Some(preferred) = prefer {
        promote_preferred(&mut order, &preferred);
    }
    order
}

/// Move `preferred` to index 0, keeping the relative order of the rest.
/// No-op if `preferred` is absent or already first.
pub(crate) fn promote_preferred<T: PartialEq>(items: &mut [T], preferred: &T) {
    if let Some(idx) = items.iter().position(|p| p == preferred)
        && idx > 0
    {
        items[..=idx].rotate_right(1);
    }
}

/// Model identifier that scopes the cache key.
///
/// An explicit override wins; otherwise the default model of the preferred
/// slot (primary when there is no preference).
pub fn resolve_model<'a>(
    model_override: Option<&'a str>,
    prefer: Option<ProviderId>,
    primary_default: &'a str,
    secondary_default: &'a str,
) -> &'a str {
    match (model_override, prefer) {
        (Some(model), _) => model,
        (None, Some(ProviderId::Secondary)) => secondary_default,
        (None, _) => primary_default,
    }
}

/// Prompt actually sent to providers for `task`.
pub fn outgoing_prompt<'a>(task: &Task, prompt: &'a str) -> Cow<'a, str> {
    if task.is_strict_json() {
        Cow::Owned(format!("{STRICT_JSON_PREAMBLE}{prompt}"))
    } else {
        Cow::Borrowed(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_is_primary_first() {
        assert_eq!(
            provider_order(None),
            [ProviderId::Primary, ProviderId::Secondary]
        );
        assert_eq!(
            provider_order(Some(ProviderId::Primary)),
            [ProviderId::Primary, ProviderId::Secondary]
        );
    }

    #[test]
    fn secondary_preference_reverses_order() {
        assert_eq!(
            provider_order(Some(ProviderId::Secondary)),
            [ProviderId::Secondary, ProviderId::Primary]
        );
    }

    #[test]
    fn promote_preserves_order_of_others() {
        let mut items = ["a", "b", "c", "d"];
        promote_preferred(&mut items, &"c");
        assert_eq!(items, ["c", "a", "b", "d"]);
    }

    #[test]
    fn promote_noop_if_not_found() {
        let mut items = ["a", "b"];
        promote_preferred(&mut items, &"z");
        assert_eq!(items, ["a", "b"]);
    }

    #[test]
    fn override_wins_model_resolution() {
        let model = resolve_model(Some("custom"), Some(ProviderId::Secondary), "p", "s");
        assert_eq!(model, "custom");
    }

    #[test]
    fn preference_picks_default_model() {
        assert_eq!(resolve_model(None, None, "p", "s"), "p");
        assert_eq!(resolve_model(None, Some(ProviderId::Primary), "p", "s"), "p");
        assert_eq!(resolve_model(None, Some(ProviderId::Secondary), "p", "s"), "s");
    }

    #[test]
    fn strict_task_prompt_is_wrapped() {
        let wrapped = outgoing_prompt(&Task::ResumeGeneration, "build my resume");
        assert!(wrapped.starts_with(STRICT_JSON_PREAMBLE));
        assert!(wrapped.ends_with("build my resume"));
    }

    #[test]
    fn general_prompt_is_untouched() {
        let prompt = outgoing_prompt(&Task::General, "hello");
        assert!(matches!(prompt, Cow::Borrowed("hello")));
    }
}
