//! Dynamic file-name templates
//!
//! When none of a layer's rules match, its `dynamic_file` template is
//! expanded into a file name from live state. Recognized patterns:
//!
//! | Pattern          | Expands to                                          |
//! |------------------|-----------------------------------------------------|
//! | `{hp:a,b,...}`   | bucket index of the HP percentage                   |
//! | `{stateId}`      | highest-priority visible status effect id, else `0` |
//! | `{switch:N}`     | `1` / `0`                                           |
//! | `{variable:N}`   | string value of variable N                          |
//! | `{action}`       | `1` while acting, else `0`                          |
//! | `{damage}`       | `1` inside the damage window, else `0`              |
//! | `{note}`         | first non-empty inherited note value                |
//!
//! Patterns are disjoint and matched case-insensitively; anything that is
//! not a recognized pattern is copied through verbatim.

use crate::rules::EvalContext;

/// Expand every recognized `{...}` pattern in `template`.
pub fn expand(template: &str, ctx: &EvalContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let (head, tail) = rest.split_at(start);
        out.push_str(head);
        let Some(end) = tail.find('}') else {
            // Unterminated brace: keep the remainder as-is
            out.push_str(tail);
            return out;
        };
        match expand_pattern(&tail[1..end], ctx) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    out
}

fn expand_pattern(inner: &str, ctx: &EvalContext) -> Option<String> {
    let lower = inner.to_ascii_lowercase();

    if let Some(args) = lower.strip_prefix("hp:") {
        return Some(hp_bucket(args, ctx.actor.hp_percent()).to_string());
    }
    if let Some(id) = lower.strip_prefix("switch:") {
        let id: u32 = id.trim().parse().ok()?;
        return Some(if ctx.game.switch(id) { "1" } else { "0" }.to_string());
    }
    if let Some(id) = lower.strip_prefix("variable:") {
        let id: u32 = id.trim().parse().ok()?;
        return Some(ctx.game.variable(id));
    }

    match lower.as_str() {
        "stateid" => Some(ctx.actor.display_state().unwrap_or(0).to_string()),
        "action" => Some(flag(ctx.acting)),
        "damage" => Some(flag(ctx.damaged)),
        "note" => Some(ctx.actor.portrait_note().unwrap_or("").to_string()),
        _ => None,
    }
}

fn flag(on: bool) -> String {
    if on { "1" } else { "0" }.to_string()
}

/// Bucket index for an HP percentage against ascending thresholds.
///
/// Buckets are half-open `[prev, next)`: an HP exactly on a threshold falls
/// into the bucket above it. The final bucket is closed at 100. Thresholds
/// that fail to parse are skipped (the validator reports them).
fn hp_bucket(args: &str, hp_percent: f32) -> usize {
    args.split(',')
        .filter_map(|t| t.trim().parse::<f32>().ok())
        .take_while(|&t| hp_percent >= t)
        .count()
}

/// Static template problems, for the definition checker.
///
/// Returns one message per malformed construct: unterminated braces,
/// unrecognized pattern names, non-numeric `switch:`/`variable:`/`hp:`
/// arguments, and `hp:` thresholds that do not ascend.
pub fn lint(template: &str) -> Vec<String> {
    let mut problems = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let tail = &rest[start..];
        let Some(end) = tail.find('}') else {
            problems.push(format!("unterminated `{{` in `{template}`"));
            return problems;
        };
        let inner = &tail[1..end];
        lint_pattern(inner, &mut problems);
        rest = &tail[end + 1..];
    }

    problems
}

fn lint_pattern(inner: &str, problems: &mut Vec<String>) {
    let lower = inner.to_ascii_lowercase();

    if let Some(args) = lower.strip_prefix("hp:") {
        let mut parsed = Vec::new();
        for part in args.split(',') {
            match part.trim().parse::<f32>() {
                Ok(threshold) => parsed.push(threshold),
                Err(_) => problems.push(format!("non-numeric hp threshold `{}`", part.trim())),
            }
        }
        if parsed.windows(2).any(|w| w[0] >= w[1]) {
            problems.push(format!("hp thresholds must ascend in `{{{inner}}}`"));
        }
        return;
    }
    for prefix in ["switch:", "variable:"] {
        if let Some(id) = lower.strip_prefix(prefix) {
            if id.trim().parse::<u32>().is_err() {
                problems.push(format!("non-numeric id in `{{{inner}}}`"));
            }
            return;
        }
    }
    if !matches!(lower.as_str(), "stateid" | "action" | "damage" | "note") {
        problems.push(format!("unrecognized pattern `{{{inner}}}`"));
    }
}
