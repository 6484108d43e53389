// src/utils/html.rs

/// Sanitizes a question prompt with ammonia's whitelist.
///
/// Inline markup such as `<b>` or `<em>` survives; `<script>`/`<style>` are
/// dropped with their content and event-handler attributes are stripped.
/// Text is re-serialized, so `&`, `<` and `>` come back entity-escaped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
