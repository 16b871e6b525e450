use dioxus::document::eval;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct CopyOutcome {
    copied: bool,
    #[serde(default)]
    fallback: bool,
}

/// Writes `text` to the clipboard, falling back to a hidden textarea and
/// `execCommand("copy")`. Returns `false` when both fail.
pub async fn copy_to_clipboard(text: &str) -> bool {
    let script = copy_to_clipboard_script(text);
    let outcome = eval(&script).join::<CopyOutcome>().await.unwrap_or_default();
    outcome.copied || outcome.fallback
}

/// Offers `bytes` as a file download named `file_name`.
pub async fn download_bytes(file_name: &str, mime: &str, bytes: &[u8]) {
    let script = download_bytes_script(file_name, mime, bytes);
    let _ = eval(&script).await;
}

fn copy_to_clipboard_script(text: &str) -> String {
    let text_literal = js_string_literal(text);
    format!(
        r#"
        const text = {text_literal};
        try {{
            if (navigator.clipboard && navigator.clipboard.writeText) {{
                await navigator.clipboard.writeText(text);
                return {{ copied: true, fallback: false }};
            }}
        }} catch (_) {{}}
        const area = document.createElement("textarea");
        area.value = text;
        area.setAttribute("readonly", "");
        area.style.position = "fixed";
        area.style.opacity = "0";
        document.body.appendChild(area);
        area.select();
        let copied = false;
        try {{
            copied = document.execCommand("copy");
        }} catch (_) {{
            copied = false;
        }}
        document.body.removeChild(area);
        return {{ copied: false, fallback: copied }};
        "#
    )
}

fn download_bytes_script(file_name: &str, mime: &str, bytes: &[u8]) -> String {
    let name_literal = js_string_literal(file_name);
    let mime_literal = js_string_literal(mime);
    let byte_list = bytes
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"
        const bytes = new Uint8Array([{byte_list}]);
        const blob = new Blob([bytes], {{ type: {mime_literal} }});
        const url = URL.createObjectURL(blob);
        const link = document.createElement("a");
        link.href = url;
        link.download = {name_literal};
        document.body.appendChild(link);
        link.click();
        document.body.removeChild(link);
        URL.revokeObjectURL(url);
        "#
    )
}

fn js_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{000C}' => out.push_str("\\f"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
