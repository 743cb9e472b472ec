//! Server-rendered HTML.
//!
//! Pages are plain `format!` templates. Anything that came from a user or
//! the store goes through [`escape`] before it is written into markup.

pub mod admin;
pub mod site;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A JavaScript string literal for `s`, already escaped for an HTML attribute.
fn js_string_attr(s: &str) -> String {
    let literal = serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_owned());
    escape(&literal)
}

/// Flash message shown above a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    fn render(&self) -> String {
        let (class, text) = match self {
            Self::Success(text) => ("notice ok", text),
            Self::Error(text) => ("notice err", text),
        };
        format!(r#"<p class="{class}" role="status">{}</p>"#, escape(text))
    }
}

fn render_notice(notice: Option<&Notice>) -> String {
    notice.map(Notice::render).unwrap_or_default()
}

fn build_page(title: &str, body_class: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>
*{{box-sizing:border-box;margin:0;padding:0;}}
body{{font-family:system-ui,-apple-system,sans-serif;line-height:1.6;color:#1f2a1f;}}
body.dark{{background:#0b1a10;color:#e9f1ea;}}
a{{color:inherit;}}
.wrap{{max-width:1120px;margin:0 auto;padding:0 24px;}}
nav.top{{display:flex;justify-content:space-between;align-items:center;padding:16px 24px;background:#0b1a10;color:#fff;}}
nav.top a{{margin-left:20px;text-decoration:none;opacity:.8;}}
.brand b{{color:#4ade80;}}
.hero{{padding:120px 24px;text-align:center;background:linear-gradient(#0b1a10cc,#0b1a10ee),url(/images/hero.png) center/cover;color:#fff;}}
.hero h1{{font-size:56px;}}
.badge{{display:inline-block;padding:4px 14px;border:1px solid #ffffff40;border-radius:999px;font-size:13px;margin-bottom:16px;}}
section{{padding:72px 0;}}
section h2{{font-size:36px;margin-bottom:12px;}}
.label{{text-transform:uppercase;letter-spacing:.15em;font-size:13px;color:#15803d;font-weight:600;}}
.grid{{display:grid;grid-template-columns:repeat(auto-fill,minmax(300px,1fr));gap:24px;margin-top:32px;}}
.card{{border-radius:16px;overflow:hidden;background:#fff;box-shadow:0 2px 10px #0001;}}
.card img{{width:100%;height:220px;object-fit:cover;display:block;}}
.card .body{{padding:20px;}}
.events{{background:#0b1a10;color:#fff;}}
.event{{display:flex;gap:16px;padding:20px;border:1px solid #ffffff1a;border-radius:16px;}}
.date{{text-align:center;min-width:64px;}}
.date b{{display:block;font-size:28px;}}
.tag,.chip{{display:inline-block;padding:2px 10px;border-radius:999px;font-size:12px;background:#ffffff14;margin:2px;text-decoration:none;}}
.chip.active{{background:#22c55e;color:#fff;}}
.quote{{padding:24px;border-radius:16px;background:#fff;box-shadow:0 2px 10px #0001;}}
.avatar{{display:inline-flex;width:40px;height:40px;border-radius:50%;background:#15803d;color:#fff;align-items:center;justify-content:center;font-weight:700;}}
footer{{padding:32px 24px;text-align:center;font-size:13px;background:#0b1a10;color:#ffffff80;}}
.panel{{display:grid;grid-template-columns:1fr 1fr;gap:32px;}}
.row{{display:flex;align-items:center;gap:12px;padding:10px;border:1px solid #ffffff1a;border-radius:12px;margin-bottom:8px;}}
.row img{{width:96px;height:64px;object-fit:cover;border-radius:8px;}}
.row .grow{{flex:1;min-width:0;}}
form.stack label{{display:block;margin:12px 0 4px;font-size:14px;opacity:.8;}}
form.stack input,form.stack textarea,form.stack select{{width:100%;padding:10px;border-radius:10px;border:1px solid #ffffff26;background:#ffffff0d;color:inherit;}}
button{{padding:10px 18px;border:0;border-radius:10px;background:#22c55e;color:#fff;font-weight:600;cursor:pointer;}}
button.danger{{background:#dc2626;}}
.tabs a{{margin-right:12px;padding:8px 16px;border-radius:10px;border:1px solid #ffffff26;text-decoration:none;}}
.tabs a.active{{background:#22c55e;border-color:#22c55e;}}
.notice{{padding:8px 12px;border-radius:8px;margin:12px 0;font-size:14px;}}
.notice.ok{{background:#22c55e1a;color:#4ade80;}}
.notice.err{{background:#ef44441a;color:#f87171;}}
table.cal{{border-collapse:collapse;width:100%;text-align:center;}}
table.cal td,table.cal th{{padding:6px;}}
table.cal td.has-event{{background:#22c55e;border-radius:8px;color:#fff;font-weight:700;}}
.muted{{opacity:.5;font-size:13px;}}
</style>
</head>
<body class="{body_class}">
{content}
</body>
</html>"#,
        title = escape(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn js_literal_is_attribute_safe() {
        let attr = js_string_attr(r#"¿Eliminar "O'Brien"?"#);
        assert!(!attr.contains('"'));
        assert!(!attr.contains('\''));
        assert!(attr.starts_with("&quot;"));
    }
}
