use wall_types::api::WallPage;
use wall_types::models::{MAX_MESSAGE_CHARS, MAX_NAME_CHARS};

/// Renders the wall page. Every piece of stored text is escaped.
pub fn wall_page(page: &WallPage) -> String {
    let mut tiles = String::new();
    for color in &page.tile_colors {
        tiles.push_str(&format!(
            r#"<div class="tile" style="background: {}"></div>"#,
            escape(color)
        ));
    }

    let mut entries = String::new();
    for entry in &page.entries {
        let name = if entry.name.is_empty() { "anonymous" } else { entry.name.as_str() };
        entries.push_str(&format!(
            r#"<li class="entry" data-id="{id}"><span class="swatch" style="background: {color}"></span><strong>{name}</strong> {message}</li>"#,
            id = entry.id,
            color = escape(&entry.color),
            name = escape(name),
            message = escape(&entry.message),
        ));
    }
    let empty_hidden = if page.entries.is_empty() { "" } else { " hidden" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>The Wall</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body style="--visitor-color: {visitor_color}">
<header>
<h1>You are visitor #{visitor_number}</h1>
<p>{total_visitors} visitors so far</p>
<div class="mosaic">{tiles}</div>
</header>
<form id="entryForm">
<input id="nameInput" name="name" maxlength="{max_name}" placeholder="name (optional)">
<span id="nameCharCount">0/{max_name}</span>
<input id="messageInput" name="message" maxlength="{max_message}" placeholder="say something" required>
<span id="charCount">0/{max_message}</span>
<div id="heatmapPicker"><div id="pickerCursor"></div></div>
<div id="colorPreview"></div>
<input type="hidden" id="colorValue" name="color">
<button id="submitBtn" type="submit">sign the wall</button>
</form>
<p id="emptyState"{empty_hidden}>Nobody has signed the wall yet.</p>
<ul id="guestbook">{entries}</ul>
<script>window.VISITOR_COLOR = {visitor_color_js};</script>
<script src="/static/script.js"></script>
</body>
</html>
"#,
        visitor_color = escape(&page.visitor_color),
        visitor_number = page.visitor_number,
        total_visitors = page.total_visitors,
        max_name = MAX_NAME_CHARS,
        max_message = MAX_MESSAGE_CHARS,
        visitor_color_js = js_string(&page.visitor_color),
    )
}

/// HTML-escapes text for element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A JSON string literal that cannot close the surrounding `<script>`.
fn js_string(text: &str) -> String {
    serde_json::Value::from(text).to_string().replace("</", "<\\/")
}
