//! HTML for the full-screen slideshow page.

use std::fmt::Write as _;
use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::DisplaySettings;
use crate::state::SlideshowState;

/// Route prefix the image files are served under.
pub const IMAGE_ROUTE: &str = "img";

const SAFE_PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// `img/<segment>/<segment>` with every segment percent-encoded.
pub fn image_src(relative_path: &str) -> String {
    let mut src = String::from(IMAGE_ROUTE);
    for segment in relative_path.split('/') {
        src.push('/');
        src.extend(utf8_percent_encode(segment, SAFE_PATH_SEGMENT));
    }
    src
}

/// Render the page for `state`.
///
/// The page reloads itself every `refresh_interval` so new refresh cycles
/// reach the screen without a controller.
pub fn render_slideshow(
    state: &SlideshowState,
    display: &DisplaySettings,
    refresh_interval: Duration,
) -> String {
    let mut slides = String::new();
    for entry in &state.entries {
        writeln!(
            &mut slides,
            "<div class=\"slide\"><img src=\"{}\" alt=\"{}\"></div>",
            escape_html(&image_src(&entry.relative_path)),
            escape_html(&entry.base_name)
        )
        .ok();
    }

    let shadow = if display.border_enabled() {
        format!(
            "box-shadow: 0 0 {}px rgba({}, 1);",
            display.border,
            escape_html(&display.border_color)
        )
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta http-equiv=\"refresh\" content=\"{refresh}\">\
<title>Photo Board</title><style>{styles}\n#slideshow img {{ {shadow} }}</style></head>\
<body style=\"background-color: #{background}; cursor: none\">\
<div id=\"slideshow\">\n{slides}</div>\
<script>{script}</script></body></html>",
        refresh = refresh_interval.as_secs(),
        styles = styles(),
        shadow = shadow,
        background = escape_html(&display.background),
        slides = slides,
        script = script(display.slide_duration),
    )
}

fn styles() -> &'static str {
    "body { margin: 0; overflow: hidden; }\n#slideshow { display: block; height: 98vh; max-width: 98vw; max-height: 98vh; margin: 1vh auto 0; position: relative; }\n#slideshow .slide { position: absolute; inset: 0; opacity: 0; transition: opacity 1s; }\n#slideshow .slide.active { opacity: 1; }\n#slideshow img { display: block; height: 98vh; max-width: 98vw; object-fit: contain; margin: 0 auto; }"
}

fn script(slide_duration: Duration) -> String {
    let millis = slide_duration.as_millis().min(u128::from(u64::MAX)) as u64;
    format!(
        "(function() {{ var slides = document.querySelectorAll('#slideshow .slide'); if (slides.length === 0) return; var current = 0; slides[0].classList.add('active'); if (slides.length === 1) return; setInterval(function() {{ slides[current].classList.remove('active'); current = (current + 1) % slides.length; slides[current].classList.add('active'); }}, {millis}); }})();"
    )
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
