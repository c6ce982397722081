//! HTML snippets for the lightbox and small text helpers.

use crate::rng::RandomSource;

use super::records::{MediaItem, MediaKind};

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inner markup of the modal that shows one media item full size.
pub fn lightbox_html(item: &MediaItem) -> String {
    let src = escape_html(&item.data_url);
    let (title, body) = match item.kind {
        MediaKind::Video => (
            "Video",
            format!(r#"<video class="lightMedia" src="{src}" controls autoplay playsinline></video>"#),
        ),
        MediaKind::Photo => ("Photo", format!(r#"<img class="lightMedia" src="{src}" alt="photo">"#)),
    };
    format!(
        r#"<div style="display:flex; justify-content:space-between; align-items:center; gap:12px;">
  <h2 style="margin:0;">{title}</h2>
  <button class="btn" id="closeX">✕</button>
</div>
<div class="hr"></div>
{body}"#
    )
}

/// Short unique-enough id: random hex followed by the timestamp in hex.
pub fn uid(rng: &mut dyn RandomSource, now_ms: f64) -> String {
    let random = (rng.next_f64() * (1u64 << 52) as f64) as u64;
    format!("{random:x}{:x}", now_ms.max(0.0) as u64)
}
