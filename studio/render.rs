//! Central template renderer for the ferrite-dscript studio.
//!
//! The studio uses a single HTML template (`studio/assets/studio.html`) with
//! placeholder tokens like `{{TOKEN}}`.  Global placeholders are resolved
//! here; a per-page closure fills the rest and anything left over is blanked.

use ferrite_dscript::Rounds;

use crate::state::{FlashKind, FlashMessage};

const TEMPLATE: &str = include_str!("assets/studio.html");

/// Which tab is active.
#[derive(Clone, Copy)]
pub enum Page {
    Editor  = 0,
    Builder = 1,
}

/// Renders the full studio page.
///
/// # Arguments
/// - `page`        — active tab
/// - `run_running` — whether a simulation is currently active
/// - `fill`        — closure that fills tab-specific placeholders
pub fn render_page<F>(page: Page, run_running: bool, fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    let mut html = TEMPLATE.to_owned();

    html = html.replace("{{ACTIVE_TAB}}",  &(page as u8).to_string());
    html = html.replace("{{RUN_RUNNING}}", if run_running { "true" } else { "false" });

    html = fill(html);

    blank_remaining(html)
}

/// Replaces any `{{TOKEN}}` the page did not fill with an empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}

pub fn render_flash_html(flash: Option<&FlashMessage>) -> String {
    match flash {
        None    => String::new(),
        Some(f) => {
            let cls = match f.kind {
                FlashKind::Success => "flash-success",
                FlashKind::Error   => "flash-error",
            };
            format!(r#"<div class="flash {}">{}</div>"#, cls, html_escape(&f.text))
        }
    }
}

/// `<option>` list for the rounds selector shared by both tabs.
pub fn build_rounds_options(selected: Rounds) -> String {
    Rounds::options()
        .map(|r| {
            let range = r.duration_range_ms();
            format!(
                r#"<option value="{v}"{sel}>{label} ({lo}-{hi} seconds)</option>"#,
                v     = r.get(),
                sel   = if r == selected { " selected" } else { "" },
                label = r,
                lo    = range.start / 1000,
                hi    = range.end / 1000,
            )
        })
        .collect()
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
     .replace('<', "&lt;")
     .replace('>', "&gt;")
     .replace('"', "&quot;")
     .replace('\'', "&#039;")
}
