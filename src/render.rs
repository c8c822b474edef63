//! Plain-text rendering of logbook pages.
//!
//! Output is meant for a terminal; each function returns a `String` so the
//! binary decides where it goes.

use crate::catalog::{FilterControl, SpeciesRecord};
use crate::catalog::model::DETAIL_ROUTE;
use crate::format::format_datetime;
use crate::logbook::LogbookView;
use std::fmt::Write;

pub const SITE_NAME: &str = "Microcosm Log";
pub const IMAGE_PLACEHOLDER: &str = "No image available";
pub const EMPTY_RESULT: &str = "No species found matching your criteria.";

const CARD_DESCRIPTION_CHARS: usize = 180;
const META_DESCRIPTION_CHARS: usize = 160;

/// Truncate on a char boundary, marking the cut with `...`.
pub fn clamp(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

/// `<title>` text for a detail page.
pub fn page_title(record: &SpeciesRecord) -> String {
    format!("{} | {SITE_NAME}", record.name)
}

/// First 160 characters of the description, uncut otherwise.
pub fn meta_description(record: &SpeciesRecord) -> String {
    record.description.chars().take(META_DESCRIPTION_CHARS).collect()
}

/// Summary card shown in the logbook grid.
pub fn render_card(record: &SpeciesRecord) -> String {
    let card = record.card();
    let mut out = String::new();
    let _ = writeln!(out, "{}", card.name);
    if !card.scientific_name.is_empty() {
        let _ = writeln!(out, "  {}", card.scientific_name);
    }
    if !card.description.is_empty() {
        let _ = writeln!(out, "  {}", clamp(&card.description, CARD_DESCRIPTION_CHARS));
    }
    let _ = writeln!(
        out,
        "  [{}]",
        card.image_url.as_deref().unwrap_or(IMAGE_PLACEHOLDER)
    );
    let _ = writeln!(out, "  -> {}", card.href);
    out
}

/// Filter control row with the active selector bracketed.
pub fn render_controls(controls: &[FilterControl], view: &LogbookView<'_>) -> String {
    controls
        .iter()
        .map(|control| {
            if &control.selector == view.selector() {
                format!("[{}]", control.label)
            } else {
                control.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Whole logbook page: controls, count line, then cards or the empty message.
///
/// Cards come from [`LogbookView::visible`], so a published result is what
/// reaches the screen.
pub fn render_logbook(view: &LogbookView<'_>) -> String {
    let records = view.visible();
    let mut out = String::new();
    let _ = writeln!(out, "{SITE_NAME} Logbook");
    let _ = writeln!(out, "{}", render_controls(&view.registry().controls(), view));
    if !view.query().is_empty() {
        let _ = writeln!(out, "Search: {}", view.query());
    }
    let _ = writeln!(out, "{}", view.summary());
    let _ = writeln!(out);

    if records.is_empty() {
        let _ = writeln!(out, "{EMPTY_RESULT}");
        if view.is_filtered() {
            let _ = writeln!(out, "Clear filters with :clear");
        }
        return out;
    }

    for record in records {
        out.push_str(&render_card(record));
        out.push('\n');
    }
    out
}

/// Full detail page for one record, headed by its title and meta summary.
pub fn render_detail(record: &SpeciesRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", page_title(record));
    let meta = meta_description(record);
    if !meta.is_empty() {
        let _ = writeln!(out, "Summary: {meta}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "<- Back to Logbook ({DETAIL_ROUTE})");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", record.name);
    if !record.scientific_name.is_empty() {
        let _ = writeln!(out, "{}", record.scientific_name);
    }
    let _ = writeln!(
        out,
        "[{}]",
        record.image_url.as_deref().unwrap_or(IMAGE_PLACEHOLDER)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Description");
    let _ = writeln!(out, "{}", record.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Habitat");
    let _ = writeln!(out, "{}", record.habitat);
    if let Some(created) = &record.created_at {
        let _ = writeln!(out);
        let _ = writeln!(out, "Added {}", format_datetime(created, false));
    }
    out
}

/// Shown when a detail id does not resolve.
pub fn render_not_found(id: &str) -> String {
    format!(
        "Species Not Found\nThe species '{id}' doesn't exist in our database.\nReturn to Logbook ({DETAIL_ROUTE})\n"
    )
}
