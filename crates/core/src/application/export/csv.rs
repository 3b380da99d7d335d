// CSV Rendering
//
// Deterministic: the same item sequence always yields byte-identical output.
// Item order is whatever the store's query returned; no extra sorting here.

use crate::domain::ListItem;

/// Fixed header line, columns in render order
pub const CSV_HEADER: &str = "itemId,text,createdAt,completed";

/// Content type of published artifacts
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Render items into CSV text: header line plus one line per item.
///
/// `text` is wrapped in double quotes; embedded quotes pass through
/// unescaped. Changing that would change every published artifact, so the
/// limitation is kept deliberately.
pub fn render(items: &[ListItem]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + items.len() * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for item in items {
        out.push_str(&item.item_id);
        out.push_str(",\"");
        out.push_str(&item.text);
        out.push_str("\",");
        out.push_str(&item.created_at_rfc3339());
        out.push(',');
        out.push_str(if item.completed { "true" } else { "false" });
        out.push('\n');
    }

    out
}
