//! JSON shapes for `--json` output.

use diary_core::JournalEntry;

use crate::ui::format::millis_to_datetime;

/// One entry, addressed by its 1-based number.
pub fn entry_json(number: usize, entry: &JournalEntry) -> serde_json::Value {
    let latest = entry.latest();
    serde_json::json!({
        "number": number,
        "hidden": entry.is_hidden(),
        "revisions": entry.history().len(),
        "created": entry.first().timestamp,
        "updated": latest.timestamp,
        "updated_at": millis_to_datetime(latest.timestamp).map(|dt| dt.to_rfc3339()),
        "content": latest.content,
        "history": entry.history(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_json_shape() {
        let mut entry = JournalEntry::new("first", 1_000);
        entry.append_revision("second", 2_000);

        let value = entry_json(3, &entry);

        assert_eq!(value["number"], 3);
        assert_eq!(value["hidden"], false);
        assert_eq!(value["revisions"], 2);
        assert_eq!(value["created"], 1_000);
        assert_eq!(value["updated"], 2_000);
        assert_eq!(value["content"], "second");
        assert_eq!(value["history"][0]["content"], "first");
        assert_eq!(value["history"][0]["date"], 1_000);
    }
}
