mod add;
mod edit;
mod history;
mod list;
mod show;
mod visibility;

pub use add::handle_add;
pub use edit::handle_edit;
pub use history::handle_history;
pub use list::handle_list;
pub use show::handle_show;
pub use visibility::handle_set_hidden;

use diary_core::{Journal, JournalEntry};

use crate::errors::CliError;
use crate::helpers::entry_index;

/// Look up an entry by its 1-based number.
pub(crate) fn lookup(journal: &Journal, number: usize) -> Result<(usize, &JournalEntry), CliError> {
    let index = entry_index(number)?;
    journal
        .get(index)
        .map(|entry| (index, entry))
        .ok_or_else(|| {
            CliError::not_found(
                format!("Entry {} not found (journal has {} entries)", number, journal.len()),
                "Run `diary list --all` to see entry numbers.",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_number() {
        let mut journal = Journal::new();
        journal.add_entry("a", 1);
        journal.add_entry("b", 2);

        let (index, entry) = lookup(&journal, 2).unwrap();
        assert_eq!(index, 1);
        assert_eq!(entry.latest().content, "b");
    }

    #[test]
    fn test_lookup_out_of_range_is_not_found() {
        let journal = Journal::new();
        let err = lookup(&journal, 1).unwrap_err();
        assert_eq!(err.exit_code(), crate::constants::exit_codes::NOT_FOUND);
        assert!(lookup(&journal, 0).is_err());
    }
}
