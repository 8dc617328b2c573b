use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output::entry_json;
use crate::ui::format::{first_line, format_timestamp, truncate};
use crate::ui::{blank_line, header, hint, print, simple_table, Column};

pub async fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let session = ctx.load_session(&ui).await?;
    let journal = session.journal()?;

    let entries: Vec<_> = journal
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, entry)| args.all || !entry.is_hidden())
        .collect();

    if ui.mode.is_json() {
        let values: Vec<_> = entries
            .iter()
            .map(|(index, entry)| entry_json(index + 1, entry))
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    let pretty = ui.mode.is_pretty();
    if pretty && !ctx.quiet() {
        let context = format!("{} of {}", entries.len(), journal.len());
        print(&ui, &header(&ui, "list", Some(&context)));
        blank_line(&ui);
    }

    if entries.is_empty() {
        if !ctx.quiet() {
            print(&ui, "No entries.");
            print(&ui, &hint(&ui, "diary add --body \"...\""));
        }
        return Ok(());
    }

    let preview_width = ui.width.saturating_sub(40).max(20);
    let columns = [
        Column::new("#"),
        Column::new("Updated"),
        Column::new("Rev"),
        Column::new("Preview"),
    ];
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|(index, entry)| {
            let latest = entry.latest();
            let mut number = (index + 1).to_string();
            if entry.is_hidden() {
                number.push('*');
            }
            vec![
                number,
                format_timestamp(latest.timestamp, pretty),
                entry.history().len().to_string(),
                truncate(first_line(&latest.content), preview_width),
            ]
        })
        .collect();

    print(&ui, &simple_table(&ui, &columns, &rows));
    if args.all && pretty && !ctx.quiet() && entries.iter().any(|(_, e)| e.is_hidden()) {
        blank_line(&ui);
        print(&ui, &hint(&ui, "* marks hidden entries"));
    }
    Ok(())
}
