use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::output::entry_json;
use crate::ui::format::format_timestamp;
use crate::ui::{blank_line, divider, header, kv, print, OutputMode};

use super::lookup;

pub async fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let session = ctx.load_session(&ui).await?;
    let (_, entry) = lookup(session.journal()?, args.index)?;

    if ui.mode.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&entry_json(args.index, entry))?
        );
        return Ok(());
    }

    let latest = entry.latest();
    let pretty = ui.mode == OutputMode::Pretty;
    if !ctx.quiet() {
        let number = args.index.to_string();
        print(&ui, &header(&ui, "show", Some(&number)));
        blank_line(&ui);
        print(
            &ui,
            &kv(&ui, "Created", &format_timestamp(entry.first().timestamp, pretty)),
        );
        print(
            &ui,
            &kv(&ui, "Updated", &format_timestamp(latest.timestamp, pretty)),
        );
        print(
            &ui,
            &kv(&ui, "Revisions", &entry.history().len().to_string()),
        );
        if entry.is_hidden() {
            print(&ui, &kv(&ui, "Hidden", "yes"));
        }
        blank_line(&ui);
        print(&ui, &divider(&ui));
        blank_line(&ui);
    }
    println!("{}", latest.content);
    Ok(())
}
