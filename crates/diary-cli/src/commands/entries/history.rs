use crate::app::AppContext;
use crate::cli::IndexArgs;
use crate::ui::format::format_timestamp;
use crate::ui::{blank_line, divider, header, kv, print};

use super::lookup;

pub async fn handle_history(ctx: &AppContext, args: &IndexArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let session = ctx.load_session(&ui).await?;
    let (_, entry) = lookup(session.journal()?, args.index)?;
    let pretty = ui.mode.is_pretty();

    if !ctx.quiet() {
        let context = format!("{}, {} revisions", args.index, entry.history().len());
        print(&ui, &header(&ui, "history", Some(&context)));
    }
    for (i, revision) in entry.history().iter().enumerate() {
        blank_line(&ui);
        print(&ui, &divider(&ui));
        print(
            &ui,
            &kv(
                &ui,
                &format!("Revision {}", i + 1),
                &format_timestamp(revision.timestamp, pretty),
            ),
        );
        print(&ui, &revision.content);
    }
    Ok(())
}
