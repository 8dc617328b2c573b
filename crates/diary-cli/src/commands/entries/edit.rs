use crate::app::AppContext;
use crate::cli::EditArgs;
use crate::helpers::{now_millis, read_entry_body};
use crate::ui::{badge, print, Badge};

use super::lookup;

pub async fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let body = read_entry_body(args.body.clone())?;
    let ui = ctx.ui_context(false);

    let mut session = ctx.load_session(&ui).await?;
    let (index, entry) = lookup(session.journal()?, args.index)?;
    if entry.latest().content == body {
        if !ctx.quiet() {
            print(&ui, &badge(&ui, Badge::Info, "No changes; nothing saved"));
        }
        return Ok(());
    }

    let revisions = entry.history().len() + 1;
    session
        .journal_mut()?
        .append_revision(index, body, now_millis())?;
    ctx.save_session(&mut session, &ui).await?;
    session.close();

    if !ctx.quiet() {
        print(
            &ui,
            &badge(
                &ui,
                Badge::Ok,
                &format!("Entry {} now has {} revisions", args.index, revisions),
            ),
        );
    }
    Ok(())
}
