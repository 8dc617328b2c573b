use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::helpers::{now_millis, read_entry_body};
use crate::ui::{badge, print, Badge};

pub async fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let body = read_entry_body(args.body.clone())?;
    let ui = ctx.ui_context(false);

    let mut session = ctx.load_session(&ui).await?;
    let index = session.journal_mut()?.add_entry(body, now_millis());
    ctx.save_session(&mut session, &ui).await?;
    session.close();

    if !ctx.quiet() {
        print(&ui, &badge(&ui, Badge::Ok, &format!("Added entry {}", index + 1)));
    }
    Ok(())
}
