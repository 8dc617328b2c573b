use crate::app::AppContext;
use crate::cli::IndexArgs;
use crate::ui::{badge, print, Badge};

use super::lookup;

/// `hide` and `unhide`. Visibility is metadata; history is untouched.
pub async fn handle_set_hidden(
    ctx: &AppContext,
    args: &IndexArgs,
    hidden: bool,
) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let mut session = ctx.load_session(&ui).await?;
    let (index, entry) = lookup(session.journal()?, args.index)?;
    let verb = if hidden { "hidden" } else { "visible" };

    if entry.is_hidden() == hidden {
        if !ctx.quiet() {
            print(
                &ui,
                &badge(&ui, Badge::Info, &format!("Entry {} is already {}", args.index, verb)),
            );
        }
        return Ok(());
    }

    session.journal_mut()?.set_hidden(index, hidden)?;
    ctx.save_session(&mut session, &ui).await?;
    session.close();

    if !ctx.quiet() {
        print(
            &ui,
            &badge(&ui, Badge::Ok, &format!("Entry {} is now {}", args.index, verb)),
        );
    }
    Ok(())
}
