//! `diary reset --yes`: the explicit acknowledgment that an unreadable
//! stored journal may be replaced by an empty one.

use crate::app::AppContext;
use crate::cli::ResetArgs;
use crate::errors::CliError;
use crate::ui::progress::Spinner;
use crate::ui::{badge, hint, print, Badge};

pub async fn handle_reset(ctx: &AppContext, args: &ResetArgs) -> anyhow::Result<()> {
    if !args.yes {
        return Err(CliError::Other(
            "Refusing to reset without --yes. This discards whatever is stored on the server."
                .to_string(),
        )
        .into());
    }

    let ui = ctx.ui_context(false);
    let mut session = ctx.open_session(&ui).await?;

    let spinner = Spinner::new(&ui, "Loading journal");
    let loaded = session.load().await.map(|journal| journal.len());
    spinner.finish();

    match loaded {
        Ok(entries) => {
            if !ctx.quiet() {
                print(
                    &ui,
                    &badge(
                        &ui,
                        Badge::Info,
                        &format!("Journal is readable ({} entries); nothing to reset", entries),
                    ),
                );
            }
            return Ok(());
        }
        Err(err) if err.is_corrupt_or_wrong_password() => {
            tracing::warn!(error = %err, "replacing unreadable journal");
        }
        Err(err) => return Err(err.into()),
    }

    session.acknowledge_empty()?;
    ctx.save_session(&mut session, &ui).await?;
    session.close();

    if !ctx.quiet() {
        print(&ui, &badge(&ui, Badge::Warn, "Stored journal replaced with an empty one"));
        print(&ui, &hint(&ui, "diary add --body \"...\""));
    }
    Ok(())
}
