//! Session commands: login, logout, status.

use anyhow::{Result, bail};

use super::context::AppContext;

pub async fn login(
    ctx: &AppContext,
    email: Option<String>,
    password: Option<String>,
    google_token: Option<String>,
) -> Result<()> {
    let user = match (google_token, email, password) {
        (Some(token), _, _) => ctx.session.login_with_google(&token).await?,
        (None, Some(email), Some(password)) => ctx.session.login(&email, &password).await?,
        _ => bail!("Provide --email and --password, or --google-token"),
    };

    println!("Signed in as {} ({})", user.display_name(), user.role);

    // Adopt the preference the user set on another device; the cached
    // locale keeps working when this fails.
    match ctx.language.sync_from_remote().await {
        Ok(tag) => println!("Language: {tag}"),
        Err(err) => tracing::warn!(error = %err, "Could not sync language preference"),
    }
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout().await?;
    println!("Signed out");
    Ok(())
}

pub async fn status(ctx: &AppContext, refresh: bool) -> Result<()> {
    if refresh && ctx.session.manager().current().is_authenticated() {
        ctx.session.refresh_account().await?;
    }

    match ctx.session.manager().current().user() {
        Some(user) => {
            println!("Signed in as {} ({})", user.display_name(), user.role);
            println!("Language: {}", ctx.language.active());
        }
        None => println!("Not signed in"),
    }
    Ok(())
}
