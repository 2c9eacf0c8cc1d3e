//! Language commands.

use anyhow::{Result, bail};
use verdant_core::locale::LanguageTag;

use super::context::AppContext;

pub async fn list(ctx: &AppContext) -> Result<()> {
    let active = ctx.language.active();
    for tag in ctx.language.available_languages().await? {
        if tag == active {
            println!("{tag} (active)");
        } else {
            println!("{tag}");
        }
    }
    Ok(())
}

pub async fn get(ctx: &AppContext) -> Result<()> {
    println!("{}", ctx.language.active());
    if ctx.session.manager().current().is_authenticated() {
        let remote = ctx.language.preference().await?;
        println!("Stored preference: {remote}");
    }
    Ok(())
}

pub async fn set(ctx: &AppContext, code: &str) -> Result<()> {
    let Some(tag) = LanguageTag::parse(code) else {
        bail!("Invalid language code: {code:?}");
    };
    ctx.language.set_language(tag.clone()).await?;
    println!("Language set to {tag}");
    Ok(())
}
