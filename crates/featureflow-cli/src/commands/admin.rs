use crate::app::App;
use crate::render;
use anyhow::Result;
use featureflow_core::{FeedbackError, IdeaStatus};

pub async fn ideas(app: &App, page: u32) -> Result<()> {
    let ideas = app.store.load_admin_ideas(page).await?;
    for idea in &ideas {
        println!("{}", render::idea_line(idea));
    }

    let stats = app.store.board_stats().await;
    let summary: Vec<String> = stats
        .by_status
        .iter()
        .map(|(status, count)| format!("{}: {}", status.label(), count))
        .collect();
    println!();
    println!("{} ideas · {}", stats.total, summary.join(" · "));
    Ok(())
}

pub async fn change_status(app: &App, id: &str, status: IdeaStatus) -> Result<()> {
    app.store.load_idea(id).await?;
    let idea = app.store.change_status(id, status).await?;
    render::success(&format!("\"{}\" is now {}", idea.title, idea.status.label()));
    Ok(())
}

pub async fn delete(app: &App, id: &str, confirmed: bool) -> Result<()> {
    let pending = app.store.prepare_delete(id).await?;
    if !confirmed {
        return Err(FeedbackError::ConfirmationRequired(format!(
            "{} Re-run with --yes to confirm.",
            pending.prompt()
        ))
        .into());
    }

    let title = pending.title().to_string();
    app.store.delete_idea(pending.confirm()).await?;
    render::success(&format!("Deleted \"{}\"", title));
    Ok(())
}
