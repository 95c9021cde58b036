use crate::app::App;
use crate::render;
use anyhow::Result;

pub async fn vote(app: &App, id: &str) -> Result<()> {
    app.store.load_idea(id).await?;
    let idea = app.store.vote(id).await?;
    render::success(&format!("Voted for \"{}\"", idea.title));
    println!("{}", render::idea_line(&idea));
    Ok(())
}

pub async fn unvote(app: &App, id: &str) -> Result<()> {
    app.store.load_idea(id).await?;
    let idea = app.store.unvote(id).await?;
    render::success(&format!("Removed your vote from \"{}\"", idea.title));
    println!("{}", render::idea_line(&idea));
    Ok(())
}

pub async fn comment(app: &App, id: &str, text: &str) -> Result<()> {
    let comment = app.store.add_comment(id, text).await?;
    render::success("Comment posted");
    println!("{}", render::comment_line(&comment));
    Ok(())
}

/// Loads comment pages until the target shows up, so ownership can be checked.
pub async fn delete_comment(app: &App, id: &str, comment_id: &str) -> Result<()> {
    let mut page = 1;
    loop {
        let before = app.store.comments(id).await.len();
        let comments = app.store.load_comments(id, page).await?;
        if comments.iter().any(|c| c.id == comment_id) || comments.len() == before {
            break;
        }
        page += 1;
    }

    app.store.delete_comment(id, comment_id).await?;
    render::success("Comment deleted");
    Ok(())
}
