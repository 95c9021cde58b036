use crate::app::App;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use featureflow_core::{Category, IdeaFilter, IdeaStatus};

pub enum Listing {
    Trending(u32),
    Recent(u32),
    Filtered {
        status: Option<IdeaStatus>,
        category: Option<Category>,
        page: u32,
    },
}

pub async fn list(app: &App, listing: Listing, search: Option<&str>) -> Result<()> {
    match listing {
        Listing::Trending(page) => app.store.load_trending(page).await?,
        Listing::Recent(page) => app.store.load_recent(page).await?,
        Listing::Filtered {
            status,
            category,
            page,
        } => {
            let filter = IdeaFilter {
                status,
                category,
                page: Some(page),
            };
            app.store.load_filtered(filter).await?
        }
    };

    let ideas = app.store.search(search.unwrap_or_default()).await;
    if ideas.is_empty() {
        println!("{}", "No ideas found".dimmed());
        return Ok(());
    }
    for idea in &ideas {
        println!("{}", render::idea_line(idea));
    }
    Ok(())
}

pub async fn show(app: &App, id: &str) -> Result<()> {
    let idea = app.store.load_idea(id).await?;
    let comments = app.store.load_comments(id, 1).await?;

    render::idea_detail(&idea);
    println!();
    if comments.is_empty() {
        println!("{}", "No comments yet".dimmed());
    }
    for comment in &comments {
        println!("{}", render::comment_line(comment));
    }
    Ok(())
}

pub async fn submit(app: &App, title: &str, description: &str, category: Category) -> Result<()> {
    let idea = app.store.create_idea(title, description, category).await?;
    render::success(&format!("Submitted idea #{}", idea.id));
    println!("{}", render::idea_line(&idea));
    Ok(())
}
