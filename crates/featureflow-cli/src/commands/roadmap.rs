use crate::app::App;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use featureflow_core::RoadmapItem;

fn column(title: &str, items: &[RoadmapItem]) {
    println!("{} ({})", title.bold(), items.len());
    for item in items {
        println!("{}", render::roadmap_line(item));
    }
    println!();
}

pub async fn show(app: &App, page: u32) -> Result<()> {
    app.store.load_roadmap(page).await?;
    let columns = app.store.roadmap_by_status().await;

    if columns.is_empty() {
        println!("{}", "The roadmap is empty".dimmed());
        return Ok(());
    }
    column("Planned", &columns.planned);
    column("In Progress", &columns.in_progress);
    column("Completed", &columns.completed);
    Ok(())
}
