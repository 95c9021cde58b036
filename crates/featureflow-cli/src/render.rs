//! Terminal rendering of board entities.

use colored::Colorize;
use featureflow_core::{Comment, FeedbackError, Idea, IdeaStatus, RoadmapItem};

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints the single notification line for a failed command.
pub fn failure(err: &anyhow::Error) {
    let message = match err.downcast_ref::<FeedbackError>() {
        Some(feedback) => feedback.user_message(),
        None => format!("{:#}", err),
    };
    eprintln!("{} {}", "✗".red().bold(), message);
}

fn status_badge(status: IdeaStatus) -> String {
    let label = format!("[{}]", status.label());
    match status {
        IdeaStatus::Submitted => label.dimmed().to_string(),
        IdeaStatus::Planned => label.blue().to_string(),
        IdeaStatus::InProgress => label.yellow().to_string(),
        IdeaStatus::Completed => label.green().to_string(),
        IdeaStatus::Rejected => label.red().to_string(),
    }
}

pub fn idea_line(idea: &Idea) -> String {
    let votes = format!("{:>4} ▲", idea.vote_count);
    let votes = if idea.viewer_has_voted {
        votes.green().bold().to_string()
    } else {
        votes
    };
    let trending = if idea.is_trending_badge() { " 🔥" } else { "" };

    format!(
        "{} {} {}{} {} {}",
        format!("#{:<5}", idea.id).dimmed(),
        votes,
        idea.title.bold(),
        trending,
        status_badge(idea.status),
        format!("({} comments)", idea.comment_count).dimmed()
    )
}

pub fn idea_detail(idea: &Idea) {
    println!("{}", idea_line(idea));
    let author = idea
        .author
        .as_ref()
        .map(|a| a.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("unknown");
    println!(
        "  {} · {} · by {} · {}",
        idea.category,
        idea.status.label(),
        author,
        idea.created_at.format("%Y-%m-%d")
    );
    println!();
    for line in idea.description.lines() {
        println!("  {}", line);
    }
}

pub fn comment_line(comment: &Comment) -> String {
    format!(
        "  {} {} {}\n    {}",
        format!("#{}", comment.id).dimmed(),
        comment.author.name.bold(),
        comment.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        comment.content
    )
}

pub fn roadmap_line(item: &RoadmapItem) -> String {
    let target = item
        .target_date
        .map(|date| format!(" → {}", date))
        .unwrap_or_default();
    let intensity = "●".repeat(item.priority.min(5) as usize);
    format!("  {} {}{} {}", intensity.cyan(), item.title, target.dimmed(), format!("#{}", item.id).dimmed())
}
