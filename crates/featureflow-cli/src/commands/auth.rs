use crate::app::App;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use featureflow_application::SignupRequest;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let user = app.session.login(email, password).await?;
    render::success(&format!("Signed in as {}", user.display_name()));
    Ok(())
}

pub async fn signup(
    app: &App,
    email: String,
    name: String,
    password: String,
    password_confirmation: Option<String>,
) -> Result<()> {
    let request = SignupRequest {
        email,
        password,
        password_confirmation,
        name,
    };
    let user = app.session.signup(request).await?;
    render::success(&format!("Welcome, {}!", user.display_name()));
    Ok(())
}

pub fn logout(app: &App) {
    if app.session.logout() {
        render::success("Signed out");
    } else {
        println!("Not signed in");
    }
}

pub fn whoami(app: &App) {
    match app.session.current_user() {
        Some(user) => {
            let role = if user.is_admin() { " (admin)" } else { "" };
            println!(
                "{} <{}>{}",
                user.display_name().bold(),
                user.email,
                role.yellow()
            );
        }
        None => println!("Not signed in"),
    }
}
