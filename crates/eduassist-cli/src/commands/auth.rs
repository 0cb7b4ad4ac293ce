use super::prompt_if_missing;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use eduassist_application::AppContext;
use eduassist_core::EduError;
use eduassist_core::routes::RouteDecision;
use eduassist_interaction::endpoints::RegisterRequest;

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    school: Option<String>,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    password: Option<String>,
}

pub async fn login(ctx: &AppContext, email: &str, password: Option<String>) -> Result<()> {
    let password = prompt_if_missing(password, "Password")?;
    match ctx.auth().login(email, &password).await {
        Ok(profile) => {
            let name = profile
                .as_ref()
                .and_then(|p| p.get("first_name").or_else(|| p.get("name")))
                .and_then(|v| v.as_str())
                .unwrap_or(email);
            println!("{}", format!("Welcome back, {name}!").green());
            Ok(())
        }
        // wrong credentials are shown inline; the session stays as it was
        Err(EduError::Unauthorized(message)) => {
            eprintln!("{}", message.red());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn register(ctx: &AppContext, args: RegisterArgs) -> Result<()> {
    let password = prompt_if_missing(args.password, "Password")?;
    let request = RegisterRequest {
        email: args.email,
        password,
        first_name: args.first_name,
        last_name: args.last_name,
        school: args.school,
        subject: args.subject,
    };
    ctx.auth().register(&request).await?;
    println!(
        "{}",
        format!("Account created for {}. You can now log in.", request.email).green()
    );
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth().logout()?;
    println!("{}", "Signed out.".bright_black());
    Ok(())
}

pub fn route(ctx: &AppContext, path: &str) -> Result<()> {
    match ctx.auth().resolve_route(path)? {
        RouteDecision::Render(route) => println!("{path} -> {route:?}"),
        RouteDecision::Redirect(target) => {
            println!("{}", format!("{path} -> redirect to {target}").yellow())
        }
    }
    Ok(())
}
