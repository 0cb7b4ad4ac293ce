use super::prompt_if_missing;
use crate::console::print_json;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use eduassist_application::{AppContext, StudentTab};
use eduassist_core::EduError;
use eduassist_interaction::endpoints::ContactTeacherRequest;

#[derive(Subcommand)]
pub enum StudentAction {
    /// Sign in to the student portal
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    /// Show a tab: profile, marks, reports, notifications or schedule
    Show { tab: String },
    /// Message a teacher
    Contact {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        teacher_id: Option<String>,
    },
}

pub async fn run(ctx: &AppContext, action: StudentAction) -> Result<()> {
    let portal = ctx.student_portal();
    match action {
        StudentAction::Login { email, password } => {
            let password = prompt_if_missing(password, "Password")?;
            match portal.login(&email, &password).await {
                Ok(_) => println!("{}", "Signed in to the student portal.".green()),
                Err(EduError::Unauthorized(message)) => eprintln!("{}", message.red()),
                Err(e) => return Err(e.into()),
            }
        }
        StudentAction::Logout => {
            portal.logout()?;
            println!("{}", "Signed out of the student portal.".bright_black());
        }
        StudentAction::Show { tab } => {
            if !portal.is_signed_in()? {
                println!("{}", "Run `eduassist student login` first.".yellow());
                return Ok(());
            }
            let tab: StudentTab = tab.parse()?;
            print_json(&portal.tab(tab).await?);
        }
        StudentAction::Contact {
            subject,
            message,
            teacher_id,
        } => {
            let response = portal
                .contact_teacher(&ContactTeacherRequest {
                    subject,
                    message,
                    teacher_id,
                })
                .await?;
            print_json(&response);
        }
    }
    Ok(())
}
