use crate::console::print_json;
use anyhow::{Result, anyhow};
use chrono::Utc;
use clap::Subcommand;
use colored::Colorize;
use eduassist_application::{AppContext, EnhancedAssistantService};
use eduassist_core::assistant::{AutonomyMode, EnhancedChatResponse};
use eduassist_core::conversation::{ChatRole, DashboardTab, is_affirmative};
use eduassist_interaction::endpoints::QuickAction;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

#[derive(Subcommand)]
pub enum AssistantAction {
    /// Open an interactive session
    Chat {
        /// manual, assist or autonomous
        #[arg(long, default_value = "assist")]
        mode: AutonomyMode,
    },
    /// Run a one-click prompt (daily_summary, at_risk_students, ...)
    Quick { action: String },
    /// Approve or reject a proposed action
    Approve {
        action_id: String,
        #[arg(long)]
        reject: bool,
    },
    /// Show assistant availability
    Status,
    /// Show assistant settings
    Settings,
}

/// Line-oriented loop shared by the chat commands. `handle` returns
/// `false` to stop.
async fn repl<F, Fut>(banner: &str, mut handle: F) -> Result<()>
where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = Result<bool>>,
{
    let mut rl = DefaultEditor::new()?;
    println!("{}", banner.bright_magenta().bold());
    println!("{}", "Type 'quit' to exit.".bright_black());
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                if !handle(trimmed.to_string()).await? {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }
    Ok(())
}

fn print_reply(text: &str) {
    for line in text.lines() {
        println!("{}", line.bright_blue());
    }
}

/// The scripted task assistant.
pub async fn scripted(ctx: &AppContext) -> Result<()> {
    let assistant = ctx.assistant()?;
    let dashboard = ctx.dashboard();

    for message in assistant.messages().await {
        match message.role {
            ChatRole::User => println!("{}", format!("> {}", message.content).green()),
            _ => print_reply(&message.content),
        }
    }

    let (assistant, dashboard) = (&assistant, &dashboard);
    repl("=== EduAssist ===", move |line| {
        async move {
            if line == "/clear" {
                assistant.clear().await?;
                println!("{}", "Conversation cleared.".bright_black());
                return Ok(true);
            }
            let reply = assistant.send(&line).await;
            print_reply(&reply.text);
            if reply.show_tab == Some(DashboardTab::Overview) {
                if let Ok(Some(overview)) = dashboard.refresh_overview().await {
                    print_json(&overview);
                }
            }
            Ok(true)
        }
    })
    .await
}

pub async fn assistant(ctx: &AppContext, action: AssistantAction) -> Result<()> {
    let service = ctx.enhanced_assistant();
    match action {
        AssistantAction::Chat { mode } => {
            service.set_autonomy(mode).await;
            let banner = format!("=== EduAssist AI ({mode} mode) ===");
            let service = &service;
            repl(&banner, move |line| {
                async move {
                    match service.send(&line, Utc::now()).await {
                        Ok(response) => show_response(service, &response).await?,
                        // already reported through the notifier
                        Err(e) => tracing::debug!("[Chat] {}", e),
                    }
                    Ok(true)
                }
            })
            .await?;
        }
        AssistantAction::Quick { action } => {
            let quick = QuickAction::from_id(&action)
                .ok_or_else(|| anyhow!("unknown quick action '{action}'"))?;
            let response = service.quick_action(quick, Utc::now()).await?;
            show_response(&service, &response).await?;
        }
        AssistantAction::Approve { action_id, reject } => {
            print_json(&service.approve(&action_id, !reject).await?);
        }
        AssistantAction::Status => print_json(&service.status().await?),
        AssistantAction::Settings => print_json(&service.settings().await?),
    }
    Ok(())
}

async fn show_response(
    service: &EnhancedAssistantService,
    response: &EnhancedChatResponse,
) -> Result<()> {
    print_reply(&response.response);
    for suggestion in &response.suggested_actions {
        println!("{}", format!("  - {suggestion}").yellow());
    }

    let (true, Some(action_id)) = (response.requires_approval, &response.action_id) else {
        return Ok(());
    };
    let mut rl = DefaultEditor::new()?;
    let answer = rl.readline(&format!("{} ", "Approve this action? (yes/no)".bright_yellow()))?;
    let approved = is_affirmative(&answer);
    service.approve(action_id, approved).await?;
    let outcome = if approved { "Approved." } else { "Rejected." };
    println!("{}", outcome.bright_black());
    Ok(())
}

pub async fn chatbot(ctx: &AppContext, message: Option<String>, clear: bool) -> Result<()> {
    let chat = ctx.simple_chat();
    if clear {
        chat.clear().await?;
        println!("{}", "Chatbot history cleared.".bright_black());
        return Ok(());
    }

    if let Some(message) = message {
        print_reply(&chat.send(&message, Utc::now()).await?);
        return Ok(());
    }

    let chat = &chat;
    repl("=== EduAssist Chatbot ===", move |line| {
        async move {
            if let Ok(reply) = chat.send(&line, Utc::now()).await {
                print_reply(&reply);
            }
            Ok(true)
        }
    })
    .await
}
