use crate::console::print_json;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Subcommand};
use colored::Colorize;
use eduassist_application::AppContext;
use eduassist_core::calendar;
use eduassist_core::performance::PerformanceEvent;
use eduassist_core::roster::{self, StudentSort};
use eduassist_interaction::endpoints::{BulkSendRequest, ReportFormat};
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Subcommand)]
pub enum PerformanceAction {
    /// Class-wide overview
    Overview,
    /// One student's performance
    Student { student_id: String },
    /// Download a student's report
    Report {
        student_id: String,
        /// pdf or csv
        #[arg(long, default_value = "pdf")]
        format: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Reports already sent
    Sent,
    /// Stream live updates until interrupted
    Watch { educator_id: String },
}

#[derive(Args)]
pub struct StudentsArgs {
    /// Section to list; defaults to the last selected one
    #[arg(long)]
    section: Option<String>,
    /// Filter by name, email or student number
    #[arg(long, default_value = "")]
    search: String,
    /// Sort by average instead of name
    #[arg(long)]
    by_average: bool,
    /// Hand the listed students to `bulk send --preselected`
    #[arg(long)]
    preselect: bool,
}

#[derive(Subcommand)]
pub enum BulkAction {
    Sections,
    Templates,
    Sent,
    /// Send a message to students
    Send {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        /// Recipient ids
        #[arg(long = "to")]
        to: Vec<String>,
        /// Add the students chosen with `students --preselect`
        #[arg(long)]
        preselected: bool,
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        include_parents: bool,
    },
}

pub async fn calendar(ctx: &AppContext, month: Option<&str>) -> Result<()> {
    let first = match month {
        Some(month) => NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
            .with_context(|| format!("expected YYYY-MM, got '{month}'"))?,
        None => Local::now().date_naive().with_day(1).ok_or_else(|| anyhow!("invalid date"))?,
    };
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| anyhow!("month out of range"))?;

    let Some(buckets) = ctx.dashboard().load_calendar(first, last).await? else {
        return Ok(());
    };

    println!("{}", first.format("%B %Y").to_string().bright_magenta().bold());
    let days = calendar::month_days(first.year(), first.month(), &buckets);
    let mut any = false;
    for day in days.iter().filter(|day| !day.events.is_empty()) {
        any = true;
        println!("{}", day.date.format("%a %d").to_string().bold());
        for event in &day.events {
            let title = event
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("(untitled)");
            println!("  {title}");
        }
    }
    if !any {
        println!("{}", "No events this month.".bright_black());
    }
    Ok(())
}

pub async fn performance(ctx: &AppContext, action: PerformanceAction) -> Result<()> {
    let dashboard = ctx.dashboard();
    match action {
        PerformanceAction::Overview => {
            if let Some(overview) = dashboard.refresh_overview().await? {
                print_json(&overview);
            }
        }
        PerformanceAction::Student { student_id } => {
            print_json(&dashboard.student_performance(&student_id).await?)
        }
        PerformanceAction::Report {
            student_id,
            format,
            output,
        } => {
            let format = match format.to_lowercase().as_str() {
                "pdf" => ReportFormat::Pdf,
                "csv" => ReportFormat::Csv,
                other => bail!("unsupported report format '{other}'"),
            };
            let bytes = dashboard.download_report(&student_id, format).await?;
            let output = output.unwrap_or_else(|| {
                PathBuf::from(format!("student-{student_id}-report.{}", format.extension()))
            });
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("{}", format!("Saved {}", output.display()).green());
        }
        PerformanceAction::Sent => print_json(&dashboard.sent_reports().await?),
        PerformanceAction::Watch { educator_id } => watch(ctx, &educator_id).await?,
    }
    Ok(())
}

async fn watch(ctx: &AppContext, educator_id: &str) -> Result<()> {
    let feed = ctx.performance_feed(educator_id);
    let (tx, mut rx) = mpsc::channel::<PerformanceEvent>(32);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(feed.run(tx, cancel.clone()));

    println!("{}", "Watching performance updates. Press CTRL-C to stop.".bright_black());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = rx.recv() => match event {
                Some(event) => {
                    println!("{}", event.kind().bright_cyan());
                    print_json(&Value::Object(event.data().clone()));
                }
                None => break,
            },
        }
    }

    cancel.cancel();
    let _ = handle.await;
    Ok(())
}

pub async fn students(ctx: &AppContext, args: StudentsArgs) -> Result<()> {
    let dashboard = ctx.dashboard();
    let section = match args.section {
        Some(section) => section,
        None => match dashboard.selected_section()? {
            Some(section) => section,
            None => {
                println!("{}", "No section selected. Available sections:".yellow());
                print_json(&dashboard.sections().await?);
                return Ok(());
            }
        },
    };

    let sort = if args.by_average {
        StudentSort::Average
    } else {
        StudentSort::Name
    };
    let Some(students) = dashboard.section_students(&section, &args.search, sort).await? else {
        return Ok(());
    };

    for student in &students {
        let average = student
            .get("average")
            .and_then(Value::as_f64)
            .map(|avg| format!("{avg:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<32} {:>6}", roster::student_name(student), average);
    }
    println!("{}", format!("{} student(s)", students.len()).bright_black());

    if args.preselect {
        dashboard.preselect_users(&students)?;
        println!("{}", "Selection saved for `bulk send --preselected`.".green());
    }
    Ok(())
}

pub async fn bulk(ctx: &AppContext, action: BulkAction) -> Result<()> {
    let dashboard = ctx.dashboard();
    match action {
        BulkAction::Sections => print_json(&dashboard.bulk_sections().await?),
        BulkAction::Templates => print_json(&dashboard.bulk_templates().await?),
        BulkAction::Sent => print_json(&dashboard.bulk_sent().await?),
        BulkAction::Send {
            subject,
            message,
            mut to,
            preselected,
            template,
            include_parents,
        } => {
            if preselected {
                to.extend(
                    dashboard
                        .take_preselected_users()?
                        .iter()
                        .filter_map(|user| user.get("id"))
                        .map(|id| match id {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        }),
                );
            }
            if to.is_empty() {
                bail!("no recipients; pass --to or --preselected");
            }
            let response = dashboard
                .bulk_send(&BulkSendRequest {
                    recipient_ids: to,
                    subject,
                    message,
                    template_id: template,
                    include_parents,
                })
                .await?;
            print_json(&response);
        }
    }
    Ok(())
}
