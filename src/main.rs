use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use complaint_desk::config::Config;
use complaint_desk::lifecycle::{Action, Status};
use complaint_desk::models::Complaint;
use complaint_desk::priority::{detect_priority, is_previewable, Priority, PREVIEW_MIN_CHARS};
use complaint_desk::views::{
    AdminFilters, AdminView, FileComplaintView, HomeView, LeaderboardView, Notice, TrackView,
    TransitionOutcome,
};
use complaint_desk::ComplaintClient;

#[derive(Parser, Debug)]
#[command(name = "complaint-desk", version, about = "Civic complaint desk")]
struct Args {
    /// Backend API base URL, e.g. http://localhost:5000/api
    #[arg(long, env = "COMPLAINT_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Complaint counters by status
    Stats,
    /// Preview the priority a description would get
    Classify { text: String },
    /// File a new complaint
    File {
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        #[arg(long)]
        anonymous: bool,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Look up a complaint by ID
    Track { id: String },
    /// Department ranking by resolved complaints
    Leaderboard,
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// List complaints with the actions available for each
    List {
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Move a submitted complaint to In Progress
    Start {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Mark an in-progress complaint as Resolved
    Resolve {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Show every field of one complaint
    Show { id: String },
}

fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(url) = args.api_url {
        config.api_url = url;
        config.validate().context("validating --api-url")?;
    }
    tracing::debug!(api_url = %config.api_url, timeout = ?config.http_timeout, "configuration loaded");

    let client = ComplaintClient::new(&config).context("building HTTP client")?;

    match args.command {
        Command::Stats => {
            let mut home = HomeView::new(client);
            home.load().await;
            let s = home.stats;
            println!("Total complaints: {}", s.total);
            println!("Submitted:        {}", s.submitted);
            println!("In Progress:      {}", s.in_progress);
            println!("Resolved:         {}", s.resolved);
        }
        Command::Classify { text } => {
            if !is_previewable(&text) {
                bail!("description must be longer than {} characters to classify", PREVIEW_MIN_CHARS);
            }
            println!("{}", detect_priority(&text));
        }
        Command::File {
            description,
            location,
            lat,
            lng,
            anonymous,
            image,
        } => {
            let mut view = FileComplaintView::new(client);
            view.set_description(description);
            view.set_location(location);
            if let (Some(lat), Some(lng)) = (lat, lng) {
                view.set_coordinates(lat, lng);
            }
            view.set_anonymous(anonymous);
            if let Some(path) = image {
                view.attach_image(path).await;
                fail_on_error(&view.notice)?;
                if let Some(category) = &view.category {
                    println!("Suggested category: {}", category);
                }
            }
            if let Some(priority) = view.priority {
                println!("Detected priority:  {}", priority);
            }
            match view.submit().await {
                Some(id) => println!("Complaint submitted. Track it with ID {}", id),
                None => fail_on_error(&view.notice)?,
            }
        }
        Command::Track { id } => {
            let mut view = TrackView::new(client);
            match view.search(&id).await {
                Some(c) => print_details(c),
                None => fail_on_error(&view.notice)?,
            }
        }
        Command::Leaderboard => {
            let mut view = LeaderboardView::new(client);
            view.load().await;
            fail_on_error(&view.notice)?;
            if let Some(podium) = view.podium() {
                let names: Vec<&str> = podium.iter().map(|d| d.name.as_str()).collect();
                println!("Top performers: {}", names.join(" / "));
            }
            println!("{:<5} {:<34} {:>6} {:>9} {:>7}", "Rank", "Department", "Total", "Resolved", "Rate");
            for (rank, medal, d) in view.entries() {
                let badge = medal.map(|m| m.to_string()).unwrap_or_else(|| format!("#{}", rank));
                println!(
                    "{:<5} {:<34} {:>6} {:>9} {:>6.1}%",
                    badge, d.name, d.total_complaints, d.complaints_resolved, d.resolution_rate
                );
            }
        }
        Command::Admin(cmd) => run_admin(client, cmd).await?,
    }

    Ok(())
}

async fn run_admin(client: ComplaintClient, cmd: AdminCommand) -> Result<()> {
    let mut admin = AdminView::new(client);
    admin.refresh().await;
    fail_on_error(&admin.notice)?;

    match cmd {
        AdminCommand::List {
            status,
            priority,
            search,
        } => {
            admin.set_filters(AdminFilters {
                status,
                priority,
                search: search.unwrap_or_default(),
            });
            let s = admin.stats;
            println!(
                "Total {} | Submitted {} | In Progress {} | Resolved {}",
                s.total, s.submitted, s.in_progress, s.resolved
            );
            let rows = admin.filtered();
            println!("All Complaints ({})", rows.len());
            for c in rows {
                let actions: Vec<&str> = admin.actions_for(c).iter().map(Action::as_str).collect();
                println!(
                    "{}{} [{}] {} / {} / {} {} ({})",
                    c.id,
                    if c.anonymous { " (anonymous)" } else { "" },
                    c.category_label(),
                    c.priority,
                    c.status,
                    c.created_at().map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_else(|| c.timestamp.clone()),
                    c.excerpt(),
                    if actions.is_empty() { "no actions".to_string() } else { actions.join(", ") },
                );
            }
        }
        AdminCommand::Start { id, yes } => transition(&mut admin, &id, Action::Start, yes).await?,
        AdminCommand::Resolve { id, yes } => transition(&mut admin, &id, Action::Resolve, yes).await?,
        AdminCommand::Show { id } => match admin.select(&id) {
            Some(c) => print_details(c),
            None => bail!("complaint {} not found", id),
        },
    }
    Ok(())
}

async fn transition(admin: &mut AdminView, id: &str, action: Action, yes: bool) -> Result<()> {
    let mut confirm = |prompt: &str| yes || confirm_on_stdin(prompt);
    match admin.request_transition(id, action, &mut confirm).await {
        TransitionOutcome::Applied(status) => {
            println!("{} is now {}", id, status);
            Ok(())
        }
        TransitionOutcome::Declined => {
            println!("No change made.");
            Ok(())
        }
        _ => {
            fail_on_error(&admin.notice)?;
            bail!("status update for {} did not complete", id)
        }
    }
}

fn fail_on_error(notice: &Option<Notice>) -> Result<()> {
    match notice {
        Some(Notice::Error(message)) => bail!("{}", message),
        _ => Ok(()),
    }
}

fn print_details(c: &Complaint) {
    println!("ID:          {}", c.id);
    println!("Status:      {}", c.status);
    println!("Priority:    {}", c.priority);
    println!("Category:    {}", c.category_label());
    println!("Department:  {}", c.department());
    println!("Description: {}", c.description);
    println!("Location:    {}", c.location.as_deref().filter(|l| !l.is_empty()).unwrap_or("Not specified"));
    match c.created_at() {
        Some(t) => println!("Submitted:   {}", t.format("%Y-%m-%d %H:%M UTC")),
        None => println!("Submitted:   {}", c.timestamp),
    }
    if let Some(resolved) = c.resolved_at.as_deref() {
        println!("Resolved:    {}", resolved);
    }
    if let Some(image) = c.image_path.as_deref() {
        println!("Image:       {}", image);
    }
    if c.anonymous {
        println!("Filed anonymously");
    }
}
