//! MindTrack CLI
//!
//! Command-line interface over the MindTrack wellness tracker.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mindtrack::config::{generate_default_config, Config};
use mindtrack::i18n::{QuoteBook, Translations};
use mindtrack::ledger::Ledger;
use mindtrack::metrics;
use mindtrack::router::{RenderTarget, Route, Router};
use mindtrack::session::SessionManager;
use mindtrack::storage::{
    handle, mood_label, FileStore, GoalCategory, MemoryStore, MoodEntry, StoreHandle, UserRecord,
};
use mindtrack::users::{NewUser, UserStore};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mindtrack", version, about = "Mental wellness tracker")]
struct Cli {
    /// Path to a config file (defaults to the standard locations)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file to stdout
    Init,
    /// Create an account and log in
    Register {
        name: String,
        email: String,
        password: String,
        /// Self-reported age range, e.g. 25-34
        #[arg(long, default_value = "25-34")]
        age: String,
        #[arg(long)]
        newsletter: bool,
    },
    /// Log in
    Login {
        email: String,
        password: String,
        /// Keep the session across restarts
        #[arg(long)]
        remember: bool,
    },
    /// Clear the active session
    Logout,
    /// Log today's mood (1-5)
    Mood {
        level: u8,
        /// Energy level 1-10
        #[arg(long, default_value_t = 5)]
        energy: u8,
        /// Sleep quality 1-10
        #[arg(long, default_value_t = 5)]
        sleep: u8,
        /// Activity tags
        #[arg(long)]
        activity: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Write a journal entry
    Journal {
        content: String,
        #[arg(long)]
        title: Option<String>,
        /// Mood while writing, 1-5
        #[arg(long)]
        mood: Option<u8>,
    },
    /// Manage wellness goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },
    /// Show the dashboard summary
    Dashboard,
    /// Render a route through the console target
    Open { fragment: String },
}

#[derive(Subcommand)]
enum GoalAction {
    Add {
        text: String,
        /// mood, exercise, sleep, social, mindfulness or other
        #[arg(long, default_value = "other")]
        category: GoalCategory,
    },
    Toggle {
        id: String,
    },
    Delete {
        id: String,
    },
    List,
}

/// Everything the commands need, built once from config
struct App {
    users: UserStore,
    sessions: SessionManager,
    ledger: Ledger,
    config: Config,
}

impl App {
    fn build(config: Config) -> anyhow::Result<Self> {
        let data_dir = Path::new(&config.storage.data_dir);
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("creating data directory {data_dir:?}"))?;

        let durable: StoreHandle = handle(FileStore::open(&config.storage.durable_path())?);
        let ephemeral: StoreHandle = if config.storage.ephemeral_in_memory {
            handle(MemoryStore::new())
        } else {
            handle(FileStore::open(&data_dir.join("ephemeral.json"))?)
        };

        let users = UserStore::new(durable.clone());
        let sessions = SessionManager::new(users.clone(), durable.clone(), ephemeral)
            .with_login_delay(Duration::from_millis(config.session.login_delay_ms));
        let ledger = Ledger::new(users.clone(), durable);

        Ok(Self {
            users,
            sessions,
            ledger,
            config,
        })
    }

    /// The logged-in user, or an error telling the caller to log in
    fn current_user(&self) -> anyhow::Result<UserRecord> {
        match self.sessions.current_user() {
            Some(user) => Ok(user),
            None => bail!("not logged in; run `mindtrack login` first"),
        }
    }
}

/// Renders route content to stdout
#[derive(Default)]
struct ConsoleTarget;

impl RenderTarget for ConsoleTarget {
    fn show_loading(&mut self) {}
    fn hide_loading(&mut self) {}

    fn set_title(&mut self, title: &str) {
        println!("== {title} ==");
    }

    fn replace_content(&mut self, body: &str) {
        println!("{body}");
    }

    fn set_active_nav(&mut self, route: Route) {
        tracing::debug!("Active nav: {}", route.fragment());
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(Path::new(path))?,
        None => Config::load_default(),
    };

    init_logging(&config);
    tracing::info!("MindTrack v{}", env!("CARGO_PKG_VERSION"));

    if let Command::Init = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let app = App::build(config)?;
    run(&app, cli.command)
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("mindtrack={}", config.logging.level)),
    );

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn run(app: &App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Init => unreachable!("handled before the app is built"),

        Command::Register {
            name,
            email,
            password,
            age,
            newsletter,
        } => {
            let session = app.sessions.register(&NewUser {
                name,
                email,
                confirm_password: password.clone(),
                password,
                age_bracket: age,
                agree_terms: true,
                newsletter,
            })?;
            println!("Welcome, {}! You are logged in.", session.user.name);
        }

        Command::Login {
            email,
            password,
            remember,
        } => {
            let session = app.sessions.login(&email, &password, remember)?;
            println!("Welcome back, {}!", session.user.name);
        }

        Command::Logout => {
            app.sessions.logout()?;
            println!("Logged out.");
        }

        Command::Mood {
            level,
            energy,
            sleep,
            activity,
            notes,
        } => {
            let user = app.current_user()?;
            let mut entry = MoodEntry::detailed(level, energy, sleep);
            for tag in activity {
                entry = entry.activity(tag);
            }
            if let Some(text) = notes {
                entry = entry.notes(text);
            }
            app.ledger.record_mood(&user.id, entry)?;
            println!("Mood logged: {}", mood_label(level));
        }

        Command::Journal {
            content,
            title,
            mood,
        } => {
            let user = app.current_user()?;
            let updated = app
                .ledger
                .record_journal(&user.id, title.as_deref(), &content, mood)?;
            let entry = updated.journal_entries.last().expect("just appended");
            println!("Saved: {}", entry.title);
        }

        Command::Goal { action } => run_goal(app, action)?,

        Command::Dashboard => {
            let user = app.current_user()?;
            // Ledger writes since login are on the stored record
            let user = app.users.find_by_id(&user.id).unwrap_or(user);
            print_dashboard(app, &user);
        }

        Command::Open { fragment } => {
            let mut router = Router::new(&app.users, &app.sessions, ConsoleTarget);
            router.navigate(&fragment);
        }
    }
    Ok(())
}

fn run_goal(app: &App, action: GoalAction) -> anyhow::Result<()> {
    let user = app.current_user()?;
    match action {
        GoalAction::Add { text, category } => {
            let updated = app.ledger.add_goal(&user.id, &text, category)?;
            let goal = updated.goals.last().expect("just appended");
            println!("Added goal {} [{}]", goal.id, goal.category);
        }
        GoalAction::Toggle { id } => {
            let updated = app.ledger.toggle_goal(&user.id, &id)?;
            let goal = updated
                .goals
                .iter()
                .find(|g| g.id == id)
                .expect("goal was just toggled");
            let state = if goal.completed { "done" } else { "open" };
            println!("Goal {} is now {state}", goal.id);
        }
        GoalAction::Delete { id } => {
            app.ledger.delete_goal(&user.id, &id)?;
            println!("Deleted goal {id}");
        }
        GoalAction::List => {
            let goals = app.ledger.goals(&user.id)?;
            if goals.is_empty() {
                println!("No goals yet.");
            }
            for goal in goals {
                let mark = if goal.completed { "x" } else { " " };
                println!("[{mark}] {} {} [{}]", goal.id, goal.text, goal.category);
            }
        }
    }
    Ok(())
}

fn print_dashboard(app: &App, user: &UserRecord) {
    let translations = Translations::load(Path::new(&app.config.i18n.translations_file))
        .unwrap_or_else(|e| {
            tracing::debug!("No translation table: {}", e);
            Translations::from_value(serde_json::Value::Null)
        });
    let greeting = translations.get_or("dashboard.welcome", "Welcome back");
    println!("== {greeting}, {}! ==", user.name);

    let book = QuoteBook::load(Path::new(&app.config.i18n.quotes_file));
    let today = chrono::Local::now().date_naive();
    println!("\"{}\"\n", book.quote_of_day(&app.config.i18n.language, today));

    let todays = metrics::todays_mood(user)
        .map(|e| mood_label(e.mood).to_string())
        .unwrap_or_else(|| "Not logged".to_string());
    println!("Today's mood:    {todays}");
    println!("Weekly average:  {}", average_label(user, 7));
    println!("Monthly average: {}", average_label(user, 30));
    println!("Tracking streak: {} days", metrics::tracking_streak(user));

    println!("\nRecent activity:");
    for item in metrics::recent_activity(user, 10) {
        println!("  - {}", item.describe());
    }
}

fn average_label(user: &UserRecord, window_days: i64) -> String {
    match metrics::average_mood(user, window_days) {
        Some(avg) => format!("{avg:.1}"),
        None => "No data".to_string(),
    }
}
