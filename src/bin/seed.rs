//! Demo data seeder.
//!
//! Creates demo users (and optionally an admin) with a batch of random tasks each.
//!
//! Usage:
//!   cargo run --bin seed -- --users 3 --tasks-per-user 25
//!   cargo run --bin seed -- --wipe --create-admin --seed 42

use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::process::ExitCode;

use tasktrack::{
    auth::hash_password,
    config::Config,
    db,
    models::{Role, TaskInput, TaskStatus, User},
    store::{PgStore, TaskStore, UserStore},
    AppError,
};

const WORDS: &[&str] = &[
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
    "juliet", "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo",
    "sierra", "tango", "uniform", "victor", "whiskey", "xray", "yankee", "zulu", "rocket",
    "laser", "engine", "vector", "async", "secure", "tracker", "api", "jwt", "orm", "cache",
    "index", "service", "router", "auth", "token", "password", "schedule", "task",
];

const STATUSES: &[TaskStatus] = &[TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

/// Seed demo users and tasks.
#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Seed demo users and tasks")]
struct Cli {
    /// Number of demo users to create
    #[arg(long, default_value_t = 3)]
    users: u32,

    /// Tasks per user
    #[arg(long, default_value_t = 25)]
    tasks_per_user: u32,

    /// Common password for demo users
    #[arg(long, default_value = "test123")]
    password: String,

    /// Email prefix for demo users
    #[arg(long, default_value = "demo")]
    email_prefix: String,

    /// Email domain
    #[arg(long, default_value = "example.com")]
    domain: String,

    /// Delete previously seeded users with the given prefix first
    #[arg(long)]
    wipe: bool,

    /// Random seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,

    /// Also create an admin user
    #[arg(long)]
    create_admin: bool,

    /// Admin email (default: admin@<domain>)
    #[arg(long)]
    admin_email: Option<String>,

    /// Admin password (default: --password)
    #[arg(long)]
    admin_password: Option<String>,
}

fn rand_words(rng: &mut impl Rng, n: usize) -> String {
    let words: Vec<&str> = (0..n)
        .filter_map(|_| WORDS.choose(&mut *rng).copied())
        .collect();
    let sentence = words.join(" ");
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn maybe_due_date(rng: &mut impl Rng, probability: f64) -> Option<DateTime<Utc>> {
    if !rng.gen_bool(probability) {
        return None;
    }
    let days = rng.gen_range(-15..=15);
    let hours = rng.gen_range(0..24);
    Some(Utc::now() + Duration::days(days) + Duration::hours(hours))
}

/// Returns the user with `email`, creating it if needed, with its role forced to `role`.
async fn get_or_create_user(
    store: &PgStore,
    email: &str,
    password: &str,
    role: Role,
    bcrypt_cost: u32,
) -> Result<User, AppError> {
    let user = match store.find_user_by_email(email).await? {
        Some(user) => user,
        None => {
            let password_hash = hash_password(password, bcrypt_cost)?;
            store.create_user(email, &password_hash, Role::User).await?
        }
    };

    if user.role != role {
        return store.set_role(user.id, role).await;
    }
    Ok(user)
}

async fn create_tasks_for_user(
    store: &PgStore,
    rng: &mut StdRng,
    user: &User,
    count: u32,
) -> Result<usize, AppError> {
    for i in 0..count {
        let input = TaskInput {
            title: format!("{} #{}", rand_words(rng, 2), i + 1),
            description: Some(format!(
                "Seeded task for {}: {}",
                user.email,
                rand_words(rng, 6)
            )),
            due_date: maybe_due_date(rng, 0.6),
            status: STATUSES.choose(rng).copied().unwrap_or_default(),
        };
        store.create_task(user.id, input).await?;
    }
    Ok(count as usize)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let pool = db::connect(&config).await?;
    db::run_migrations(&pool).await?;
    let store = PgStore::new(pool);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if cli.wipe {
        log::info!("Wiping users with prefix '{}'", cli.email_prefix);
        let removed = store
            .delete_users_with_email_prefix(&cli.email_prefix)
            .await?;
        log::info!("Removed {} user(s)", removed);
    }

    log::info!(
        "Creating {} user(s) x {} task(s) each",
        cli.users,
        cli.tasks_per_user
    );
    for i in 1..=cli.users {
        let email = format!("{}{}@{}", cli.email_prefix, i, cli.domain);
        let user =
            get_or_create_user(&store, &email, &cli.password, Role::User, config.bcrypt_cost)
                .await?;
        let created = create_tasks_for_user(&store, &mut rng, &user, cli.tasks_per_user).await?;
        log::info!("  - {}: {} tasks", email, created);
    }

    if cli.create_admin {
        let admin_email = cli
            .admin_email
            .clone()
            .unwrap_or_else(|| format!("admin@{}", cli.domain));
        let admin_password = cli.admin_password.as_deref().unwrap_or(&cli.password);
        let admin = get_or_create_user(
            &store,
            &admin_email,
            admin_password,
            Role::Admin,
            config.bcrypt_cost,
        )
        .await?;
        let created = create_tasks_for_user(&store, &mut rng, &admin, cli.tasks_per_user).await?;
        log::info!("  - {} (admin): {} tasks", admin_email, created);
    }

    log::info!("Done");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Seeding failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
