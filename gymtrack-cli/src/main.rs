mod browser;
mod sets;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use log::{LevelFilter, debug};
use std::path::PathBuf;

use gymtrack::auth::{Access, Role, RoleGate, Route};
use gymtrack::config::ClientConfig;
use gymtrack::logging::init_logger;
use gymtrack::models::{
    ChangePasswordRequest, Difficulty, Machine, Muscle, NewBodyMeasurement,
    NewExerciseConfiguration, NewHistoryPRExercise, NewMachine, NewTrainingPlan, NewUserGym,
    PushMessage, RegisterRequest, ResetPasswordRequest, WeekDay,
};
use gymtrack::pagination::PageQuery;
use gymtrack::session::Session;
use gymtrack::stats::DateWindow;

#[derive(Parser, Debug)]
#[command(version, about = "gymtrack - fitness tracking client", long_about = None)]
struct Args {
    /// Backend base URL, overrides GYMTRACK_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Local session database, overrides GYMTRACK_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// More output; repeat for debug and trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CatalogKind {
    Muscle,
    Difficulty,
    Machine,
    WeekDay,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "GYMTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show the signed-in user, checking the token with the backend
    Whoami,
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
    },
    VerifyEmail {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    ResendCode {
        #[arg(long)]
        email: String,
    },
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        new_password: String,
    },
    ChangePassword {
        #[arg(long)]
        old_password: String,
        #[arg(long)]
        new_password: String,
    },
    /// Search the exercise catalog
    Exercises {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
    /// List a catalog table
    Catalog {
        #[arg(value_enum)]
        kind: CatalogKind,
    },
    /// Add a catalog entry (gym role)
    CatalogAdd {
        #[arg(value_enum)]
        kind: CatalogKind,
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Routines {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one routine with its days
    Routine { id: i64 },
    NewRoutine {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Create the routine for a gym instead of yourself
        #[arg(long)]
        gym: Option<i64>,
    },
    /// Add or update an exercise prescription on a workout day
    Configure {
        /// Update this configuration instead of creating one
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        day: Option<i64>,
        #[arg(long)]
        exercise: i64,
        #[arg(long)]
        sets: u32,
        #[arg(long)]
        reps_low: u32,
        #[arg(long)]
        reps_high: u32,
        /// Rest between sets in seconds
        #[arg(long, default_value_t = 90)]
        rest: u32,
        #[arg(long)]
        notes: Option<String>,
    },
    Unconfigure { id: i64 },
    /// Records and recent sessions of one exercise
    History {
        exercise_id: i64,
        #[arg(short, long, default_value = "all")]
        window: DateWindow,
        /// Only the N most recent sessions
        #[arg(short, long)]
        last: Option<usize>,
    },
    /// Log a session, one argument per series: 100x5@8+80x8
    Log {
        exercise_id: i64,
        #[arg(required = true)]
        series: Vec<String>,
        /// YYYY-MM-DD, today by default
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    DeleteSession { id: i64 },
    Measurements,
    /// Save a body-measurement snapshot
    Measure {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        body_fat: Option<f64>,
        #[arg(long)]
        muscle_mass: Option<f64>,
        #[arg(long)]
        chest: Option<f64>,
        #[arg(long)]
        waist: Option<f64>,
        #[arg(long)]
        hip: Option<f64>,
        #[arg(long)]
        arm: Option<f64>,
        #[arg(long)]
        thigh: Option<f64>,
    },
    Progress,
    /// Gyms you own (gym role)
    Gyms,
    Members {
        gym_id: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    GrantMembership {
        #[arg(long)]
        gym: i64,
        #[arg(long)]
        email: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        premium: bool,
        #[arg(long)]
        can_edit_routines: bool,
        #[arg(long)]
        can_manage_members: bool,
    },
    NotifyToken { token: String },
    /// Send a push notification (admin role)
    Notify {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        /// Only this user; everyone when absent
        #[arg(long)]
        email: Option<String>,
    },
    /// Browse an exercise's history in the terminal
    Interactive { exercise_id: i64 },
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Fails with a readable message when the current role may not run a
/// command.
async fn gate(session: &Session, required: Role) -> Result<()> {
    match session.check(RoleGate::new(required)).await {
        Access::Granted => Ok(()),
        Access::Redirect(Route::Login) => bail!("not logged in, run `gymtrack login` first"),
        Access::Redirect(Route::Home) => bail!("this command needs the {} role", required),
    }
}

fn print_table<T>(rows: &[T], line: impl Fn(&T) -> String) {
    if rows.is_empty() {
        println!("(none)");
    }
    for row in rows {
        println!("{}", line(row));
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    init_logger(level_for(args.verbose));

    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(db) = args.db {
        config.db_path = db;
    }
    debug!("Using {:?}", config);

    let session = Session::from_config(&config).context("failed to start session")?;
    if session.is_first_launch().await? {
        println!("Welcome to gymtrack. Run `gymtrack login` to get started.");
        session.mark_launched().await?;
    }
    session.restore().await?;

    run(&session, args.command).await
}

async fn run(session: &Session, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let user = session.login(&email, &password).await?;
            println!("Logged in as {} ({})", user.display_name(), user.role);
        }
        Commands::Logout => {
            session.logout().await?;
            println!("Logged out");
        }
        Commands::Whoami => {
            gate(session, Role::Logued).await?;
            let user = session.verify().await?;
            println!("{} <{}>", user.display_name(), user.email);
            println!("role: {}", user.role);
            println!("verified: {}", if user.is_verified { "yes" } else { "no" });
        }
        Commands::Register {
            email,
            name,
            last_name,
            password,
            phone,
        } => {
            let form = RegisterRequest {
                email,
                name,
                last_name,
                password_confirmation: password.clone(),
                password,
                phone,
            };
            session.register(&form).await?;
            println!("Account created. Check your inbox for the verification code.");
        }
        Commands::VerifyEmail { email, code } => {
            session.verify_email(&email, &code).await?;
            println!("Email verified");
        }
        Commands::ResendCode { email } => {
            session.resend_verification(&email).await?;
            println!("Verification code sent");
        }
        Commands::ForgotPassword { email } => {
            session.forgot_password(&email).await?;
            println!("Reset code sent");
        }
        Commands::ResetPassword {
            email,
            code,
            new_password,
        } => {
            let form = ResetPasswordRequest {
                email,
                code,
                new_password,
            };
            session.reset_password(&form).await?;
            println!("Password reset");
        }
        Commands::ChangePassword {
            old_password,
            new_password,
        } => {
            gate(session, Role::Logued).await?;
            let form = ChangePasswordRequest {
                old_password,
                new_password,
            };
            session.change_password(&form).await?;
            println!("Password changed");
        }
        Commands::Exercises { name, page, size } => {
            gate(session, Role::Logued).await?;
            let found = session
                .search_exercises(name.as_deref(), PageQuery::new(page, size))
                .await?;
            print_table(&found.items, |e| format!("{:>5}  {}", e.id, e.name));
            println!("page {}/{} ({} total)", found.page, found.pages.max(1), found.total);
        }
        Commands::Catalog { kind } => {
            gate(session, Role::Logued).await?;
            match kind {
                CatalogKind::Muscle => {
                    let rows = session.catalog::<Muscle>().await?;
                    print_table(&rows, |m| format!("{:>5}  {}", m.id, m.name));
                }
                CatalogKind::Difficulty => {
                    let rows = session.catalog::<Difficulty>().await?;
                    print_table(&rows, |d| format!("{:>5}  {}", d.id, d.name));
                }
                CatalogKind::Machine => {
                    let rows = session.catalog::<Machine>().await?;
                    print_table(&rows, |m| format!("{:>5}  {}", m.id, m.name));
                }
                CatalogKind::WeekDay => {
                    let rows = session.catalog::<WeekDay>().await?;
                    print_table(&rows, |d| format!("{:>5}  {}", d.id, d.name));
                }
            }
        }
        Commands::CatalogAdd {
            kind,
            name,
            description,
        } => {
            gate(session, Role::Gym).await?;
            let id = match kind {
                CatalogKind::Muscle => session.create_catalog_entry::<Muscle>(&name).await?.id,
                CatalogKind::Difficulty => {
                    session.create_catalog_entry::<Difficulty>(&name).await?.id
                }
                CatalogKind::Machine => {
                    let machine = NewMachine { name, description };
                    session.create_machine(&machine).await?.id
                }
                CatalogKind::WeekDay => bail!("week days are fixed"),
            };
            println!("Created #{}", id);
        }
        Commands::Routines { page } => {
            gate(session, Role::Logued).await?;
            let plans = session
                .training_plans(PageQuery::new(page, 20))
                .await?;
            print_table(&plans.items, |p| {
                let tags: Vec<&str> = p.tags.iter().map(|t| t.name.as_str()).collect();
                format!("{:>5}  {}  [{}]", p.id, p.name, tags.join(", "))
            });
        }
        Commands::Routine { id } => {
            gate(session, Role::Logued).await?;
            let plan = session.training_plan(id).await?;
            println!("{} (#{})", plan.name, plan.id);
            if let Some(description) = &plan.description {
                println!("{}", description);
            }
            for day in &plan.days {
                println!("day {} (#{})", day.week_day_id, day.id);
                for c in &day.exercise_configurations {
                    println!(
                        "  #{} exercise {}: {} x {}-{} reps, rest {}s{}",
                        c.id,
                        c.exercise_id,
                        c.sets,
                        c.reps_low,
                        c.reps_high,
                        c.rest,
                        c.notes
                            .as_deref()
                            .map(|n| format!(" ({})", n))
                            .unwrap_or_default()
                    );
                }
            }
            println!("{} sets per week", plan.total_sets());
        }
        Commands::NewRoutine {
            name,
            description,
            gym,
        } => {
            let user = session.current_user().await;
            let plan = NewTrainingPlan {
                name,
                description,
                user_email: if gym.is_none() {
                    user.map(|u| u.email)
                } else {
                    None
                },
                gym_id: gym,
            };
            let created = session.create_training_plan(&plan).await?;
            println!("Created routine #{}", created.id);
        }
        Commands::Configure {
            id,
            day,
            exercise,
            sets,
            reps_low,
            reps_high,
            rest,
            notes,
        } => {
            gate(session, Role::Logued).await?;
            let config = NewExerciseConfiguration {
                exercise_id: exercise,
                workout_day_exercise_id: day,
                sets,
                reps_high,
                reps_low,
                rest,
                notes,
            };
            let saved = match id {
                Some(id) => session.update_exercise_configuration(id, &config).await?,
                None => session.create_exercise_configuration(&config).await?,
            };
            println!(
                "Saved #{}: {} x {}-{} reps, rest {}s",
                saved.id, saved.sets, saved.reps_low, saved.reps_high, saved.rest
            );
        }
        Commands::Unconfigure { id } => {
            session.delete_exercise_configuration(id).await?;
            println!("Deleted configuration #{}", id);
        }
        Commands::History {
            exercise_id,
            window,
            last,
        } => {
            gate(session, Role::Logued).await?;
            let report = session.exercise_report(exercise_id, window, last).await?;
            let records = &report.records;
            println!("Exercise #{} ({})", report.exercise_id, report.window);
            println!("  max weight    {:.1} kg", records.max_weight_value());
            println!("  est. 1RM      {:.1} kg", records.one_rep_max_value());
            println!("  best series   {:.1} kg", records.best_series_volume_value());
            println!("  window volume {:.1} kg", report.window_volume);
            println!();
            print_table(&report.sessions, |s| {
                format!(
                    "{}  #{:<5} {} series, {} reps, top {:.1}kg, vol {:.1}",
                    s.date, s.history_id, s.series_count, s.total_reps, s.max_weight, s.volume
                )
            });
            if !report.best_series.is_empty() {
                println!();
                println!("best by reps:");
                for b in &report.best_series {
                    println!("  {:>3} reps  {:.1}kg  ({})", b.reps, b.weight, b.date);
                }
            }
        }
        Commands::Log {
            exercise_id,
            series,
            date,
            notes,
        } => {
            gate(session, Role::Logued).await?;
            let series = series
                .iter()
                .map(|s| sets::parse_series(s))
                .collect::<Result<Vec<_>>>()?;
            let new = NewHistoryPRExercise {
                exercise_id,
                user_email: String::new(),
                date: date.unwrap_or_else(|| Local::now().date_naive()),
                notes,
                series,
            };
            let logged = session.log_session(&new).await?;
            println!("Logged session #{} on {}", logged.id, logged.date);
            for (i, s) in logged.series.iter().enumerate() {
                println!("  {}. {}", i + 1, s);
            }
        }
        Commands::DeleteSession { id } => {
            session.delete_session(id).await?;
            println!("Deleted session #{}", id);
        }
        Commands::Measurements => {
            gate(session, Role::Logued).await?;
            let mut rows = session.body_measurements().await?;
            rows.sort_by_key(|m| m.date);
            print_table(&rows, |m| {
                format!(
                    "{}  weight {}  body fat {}  waist {}",
                    m.date,
                    fmt_opt(m.weight, "kg"),
                    fmt_opt(m.body_fat, "%"),
                    fmt_opt(m.waist, "cm"),
                )
            });
        }
        Commands::Measure {
            date,
            height,
            weight,
            body_fat,
            muscle_mass,
            chest,
            waist,
            hip,
            arm,
            thigh,
        } => {
            gate(session, Role::Logued).await?;
            let measurement = NewBodyMeasurement {
                user_email: String::new(),
                date,
                height,
                weight,
                body_fat,
                muscle_mass,
                chest,
                waist,
                hip,
                arm,
                thigh,
            };
            let saved = session.save_measurement(&measurement).await?;
            println!("Saved measurement #{} for {}", saved.id, saved.date);
        }
        Commands::Progress => {
            gate(session, Role::Logued).await?;
            match session.measurement_progress().await? {
                None => println!("No measurements yet"),
                Some(p) => {
                    println!("{} to {}", p.from, p.to);
                    println!("  weight      {}", fmt_delta(p.weight, "kg"));
                    println!("  body fat    {}", fmt_delta(p.body_fat, "%"));
                    println!("  muscle mass {}", fmt_delta(p.muscle_mass, "kg"));
                    println!("  waist       {}", fmt_delta(p.waist, "cm"));
                    if let Some(bmi) = p.current_bmi {
                        println!("  BMI now     {:.1}", bmi);
                    }
                }
            }
        }
        Commands::Gyms => {
            gate(session, Role::Gym).await?;
            let gyms = session.my_gyms().await?;
            print_table(&gyms, |g| {
                format!("{:>5}  {}  {}  cap {}", g.id, g.name, g.address, g.capacity)
            });
        }
        Commands::Members { gym_id, page } => {
            gate(session, Role::Gym).await?;
            let members = session
                .gym_members(gym_id, PageQuery::new(page, 50))
                .await?;
            let today = Local::now().date_naive();
            print_table(&members.items, |m| {
                format!(
                    "{}  {} to {}{}{}",
                    m.user_email,
                    m.start_date,
                    m.end_date,
                    if m.is_premium { "  premium" } else { "" },
                    if m.is_active_on(today) { "" } else { "  (inactive)" }
                )
            });
        }
        Commands::GrantMembership {
            gym,
            email,
            start,
            end,
            premium,
            can_edit_routines,
            can_manage_members,
        } => {
            gate(session, Role::Gym).await?;
            let membership = NewUserGym {
                user_email: email,
                gym_id: gym,
                start_date: start,
                end_date: end,
                is_premium: premium,
                can_edit_routines,
                can_manage_members,
            };
            let created = session.grant_membership(&membership).await?;
            println!("Membership #{} created", created.id);
        }
        Commands::NotifyToken { token } => {
            session.register_push_token(&token).await?;
            println!("Push token registered");
        }
        Commands::Notify { title, body, email } => {
            gate(session, Role::Admin).await?;
            let message = PushMessage {
                title,
                body,
                user_email: email,
            };
            session.send_notification(&message).await?;
            println!("Notification sent");
        }
        Commands::Interactive { exercise_id } => {
            gate(session, Role::Logued).await?;
            let terminal = ratatui::init();
            let result = browser::run_history_browser(terminal, session, exercise_id).await;
            ratatui::restore();
            result?;
        }
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    value
        .map(|v| format!("{:.1}{}", v, unit))
        .unwrap_or_else(|| "-".to_string())
}

fn fmt_delta(value: Option<f64>, unit: &str) -> String {
    value
        .map(|v| format!("{:+.1}{}", v, unit))
        .unwrap_or_else(|| "-".to_string())
}
