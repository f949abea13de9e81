//! CLI entry point for the NEO tracker.
//!
//! Loads near-Earth-object windows from the NeoWs feed, prints filtered and
//! sorted views, compares selected objects and exercises the identity
//! provider.

use anyhow::{Result, anyhow, bail};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use neo_tracker::auth::{Session, select_provider};
use neo_tracker::compare::{ScatterPoint, plot_points, project_for_chart, summarize};
use neo_tracker::config::{AuthConfig, FeedConfig};
use neo_tracker::dashboard::{DashboardState, DateWindow, SIGN_IN_REQUIRED};
use neo_tracker::derive::{average_diameter, closest_approach};
use neo_tracker::feed::{DEFAULT_WINDOW_DAYS, NeoFeedClient};
use neo_tracker::filter::{FilterConfig, SortBy, SortOrder};
use neo_tracker::format::{
    format_astronomical, format_diameter, format_distance, format_lunar, format_velocity,
    format_velocity_kms,
};
use neo_tracker::model::Neo;
use neo_tracker::output::{append_rows, print_json, print_pretty, render_row};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "neo_tracker")]
#[command(about = "Browse and compare near-Earth objects from the NeoWs feed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct WindowArgs {
    /// First day of the window (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    start: Option<NaiveDate>,

    /// Days per window
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_DAYS)]
    days: u64,
}

impl WindowArgs {
    fn window(&self) -> DateWindow {
        DateWindow::new(
            self.start.unwrap_or_else(|| Utc::now().date_naive()),
            self.days,
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List objects approaching within one or more date windows
    Feed {
        #[command(flatten)]
        window: WindowArgs,

        /// Number of consecutive windows to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,

        /// Only show potentially hazardous objects
        #[arg(long, default_value_t = false)]
        hazardous: bool,

        #[arg(long, value_enum, default_value_t = SortBy::Date)]
        sort_by: SortBy,

        #[arg(long, value_enum, default_value_t = SortOrder::Asc)]
        order: SortOrder,

        /// Maximum rows to print
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Print the view as JSON instead of rows
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the full record for one object
    Detail {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Find an object on the browse listing by id or reference id
    Lookup {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Compare objects from a window by id
    Compare {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        window: WindowArgs,

        /// CSV file to append comparison rows to
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print summary and rows as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Account used to sign in before comparing
        #[arg(long, env = "NEO_TRACKER_EMAIL")]
        email: Option<String>,

        #[arg(long, env = "NEO_TRACKER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in with the configured identity provider
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account with the configured identity provider
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/neo_tracker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("neo_tracker.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Feed {
            window,
            pages,
            hazardous,
            sort_by,
            order,
            limit,
            json,
        } => {
            let client = NeoFeedClient::from_config(&FeedConfig::from_env())?;
            let filter = FilterConfig {
                hazardous_only: hazardous,
                sort_by,
                sort_order: order,
            };
            feed(&client, window.window(), pages, filter, limit, json).await?;
        }
        Commands::Detail { id } => {
            let client = NeoFeedClient::from_config(&FeedConfig::from_env())?;
            let neo = client.fetch_neo(&id).await?;
            print_pretty(&neo);
            print_detail(&neo);
        }
        Commands::Lookup { id } => {
            let client = NeoFeedClient::from_config(&FeedConfig::from_env())?;
            let neo = client.lookup_neo(&id).await?;
            print_detail(&neo);
        }
        Commands::Compare {
            ids,
            window,
            csv,
            json,
            email,
            password,
        } => {
            let client = NeoFeedClient::from_config(&FeedConfig::from_env())?;
            let session = Session::new(select_provider(&AuthConfig::from_env())?);
            if let (Some(email), Some(password)) = (email, password) {
                if let Err(e) = session.sign_in(&email, &password).await {
                    error!(error = %e, "Sign-in failed");
                    bail!("{SIGN_IN_REQUIRED} ({e})");
                }
            }
            let result = compare(&client, &session, window.window(), &ids, csv.as_deref(), json).await;
            session.sign_out().await;
            result?;
        }
        Commands::SignIn { email, password } => {
            authenticate(&email, &password, false).await?;
        }
        Commands::SignUp { email, password } => {
            authenticate(&email, &password, true).await?;
        }
    }

    Ok(())
}

/// Loads `pages` consecutive windows and prints the filtered view.
#[tracing::instrument(skip(client, filter), fields(start = %window.start, days = window.days))]
async fn feed(
    client: &NeoFeedClient<neo_tracker::fetch::BasicClient>,
    window: DateWindow,
    pages: usize,
    filter: FilterConfig,
    limit: usize,
    json: bool,
) -> Result<()> {
    let mut state = DashboardState::with_window(window);
    if !state.load(client).await {
        bail!(
            "{} (run the command again to retry)",
            state.error().unwrap_or("fetch failed")
        );
    }

    for page in 1..pages {
        if !state.load_more(client).await {
            warn!(page, error = state.error(), "Stopping early, showing what was loaded");
            break;
        }
    }

    state.set_filter(filter);
    state.show_at_least(limit);
    let mut shown = state.page();
    shown.truncate(limit);
    info!(
        loaded = state.neos().len(),
        visible = state.visible().len(),
        sort_by = %filter.sort_by,
        "Objects found"
    );

    if json {
        print_json(&shown)?;
    } else {
        for neo in &shown {
            info!("{}", render_row(neo));
        }
    }

    let remaining = state.visible().len().saturating_sub(shown.len());
    if remaining > 0 {
        info!(remaining, "More objects available, raise --limit to see them");
    }
    Ok(())
}

/// Compares `ids` from the window for the signed-in user of `session`.
#[tracing::instrument(skip(client, session, csv), fields(start = %window.start, days = window.days))]
async fn compare(
    client: &NeoFeedClient<neo_tracker::fetch::BasicClient>,
    session: &Session,
    window: DateWindow,
    ids: &[String],
    csv: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut state = DashboardState::with_window(window);
    if state.load_comparison(session, client, ids).await == 0 {
        return Err(anyhow!(
            "{}",
            state.error().unwrap_or("No NEO IDs matched")
        ));
    }

    let selected = state.selected();
    let summary = summarize(selected);
    let rows = project_for_chart(selected);
    let points = plot_points(&rows);
    let (safe, hazardous) = ScatterPoint::split_by_hazard(&points);

    if json {
        print_json(&serde_json::json!({
            "summary": summary,
            "rows": rows,
            "scatter": points,
        }))?;
    } else {
        info!(
            total = summary.total,
            hazardous = summary.hazardous,
            mean_diameter = %format_diameter(summary.mean_diameter_km, 2),
            "Comparison summary"
        );
        for row in &rows {
            info!(
                label = %row.label,
                diameter_km = row.diameter_km,
                hazardous = row.hazardous,
                distance_km = row.distance_km,
                velocity_kmh = row.velocity_kmh,
                "Row"
            );
        }
        info!(
            plotted = points.len(),
            non_hazardous = safe.len(),
            hazardous = hazardous.len(),
            "Distance vs velocity points"
        );
    }

    if let Some(path) = csv {
        append_rows(path, &rows)?;
        info!(path = %path.display(), rows = rows.len(), "Comparison exported");
    }
    Ok(())
}

fn print_detail(neo: &Neo) {
    let range = &neo.estimated_diameter.kilometers;
    info!(
        id = %neo.id,
        name = %neo.name,
        hazardous = neo.is_potentially_hazardous,
        sentry = neo.is_sentry_object,
        absolute_magnitude = neo.absolute_magnitude,
        average_diameter = %format_diameter(average_diameter(neo), 3),
        diameter_range = %format!(
            "{} - {}",
            format_diameter(range.estimated_diameter_min, 3),
            format_diameter(range.estimated_diameter_max, 3)
        ),
        url = %neo.external_reference_url,
        "Object"
    );

    match closest_approach(neo) {
        Some(a) => info!(
            date = %a.full_date.as_deref().unwrap_or(&a.date),
            orbiting_body = %a.orbiting_body,
            distance = %format_distance(&a.miss_distance.kilometers),
            lunar = %format_lunar(&a.miss_distance.lunar),
            astronomical = %format_astronomical(&a.miss_distance.astronomical),
            velocity = %format_velocity(&a.relative_velocity.kilometers_per_hour),
            velocity_kms = %format_velocity_kms(&a.relative_velocity.kilometers_per_second),
            "Closest approach"
        ),
        None => info!("No close approach data"),
    }

    if let Some(orbit) = &neo.orbital_data {
        info!(
            orbit_id = %orbit.orbit_id,
            period_days = %orbit.orbital_period,
            eccentricity = %orbit.eccentricity,
            inclination_deg = %orbit.inclination,
            "Orbital data"
        );
    }
}

/// Runs one sign-in or sign-up through a session and logs the change
/// notifications it produces.
async fn authenticate(email: &str, password: &str, sign_up: bool) -> Result<()> {
    let provider = select_provider(&AuthConfig::from_env())?;
    let session = Session::new(provider);

    let mut changes = session.subscribe();
    let watcher = tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let user = changes.borrow_and_update().clone();
            match user {
                Some(user) => info!(user_id = %user.id, email = ?user.email, "Session changed"),
                None => info!("Session cleared"),
            }
        }
    });

    let result = if sign_up {
        session.sign_up(email, password).await
    } else {
        session.sign_in(email, password).await
    };

    match result {
        Ok(outcome) if !outcome.session_active => {
            info!(user_id = %outcome.user.id, "Account created, confirm the email address to sign in");
        }
        Ok(_) => {
            info!(provider = session.provider_name(), "Signed in");
            session.sign_out().await;
        }
        Err(e) => error!(error = %e, "Authentication failed"),
    }

    drop(session);
    let _ = watcher.await;
    Ok(())
}
