//! velopro cli - replay recorded rides and manage the local rider account

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use argopt::{cmd_group, subcmd};
use csv::Reader;
use time::format_description::well_known;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use velopro::accounts::{AccountService, BikeType, JsonFileStore, SignupForm};
use velopro::challenges::default_challenges;
use velopro::feed::{ActivityFeed, DEFAULT_TITLE};
use velopro::sources::CsvSource;
use velopro::{Configs, GpxExporter, SampleSource};

/// CLI of velopro - Replay your recorded rides and keep a local rider account
#[cmd_group(commands = [replay, signup, login, logout, whoami, challenges])]
fn main() -> Result<(), String> {}

/// Replay a CSV recorded ride, write it as GPX and print the resulting activity
#[subcmd]
fn replay(
    /// CSV file source
    csv_path: String,
    /// GPX path file destination
    destination: String,
    /// Ride title. Default: Afternoon Ride
    #[opt(long)]
    title: Option<String>,
    /// Ignore samples before this time, RFC3339 format
    #[opt(long)]
    start: Option<String>,
    /// Ignore samples after this time, RFC3339 format
    #[opt(long)]
    end: Option<String>,
    /// Fields and tracking configuration. Default: .velopro.yaml, ~/.velopro.yaml
    #[opt(long)]
    config: Option<String>,
    /// Account storage directory. Default: the user data directory
    #[opt(long)]
    store: Option<String>,
) -> Result<(), String> {
    init_logging();

    let start = parse_time(start, "start")?;
    let end = parse_time(end, "end")?;
    let configs = load_configs(config);

    let csv = File::open(csv_path)
        .map_err(|e| format!("Failed on open the CSV file: {}", e))?;
    let mut source = CsvSource::new(Reader::from_reader(csv), Some(configs.fields));
    let samples = source
        .fetch(start, end)
        .map_err(|e| format!("Failed on read the samples: {}", e))?;

    let replayed = velopro::replay(samples, configs.tracking)
        .map_err(|e| format!("Failed on replay the ride: {}", e))?;
    for failure in &replayed.failures {
        tracing::warn!(error = %failure, "Location failure during replay");
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let mut gpx = GpxExporter::empty();
    gpx.ride(&title, &replayed.summary);
    let doc = gpx.generate();

    let destination = File::create(destination)
        .map_err(|e| format!("Failed on create the destination file: {}", e))?;
    let mut writer = BufWriter::new(destination);
    gpx::write(&doc, &mut writer).map_err(|e| e.to_string())?;

    let mut accounts = accounts(store);
    let user = accounts
        .current_user()
        .map_err(|e| format!("Failed on load the current rider: {}", e))?;

    let mut feed = ActivityFeed::new();
    let activity = feed.publish(replayed.summary, user.as_ref(), Some(title.as_str()));

    let report = serde_json::json!({
        "id": activity.id,
        "title": activity.title,
        "user": activity.user_name,
        "distanceKm": activity.distance_km,
        "durationSeconds": activity.duration_seconds,
        "averageSpeedKmh": activity.average_speed_kmh,
        "maxSpeedKmh": activity.max_speed_kmh,
        "elevationM": activity.elevation_m,
        "calories": activity.calories,
        "points": activity.points.len(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?
    );

    Ok(())
}

/// Register a rider and sign in
#[subcmd]
fn signup(
    /// E-mail used to sign in
    email: String,
    /// Password
    password: String,
    /// Unique username
    username: String,
    /// Display name
    name: String,
    /// MTB, Speed, Gravel or Urban
    #[opt(long)]
    bike: Option<String>,
    #[opt(long)]
    city: Option<String>,
    #[opt(long)]
    country: Option<String>,
    /// Account storage directory. Default: the user data directory
    #[opt(long)]
    store: Option<String>,
) -> Result<(), String> {
    init_logging();

    let bike_type = match bike {
        Some(b) => b.parse::<BikeType>()?,
        None => BikeType::default(),
    };

    let form = SignupForm {
        email,
        password,
        username,
        name,
        bike_type,
        city: city.unwrap_or_default(),
        country: country.unwrap_or_default(),
        ..SignupForm::default()
    };

    let user = accounts(store)
        .signup(form)
        .map_err(|e| format!("Failed on sign up: {}", e))?;
    println!("Welcome, {} (@{})", user.name, user.username);

    Ok(())
}

/// Sign in with e-mail and password
#[subcmd]
fn login(
    email: String,
    password: String,
    /// Account storage directory. Default: the user data directory
    #[opt(long)]
    store: Option<String>,
) -> Result<(), String> {
    init_logging();

    let user = accounts(store)
        .login(&email, &password)
        .map_err(|e| format!("Failed on sign in: {}", e))?;
    println!("Welcome back, {}", user.name);

    Ok(())
}

/// Sign out the current rider
#[subcmd]
fn logout(
    /// Account storage directory. Default: the user data directory
    #[opt(long)]
    store: Option<String>,
) -> Result<(), String> {
    init_logging();

    accounts(store)
        .logout()
        .map_err(|e| format!("Failed on sign out: {}", e))
}

/// Show the signed-in rider
#[subcmd]
fn whoami(
    /// Account storage directory. Default: the user data directory
    #[opt(long)]
    store: Option<String>,
) -> Result<(), String> {
    init_logging();

    match accounts(store)
        .current_user()
        .map_err(|e| format!("Failed on load the current rider: {}", e))?
    {
        Some(user) => println!(
            "{} (@{}) - {} - {}, {}",
            user.name, user.username, user.bike_type, user.city, user.country
        ),
        None => println!("Not signed in"),
    }

    Ok(())
}

/// List the dashboard challenges
#[subcmd]
fn challenges() -> Result<(), String> {
    for c in default_challenges() {
        println!(
            "{} {} - {:.0}/{:.0} ({:.0}%) until {}",
            c.reward_icon,
            c.title,
            c.current,
            c.goal,
            c.progress() * 100.0,
            c.deadline
        );
    }

    Ok(())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("velopro=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_time(raw: Option<String>, what: &str) -> Result<Option<OffsetDateTime>, String> {
    raw.map(|r| {
        OffsetDateTime::parse(&r, &well_known::Rfc3339)
            .map_err(|e| format!("Failed on parse the {} time: {}", what, e))
    })
    .transpose()
}

fn accounts(store: Option<String>) -> AccountService<JsonFileStore, JsonFileStore> {
    let dir = match store {
        Some(s) => PathBuf::from(s),
        None => dirs::data_dir()
            .map(|d| d.join("velopro"))
            .unwrap_or_else(|| PathBuf::from(".velopro")),
    };

    let store = JsonFileStore::new(dir);

    AccountService::new(store.clone(), store)
}

/// Load the current config
fn load_configs(provided: Option<String>) -> Configs {
    let mut options = vec![];

    if let Some(sprovided) = provided {
        options.push(sprovided);
    }

    options.push(".velopro.yaml".to_string());

    if let Some(home) = dirs::home_dir() {
        if let Some(shome) = home.to_str() {
            options.push(format!("{}/.velopro.yaml", shome));
        }
    }

    for fi in options {
        if let Ok(s) = fs::read_to_string(&fi) {
            match Configs::from_yaml(&s) {
                Ok(conf) => return conf,
                Err(e) => tracing::warn!(file = %fi, error = %e, "Ignoring invalid config"),
            }
        }
    }

    Configs::default()
}
