use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Datelike, Local};

use event_countdown::app::EventController;
use event_countdown::config::AppConfig;
use event_countdown::models::event::Event;
use event_countdown::models::settings::{StartupRoute, ThemePreference};
use event_countdown::services::countdown::CountdownTicker;
use event_countdown::services::database::Database;
use event_countdown::services::holiday::NagerHolidayFetcher;
use event_countdown::services::image::ImageStore;
use event_countdown::services::notification::{
    dispatch_due, DispatchReport, EventNotification, NotificationService, Notifier,
};
use event_countdown::services::settings::SettingsService;
use event_countdown::utils::date::parse_user_datetime;

use super::render::{event_details, event_line, holiday_line, snapshot_line};
use super::{Cli, Commands};

/// Everything a command needs, opened once per invocation.
struct Session {
    config: AppConfig,
    db: Database,
}

impl Session {
    fn open(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => AppConfig::load_from(path)?,
            None => AppConfig::load()?,
        };

        let db_path = config.database_path();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let db = Database::new(&db_path.to_string_lossy())?;
        db.initialize_schema()?;
        log::info!("Using database {:?}", db_path);

        Ok(Self { config, db })
    }

    fn controller(&self) -> Result<EventController<'_>> {
        let fetcher = NagerHolidayFetcher::new(&self.config.holidays.api_base_url)?;
        Ok(EventController::new(&self.db, Box::new(fetcher))
            .with_holiday_anchor(self.config.holidays.anchor()?)
            .with_auto_seed(self.config.holidays.auto_seed))
    }

    fn images(&self) -> ImageStore {
        ImageStore::new(self.config.image_dir())
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let ctx = Session::open(&cli)?;
    run_onboarding_gate(&ctx)?;

    match cli.command {
        Commands::Add {
            title,
            at,
            description,
            color,
            image,
        } => cmd_add(&ctx, title, &at, description, color, image.as_deref()),
        Commands::Edit {
            id,
            title,
            description,
            at,
            color,
            image,
        } => cmd_edit(&ctx, id, title, description, at, color, image.as_deref()),
        Commands::Delete { id } => cmd_delete(&ctx, id),
        Commands::List { past } => cmd_list(&ctx, past),
        Commands::Show { id } => cmd_show(&ctx, id),
        Commands::Holidays {
            year,
            country,
            list,
        } => cmd_holidays(&ctx, year, country, list),
        Commands::Watch => cmd_watch(&ctx),
        Commands::Settings {
            theme,
            language,
            onboarding_completed,
            reset,
        } => cmd_settings(&ctx, theme, language, onboarding_completed, reset),
        Commands::NotifyTest => cmd_notify_test(),
    }
}

fn run_onboarding_gate(ctx: &Session) -> Result<()> {
    let settings = SettingsService::new(&ctx.db);
    if StartupRoute::for_settings(&settings.get()?) == StartupRoute::Onboarding {
        println!("Welcome to Event Countdown!");
        println!("  Add events with `event-countdown add <title> --at <date>`.");
        println!("  Pull in public holidays with `event-countdown holidays`.");
        println!("  Keep `event-countdown watch` running to see live countdowns and get notified.");
        println!();
        settings.set_onboarding_completed(true)?;
    }
    Ok(())
}

/// Turn the controller's error cell into a command failure.
fn controller_error(controller: &EventController<'_>) -> anyhow::Error {
    anyhow!(controller
        .error()
        .unwrap_or_else(|| "Unknown error".to_string()))
}

fn cmd_add(
    ctx: &Session,
    title: String,
    at: &str,
    description: String,
    color: Option<String>,
    image: Option<&Path>,
) -> Result<()> {
    let controller = ctx.controller()?;
    let target = parse_user_datetime(at, ctx.config.holidays.anchor()?)?;

    let mut event = Event::new(title, target);
    event.description = description;
    if let Some(color) = color {
        event.color = color;
    }
    if let Some(image) = image {
        event.background_image = Some(ctx.images().import(image)?.to_string_lossy().into_owned());
    }

    let image_path = event.background_image.clone();
    let Some(added) = controller.add_event(event) else {
        discard_image(ctx, image_path.as_deref(), None);
        return Err(controller_error(&controller));
    };
    println!(
        "Added event {}: {}",
        added.id.unwrap_or_default(),
        event_line(&added, Local::now()).trim_start()
    );
    Ok(())
}

fn cmd_edit(
    ctx: &Session,
    id: i64,
    title: Option<String>,
    description: Option<String>,
    at: Option<String>,
    color: Option<String>,
    image: Option<&Path>,
) -> Result<()> {
    let controller = ctx.controller()?;
    let Some(mut event) = controller.find_event(id) else {
        bail!("Event {} not found", id);
    };
    let previous_image = event.background_image.clone();

    if let Some(title) = title {
        event.title = title;
    }
    if let Some(description) = description {
        event.description = description;
    }
    if let Some(at) = at {
        event.target = parse_user_datetime(&at, ctx.config.holidays.anchor()?)?;
    }
    if let Some(color) = color {
        event.color = color;
    }
    if let Some(image) = image {
        event.background_image = Some(ctx.images().import(image)?.to_string_lossy().into_owned());
    }

    let current_image = event.background_image.clone();
    if !controller.update_event(event) {
        discard_image(ctx, current_image.as_deref(), previous_image.as_deref());
        return Err(controller_error(&controller));
    }
    discard_image(ctx, previous_image.as_deref(), current_image.as_deref());

    if let Some(updated) = controller.find_event(id) {
        println!("Updated event {}", id);
        print!("{}", event_details(&updated, Local::now()));
    }
    Ok(())
}

fn cmd_delete(ctx: &Session, id: i64) -> Result<()> {
    let controller = ctx.controller()?;
    let Some(event) = controller.find_event(id) else {
        bail!("Event {} not found", id);
    };

    if !controller.delete_event(&event) {
        return Err(controller_error(&controller));
    }

    discard_image(ctx, event.background_image.as_deref(), None);

    println!("Deleted event {}: {}", id, event.title);
    Ok(())
}

/// Drop `previous` from the image store unless the event still uses it.
fn discard_image(ctx: &Session, previous: Option<&str>, current: Option<&str>) {
    if let Err(err) = ctx.images().discard_replaced(previous, current) {
        log::warn!("Failed to remove background image {:?}: {:#}", previous, err);
    }
}

fn cmd_list(ctx: &Session, past: bool) -> Result<()> {
    let controller = ctx.controller()?;
    let now = Local::now();

    let events = if past {
        controller.past_events(now)
    } else {
        controller.upcoming_events(now)
    };

    if events.is_empty() {
        if past {
            println!("No past events yet.");
        } else {
            println!("No upcoming events. Add one with `event-countdown add`.");
        }
        return Ok(());
    }

    for event in &events {
        println!("{}", event_line(event, now));
    }
    Ok(())
}

fn cmd_show(ctx: &Session, id: i64) -> Result<()> {
    let controller = ctx.controller()?;
    match controller.find_event(id) {
        Some(event) => print!("{}", event_details(&event, Local::now())),
        None => println!("Event not found"),
    }
    Ok(())
}

fn cmd_holidays(
    ctx: &Session,
    year: Option<i32>,
    country: Option<String>,
    list: bool,
) -> Result<()> {
    let controller = ctx.controller()?;
    let year = year.unwrap_or_else(|| Local::now().year());
    let country = country.unwrap_or_else(|| ctx.config.holidays.country_code.clone());

    let before = controller.events().len();
    if !controller.load_holidays(year, &country) {
        return Err(controller_error(&controller));
    }
    if let Some(message) = controller.error() {
        bail!(message);
    }

    if list {
        for holiday in controller.holidays() {
            println!("{}", holiday_line(&holiday));
        }
        println!();
    }

    let created = controller.events().len().saturating_sub(before);
    println!(
        "Fetched {} holidays for {} {}; added {} new events.",
        controller.holidays().len(),
        country.to_ascii_uppercase(),
        year,
        created
    );
    Ok(())
}

fn cmd_watch(ctx: &Session) -> Result<()> {
    let controller = ctx.controller()?;
    let notifier = NotificationService::new();
    let interval = ctx.config.countdown.tick_interval();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        let (ticker, mut snapshots) =
            CountdownTicker::spawn(controller.subscribe_events(), interval);
        let mut poll = tokio::time::interval(interval);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => break,
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let frame: Vec<String> = snapshots
                        .borrow_and_update()
                        .iter()
                        .map(snapshot_line)
                        .collect();
                    draw(&frame)?;
                }
                _ = poll.tick() => {
                    deliver_due(&ctx.db, Local::now(), &notifier);
                    // Pick up edits made by other invocations.
                    controller.refresh_events();
                }
            }
        }

        drop(ticker);
        Ok::<(), anyhow::Error>(())
    })?;

    println!();
    Ok(())
}

/// One delivery pass for the watch loop. Store failures are logged and the
/// jobs stay queued for the next pass.
fn deliver_due(db: &Database, now: DateTime<Local>, notifier: &dyn Notifier) -> DispatchReport {
    match dispatch_due(db.connection(), now, notifier) {
        Ok(report) => {
            if report.total() > 0 {
                log::info!(
                    "Dispatched notifications: {} delivered, {} skipped, {} failed",
                    report.delivered,
                    report.skipped,
                    report.failed
                );
            }
            report
        }
        Err(err) => {
            log::error!("Failed to dispatch due notifications: {:#}", err);
            DispatchReport::default()
        }
    }
}

fn draw(lines: &[String]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "\x1B[2J\x1B[H")?;
    writeln!(stdout, "Event Countdown  (Ctrl-C to quit)")?;
    writeln!(stdout)?;
    if lines.is_empty() {
        writeln!(stdout, "No events.")?;
    }
    for line in lines {
        writeln!(stdout, "{}", line)?;
    }
    stdout.flush()?;
    Ok(())
}

fn cmd_settings(
    ctx: &Session,
    theme: Option<String>,
    language: Option<String>,
    onboarding_completed: Option<bool>,
    reset: bool,
) -> Result<()> {
    let service = SettingsService::new(&ctx.db);

    if reset {
        service.reset()?;
    }
    if let Some(theme) = theme {
        service.set_theme(ThemePreference::parse(&theme))?;
    }
    if let Some(language) = language {
        service.set_language(&language)?;
    }
    if let Some(completed) = onboarding_completed {
        service.set_onboarding_completed(completed)?;
    }

    let settings = service.get()?;
    println!("theme:                {}", settings.theme);
    println!("language:             {}", settings.language);
    println!("onboarding completed: {}", settings.onboarding_completed);
    Ok(())
}

fn cmd_notify_test() -> Result<()> {
    let notification = EventNotification::event_time(0, "Test Event");
    NotificationService::new().notify(&notification)?;
    println!("Test notification sent.");
    Ok(())
}
