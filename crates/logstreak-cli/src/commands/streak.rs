use logstreak_core::date::start_of_day;
use logstreak_core::{
    parse_formatted_date, Clock, Config, Database, FixedClock, Streak, SystemClock, Transition,
};

fn open(config: &Config) -> Result<Database, Box<dyn std::error::Error>> {
    tracing::debug!(db_file = %config.storage.db_file, "opening streak database");
    Ok(Database::open(config)?)
}

/// The system clock, or midnight of `date` when one is given.
pub fn clock_for(date: Option<&str>) -> Result<Box<dyn Clock>, Box<dyn std::error::Error>> {
    match date {
        Some(raw) => {
            let day = parse_formatted_date(raw).ok_or_else(|| format!("invalid date: {raw}"))?;
            Ok(Box::new(FixedClock(start_of_day(day))))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

fn describe(streak: &Streak) -> String {
    let days = if streak.current_count == 1 { "day" } else { "days" };
    format!(
        "{} {days} (since {}, last login {})",
        streak.current_count,
        streak.formatted_start_date(),
        streak.formatted_last_login_date()
    )
}

pub fn check(clock: &dyn Clock, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut db = open(&config)?;
    let eval = config.engine().check_in(&mut db, clock)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&eval)?);
        return Ok(());
    }

    let verb = match eval.transition {
        Transition::Started => "Streak started",
        Transition::SameDay => "Already checked in today",
        Transition::Continued => "Streak extended",
        Transition::Reset => "Streak reset",
        Transition::Backdated => "Date is before the last login, streak unchanged",
    };
    println!("{verb}: {}", describe(&eval.streak));
    Ok(())
}

pub fn show(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = open(&config)?;
    let streak = config.engine().current(&db)?;

    match (streak, json) {
        (Some(streak), true) => println!("{}", serde_json::to_string_pretty(&streak)?),
        (None, true) => println!("null"),
        (Some(streak), false) => println!("{}", describe(&streak)),
        (None, false) => println!("no streak recorded"),
    }
    Ok(())
}

pub fn clear() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = open(&config)?;
    if db.kv_delete(&config.streak.key)? {
        println!("streak cleared");
    } else {
        println!("no streak recorded");
    }
    Ok(())
}
