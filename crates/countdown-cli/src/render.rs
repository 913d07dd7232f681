//! Terminal rendering of the countdown and celebration views.

use std::io::{self, Write};

use countdown_core::{CountdownView, Event, ThemeId};
use rand::seq::SliceRandom;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Number of wishes shown under the celebration banner.
const WISHES_SHOWN: usize = 5;

/// ANSI foreground roughly matching each theme's accent colour.
fn accent(theme: ThemeId) -> &'static str {
    match theme {
        ThemeId::Default => "\x1b[36m",
        ThemeId::FierySunset => "\x1b[33m",
        ThemeId::ElectricSpring => "\x1b[93m",
        ThemeId::RoyalTwilight => "\x1b[35m",
        ThemeId::CrimsonPassion => "\x1b[91m",
        ThemeId::MysticOcean => "\x1b[95m",
        ThemeId::NeonDream => "\x1b[96m",
    }
}

pub struct Renderer {
    json: bool,
    color: bool,
}

impl Renderer {
    pub fn new(json: bool, color: bool) -> Self {
        Self { json, color }
    }

    fn paint(&self, code: &'static str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Draw the state after `event`.
    pub fn event(&self, event: &Event, view: &CountdownView) -> io::Result<()> {
        let mut out = io::stdout().lock();
        if self.json {
            let line = serde_json::to_string(event).map_err(io::Error::other)?;
            writeln!(out, "{line}")?;
            return out.flush();
        }
        if view.celebration_active {
            return Ok(());
        }
        if matches!(event, Event::CountdownStarted { .. }) {
            let heading = match view.target.year {
                Some(_) => "New Year Countdown".to_string(),
                None => "Countdown".to_string(),
            };
            writeln!(
                out,
                "{}",
                self.paint(accent(view.theme.id), &format!("{BOLD}{heading}"))
            )?;
            writeln!(out, "{}", self.paint(DIM, "days  hrs  min  sec"))?;
        }
        let t = &view.time;
        write!(
            out,
            "\r{}",
            self.paint(
                accent(view.theme.id),
                &format!("{} : {} : {} : {}", t.days, t.hours, t.minutes, t.seconds)
            )
        )?;
        out.flush()
    }

    /// Draw the celebration banner and a random handful of wishes.
    pub fn celebrate(&self, view: &CountdownView) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        let color = accent(view.theme.id);
        writeln!(out)?;
        match view.target.year {
            Some(year) => {
                writeln!(out, "{}", self.paint(color, &format!("{BOLD}{year}")))?;
                writeln!(out, "{}", self.paint(BOLD, "Happy New Year!"))?;
            }
            None => writeln!(out, "{}", self.paint(color, &format!("{BOLD}Time's up!")))?,
        }

        let mut rng = rand::thread_rng();
        for wish in view.wishes.choose_multiple(&mut rng, WISHES_SHOWN) {
            writeln!(out, "  {}", self.paint(DIM, &format!("* {wish}")))?;
        }
        out.flush()
    }

    pub fn interrupted(&self) -> io::Result<()> {
        if !self.json {
            println!();
        }
        Ok(())
    }
}
