use std::fmt::{self, Write};

use skyboard_core::DashboardView;

/// Plain-text rendering of a dashboard view.
pub fn dashboard(view: &DashboardView) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_dashboard(&mut out, view)?;
    Ok(out)
}

fn write_dashboard(out: &mut impl Write, view: &DashboardView) -> fmt::Result {
    let c = &view.current;

    writeln!(out, "{}, {}  ·  {}", c.name, c.country, c.local_date)?;
    writeln!(out, "{}", c.local_time)?;
    writeln!(out)?;
    writeln!(out, "  {}  {}  {}", c.icon.glyph(), c.temperature, c.description)?;
    if c.conditions.len() > 1 {
        writeln!(out, "  Conditions  {}", c.conditions.join(", "))?;
    }
    writeln!(out, "  Feels like {}", c.feels_like)?;
    writeln!(out, "  High / Low  {} / {}", c.high, c.low)?;
    writeln!(out, "  Humidity    {}", c.humidity)?;
    writeln!(out, "  Wind        {}", c.wind)?;
    writeln!(out, "  Pressure    {}", c.pressure)?;

    if !view.hourly.is_empty() {
        writeln!(out)?;
        writeln!(out, "Hourly Forecast")?;
        for cell in &view.hourly {
            writeln!(out, "  {:>8}  {}  {:>6}", cell.time, cell.icon.glyph(), cell.temperature)?;
        }
    }

    if !view.daily.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}-Day Forecast", view.daily.len())?;
        for day in &view.daily {
            writeln!(
                out,
                "  {:<6} {}  {:>6} .. {:<6}",
                day.label,
                day.icon.glyph(),
                day.low,
                day.high
            )?;
        }
    }

    Ok(())
}
