use std::io::{self, Write};

use vacant_core::PlatformVacancies;
use vacant_engine::SearchOutcome;

const RULE: &str = "--------------------";

/// Prints every platform's vacancies under a header with the match count.
pub fn print_vacancies(out: &mut impl Write, vacancies: &PlatformVacancies) -> io::Result<()> {
    for (platform, records) in vacancies {
        writeln!(out)?;
        writeln!(out, "{RULE} {platform} {RULE}")?;
        writeln!(out, "{RULE} {} {RULE}", records.len())?;
        if records.is_empty() {
            writeln!(out, "No vacancies matching the specified criteria.")?;
            writeln!(out)?;
            continue;
        }
        for record in records {
            writeln!(out, "{record}")?;
        }
    }
    Ok(())
}

pub fn print_outcome(out: &mut impl Write, outcome: &SearchOutcome) -> io::Result<()> {
    print_vacancies(out, &outcome.vacancies)?;
    for (platform, err) in &outcome.failures {
        writeln!(out, "Could not fetch vacancies from {platform}: {err}")?;
    }
    if outcome.skipped > 0 {
        writeln!(
            out,
            "{} listing(s) skipped because they could not be read.",
            outcome.skipped
        )?;
    }
    Ok(())
}
