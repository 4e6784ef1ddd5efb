//! Human-readable rendering of the analysis report

use std::io::Write;

use colored::Colorize;

use authlens_analyzer::{CounterKind, RankedView, Report};

use crate::output::Render;

/// Width of the key column in ranking tables.
const KEY_WIDTH: usize = 18;

fn alert_label(kind: CounterKind) -> &'static str {
    match kind {
        CounterKind::FailedByIp => "SSH failed by IP",
        CounterKind::FailedByUser => "SSH failed by user",
        CounterKind::AcceptedByIp => "SSH accepted by IP",
        CounterKind::AcceptedByUser => "SSH accepted by user",
        CounterKind::SudoFailedByUser => "Sudo auth failures by user",
    }
}

fn write_table(w: &mut dyn Write, view: &RankedView) -> std::io::Result<()> {
    if view.is_empty() {
        return writeln!(w, "    {}", "(none)".dimmed());
    }
    for entry in view.entries() {
        writeln!(w, "    {:<KEY_WIDTH$} {}", entry.key, entry.count)?;
    }
    Ok(())
}

fn write_alert_table(w: &mut dyn Write, view: &RankedView) -> std::io::Result<()> {
    for entry in view.entries() {
        let key = format!("{:<KEY_WIDTH$}", entry.key);
        writeln!(w, "    {} {}", key.red(), entry.count.to_string().red().bold())?;
    }
    Ok(())
}

impl Render for Report {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}", "Auth Log Analyzer".bold())?;
        writeln!(w, "File: {}", self.source())?;
        writeln!(w, "Lines processed: {}", self.total_lines())?;
        writeln!(w)?;

        writeln!(w, "{} {}", "SSH Failed Logins:".bold(), self.ssh_failed_total())?;
        writeln!(w, "  Top IPs:")?;
        write_table(w, self.top_view(CounterKind::FailedByIp))?;
        writeln!(w, "  Top Usernames:")?;
        write_table(w, self.top_view(CounterKind::FailedByUser))?;
        writeln!(w)?;

        writeln!(w, "{} {}", "SSH Successful Logins:".bold(), self.ssh_accepted_total())?;
        writeln!(w, "  Top IPs:")?;
        write_table(w, self.top_view(CounterKind::AcceptedByIp))?;
        writeln!(w, "  Top Usernames:")?;
        write_table(w, self.top_view(CounterKind::AcceptedByUser))?;
        writeln!(w)?;

        writeln!(w, "{} {}", "Sudo Auth Failures:".bold(), self.sudo_authfail_total())?;
        writeln!(w, "  Top Usernames:")?;
        write_table(w, self.top_view(CounterKind::SudoFailedByUser))?;
        writeln!(w)?;

        let alerts = self.alerts();
        if alerts.is_enabled() {
            let heading = format!("ALERTS (threshold >= {})", alerts.threshold());
            writeln!(w, "{}", heading.yellow().bold())?;
            if alerts.is_clear() {
                writeln!(w, "  {}", "No alert thresholds exceeded.".green())?;
            } else {
                for kind in CounterKind::ALL {
                    let view = alerts.view(kind);
                    if view.is_empty() {
                        continue;
                    }
                    writeln!(w, "  {}:", alert_label(kind))?;
                    write_alert_table(w, view)?;
                }
            }
            writeln!(w)?;
        }

        writeln!(w, "Tip: use --json for machine-readable output.")?;
        Ok(())
    }
}
