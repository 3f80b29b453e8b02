use crate::grammar::Verb;
use crate::i18n::I18n;
use crate::storage::ContainerStatus;
use colored::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const VOYAGE_SHIPS: usize = 10;

/// Ten-ship voyage bar: `⛵` per completed tenth, `⚓` for the rest.
pub fn voyage_bar(completed: usize, total: usize) -> String {
    let sailed = if total == 0 {
        0
    } else {
        (completed.min(total) * VOYAGE_SHIPS) / total
    };
    let mut bar = "⛵".repeat(sailed);
    bar.push_str(&"⚓".repeat(VOYAGE_SHIPS - sailed));
    bar
}

/// Rank awarded for a completion percentage, if any.
pub fn rank_key(percent: f64) -> Option<&'static str> {
    if percent >= 100.0 {
        Some("rank_master")
    } else if percent >= 75.0 {
        Some("rank_senior")
    } else if percent >= 50.0 {
        Some("rank_captain")
    } else if percent >= 25.0 {
        Some("rank_mate")
    } else if percent > 0.0 {
        Some("rank_sailor")
    } else {
        None
    }
}

pub fn state_badge(state: ContainerStatus) -> ColoredString {
    match state {
        ContainerStatus::Running => "⛵ Running".green().bold(),
        ContainerStatus::Stopped => "⚓ Stopped".red(),
        ContainerStatus::Created => "🏗️ Created".yellow(),
        ContainerStatus::Removing => "🗑️ Removing".dimmed(),
    }
}

/// Harbor sketch of what a command just did, for the verbs that move ships.
pub fn command_visual(verb: Verb, target: &str) -> Option<String> {
    let (icon, frames, caption, line) = match verb {
        Verb::Run => ("🚢⛵", "🏗️  →  🚢  →  ⛵", "Blueprint  Ship Built  Ship Sailing", "A new ship is launched into the harbor!"),
        Verb::Stop => ("⚓", "⛵  →  🚢  →  ⚓", "Sailing  Slowing  Anchored", "The ship drops anchor and stops."),
        Verb::Start => ("⛵", "⚓  →  🚢  →  ⛵", "Anchored  Raising  Sailing", "The ship weighs anchor and sets sail!"),
        Verb::Rm => ("👋", "⚓  →  🚢  →  〰️", "Docked  Leaving  Gone", "The ship leaves the harbor."),
        Verb::Ps => ("📋", "🔍  Harbor Status Check", "", "Reviewing all ships in the harbor..."),
        Verb::Images => ("📦", "📚  Blueprint Library", "", "Showing all available ship designs..."),
        Verb::Pull => ("📥", "☁️  →  📦  →  🏗️", "Registry  Download  Blueprint Ready", "New ship blueprint added to your collection!"),
        _ => return None,
    };

    let heading = if target.is_empty() {
        format!("{} {} Action", icon, verb.as_str().to_uppercase())
    } else {
        format!("{} {} Action: {}", icon, verb.as_str().to_uppercase(), target)
    };
    let mut lines = vec![heading, format!("  {}", frames)];
    if !caption.is_empty() {
        lines.push(format!("  {}", caption));
    }
    lines.push(format!("  {}", line));
    Some(lines.join("\n"))
}

const LIFECYCLE_STAGES: [(ContainerStatus, &str, &str, &str); 4] = [
    (ContainerStatus::Created, "CREATED", "Blueprint Ready", "Ship under construction. Start it with: docker start <container>"),
    (ContainerStatus::Running, "RUNNING", "Actively Sailing", "Ship is in motion. See it with: docker ps, docker logs <container>"),
    (ContainerStatus::Stopped, "STOPPED", "Anchored", "Ship is docked, cargo intact. Resume with: docker start <container>"),
    (ContainerStatus::Removing, "REMOVED", "Decommissioned", "Ship left the harbor. Its blueprint (image) stays behind."),
];

const LIFECYCLE_TRANSITIONS: [(&str, &str, &str, &str); 6] = [
    ("docker run", "Created → Running", "Launch a ship from blueprint", "🏗️ ➡️ ⛵"),
    ("docker stop", "Running → Stopped", "Anchor a sailing ship", "⛵ ➡️ ⚓"),
    ("docker start", "Stopped → Running", "Set a docked ship back in motion", "⚓ ➡️ ⛵"),
    ("docker restart", "Running → Running", "Bring ship to dock and send out again", "⛵ 🔄 ⛵"),
    ("docker rm", "Stopped → Removed", "Decommission and remove ship", "⚓ ➡️ 🗑️"),
    ("docker rm -f", "Running → Removed", "Force remove sailing ship", "⛵ ➡️ 🗑️"),
];

/// The four container states and the commands that move between them.
pub fn lifecycle_guide(i18n: &I18n) -> String {
    let mut out = vec![i18n.t("lifecycle_title").bold().cyan().to_string(), String::new()];

    for (state, label, headline, detail) in LIFECYCLE_STAGES {
        out.push(format!("{}  {} {}", pad(label, 8).bold(), state_badge(state), headline.dimmed()));
        out.push(format!("          {}", detail));
    }

    out.push(String::new());
    out.push(i18n.t("lifecycle_transitions").bold().to_string());
    for (command, transition, description, icons) in LIFECYCLE_TRANSITIONS {
        out.push(format!(
            "  {} {} {} {}",
            pad(command, 15).green(),
            pad(transition, 18),
            pad(description, 38),
            icons
        ));
    }
    out.join("\n")
}

/// Left-align `text` in `width` terminal columns, truncating with `…`.
pub fn pad(text: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(text);
    if current <= width {
        return format!("{}{}", text, " ".repeat(width - current));
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Pad text that carries escape codes, measuring its plain form. No truncation.
pub fn pad_styled(plain: &str, styled: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(plain);
    format!("{}{}", styled, " ".repeat(width.saturating_sub(used)))
}

pub fn progress_summary(completed: usize, total: usize, percent: f64, i18n: &I18n) -> String {
    let mut lines = vec![
        i18n.t("progress_title").bold().cyan().to_string(),
        voyage_bar(completed, total),
        i18n.t_format(
            "progress_summary",
            &[&completed.to_string(), &total.to_string(), &format!("{:.0}", percent)],
        ),
    ];
    if let Some(key) = rank_key(percent) {
        lines.push(i18n.t(key).yellow().bold().to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voyage_bar_has_ten_slots() {
        assert_eq!(voyage_bar(0, 0), "⚓".repeat(10));
        assert_eq!(voyage_bar(8, 8), "⛵".repeat(10));
        assert_eq!(voyage_bar(4, 8), format!("{}{}", "⛵".repeat(5), "⚓".repeat(5)));
        assert_eq!(voyage_bar(1, 3).chars().count(), 10);
        assert_eq!(voyage_bar(9, 3), "⛵".repeat(10));
    }

    #[test]
    fn moving_verbs_have_a_sketch() {
        let run = command_visual(Verb::Run, "nginx").unwrap();
        assert!(run.starts_with("🚢⛵ RUN Action: nginx"));
        assert!(run.contains("Blueprint  Ship Built  Ship Sailing"));

        let ps = command_visual(Verb::Ps, "").unwrap();
        assert_eq!(ps.lines().next(), Some("📋 PS Action"));
        assert_eq!(ps.lines().count(), 3);

        assert!(command_visual(Verb::Inspect, "web").is_none());
        assert!(command_visual(Verb::Build, ".").is_none());
    }

    #[test]
    fn lifecycle_covers_every_state_and_transition() {
        let guide = lifecycle_guide(&I18n::new("en"));
        for label in ["CREATED", "RUNNING", "STOPPED", "REMOVED"] {
            assert!(guide.contains(label), "{label}");
        }
        for command in ["docker run", "docker stop", "docker start", "docker restart", "docker rm -f"] {
            assert!(guide.contains(command), "{command}");
        }
        assert!(guide.contains("Stopped → Removed"));
        assert!(guide.contains("Container Lifecycle"));
    }

    #[test]
    fn ranks_follow_thresholds() {
        assert_eq!(rank_key(0.0), None);
        assert_eq!(rank_key(12.5), Some("rank_sailor"));
        assert_eq!(rank_key(25.0), Some("rank_mate"));
        assert_eq!(rank_key(62.5), Some("rank_captain"));
        assert_eq!(rank_key(75.0), Some("rank_senior"));
        assert_eq!(rank_key(100.0), Some("rank_master"));
    }

    #[test]
    fn pad_counts_columns_not_bytes() {
        assert_eq!(pad("ps", 5), "ps   ");
        assert_eq!(UnicodeWidthStr::width(pad("章节", 6).as_str()), 6);
        let cut = pad("Running your first container", 10);
        assert!(cut.ends_with('…'));
        assert_eq!(UnicodeWidthStr::width(cut.as_str()), 10);
        assert_eq!(pad_styled("ps", "\x1b[1mps\x1b[0m", 4), "\x1b[1mps\x1b[0m  ");
    }

    #[test]
    fn summary_includes_rank_once_started() {
        let i18n = I18n::new("en");
        let text = progress_summary(2, 8, 25.0, &i18n);
        assert!(text.contains("2 / 8 tutorials completed (25%)"));
        assert!(text.contains("First Mate"));
        assert!(!progress_summary(0, 8, 0.0, &i18n).contains("Sailor"));
    }
}
