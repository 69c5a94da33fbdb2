//! Output formatting for CLI reports

use crate::pipeline::{EpisodeSummary, MetricsSummary};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a ratio as a percentage with one decimal
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, &str)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Print the result of a single episode
pub fn print_episode(run: usize, summary: &EpisodeSummary) {
    println!(
        "  run {:>3}: {:<8} actions={:<4} hp={:<4} monsters={} treasures={}",
        run,
        summary.outcome.to_string(),
        summary.actions,
        summary.hitpoints,
        summary.monsters_killed,
        summary.treasures_collected
    );
}

/// Print aggregate metrics over several episodes
pub fn print_metrics(metrics: &MetricsSummary) {
    print_stats_table(&[
        ("Episodes", &metrics.episodes.to_string()),
        (
            "Completed",
            &format!("{}/{}", metrics.exits, metrics.episodes),
        ),
        ("Exit rate", &format_percent(metrics.exit_rate)),
        ("Death rate", &format_percent(metrics.death_rate)),
        ("Timeouts", &metrics.timeouts.to_string()),
        ("Avg actions", &format!("{:.2}", metrics.avg_actions)),
        ("Avg HP remaining", &format!("{:.2}", metrics.avg_hitpoints)),
        ("Avg monsters", &format!("{:.2}", metrics.avg_monsters_killed)),
        ("Avg treasures", &format!("{:.2}", metrics.avg_treasures_collected)),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(15_000), "15,000");
        assert_eq!(format_number(150_000), "150,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.5), "50.0%");
        assert_eq!(format_percent(1.0 / 3.0), "33.3%");
    }
}
