//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use hostelbazaar_search::{CatalogItem, Correction, CorrectionRule, FieldScores, QueryIntent};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{:.1}s", secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Format a listing price as rupees
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("₹{:.0}", price)
    } else {
        format!("₹{:.2}", price)
    }
}

/// One row of the results table
pub fn print_hit(rank: usize, item: &CatalogItem, scores: Option<&FieldScores>) {
    let condition = item.condition.map_or("-", |c| c.label());
    print!(
        "{:>3}. {:<40} {:>10}  {:<9}",
        rank,
        truncate(&item.title, 40).bold(),
        format_price(item.price).green(),
        condition.dimmed()
    );
    match scores {
        Some(s) => println!(
            "  {} {:.2} (title {:.2}, description {:.2}, tags {:.2})",
            "relevance".dimmed(),
            s.relevance,
            s.title,
            s.description,
            s.tags
        ),
        None => println!(),
    }
}

/// Human-readable description of a query interpretation
pub fn print_intent(intent: &QueryIntent) {
    println!("{:<12} {}", "normalized".dimmed(), intent.normalized);
    println!(
        "{:<12} {}",
        "condition".dimmed(),
        intent.condition.map_or("-", |c| c.label())
    );
    println!("{:<12} {}", "terms".dimmed(), intent.terms.join(", "));

    for correction in intent.corrections.iter().filter(|c| c.changed()) {
        println!("{:<12} {}", "corrected".dimmed(), describe_correction(correction));
    }

    if let Some(price) = &intent.price {
        let bound = |value: Option<f64>| value.map_or("-".to_string(), format_price);
        println!(
            "{:<12} {} .. {} ({:?})",
            "price".dimmed(),
            bound(price.min_price),
            bound(price.max_price),
            price.parse
        );
    }
}

/// `original -> term (rule)`
pub fn describe_correction(correction: &Correction) -> String {
    format!(
        "{} -> {} ({})",
        correction.original,
        correction.term,
        rule_label(&correction.rule)
    )
}

fn rule_label(rule: &CorrectionRule) -> String {
    match rule {
        CorrectionRule::TooShort => "too short".to_string(),
        CorrectionRule::Misspelling => "known misspelling".to_string(),
        CorrectionRule::Canonical => "dictionary term".to_string(),
        CorrectionRule::Variant => "dictionary variant".to_string(),
        CorrectionRule::CanonicalDistance { distance } => format!("{distance} edit(s) from term"),
        CorrectionRule::VariantDistance { variant, distance } => {
            format!("{distance} edit(s) from variant {variant}")
        }
        CorrectionRule::Unchanged => "unchanged".to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostelbazaar_search::default_matcher;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration(Duration::from_secs_f32(5.5)), "5.5s");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "listing", "listings"), "1 listing");
        assert_eq!(format_count(3, "listing", "listings"), "3 listings");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(450.0), "₹450");
        assert_eq!(format_price(99.5), "₹99.50");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_describe_correction() {
        let correction = default_matcher().correct("moble");
        assert_eq!(describe_correction(&correction), "moble -> mobile (dictionary variant)");
    }
}
