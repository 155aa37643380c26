use colored::*;
use contactbook::list_model::{Change, ModelEvent};
use contactbook::model::Contact;
use contactbook::store::DoctorReport;
use unicode_width::UnicodeWidthStr;

const PHOTO_MARKER: &str = "◧";
const EMAIL_GAP: usize = 2;

/// Prints model events; returns whether any of them was an error.
pub fn print_events(events: &[ModelEvent]) -> bool {
    let mut failed = false;
    for event in events {
        match event {
            ModelEvent::Changed(change) => print_change(change),
            ModelEvent::Error(message) => {
                failed = true;
                eprintln!("{}", format!("Error: {}", message).red());
            }
        }
    }
    failed
}

fn print_change(change: &Change) {
    match change {
        Change::Loaded(_) => {}
        Change::Searched { query, matches } => {
            let noun = if *matches == 1 { "match" } else { "matches" };
            println!("{}", format!("{} {} for '{}'", matches, noun, query).dimmed());
        }
        Change::Created(c) => println!("{}", format!("Added {}", describe(c)).green()),
        Change::Updated(c) => println!("{}", format!("Updated {}", describe(c)).green()),
        Change::Deleted(c) => println!("{}", format!("Deleted {}", describe(c)).green()),
        Change::Cleared(count) => {
            let noun = if *count == 1 { "contact" } else { "contacts" };
            println!("{}", format!("Deleted {} {}", count, noun).green());
        }
    }
}

fn describe(contact: &Contact) -> String {
    match contact.full_name.as_deref() {
        Some(name) if !name.trim().is_empty() => format!("{} <{}>", name, contact.email),
        _ => format!("<{}>", contact.email),
    }
}

pub fn info(message: &str) {
    println!("{}", message.dimmed());
}

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn warning(message: &str) {
    println!("{}", message.yellow());
}

/// One line per contact: index, name and position on the left, email on the
/// right, fitted to `line_width`.
pub fn print_contacts(contacts: &[Contact], line_width: usize) {
    if contacts.is_empty() {
        println!("No contacts found.");
        return;
    }

    for (i, contact) in contacts.iter().enumerate() {
        let idx_str = format!("{}. ", i + 1);
        let marker = if contact.photo.is_some() {
            format!("{} ", PHOTO_MARKER)
        } else {
            "  ".to_string()
        };

        let email = &contact.email;
        let fixed_width = 2 + marker.width() + idx_str.width() + EMAIL_GAP + email.width();
        let available = line_width.saturating_sub(fixed_width);

        let left = match contact.job_position.as_deref() {
            Some(position) if !position.trim().is_empty() => {
                format!("{} · {}", contact.display_name(), position)
            }
            _ => contact.display_name().to_string(),
        };
        let left_display = truncate_to_width(&left, available);
        let padding = available.saturating_sub(left_display.width());

        println!(
            "  {}{}{}{}{}",
            marker,
            idx_str.yellow(),
            left_display,
            " ".repeat(padding + EMAIL_GAP),
            email.dimmed()
        );
    }
}

pub fn print_contact(contact: &Contact) {
    println!("{}", contact.display_name().bold());
    println!("--------------------------------");
    println!("{:<10}{}", "email:", contact.email);
    if let Some(position) = &contact.job_position {
        println!("{:<10}{}", "position:", position);
    }
    match &contact.photo {
        Some(bytes) => println!("{:<10}{} bytes", "photo:", bytes.len()),
        None => println!("{:<10}{}", "photo:", "none".dimmed()),
    }
}

pub fn print_doctor(report: &DoctorReport) {
    if report.removed_orphan_photos == 0 && report.cleared_missing_photos == 0 {
        success("Data directory is consistent.");
        return;
    }
    if report.removed_orphan_photos > 0 {
        warning(&format!(
            "Removed {} orphaned photo file(s)",
            report.removed_orphan_photos
        ));
    }
    if report.cleared_missing_photos > 0 {
        warning(&format!(
            "Cleared {} photo reference(s) with no file",
            report.cleared_missing_photos
        ));
    }
}

/// Cut `s` to at most `max_width` terminal columns, marking the cut with `…`.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Ann Lee", 20), "Ann Lee");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        let out = truncate_to_width("Bartholomew Featherstonehaugh", 10);
        assert_eq!(out, "Bartholom…");
        assert_eq!(out.width(), 10);
    }

    #[test]
    fn truncate_counts_wide_chars() {
        let out = truncate_to_width("山田太郎さん", 7);
        assert!(out.width() <= 7);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn truncate_to_zero_width_is_empty() {
        assert_eq!(truncate_to_width("Ann", 0), "");
        assert_eq!(truncate_to_width("", 0), "");
        assert_eq!(truncate_to_width("Ann", 1), "…");
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        assert_eq!(truncate_to_width("Ann Lee", 7), "Ann Lee");
    }

    #[test]
    fn describe_without_name() {
        assert_eq!(describe(&Contact::new("a@b.com")), "<a@b.com>");
        assert_eq!(
            describe(&Contact::new("a@b.com").with_full_name("Ann")),
            "Ann <a@b.com>"
        );
    }

    #[test]
    fn error_events_are_reported() {
        let events = vec![
            ModelEvent::Changed(Change::Loaded(0)),
            ModelEvent::Error("boom".to_string()),
        ];
        assert!(print_events(&events));
        assert!(!print_events(&events[..1]));
    }
}
