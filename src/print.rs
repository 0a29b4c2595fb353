//! ## Printing Module
//!
//! This module is only here to make logging in the terminal easier to read.
//! It allows to print in appropriate colors depending on the situation.
//! It also provides a print-format for the outstanding floor requests.
use crate::config;
use crate::dispatch::TravelDirection;
use ansi_term::Colour::{self, Cyan, Green, Red, White, Yellow};

use unicode_width::UnicodeWidthStr;


/// Prints an error message in red to the terminal.
///
/// If `PRINT_ERR_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[ERROR\]:   {}", msg
///
/// ## Example
/// ```
/// use elevatordispatch::print;
///
/// print::err("Something went wrong!".to_string());
/// ```
pub fn err(msg: String) {
    if config::switch_on(&config::PRINT_ERR_ON) {
        println!("{}{}\n", Red.paint("[ERROR]:   "), Red.paint(msg));
    }
}

/// Prints a warning message in yellow to the terminal.
///
/// If `PRINT_WARN_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[WARNING\]: {}", msg
pub fn warn(msg: String) {
    if config::switch_on(&config::PRINT_WARN_ON) {
        println!("{}{}\n", Yellow.paint("[WARNING]: "), Yellow.paint(msg));
    }
}

/// Prints a success message in green to the terminal.
///
/// If `PRINT_OK_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[OK\]:      {}", msg
pub fn ok(msg: String) {
    if config::switch_on(&config::PRINT_OK_ON) {
        println!("{}{}\n", Green.paint("[OK]:      "), Green.paint(msg));
    }
}

/// Prints an informational message in light blue to the terminal.
///
/// If `PRINT_INFO_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[INFO\]:    {}", msg
pub fn info(msg: String) {
    let light_blue = Colour::RGB(102, 178, 255);
    if config::switch_on(&config::PRINT_INFO_ON) {
        println!("{}{}\n", light_blue.paint("[INFO]:    "), light_blue.paint(msg));
    }
}

/// Prints a change to the outstanding requests in pink.
///
/// Used by [crate::dispatch::DispatchStore] whenever a floor is added or removed.
/// If `PRINT_REQ_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[REQUEST\]: {}", msg
pub fn dispatch(msg: String) {
    let pink = Colour::RGB(255, 51, 255);
    if config::switch_on(&config::PRINT_REQ_ON) {
        println!("{}{}\n", pink.paint("[REQUEST]: "), pink.paint(msg));
    }
}

/// Pads the input text to a fixed display width using spaces.
///
/// Accounts for characters that may take more than one column width (e.g. Unicode symbols),
/// ensuring aligned text in terminal-based tables.
///
/// # Returns
/// A `String` with the original text left-aligned and padded with spaces to match the desired width.
pub fn pad_text(text: &str, width: usize) -> String {
    let visible_width = UnicodeWidthStr::width(text);
    let padding = width.saturating_sub(visible_width);
    format!("{}{}", text, " ".repeat(padding))
}

/// Arrow shown next to the floor picked for the given direction.
fn direction_label(direction: TravelDirection) -> &'static str {
    match direction {
        TravelDirection::Up => "⬆ up",
        TravelDirection::Down => "⬇ down",
        TravelDirection::Stationary => "● stationary",
    }
}

/// Builds the request table printed by [requests].
///
/// One row per outstanding floor, in the order they were requested. The row holding
/// `next` (if any) is marked with the travel direction it was chosen for.
pub fn requests_table(floors: &[i32], next: Option<(i32, TravelDirection)>) -> Vec<String> {
    let mut lines = Vec::with_capacity(floors.len() + 5);
    lines.push("┌───────┬──────────┬────────────────┐".to_string());
    lines.push(format!(
        "│ {} │ {} │ {} │",
        pad_text("#", 5),
        pad_text("Floor", 8),
        pad_text("Next stop", 14)
    ));
    lines.push("├───────┼──────────┼────────────────┤".to_string());

    if floors.is_empty() {
        lines.push(format!("│ {} │", pad_text("No outstanding requests", 33)));
    }
    for (i, floor) in floors.iter().enumerate() {
        let marker = match next {
            Some((f, dirn)) if f == *floor => direction_label(dirn),
            _ => "",
        };
        lines.push(format!(
            "│ {} │ {} │ {} │",
            pad_text(&i.to_string(), 5),
            pad_text(&floor.to_string(), 8),
            pad_text(marker, 14)
        ));
    }
    lines.push("└───────┴──────────┴────────────────┘".to_string());
    lines
}

/// Logs the outstanding floor requests to the terminal as a table.
///
/// If `PRINT_ELSE_ON` is `false`, the function exits early.
pub fn requests(floors: &[i32], next: Option<(i32, TravelDirection)>) {
    if !config::switch_on(&config::PRINT_ELSE_ON) {
        return;
    }
    println!("{}", Cyan.bold().paint("┌────────────────────────────────────┐"));
    println!("{}", Cyan.bold().paint("│        OUTSTANDING REQUESTS        │"));
    println!("{}", Cyan.bold().paint("└────────────────────────────────────┘"));
    for (i, line) in requests_table(floors, next).iter().enumerate() {
        if i == 1 {
            println!("{}", White.bold().paint(line.as_str()));
        } else {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_text_counts_display_width() {
        assert_eq!(pad_text("ab", 4), "ab  ");
        assert_eq!(pad_text("abcdef", 4), "abcdef");
    }

    #[test]
    fn table_marks_next_floor() {
        let lines = requests_table(&[5, 10, 15], Some((15, TravelDirection::Up)));
        assert_eq!(lines.len(), 3 + 3 + 1);
        assert!(lines[5].contains("15"));
        assert!(lines[5].contains("up"));
        assert!(!lines[3].contains("up"));
    }

    #[test]
    fn table_for_empty_store() {
        let lines = requests_table(&[], None);
        assert!(lines.iter().any(|l| l.contains("No outstanding requests")));
    }
}
