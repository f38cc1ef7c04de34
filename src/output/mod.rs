//! Styled terminal output for the importer
//!
//! Every function prints one styled line (or a header block) to stdout,
//! except `error`, which goes to stderr.

use owo_colors::OwoColorize;

// Pastel palette
const MINT: (u8, u8, u8) = (152, 225, 152);
const CORAL: (u8, u8, u8) = (255, 160, 160);
const CREAM: (u8, u8, u8) = (255, 230, 160);
const SKY: (u8, u8, u8) = (160, 200, 255);
const LAVENDER: (u8, u8, u8) = (181, 174, 254);
const TEAL: (u8, u8, u8) = (120, 180, 195);
const GREY: (u8, u8, u8) = (160, 160, 160);

fn paint(text: &str, (r, g, b): (u8, u8, u8)) -> String {
    text.truecolor(r, g, b).to_string()
}

fn paint_bold(text: &str, (r, g, b): (u8, u8, u8)) -> String {
    text.truecolor(r, g, b).bold().to_string()
}

/// Print a success message with a green checkmark
pub fn success(message: &str) {
    println!("{} {}", paint_bold("✓", MINT), message.bright_white());
}

/// Print an error message with a red X
pub fn error(message: &str) {
    eprintln!("{} {}", paint_bold("✗", CORAL), message.bright_white());
}

pub fn warning(message: &str) {
    println!("{} {}", paint_bold("⚠", CREAM), message.bright_white());
}

pub fn info(message: &str) {
    println!("{} {}", paint_bold("ℹ", SKY), message.bright_white());
}

/// Print a section header followed by a rule
pub fn section(title: &str) {
    println!("\n{}", paint_bold(title, LAVENDER));
    println!("{}", paint(&"─".repeat(50), GREY));
}

/// Print a lighter header with a dotted rule
pub fn subsection(title: &str) {
    println!("\n{}", paint(title, TEAL));
    println!("{}", paint(&"·".repeat(30), GREY));
}

pub fn key_value(key: &str, value: &str) {
    println!("  {} {}", paint(&format!("{}:", key), GREY), value.bright_white());
}

/// Print a key-value pair with the value highlighted
pub fn key_value_highlight(key: &str, value: &str) {
    println!("  {} {}", paint(&format!("{}:", key), GREY), paint_bold(value, TEAL));
}

pub fn dimmed(message: &str) {
    println!("{}", paint(message, GREY));
}

/// Print a file system path
pub fn path(path_str: &str) {
    println!("  {}", paint(path_str, TEAL));
}

pub fn blank() {
    println!();
}
