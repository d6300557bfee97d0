/* src/cli/core/src/ui.rs */

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn ok(msg: &str) {
  println!("  {GREEN}\u{2713}{RESET} {msg}");
}

pub fn fail(msg: &str) {
  println!("  {RED}\u{2717}{RESET} {msg}");
}

pub fn warn(msg: &str) {
  println!("  {YELLOW}!{RESET} {msg}");
}

pub fn arrow(msg: &str) {
  println!("  {GREEN}\u{2192}{RESET} {msg}");
}

/// Aligned `label  value` line under a status line.
pub fn field(label: &str, value: &str) {
  println!("        {DIM}{label:<10}{RESET}{value}");
}

pub fn detail(msg: &str) {
  println!("        {msg}");
}

pub fn banner(cmd: &str) {
  println!();
  println!("  {BOLD}localeroute{RESET} {cmd} {DIM}v{VERSION}{RESET}");
  println!();
}

pub fn highlight(msg: &str) -> String {
  format!("{CYAN}{msg}{RESET}")
}

pub fn blank() {
  println!();
}
