//! ASCII art banner for interactive runs.

use std::io::IsTerminal;

const ACCENT: &str = "\x1b[1;38;2;120;190;160m";
const SUBTITLE: &str = "\x1b[38;2;100;100;120m";
const RESET: &str = "\x1b[0m";

/// Prints the banner to stdout, with ANSI color only on a terminal.
pub fn print_banner() {
    let (accent, subtitle, reset) = if std::io::stdout().is_terminal() {
        (ACCENT, SUBTITLE, RESET)
    } else {
        ("", "", "")
    };

    println!(
        r#"
{accent}                 _      __           __  {reset}
{accent}    ____  ____ _(_)____/ /___  _____/ /__{reset}
{accent}   / __ \/ __ `/ / ___/ / __ \/ ___/ //_/{reset}
{accent}  / /_/ / /_/ / / /  / / /_/ / /__/ ,<   {reset}
{accent} / .___/\__,_/_/_/  /_/\____/\___/_/|_|  {reset}
{accent}/_/{reset}
   {subtitle}Buy both sides cheap. Keep the pair under a dollar.{reset}
"#
    );
}
