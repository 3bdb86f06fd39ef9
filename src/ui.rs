use anstyle::{AnsiColor, Style};
use is_terminal::IsTerminal;
use std::fmt::{Display, Write as _};
use std::io::{self, Write};

const STATUS_WIDTH: usize = 12;

fn supports_color() -> bool {
    io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

fn render(label: &str, message: &str, use_color: bool) -> String {
    let padded_label = format!("{:>width$}", label, width = STATUS_WIDTH);

    let (prefix, suffix) = if use_color {
        let style = Style::new().bold().fg_color(Some(AnsiColor::Red.into()));
        (style.render().to_string(), style.render_reset().to_string())
    } else {
        (String::new(), String::new())
    };

    let mut out = String::new();
    for (idx, line) in message.split('\n').enumerate() {
        if idx == 0 {
            let _ = writeln!(out, "{prefix}{padded_label}{suffix} {line}");
        } else {
            let _ = writeln!(out, "{:>width$} {line}", "", width = STATUS_WIDTH);
        }
    }
    out
}

/// Tell the user the application could not be started
///
/// Written to stderr so it never mixes with relayed child output.
pub fn error(message: impl Display) {
    let text = render("Error", &message.to_string(), supports_color());
    let mut handle = io::stderr().lock();
    let _ = handle.write_all(text.as_bytes());
    let _ = handle.flush();
}
