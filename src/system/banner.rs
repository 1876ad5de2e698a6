use std::io::IsTerminal;

use crossterm::style::{Color, Stylize};

const BANNER_LINES: [&str; 6] = [
    "██████╗ ███████╗███████╗███████╗",
    "██╔══██╗██╔════╝██╔════╝██╔════╝",
    "██████╔╝█████╗  █████╗  ███████╗",
    "██╔══██╗██╔══╝  ██╔══╝  ╚════██║",
    "██████╔╝███████╗███████╗███████║",
    "╚═════╝ ╚══════╝╚══════╝╚══════╝",
];

const HONEY: (u8, u8, u8) = (0xff, 0xd1, 0x3b);
const AMBER: (u8, u8, u8) = (0xc7, 0x7c, 0x0e);

pub(crate) fn print_cli_banner(no_color: bool) {
    let use_color = !no_color && std::io::stdout().is_terminal();
    for (idx, line) in BANNER_LINES.iter().enumerate() {
        if use_color {
            println!("{}", line.with(rgb(stripe(idx))));
        } else {
            println!("{line}");
        }
    }

    let description = format!(
        "bees v{} | {} | with machine guns",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_LICENSE")
    );
    if use_color {
        println!("{}", description.with(rgb(AMBER)));
    } else {
        println!("{description}");
    }
}

/// Alternating rows, like the stripes on an abdomen.
const fn stripe(idx: usize) -> (u8, u8, u8) {
    if idx & 1 == 0 { HONEY } else { AMBER }
}

const fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}
