/// Example: drive the calculator without a terminal UI
///
/// Usage: cargo run --example headless -- 2 + 3 '*' 4 =
///
/// Each argument is a key token (0-9 . + - * / = C M+ MC). Tokens may also
/// be packed into one argument separated by spaces.

use std::env;
use calc3d_core::{Button, DisplaySurface, InputDispatcher};

/// Prints every display update
struct Printer;

impl DisplaySurface for Printer {
    fn show(&mut self, text: &str) {
        println!("  display: {text}");
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let tokens: Vec<&str> = if args.is_empty() {
        eprintln!("No keys given, using: 2 + 3 * 4 =");
        vec!["2", "+", "3", "*", "4", "="]
    } else {
        args.iter().flat_map(|a| a.split_whitespace()).collect()
    };

    let mut dispatcher = InputDispatcher::new(Printer);
    for token in tokens {
        match token.parse::<Button>() {
            Ok(button) => {
                println!("{button}");
                dispatcher.press(button);
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    println!("memory: {}", dispatcher.engine().memory());
}
