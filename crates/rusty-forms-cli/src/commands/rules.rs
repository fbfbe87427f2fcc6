use colored::Colorize;
use rusty_forms::Registry;

pub fn execute() {
    println!("{}", "Preset rules".green().bold());
    println!();

    for descriptor in Registry::presets().descriptors() {
        match (&descriptor.default_message, descriptor.is_implemented()) {
            (Some(message), true) => {
                println!("  {:<18} {}", descriptor.name.cyan(), message);
            }
            _ => {
                println!(
                    "  {:<18} {}",
                    descriptor.name.cyan(),
                    "extension point, no default test".yellow()
                );
            }
        }
    }
}
