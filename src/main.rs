use std::env;
use std::process::exit;

use svg2room::args::{self, Command};

fn main() {
    // Logging
    env_logger::init();

    fn inner() -> Result<(), svg2room::Error> {
        let mut argv = env::args();
        let program = argv.next().unwrap_or_else(|| "svg2room".to_string());

        match args::parse_args(argv)? {
            Command::Help => println!("{}", args::HELP),
            Command::Usage => println!("{}", args::usage(&program)),
            Command::Convert {
                input,
                output,
                scale,
            } => {
                let room = svg2room::make_room(&input, &output, scale)?;
                println!(
                    "Wrote {} obstacles from '{}' to '{}'",
                    room.obstacles.len(),
                    input.display(),
                    output.display()
                );
            }
        }
        Ok(())
    }

    if let Err(e) = inner() {
        eprintln!("Error: {}", e);
        exit(2);
    }
}
