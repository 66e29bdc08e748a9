//!
//! Prints the display and cursor after each keystroke.
//!
//! `cargo run --example mask_trace -- "m/d/y" 1225`
//!

use log::debug;
use rat_mask::{LookupCompletion, MaskCompiler};
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let mut args = std::env::args().skip(1);
    let pattern = args.next().unwrap_or_else(|| "\\D\\a\\t\\e: m/d/y".to_string());
    let input = args.next().unwrap_or_else(|| "12301".to_string());

    let compiler = MaskCompiler::new();
    let mask = compiler.compile(&pattern)?;
    debug!("tokens {:?}", mask.tokens());

    println!("mask    {:?} ({:?})", mask.pattern(), mask.mask_type());
    let mut session = mask
        .new_session()
        .with_completion(LookupCompletion::new(args));
    session.begin_edit("")?;
    println!("        {:?} cursor {}", session.display(), session.cursor());

    for c in input.chars() {
        match session.insert_text(&c.to_string()) {
            Ok(()) => {
                println!(
                    "{:?}     {:?} cursor {} selection {:?}",
                    c,
                    session.display(),
                    session.cursor(),
                    session.selection()
                );
            }
            Err(e) => {
                println!("{:?}     rejected: {}", c, e);
            }
        }
    }

    match session.end_edit() {
        Ok(v) => println!("value   {:?}", v),
        Err(e) => println!("value   {}", e),
    }

    Ok(())
}

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("mask_trace.log");
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{}", message)))
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}
