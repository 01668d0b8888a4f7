extern crate log;
pub mod cleaning;
pub mod config;
pub mod geofile;
use crate::cleaning::{pipeline::clean_geofile, report::print_report};
use crate::config::{Config, CONFIG_FILEPATH};
use std::path::Path;

fn try_main() -> anyhow::Result<()> {
    let config = Config::load(Path::new(CONFIG_FILEPATH))?;
    log::info!(
        "Cleaning {:?} into {:?}",
        &config.input_path,
        &config.output_path
    );
    let collection = clean_geofile(&config.input_path, &config.output_path)?;
    print_report(
        &config.output_path,
        &collection.driver_name,
        &collection.columns(),
    );
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
