use log::debug;
use recipe2pesto::{fetch_record, PestoConfig, PestoConverter};
use serde_json::Value;
use std::env;
use std::io::Read;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A URL, a JSON file, or "-" for a JSON record on stdin
    let args: Vec<String> = env::args().collect();
    let source = args
        .get(1)
        .ok_or("Please provide a URL, a JSON file or - as an argument")?;

    let config = PestoConfig::load()?;

    let record: Value = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_record(source, &config.fetch).await?
    } else if source == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        serde_json::from_str(&input)?
    } else {
        serde_json::from_str(&tokio::fs::read_to_string(source).await?)?
    };
    debug!("{:#?}", record);

    let converter = PestoConverter::from_config(&config.output);
    println!("{}", converter.convert_value(&record)?);

    Ok(())
}
