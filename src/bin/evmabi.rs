// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::error::Error;
use std::fs;

use clap::{arg, Arg, ArgMatches, Command};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use evmabi::abi::{events_from_bytecode, selectors_from_bytecode};
use evmabi::lookup::{
    CompositeSignatureLookup, FourByteSignatureLookup, SamczsunSignatureLookup, SignatureLookup,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("evmabi")
        .about("Recovers an ABI skeleton from deployed EVM bytecode")
        .version("0.1.0")
        .subcommand_required(true)
        .arg(arg!(--verbose "Show verbose output"))
        .subcommand(
            Command::new("guess-abi")
                .about("Extract selectors and event topics from bytecode and resolve candidate signatures")
                .arg(Arg::new("bytecode").short('b').long("bytecode").help("Raw bytecode hex, with or without 0x prefix"))
                .arg(Arg::new("file").short('f').long("file").help("Read bytecode hex from a file"))
                .arg(Arg::new("address").short('a').long("address").help("Fetch deployed bytecode from this address via --url"))
                .arg(Arg::new("url").short('u').long("url").help("JSON-RPC endpoint to fetch bytecode from, when --address is given"))
                .arg(Arg::new("siglookups").long("siglookups").help("Comma-separated catalogs to query: samczsun, fourbyte").default_value("samczsun,fourbyte"))
                .visible_alias("g"),
        )
        .get_matches();

    let verbose = matches.is_present("verbose");
    if verbose {
        init_logging(LevelFilter::Info);
    } else {
        init_logging(LevelFilter::Warn);
    }

    let ok = match matches.subcommand() {
        Some(("guess-abi", args)) => guess_abi(args).await?,
        _ => unreachable!(),
    };

    std::process::exit(if ok { 0 } else { 1 });
}

async fn guess_abi(args: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let bytecode = resolve_bytecode(args).await?;

    let selectors = selectors_from_bytecode(&bytecode)?;
    let events = events_from_bytecode(&bytecode)?;
    log::info!(
        "recovered {} selector(s) and {} event topic(s)",
        selectors.len(),
        events.len()
    );

    let lookup = build_composite_lookup(args);

    for selector in &selectors {
        match lookup.load_functions(selector).await {
            Ok(candidates) if !candidates.is_empty() => {
                println!("{} {}", selector, candidates.join(" | "));
            }
            Ok(_) => println!("{} (no catalog match)", selector),
            Err(err) => {
                log::warn!("signature lookup for {} failed: {}", selector, err);
                println!("{} (lookup failed)", selector);
            }
        }
    }

    for topic in &events {
        match lookup.load_events(topic).await {
            Ok(candidates) if !candidates.is_empty() => {
                println!("{} {}", topic, candidates.join(" | "));
            }
            Ok(_) => println!("{} (no catalog match)", topic),
            Err(err) => {
                log::warn!("event lookup for {} failed: {}", topic, err);
                println!("{} (lookup failed)", topic);
            }
        }
    }

    Ok(true)
}

async fn resolve_bytecode(args: &ArgMatches) -> Result<String, Box<dyn Error>> {
    if let Some(bytecode) = args.get_one::<String>("bytecode") {
        return Ok(bytecode.clone());
    }
    if let Some(path) = args.get_one::<String>("file") {
        return Ok(fs::read_to_string(path)?.trim().to_string());
    }
    if let (Some(address), Some(url)) = (
        args.get_one::<String>("address"),
        args.get_one::<String>("url"),
    ) {
        return fetch_code_via_rpc(url, address).await;
    }
    Err("one of --bytecode, --file, or --address with --url is required".into())
}

/// Fetch deployed bytecode via a JSON-RPC `eth_getCode` call.
async fn fetch_code_via_rpc(url: &str, address: &str) -> Result<String, Box<dyn Error>> {
    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_getCode",
        "params": [address, "latest"],
    });
    let resp: serde_json::Value = client.post(url).json(&body).send().await?.json().await?;
    resp.get("result")
        .and_then(|r| r.as_str())
        .map(str::to_string)
        .ok_or_else(|| format!("eth_getCode returned no result for {}", address).into())
}

fn build_composite_lookup(args: &ArgMatches) -> CompositeSignatureLookup {
    let requested = args
        .get_one::<String>("siglookups")
        .map(String::as_str)
        .unwrap_or("samczsun,fourbyte");

    let mut lookups: Vec<Box<dyn SignatureLookup>> = Vec::new();
    for name in requested.split(',').map(str::trim) {
        match name {
            "samczsun" => lookups.push(Box::new(SamczsunSignatureLookup::new())),
            "fourbyte" => lookups.push(Box::new(FourByteSignatureLookup::new())),
            "" => {}
            other => log::warn!("unknown signature catalog {:?}, skipping", other),
        }
    }
    CompositeSignatureLookup::new(lookups)
}

/// Initialise logging using a suitable pattern.
pub fn init_logging(level: LevelFilter) {
    let encoder = PatternEncoder::new("[{l}] {m}{n}");
    //
    let stdout = ConsoleAppender::builder().encoder(Box::new(encoder)).build();
    //
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .unwrap();
    //
    let _handle = log4rs::init_config(config).unwrap();
}
