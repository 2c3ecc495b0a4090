// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! reqkit CLI - send declarative requests and run suites

use std::env;
use std::process::ExitCode;

use reqkit::{Config, HttpClient, RequestDescriptor, Response, Session, TestSuite};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let directive = match "reqkit=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => directive,
        Err(e) => {
            eprintln!("Invalid log directive: {}", e);
            return ExitCode::from(1);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let config = match option_value(&args, "--config").map(|path| Config::from_json_file(path)) {
        Some(Ok(config)) => Some(config),
        Some(Err(e)) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::from(1);
        }
        None => None,
    };

    match args[1].as_str() {
        "send" => {
            if args.len() < 3 {
                eprintln!("Usage: reqkit send <request.json> [--config <config.json>]");
                return ExitCode::from(1);
            }
            send_file(&args[2], config).await
        }
        "get" => {
            if args.len() < 3 {
                eprintln!("Usage: reqkit get <url> [--config <config.json>]");
                return ExitCode::from(1);
            }
            send_request(RequestDescriptor::get(&args[2]), config).await
        }
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: reqkit run <suite.json> [--tag <tag>] [--config <config.json>]");
                return ExitCode::from(1);
            }
            run_suite(&args[2], option_value(&args, "--tag"), config).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("reqkit {}", reqkit::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"reqkit - Declarative HTTP requests

USAGE:
    reqkit <COMMAND> [OPTIONS]

COMMANDS:
    send <request.json>   Send a request described by a JSON file
    get <url>             Send a GET request
    run <suite.json>      Run a test suite and print a JSON report
    help                  Show this help message
    version               Show version information

OPTIONS:
    --config <file>       Session configuration (base_url, headers, ...)
    --tag <tag>           Only run test cases with this tag (run)

EXAMPLES:
    reqkit get https://httpbin.org/get
    reqkit send login.json --config staging.json
    reqkit run suite.json --tag smoke
"#
    );
}

fn option_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn client(config: Option<Config>) -> HttpClient {
    match config {
        Some(config) => HttpClient::new().with_config(config),
        None => HttpClient::new(),
    }
}

async fn send_file(path: &str, config: Option<Config>) -> ExitCode {
    match RequestDescriptor::from_json_file(path) {
        Ok(request) => send_request(request, config).await,
        Err(e) => {
            eprintln!("Failed to load request: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn send_request(request: RequestDescriptor, config: Option<Config>) -> ExitCode {
    let session = Session::with_client(client(config));

    match session.send(&request).await {
        Ok(response) => {
            print_response(&response);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Request failed: {}", e);
            ExitCode::from(1)
        }
    }
}

fn print_response(response: &Response) {
    println!("=== Response ===");
    println!("Status: {} {}", response.status_code, response.reason);
    println!("URL: {}", response.url);
    println!("Time: {:.3}s", response.elapsed);
    println!("Size: {} bytes", response.body_len());

    if !response.headers.is_empty() {
        let mut names: Vec<&String> = response.headers.keys().collect();
        names.sort();
        println!("\n=== Headers ({}) ===", names.len());
        for name in names {
            println!("  {}: {}", name, response.headers[name]);
        }
    }

    if !response.cookies.is_empty() {
        println!("\n=== Cookies ({}) ===", response.cookies.len());
        for (name, value) in &response.cookies {
            println!("  {}={}", name, value);
        }
    }

    if !response.text.is_empty() {
        println!("\n=== Body ===");
        println!("{}", response.text);
    }
}

async fn run_suite(path: &str, tag: Option<&str>, config: Option<Config>) -> ExitCode {
    let suite = match TestSuite::from_json_file(path) {
        Ok(suite) => suite,
        Err(e) => {
            eprintln!("Failed to load suite: {}", e);
            return ExitCode::from(1);
        }
    };

    let client = client(config);
    let report = match tag {
        Some(tag) => suite.run_tagged(&client, tag).await,
        None => suite.run_with(&client).await,
    };

    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to render report: {}", e);
            return ExitCode::from(1);
        }
    }

    if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
