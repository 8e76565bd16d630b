use std::env;

use freedom::api::ReportError;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = freedom::api::run_http_server(port).await {
                log::error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Some("report") => match freedom::api::run_report_cli(raw_args.iter().skip(1)) {
            Ok(json) => println!("{json}"),
            Err(ReportError::Args(e)) => e.exit(),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        _ => {
            eprintln!("Usage: freedom serve [port] | freedom report --monthly-expenses <AMOUNT> [options]");
            std::process::exit(1);
        }
    }
}
