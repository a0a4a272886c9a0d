use bandwatch::api::{ApiClient, ClientConfig, Dashboard, ReqwestTransport};
use bandwatch::core::format_dollars;
use bandwatch::telemetry::init_default_tracing;

#[derive(Debug)]
struct CliArgs {
    symbol: String,
    base_url: Option<String>,
    json: bool,
}

fn main() {
    let _ = init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let mut config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    let transport = ReqwestTransport::new(config.clone()).map_err(|e| e.to_string())?;
    let client = ApiClient::new(transport, config).map_err(|e| e.to_string())?;
    let mut dashboard = Dashboard::new(client);

    let view = dashboard
        .load_stock_view(&args.symbol)
        .map_err(|e| e.display_message())?
        .ok_or_else(|| format!("summary for `{}` is already loading", args.symbol))?;

    if args.json {
        let payload = serde_json::json!({
            "symbol": view.symbol(),
            "stats": view.stats,
            "tooltips": view.tooltips,
            "markers": view.markers,
        });
        let text = serde_json::to_string_pretty(&payload)
            .map_err(|e| format!("failed to serialize output: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    println!("{} ({} trading days)", view.symbol(), view.series.len());
    for stats in &view.stats {
        println!(
            "  {}: touches {}/{} (upper/lower), hugs {}/{}, avg bounce {}, avg drop {}",
            stats.window.label(),
            stats.upper_touches,
            stats.lower_touches,
            stats.upper_hugs,
            stats.lower_hugs,
            stats.average_bounce.map_or_else(|| "-".to_owned(), format_dollars),
            stats.average_drop.map_or_else(|| "-".to_owned(), format_dollars),
        );
    }
    for (date, lines) in &view.tooltips {
        println!();
        println!("{date}");
        for line in lines {
            println!("  {line}");
        }
    }
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut symbol = None::<String>;
    let mut base_url = None::<String>;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--base-url" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --base-url".to_owned())?;
                base_url = Some(value);
            }
            "--json" => json = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag `{flag}`")),
            value => symbol = Some(value.to_owned()),
        }
    }

    let symbol = symbol
        .ok_or_else(|| "usage: band_events <SYMBOL> [--base-url <url>] [--json]".to_owned())?;
    Ok(CliArgs {
        symbol,
        base_url,
        json,
    })
}
