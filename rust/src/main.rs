use std::env;
use std::hint::black_box;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use uuidkit::{UuidFormats, UuidGen, Version, decode, format_uuid};

const LOG_ENV: &str = "UUIDKIT_LOG";
const VERSION_ENV: &str = "UUIDKIT_VERSION";

#[derive(Debug, Clone)]
struct EmitOpts {
    version: Version,
    count: usize,
    json: bool,
}

fn default_version() -> Version {
    env::var(VERSION_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Version::V4)
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_help() {
    eprintln!(
        "uuidkit - UUID v1/v4/v7 generator and decoder CLI\n\n\
Usage:\n  uuidkit generate [--version 1|4|7] [--json]\n  uuidkit bulk [--version 1|4|7] [--count <n>]\n  uuidkit format <uuid> [--json]\n  uuidkit decode <uuid> [--json]\n  uuidkit validate <uuid>\n  uuidkit healthcheck [--version 1|4|7] [--json]\n  uuidkit bench [--version 1|4|7] [--count <n>]\n  uuidkit selftest\n\n\
Environment:\n  {VERSION_ENV}=1|4|7   default version (4)\n  {LOG_ENV}=<filter>    log filter, e.g. debug (falls back to RUST_LOG)\n"
    );
}

fn parse_version(s: &str) -> Result<Version, String> {
    s.parse::<Version>()
        .map_err(|_| "version must be one of: 1, 4, 7".to_string())
}

fn parse_emit_flags(args: &[String], allow_count: bool) -> Result<EmitOpts, String> {
    let mut opts = EmitOpts {
        version: default_version(),
        count: 1,
        json: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--version" | "-v" => {
                if i + 1 >= args.len() {
                    return Err("missing value for --version".to_string());
                }
                opts.version = parse_version(&args[i + 1])?;
                i += 2;
            }
            "--count" | "-n" if allow_count => {
                if i + 1 >= args.len() {
                    return Err("missing value for --count".to_string());
                }
                opts.count = args[i + 1]
                    .parse::<usize>()
                    .map_err(|_| "invalid integer for --count".to_string())?;
                i += 2;
            }
            "--json" => {
                opts.json = true;
                i += 1;
            }
            _ => return Err(format!("unknown flag: {}", args[i])),
        }
    }

    Ok(opts)
}

/// Splits `<id> [--json]` arguments.
fn parse_id_args<'a>(args: &'a [String], cmd: &str) -> Result<(&'a str, bool), String> {
    let id = args
        .first()
        .ok_or_else(|| format!("{cmd} requires a uuid"))?;
    let mut json_out = false;
    for arg in &args[1..] {
        match arg.as_str() {
            "--json" => json_out = true,
            other => return Err(format!("unknown flag: {other}")),
        }
    }
    Ok((id.as_str(), json_out))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), String> {
    println!(
        "{}",
        serde_json::to_string(value).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn run_generate(args: &[String]) -> Result<(), String> {
    let opts = parse_emit_flags(args, false)?;
    let mut generator = UuidGen::new();
    let uuid = generator.generate(opts.version).map_err(|e| e.to_string())?;

    if opts.json {
        print_json(&UuidFormats::new(&uuid))?;
    } else {
        println!("{}", uuid);
    }
    Ok(())
}

fn run_bulk(args: &[String]) -> Result<(), String> {
    let opts = parse_emit_flags(args, true)?;
    let mut generator = UuidGen::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for _ in 0..opts.count {
        let uuid = generator.generate(opts.version).map_err(|e| e.to_string())?;
        writeln!(out, "{}", uuid).map_err(|e| e.to_string())?;
    }
    out.flush().map_err(|e| e.to_string())?;

    if generator.is_degraded() {
        eprintln!("warning: OS entropy unavailable, output used fallback randomness");
    }
    Ok(())
}

fn run_format(args: &[String]) -> Result<(), String> {
    let (id, json_out) = parse_id_args(args, "format")?;
    let formats = format_uuid(id).map_err(|e| e.to_string())?;

    if json_out {
        print_json(&formats)?;
    } else {
        for (name, value) in formats.entries() {
            println!("{}={}", name, value);
        }
    }
    Ok(())
}

fn run_decode(args: &[String]) -> Result<(), String> {
    let (id, json_out) = parse_id_args(args, "decode")?;
    let decoded = decode(id);

    if json_out {
        print_json(&decoded)?;
    } else {
        println!("valid={}", decoded.is_valid);
        if let Some(uuid) = decoded.uuid {
            println!("uuid={}", uuid);
        }
        println!(
            "version={}",
            decoded.version.map(|v| v.to_string()).unwrap_or_default()
        );
        println!(
            "variant={}",
            decoded.variant.map(|v| v.to_string()).unwrap_or_default()
        );
        println!(
            "timestamp={}",
            decoded
                .timestamp
                .map(|t| t.to_rfc3339())
                .unwrap_or_default()
        );
        println!(
            "timestamp_ms={}",
            decoded
                .timestamp_ms
                .map(|t| t.to_string())
                .unwrap_or_default()
        );
        println!(
            "random_bits={}",
            decoded
                .random_bits
                .map(|b| b.to_string())
                .unwrap_or_default()
        );
        println!("format={}", decoded.format.as_str());
        for w in &decoded.warnings {
            println!("warning[{}]={}", w.severity.as_str(), w.message);
        }
    }

    if decoded.is_valid {
        Ok(())
    } else {
        Err("invalid uuid".to_string())
    }
}

fn run_validate(args: &[String]) -> Result<(), String> {
    let (id, _) = parse_id_args(args, "validate")?;
    let ok = uuidkit::validate(id);

    println!("{}", if ok { "true" } else { "false" });
    if ok {
        Ok(())
    } else {
        Err("invalid uuid".to_string())
    }
}

fn run_healthcheck(args: &[String]) -> Result<(), String> {
    let opts = parse_emit_flags(args, false)?;
    let mut generator = UuidGen::new();
    let sample = generator.generate(opts.version).map_err(|e| e.to_string())?;
    let decoded = decode(&sample.to_string());
    let ok = decoded.is_valid
        && decoded.version == Some(opts.version.as_u8())
        && decoded.uuid == Some(sample)
        && !generator.is_degraded();

    if opts.json {
        print_json(&json!({
            "ok": ok,
            "version": opts.version.as_u8(),
            "degraded": generator.is_degraded(),
            "sample_id": sample,
        }))?;
    } else {
        println!(
            "ok={} version={} sample={}",
            if ok { "true" } else { "false" },
            opts.version.as_u8(),
            sample
        );
    }

    if ok {
        Ok(())
    } else {
        Err("healthcheck failed".to_string())
    }
}

fn run_bench(args: &[String]) -> Result<(), String> {
    let mut opts = parse_emit_flags(args, true)?;
    if opts.count <= 1 {
        opts.count = 100_000;
    }

    let mut generator = UuidGen::new();
    let start = Instant::now();
    for _ in 0..opts.count {
        black_box(generator.generate(opts.version).map_err(|e| e.to_string())?);
    }
    let secs = start.elapsed().as_secs_f64().max(1e-9);

    print_json(&json!({
        "impl": "rust",
        "version": opts.version.as_u8(),
        "n": opts.count,
        "seconds": secs,
        "ids_per_sec": opts.count as f64 / secs,
    }))
}

fn run_selftest() -> Result<(), String> {
    let mut generator = UuidGen::new();
    for version in Version::ALL {
        let uuid = generator.generate(version).map_err(|e| e.to_string())?;
        let decoded = decode(&UuidFormats::new(&uuid).standard);
        if decoded.uuid != Some(uuid) || decoded.version != Some(version.as_u8()) {
            return Err(format!("selftest failed: {} did not round-trip", uuid));
        }
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        print_help();
        process::exit(2);
    }

    if args[0] == "-h" || args[0] == "--help" || args[0] == "help" {
        print_help();
        return;
    }

    init_logging();

    let cmd = args[0].as_str();
    let rest = &args[1..];

    let res = match cmd {
        "generate" | "next" => run_generate(rest),
        "bulk" => run_bulk(rest),
        "format" => run_format(rest),
        "decode" | "parse" => run_decode(rest),
        "validate" => run_validate(rest),
        "healthcheck" => run_healthcheck(rest),
        "bench" => run_bench(rest),
        "selftest" => run_selftest(),
        _ => Err(format!("unknown command: {}", cmd)),
    };

    if let Err(err) = res {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1").unwrap(), Version::V1);
        assert_eq!(parse_version("v7").unwrap(), Version::V7);
        assert!(parse_version("5").is_err());
    }

    #[test]
    fn test_parse_emit_flags() {
        let opts = parse_emit_flags(&args(&["--version", "7", "--count", "3"]), true).unwrap();
        assert_eq!(opts.version, Version::V7);
        assert_eq!(opts.count, 3);
        assert!(!opts.json);

        assert!(parse_emit_flags(&args(&["--count", "3"]), false).is_err());
        assert!(parse_emit_flags(&args(&["--version"]), false).is_err());
        assert!(parse_emit_flags(&args(&["--count", "x"]), true).is_err());
    }

    #[test]
    fn test_parse_id_args() {
        let a = args(&["550e8400-e29b-41d4-a716-446655440000", "--json"]);
        let (id, json_out) = parse_id_args(&a, "decode").unwrap();
        assert_eq!(id, "550e8400-e29b-41d4-a716-446655440000");
        assert!(json_out);
        assert!(parse_id_args(&[], "decode").is_err());
        assert!(parse_id_args(&args(&["x", "--bogus"]), "decode").is_err());
    }

    #[test]
    fn test_bench_runs_requested_count() {
        assert!(run_bench(&args(&["--version", "7", "--count", "10"])).is_ok());
        assert!(run_bench(&args(&["--count", "x"])).is_err());
    }

    #[test]
    fn test_selftest_passes() {
        assert!(run_selftest().is_ok());
    }
}
