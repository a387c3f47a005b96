use std::time::Duration;

use clap::Parser;

pub const DEFAULT_TIMEOUT: &str = "10s";

/// Get the AWS region of an S3 bucket without credentials
#[derive(Parser, Debug)]
#[command(name = "s3region")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  s3region my-bucket
  s3region s3://my-bucket/path/to/object
  s3region arn:aws:s3:::my-bucket
  s3region https://my-bucket.s3.amazonaws.com/object
  s3region --timeout 5s my-bucket")]
pub struct Args {
    /// S3 bucket identifier: bucket name, s3:// URI, ARN or http(s) URL
    #[arg(value_name = "S3_IDENTIFIER")]
    pub identifier: String,

    /// HTTP request timeout (e.g. 500ms, 10s, 1m30s)
    #[arg(long, default_value = DEFAULT_TIMEOUT, value_parser = parse_duration)]
    pub timeout: Duration,

    /// Log request details to stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Parses a sequence of `<number><unit>` pairs such as `1m30s` or `1.5h`.
/// Units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare number is
/// seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let input = s.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    if input.chars().all(is_number) {
        let nanos = scaled_nanos(input, 1_000_000_000)
            .ok_or_else(|| format!("invalid duration {input:?}"))?;
        return to_timeout(nanos, input);
    }

    let mut rest = input;
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (number, tail) = rest.split_at(rest.find(|c| !is_number(c)).unwrap_or(rest.len()));
        let (unit, tail) = tail.split_at(tail.find(is_number).unwrap_or(tail.len()));

        let unit_nanos = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            "" => return Err(format!("missing unit in duration {input:?}")),
            other => return Err(format!("unknown duration unit {other:?} in {input:?}")),
        };
        total += scaled_nanos(number, unit_nanos)
            .ok_or_else(|| format!("invalid duration {input:?}"))?;
        rest = tail;
    }

    to_timeout(total, input)
}

/// `number` (digits with an optional fraction) times `unit_nanos`, truncated
/// to whole nanoseconds.
fn scaled_nanos(number: &str, unit_nanos: u128) -> Option<u128> {
    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !(whole.bytes().all(|b| b.is_ascii_digit()) && frac.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(unit_nanos)?;

    // Digits past nanosecond precision cannot change the result.
    let frac = &frac[..frac.len().min(18)];
    if !frac.is_empty() {
        let digits: u128 = frac.parse().ok()?;
        let scale = 10u128.pow(frac.len() as u32);
        nanos = nanos.checked_add(digits * unit_nanos / scale)?;
    }
    Some(nanos)
}

fn to_timeout(nanos: u128, input: &str) -> Result<Duration, String> {
    if nanos == 0 {
        return Err("timeout must be greater than zero".to_string());
    }
    let nanos = u64::try_from(nanos).map_err(|_| format!("duration {input:?} is too large"))?;
    Ok(Duration::from_nanos(nanos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("10s"), Ok(Duration::from_secs(10)));
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_duration("7"), Ok(Duration::from_secs(7)));
        assert_eq!(parse_duration("100us"), Ok(Duration::from_micros(100)));
        assert_eq!(parse_duration("100µs"), Ok(Duration::from_micros(100)));
        assert_eq!(parse_duration("250ns"), Ok(Duration::from_nanos(250)));
        assert_eq!(parse_duration(".5s"), Ok(Duration::from_millis(500)));
    }

    /// Multi-unit values add up like Go's `time.ParseDuration`.
    #[test]
    fn parse_duration_compound() {
        assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5400)));
        assert_eq!(
            parse_duration("2s500ms"),
            Ok(Duration::from_millis(2500))
        );
        assert_eq!(
            parse_duration("1h1m1s1ms"),
            Ok(Duration::from_millis(3_661_001))
        );
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("10d").is_err());
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("1m30").is_err());
        assert!(parse_duration("1..5s").is_err());
        assert!(parse_duration("s").is_err());
    }

    /// Defaults to a 10 second timeout and quiet logging.
    #[test]
    fn args_defaults() {
        let args = Args::try_parse_from(["s3region", "my-bucket"]).unwrap();
        assert_eq!(args.identifier, "my-bucket");
        assert_eq!(args.timeout, Duration::from_secs(10));
        assert!(!args.verbose);
    }

    #[test]
    fn args_timeout_and_verbose() {
        let args =
            Args::try_parse_from(["s3region", "--timeout", "5s", "-v", "s3://my-bucket/key"])
                .unwrap();
        assert_eq!(args.identifier, "s3://my-bucket/key");
        assert_eq!(args.timeout, Duration::from_secs(5));
        assert!(args.verbose);
    }

    #[test]
    fn args_require_identifier() {
        assert!(Args::try_parse_from(["s3region"]).is_err());
    }
}
