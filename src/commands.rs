use std::io::{self, Write};

use reqchain::chain::Chain;
use reqchain::handlers::{ChainConfig, Request, RequestError};
use reqchain::observability::TracingSink;
use reqchain::runner::{Runner, demo_requests};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Print one outcome line per request. Diagnostics go to the log.
///
/// Nothing runs unless every request parses.
pub fn check(chain: Chain, raw: &[String], out: &mut impl Write) -> Result<(), CommandError> {
    let requests = raw
        .iter()
        .map(|text| text.parse::<Request>())
        .collect::<Result<Vec<_>, _>>()?;

    let runner = Runner::new(chain);
    for (index, request) in requests.iter().enumerate() {
        let report = runner.run(request, &TracingSink);
        writeln!(out, "request {}: {}", index + 1, report.outcome)?;
    }

    let metrics = runner.metrics();
    info!(
        requests = metrics.requests,
        rejected = metrics.rejected,
        completed = metrics.completed,
        "Check finished"
    );
    Ok(())
}

/// Run the reference scenarios against fields named by `config`
pub fn demo(chain: Chain, config: &ChainConfig, out: &mut impl Write) -> io::Result<()> {
    let runner = Runner::new(chain);
    for (label, request) in demo_requests(config) {
        let report = runner.run(&request, &TracingSink);
        writeln!(out, "{label}: {}", report.outcome)?;
    }
    Ok(())
}

pub fn handlers(chain: &Chain, out: &mut impl Write) -> io::Result<()> {
    for (position, name) in chain.names().into_iter().enumerate() {
        writeln!(out, "{}. {name}", position + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqchain::handlers::{HandlerRegistry, HandlerSettings};

    fn chain_for(config: &ChainConfig) -> Chain {
        HandlerRegistry::with_defaults().build_chain(config).unwrap()
    }

    fn requests(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|text| text.to_string()).collect()
    }

    #[test]
    fn test_check_prints_one_line_per_request() {
        let mut out = Vec::new();
        let raw = requests(&[
            r#"{"admin": true}"#,
            r#"{"identifier": 1, "admin": true, "payload": "hello"}"#,
        ]);

        check(chain_for(&ChainConfig::default()), &raw, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "request 1: processing stopped at handler identity with reason missing identifier\n\
             request 2: processing reached end of chain\n"
        );
    }

    #[test]
    fn test_check_rejects_malformed_request_before_running_any() {
        let mut out = Vec::new();
        let raw = requests(&[r#"{"identifier": 1}"#, "{not json"]);

        let err = check(chain_for(&ChainConfig::default()), &raw, &mut out).unwrap_err();

        assert!(matches!(err, CommandError::Request(RequestError::InvalidJson(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_check_rejects_non_object_request() {
        let mut out = Vec::new();
        let raw = requests(&["[1, 2]"]);

        let err = check(chain_for(&ChainConfig::default()), &raw, &mut out).unwrap_err();

        assert!(matches!(err, CommandError::Request(RequestError::NotAnObject("array"))));
    }

    #[test]
    fn test_demo_uses_configured_fields() {
        let config = ChainConfig {
            handlers: vec![
                HandlerSettings::new("identity").with_field("userId"),
                HandlerSettings::new("permission"),
                HandlerSettings::new("payload").with_field("log"),
            ],
        };
        let mut out = Vec::new();

        demo(chain_for(&config), &config, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "missing identifier: processing stopped at handler identity with reason missing identifier\n\
             not an admin: processing stopped at handler permission with reason insufficient permission\n\
             missing payload: processing stopped at handler payload with reason missing payload\n\
             payload logged: processing reached end of chain\n"
        );
    }

    #[test]
    fn test_handlers_lists_chain_order() {
        let config = ChainConfig {
            handlers: vec![
                HandlerSettings::new("payload"),
                HandlerSettings::new("identity").named("user-id"),
            ],
        };
        let mut out = Vec::new();

        handlers(&chain_for(&config), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1. payload\n2. user-id\n");
    }
}
