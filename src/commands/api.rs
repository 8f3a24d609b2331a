// src/commands/api.rs
//! `notion api <METHOD> <PATH>`: an authenticated request to any endpoint.

use super::Session;
use crate::api::{Method, NotionApi, NotionTransport};
use crate::config::ApiArgs;
use crate::error::Result;
use crate::types::ValidationError;
use serde_json::Value;

pub(super) async fn run<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    args: ApiArgs,
) -> Result<()> {
    let method = parse_method(&args.method)?;
    let path = if args.path.starts_with('/') {
        args.path
    } else {
        format!("/{}", args.path)
    };

    let text = match args.body.filter(|b| !b.is_empty()) {
        Some(body) => Some(body),
        None if session.input_is_piped && takes_body(&method) => {
            let mut piped = String::new();
            session.input.read_to_string(&mut piped)?;
            Some(piped).filter(|p| !p.trim().is_empty())
        }
        None => None,
    };
    let body = text
        .map(|text| {
            serde_json::from_str::<Value>(&text).map_err(|e| ValidationError::InvalidValue {
                field: "--body",
                reason: format!("invalid JSON body: {}", e),
            })
        })
        .transpose()?;

    let response = api.request(method, &path, body.as_ref()).await?;
    if response.is_null() {
        return Ok(());
    }
    session.out.json(&response)
}

fn parse_method(raw: &str) -> Result<Method> {
    match raw.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PATCH" => Ok(Method::PATCH),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        _ => Err(ValidationError::InvalidValue {
            field: "METHOD",
            reason: format!("unsupported HTTP method {:?}", raw),
        }
        .into()),
    }
}

fn takes_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PATCH || *method == Method::PUT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_is_case_insensitive() {
        assert_eq!(parse_method("patch").unwrap(), Method::PATCH);
        assert_eq!(parse_method("Get").unwrap(), Method::GET);
        assert!(parse_method("TRACE").is_err());
    }

    #[test]
    fn test_only_writes_read_piped_bodies() {
        assert!(takes_body(&Method::POST));
        assert!(!takes_body(&Method::GET));
        assert!(!takes_body(&Method::DELETE));
    }
}
