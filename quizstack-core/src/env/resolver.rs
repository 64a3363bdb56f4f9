//! Environment resolution into a typed [`Configuration`].

use crate::error::{QuizstackError, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Runtime fields injected into the container, in injection order.
pub const RUNTIME_FIELDS: &[&str] = &[
    "PORT",
    "SECRET_KEY",
    "DB_USER",
    "DB_PWD",
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
    "DB_DIALECT",
    "HOST",
    "EMAIL",
    "MAIL_HOST",
    "MAIL_USER",
    "MAIL_PASS",
    "MAIL_PORT",
    "ENABLE_PLAYGROUND",
];

/// Fields whose values are masked in human-facing output.
pub const SECRET_FIELDS: &[&str] = &["SECRET_KEY", "DB_PWD", "MAIL_PASS"];

const VPC_FIELD: &str = "VPC_DB";
const SECURITY_GROUP_FIELD: &str = "SG_DB";
const DEPLOY_REGION: &str = "CDK_DEPLOY_REGION";
const DEFAULT_REGION: &str = "CDK_DEFAULT_REGION";

/// A port-valued field: the raw text plus its parsed value, if valid.
///
/// Parsing never substitutes a default. Zero is treated as invalid.
/// Surrounding whitespace is ignored when validating, but [`raw`](Self::raw)
/// keeps it: the container receives the text exactly as supplied and parses
/// it the same lenient way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortField {
    name: &'static str,
    raw: String,
    value: Option<u16>,
}

impl PortField {
    fn parse(name: &'static str, raw: String) -> Self {
        let value = raw.trim().parse::<u16>().ok().filter(|port| *port != 0);
        Self { name, raw, value }
    }

    /// Field name, e.g. `DB_PORT`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The text exactly as supplied (empty when absent).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed port, `None` when absent or malformed.
    pub fn value(&self) -> Option<u16> {
        self.value
    }

    /// The port, or a validation error naming the field and raw value.
    pub fn require(&self) -> Result<u16> {
        self.value.ok_or_else(|| QuizstackError::InvalidPort {
            field: self.name.to_string(),
            value: self.raw.clone(),
            reason: self.rejection_reason().to_string(),
        })
    }

    fn rejection_reason(&self) -> &'static str {
        let trimmed = self.raw.trim();
        if trimmed.is_empty() {
            "not set"
        } else if trimmed.parse::<u16>() == Ok(0) {
            "port 0 is not routable"
        } else if trimmed.chars().all(|c| c.is_ascii_digit()) {
            "out of range"
        } else {
            "not a number"
        }
    }
}

/// Resolved deployment configuration.
///
/// Every string field defaults to the empty string. The two ports keep their
/// raw text so the container still receives exactly what was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub port: PortField,
    pub secret_key: String,
    pub db_user: String,
    pub db_pwd: String,
    pub db_host: String,
    pub db_port: PortField,
    pub db_name: String,
    pub db_dialect: String,
    pub host: String,
    pub email: String,
    pub mail_host: String,
    pub mail_user: String,
    pub mail_pass: String,
    pub mail_port: String,
    pub enable_playground: String,

    /// Identifier of the network hosting the database (`VPC_DB`).
    pub vpc_db: String,
    /// Identifier of the database security group (`SG_DB`).
    pub sg_db: String,
    /// Region from `CDK_DEPLOY_REGION`, else `CDK_DEFAULT_REGION`.
    pub region: Option<String>,
}

impl Configuration {
    /// Runtime environment for the container as ordered `(name, value)` pairs.
    ///
    /// Contains every runtime field, including empty ones.
    pub fn runtime_environment(&self) -> Vec<(&'static str, String)> {
        RUNTIME_FIELDS
            .iter()
            .map(|name| (*name, self.runtime_value(name).to_string()))
            .collect()
    }

    fn runtime_value(&self, name: &str) -> &str {
        match name {
            "PORT" => self.port.raw(),
            "SECRET_KEY" => &self.secret_key,
            "DB_USER" => &self.db_user,
            "DB_PWD" => &self.db_pwd,
            "DB_HOST" => &self.db_host,
            "DB_PORT" => self.db_port.raw(),
            "DB_NAME" => &self.db_name,
            "DB_DIALECT" => &self.db_dialect,
            "HOST" => &self.host,
            "EMAIL" => &self.email,
            "MAIL_HOST" => &self.mail_host,
            "MAIL_USER" => &self.mail_user,
            "MAIL_PASS" => &self.mail_pass,
            "MAIL_PORT" => &self.mail_port,
            "ENABLE_PLAYGROUND" => &self.enable_playground,
            _ => "",
        }
    }

    /// Whether the GraphQL playground toggle reads as enabled. Display only.
    pub fn playground_enabled(&self) -> bool {
        matches!(self.enable_playground.trim().to_lowercase().as_str(), "true" | "1" | "yes")
    }

    /// Region to deploy into, falling back to the given default.
    pub fn region_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.region.as_deref().unwrap_or(fallback)
    }

    /// The value of the database network identifier, or `MissingField`.
    pub fn require_vpc(&self) -> Result<&str> {
        require_non_empty(VPC_FIELD, &self.vpc_db)
    }

    /// The value of the database security group identifier, or `MissingField`.
    pub fn require_security_group(&self) -> Result<&str> {
        require_non_empty(SECURITY_GROUP_FIELD, &self.sg_db)
    }

    /// Whether a field is a secret that must be masked in human output.
    pub fn is_secret(name: &str) -> bool {
        SECRET_FIELDS.contains(&name)
    }
}

fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QuizstackError::MissingField { field: field.to_string() });
    }
    Ok(trimmed)
}

/// Builds a [`Configuration`] from raw key/value pairs.
pub struct ConfigResolver;

impl ConfigResolver {
    /// Resolve from any source of string pairs. Later duplicates win.
    #[instrument(skip(pairs))]
    pub fn resolve<I, K, V>(pairs: I) -> Configuration
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut raw: HashMap<String, String> =
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        let mut take = |key: &str| raw.remove(key).unwrap_or_default();

        let config = Configuration {
            port: PortField::parse("PORT", take("PORT")),
            secret_key: take("SECRET_KEY"),
            db_user: take("DB_USER"),
            db_pwd: take("DB_PWD"),
            db_host: take("DB_HOST"),
            db_port: PortField::parse("DB_PORT", take("DB_PORT")),
            db_name: take("DB_NAME"),
            db_dialect: take("DB_DIALECT"),
            host: take("HOST"),
            email: take("EMAIL"),
            mail_host: take("MAIL_HOST"),
            mail_user: take("MAIL_USER"),
            mail_pass: take("MAIL_PASS"),
            mail_port: take("MAIL_PORT"),
            enable_playground: take("ENABLE_PLAYGROUND"),
            vpc_db: take(VPC_FIELD),
            sg_db: take(SECURITY_GROUP_FIELD),
            region: Self::region(take(DEPLOY_REGION), take(DEFAULT_REGION)),
        };

        debug!(
            port_valid = config.port.value().is_some(),
            db_port_valid = config.db_port.value().is_some(),
            region = ?config.region,
            "Resolved configuration"
        );
        config
    }

    fn region(deploy: String, default: String) -> Option<String> {
        [deploy, default].into_iter().map(|r| r.trim().to_string()).find(|r| !r.is_empty())
    }
}
