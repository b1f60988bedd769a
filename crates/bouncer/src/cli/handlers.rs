//! Command handlers.

use bouncer::{
    CategoryId, ChannelId, DefaultFormatter, DispatchConfig, FailureArg, FailureKind, Formatter,
    GuildId, RoleId, RoleRef, UserId,
};
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// One line per kind: `Kind -> Inverse`.
pub fn list_kinds() -> Vec<String> {
    FailureKind::iter()
        .map(|kind| format!("{:<24} -> {}", kind.to_string(), kind.inverse()))
        .collect()
}

fn ids<T: From<u64>>(raw: &[String]) -> CliResult<Vec<T>> {
    raw.iter()
        .map(|value| -> CliResult<T> { Ok(T::from(value.parse::<u64>()?)) })
        .collect()
}

fn seconds(value: &str) -> CliResult<FailureArg> {
    Ok(FailureArg::Seconds(value.parse()?))
}

/// Interpret command-line strings as the arguments `kind` carries.
pub fn parse_args(kind: FailureKind, raw: &[String]) -> CliResult<Vec<FailureArg>> {
    use FailureKind::*;

    let args = match kind {
        NotInChannel | InChannel => vec![FailureArg::Channels(ids::<ChannelId>(raw)?)],
        NotInGuild | InGuild => vec![FailureArg::Guilds(ids::<GuildId>(raw)?)],
        NotInCategory | InCategory => vec![FailureArg::Categories(ids::<CategoryId>(raw)?)],
        IsNotUser | IsUser => vec![FailureArg::Users(ids::<UserId>(raw)?)],
        UsernameDoesNotContain | UsernameContains => vec![FailureArg::Text(raw.join(" "))],
        MembershipGT | MembershipLT | MembershipGE | MembershipLE => match raw {
            [limit] => vec![seconds(limit)?],
            [limit, other, other_limit] => vec![
                seconds(limit)?,
                FailureArg::Kind(FailureKind::from_str(other)?),
                seconds(other_limit)?,
            ],
            _ => return Err("membership kinds take SECONDS or SECONDS KIND SECONDS".into()),
        },
        UserMissingRole | UserHasRole | BotMissingRole | BotHasRole => raw
            .iter()
            .map(|role| {
                FailureArg::Role(match role.parse::<u64>() {
                    Ok(id) => RoleRef::Id(RoleId::new(id)),
                    Err(_) => RoleRef::Name(role.clone()),
                })
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(args)
}

/// The stock message for `kind` with `raw` arguments.
#[instrument(skip(raw), fields(args = raw.len()))]
pub fn render_kind(kind: &str, raw: &[String]) -> CliResult<String> {
    let kind = FailureKind::from_str(kind)?;
    let args = parse_args(kind, raw)?;
    debug!(?args, "Parsed arguments");
    Ok(DefaultFormatter
        .format(kind, &args)
        .unwrap_or_else(|| DefaultFormatter.generic()))
}

/// The effective configuration as TOML.
#[instrument]
pub fn show_config(path: Option<&Path>) -> CliResult<String> {
    let config = match path {
        Some(path) => DispatchConfig::from_file(path)?,
        None => DispatchConfig::load()?,
    };
    Ok(toml::to_string_pretty(&config)?)
}
