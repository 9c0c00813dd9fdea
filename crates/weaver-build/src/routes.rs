//! uWSGI routing: HTTPS redirect, static files and access control.
//!
//! The `${...}` inside route rules are uWSGI request variables and are
//! emitted as-is; only descriptor values go through the interpolator.

use tracing::debug;
use weaver_core::{AuthSection, EnvVarMap, InterpolationError, Interpolator};

use crate::args::RuntimeArgs;

/// Label the HTTPS redirect chain jumps to once the request is secure.
pub const SSL_OKAY_LABEL: &str = "ssl-okay";

/// Label every access-control rule jumps to on success. Always emitted.
pub const AUTH_DONE_LABEL: &str = "auth-done";

/// Whitelist alias that expands to [`TRUSTED_NETWORKS`].
pub const TRUSTED_ALIAS: &str = "trusted";

pub const TRUSTED_NETWORKS: [&str; 5] = [
    "127.0.0.0/8",
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "::1/128",
];

/// Path prefix for ACME HTTP-01 challenges, which must bypass auth.
pub const ACME_CHALLENGE_PATTERN: &str = r"^/\.well-known/acme-challenge/";

pub(crate) fn ssl_redirect(args: &mut RuntimeArgs) {
    args.option(
        "route-if",
        format!("equal:${{HTTPS}};on goto:{SSL_OKAY_LABEL}"),
    );
    args.option(
        "route-if",
        format!("equal:${{HTTP_X_FORWARDED_PROTO}};https goto:{SSL_OKAY_LABEL}"),
    );
    args.option(
        "route",
        ".* redirect-permanent:https://${HTTP_HOST}${REQUEST_URI}",
    );
    args.option("route-label", SSL_OKAY_LABEL);
}

/// Already-interpolated static file settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StaticRules {
    pub public_dirs: Vec<String>,
    pub maps: Vec<(String, String)>,
    pub index: Vec<String>,
}

pub(crate) fn static_files(args: &mut RuntimeArgs, rules: &StaticRules) {
    for dir in &rules.public_dirs {
        args.option("check-static", dir);
    }
    for (prefix, dir) in &rules.maps {
        args.option("static-map", format!("{prefix}={dir}"));
    }
    for name in &rules.index {
        args.option("static-index", name);
    }
}

/// Emit whitelist, ACME bypass and basic-auth rules, then the
/// [`AUTH_DONE_LABEL`]. Without an auth section only the label is emitted.
pub(crate) fn access_control(
    args: &mut RuntimeArgs,
    auth: Option<&AuthSection>,
    interpolator: &Interpolator,
    env: &EnvVarMap,
) -> Result<(), InterpolationError> {
    if let Some(auth) = auth {
        for entry in &auth.ip_whitelist {
            if entry == TRUSTED_ALIAS {
                for network in TRUSTED_NETWORKS {
                    allow_address(args, network);
                }
            } else {
                allow_address(args, &interpolator.interpolate(entry, env)?);
            }
        }

        args.option("route", format!("{ACME_CHALLENGE_PATTERN} goto:{AUTH_DONE_LABEL}"));

        if let Some(htpasswd) = &auth.htpasswd {
            let htpasswd = interpolator.interpolate(htpasswd, env)?;
            let realm = interpolator.interpolate(&auth.realm, env)?;
            debug!(%realm, %htpasswd, "basic auth enabled");
            args.option("route", format!(".* basicauth:{realm},{htpasswd}"));
        }
    }

    args.option("route-label", AUTH_DONE_LABEL);
    Ok(())
}

fn allow_address(args: &mut RuntimeArgs, network: &str) {
    let matcher = if network.contains(':') { "ipv6in" } else { "ipv4in" };
    args.option(
        "route-if",
        format!("{matcher}:${{REMOTE_ADDR}};{network} goto:{AUTH_DONE_LABEL}"),
    );
}
