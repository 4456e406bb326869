use gatelink_types::{DynamicForward, LocalToRemoteForward, RemoteToLocalForward};

/// Parse a local-to-remote forward specification.
///
/// Format: `[bind_address:]port:host:hostport`
pub fn parse_local_to_remote(spec: &str) -> crate::TunnelResult<LocalToRemoteForward> {
    let fields = split_colon_parts(spec);
    if fields.len() == 4 {
        Ok(LocalToRemoteForward {
            bind_address: normalize_host(&fields[0]),
            bind_port: parse_port(&fields[1])?,
            target_host: normalize_host(&fields[2]).unwrap_or_else(|| "127.0.0.1".to_string()),
            target_port: parse_port(&fields[3])?,
        })
    } else if fields.len() == 3 {
        Ok(LocalToRemoteForward {
            bind_address: None,
            bind_port: parse_port(&fields[0])?,
            target_host: normalize_host(&fields[1]).unwrap_or_else(|| "127.0.0.1".to_string()),
            target_port: parse_port(&fields[2])?,
        })
    } else {
        Err(crate::TunnelError::invalid_forward(
            "local-to-remote",
            "spec must be [bind_address:]port:host:hostport",
        ))
    }
}

/// Parse a remote-to-local forward specification.
///
/// Format: `[bind_address:]port:host:hostport`
pub fn parse_remote_to_local(spec: &str) -> crate::TunnelResult<RemoteToLocalForward> {
    let fields = split_colon_parts(spec);
    if fields.len() == 4 {
        Ok(RemoteToLocalForward {
            bind_address: normalize_host(&fields[0]),
            bind_port: parse_port(&fields[1])?,
            target_host: normalize_host(&fields[2]).unwrap_or_else(|| "127.0.0.1".to_string()),
            target_port: parse_port(&fields[3])?,
        })
    } else if fields.len() == 3 {
        Ok(RemoteToLocalForward {
            bind_address: None,
            bind_port: parse_port(&fields[0])?,
            target_host: normalize_host(&fields[1]).unwrap_or_else(|| "127.0.0.1".to_string()),
            target_port: parse_port(&fields[2])?,
        })
    } else {
        Err(crate::TunnelError::invalid_forward(
            "remote-to-local",
            "spec must be [bind_address:]port:host:hostport",
        ))
    }
}

/// Parse a dynamic forward specification.
///
/// Format: `[bind_address:]port`
pub fn parse_dynamic(spec: &str) -> crate::TunnelResult<DynamicForward> {
    let fields = split_colon_parts(spec);
    if fields.is_empty() || fields.len() > 2 {
        return Err(crate::TunnelError::invalid_forward(
            "dynamic",
            "spec must be [bind_address:]port",
        ));
    }
    let bind_address = if fields.len() == 2 { normalize_host(&fields[0]) } else { None };
    let port_str = fields.last().expect("port field present");
    Ok(DynamicForward {
        bind_address,
        bind_port: parse_port(port_str)?,
    })
}

// Helper functions

fn parse_port(value: &str) -> crate::TunnelResult<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| crate::TunnelError::InvalidPort(value.to_string()))
}

fn normalize_host(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let no_brackets = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(|inner| inner.to_string());
    no_brackets.or_else(|| Some(trimmed.to_string()))
}

fn split_colon_parts(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0;
    for ch in input.chars() {
        match ch {
            ':' if bracket_depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth > 0 {
                    bracket_depth -= 1;
                }
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        parts.push(current.trim().to_string());
    }
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}
