//! Name translation between manifest (camelCase) and declarative (snake_case) conventions

/// Convert an upstream manifest field name to its declarative name.
///
/// Acronym runs stay one word: `requireTLS` becomes `require_tls` and
/// `URLSecret` becomes `url_secret`. Characters that are not alphanumeric
/// become word separators.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !out.is_empty() && !out.ends_with('_') {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
                {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else if c.is_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Build the resource type name for a kind
///
/// `k8s` + `monitoring.coreos.com` + `AlertmanagerConfig` + `v1alpha1` gives
/// `k8s_monitoring_coreos_com_alertmanager_config_v1alpha1`.
pub fn type_name(prefix: &str, group: &str, kind: &str, version: &str) -> String {
    let group = group.replace(['.', '-'], "_");
    let kind = to_snake_case(kind);
    if prefix.is_empty() {
        format!("{group}_{kind}_{version}")
    } else {
        format!("{prefix}_{group}_{kind}_{version}")
    }
}
