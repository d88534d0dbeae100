//! Machine-information block appended to the primer on first run.
//!
//! Grounds the model in the operating environment: OS, architecture, CPU
//! count, hostname, current user, home directory, and environment variables.

use std::collections::BTreeMap;

/// Retrieve system information as a pretty-printed JSON block.
pub fn machine_info() -> String {
    let mut info: BTreeMap<&str, String> = BTreeMap::new();
    info.insert("OS", std::env::consts::OS.to_string());
    info.insert("Architecture", std::env::consts::ARCH.to_string());
    info.insert(
        "CPU Count",
        std::thread::available_parallelism()
            .map(|n| n.get().to_string())
            .unwrap_or_else(|_| "unknown".to_string()),
    );
    info.insert("Hostname", env_or_unknown("HOSTNAME"));
    info.insert("Current User", env_or_unknown("USER"));
    info.insert("Home Directory", env_or_unknown("HOME"));
    info.insert("Environment Vars", environment_variables());

    serde_json::to_string_pretty(&info).unwrap_or_default()
}

fn env_or_unknown(key: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v,
        _ => "unknown".to_string(),
    }
}

fn environment_variables() -> String {
    std::env::vars()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_info_is_json() {
        let info = machine_info();
        let value: serde_json::Value = serde_json::from_str(&info).unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn test_machine_info_contains_expected_keys() {
        let info = machine_info();
        for key in [
            "OS",
            "Architecture",
            "CPU Count",
            "Hostname",
            "Current User",
            "Home Directory",
            "Environment Vars",
        ] {
            assert!(info.contains(key), "missing key: {}", key);
        }
    }

    #[test]
    fn test_machine_info_reports_current_os() {
        let info = machine_info();
        assert!(info.contains(std::env::consts::OS));
    }

    #[test]
    fn test_env_or_unknown_missing_var() {
        assert_eq!(env_or_unknown("VESPER_DEFINITELY_NOT_SET"), "unknown");
    }
}
