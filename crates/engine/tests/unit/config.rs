//! Configuration tests: defaults, policy codes, and JSON deserialization.

use pretty_assertions::assert_eq;

use schedsim_core::config::{Config, LogDestination, SchedulingPolicy};

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.policy, SchedulingPolicy::FcfsN);
    assert_eq!(config.quantum_cycles, 3);
    assert_eq!(config.memory_kb, 10_240);
    assert_eq!(config.cpu_cycle_ms, 10);
    assert_eq!(config.io_cycle_ms, 20);
    assert_eq!(config.log_to, LogDestination::Monitor);
}

#[test]
fn test_quantum_ms_is_cycles_times_rate() {
    let config = Config {
        quantum_cycles: 4,
        cpu_cycle_ms: 7,
        ..Config::default()
    };
    assert_eq!(config.quantum_ms(), 28);
}

#[test]
fn test_policy_codes_round_trip() {
    for policy in [
        SchedulingPolicy::FcfsN,
        SchedulingPolicy::SjfN,
        SchedulingPolicy::FcfsP,
        SchedulingPolicy::SrtfP,
        SchedulingPolicy::RrP,
    ] {
        assert_eq!(SchedulingPolicy::from_code(policy.code()), Some(policy));
    }
}

#[test]
fn test_policy_codes_case_insensitive() {
    assert_eq!(
        SchedulingPolicy::from_code("srtf-p"),
        Some(SchedulingPolicy::SrtfP)
    );
    assert_eq!(
        SchedulingPolicy::from_code("Rr-P"),
        Some(SchedulingPolicy::RrP)
    );
    assert_eq!(SchedulingPolicy::from_code("lottery"), None);
}

#[test]
fn test_policy_preemption_split() {
    assert!(!SchedulingPolicy::FcfsN.is_preemptive());
    assert!(!SchedulingPolicy::SjfN.is_preemptive());
    assert!(SchedulingPolicy::FcfsP.is_preemptive());
    assert!(SchedulingPolicy::SrtfP.is_preemptive());
    assert!(SchedulingPolicy::RrP.is_preemptive());
}

#[test]
fn test_log_destination_routing() {
    assert!(LogDestination::Monitor.to_monitor());
    assert!(!LogDestination::Monitor.to_file());
    assert!(!LogDestination::File.to_monitor());
    assert!(LogDestination::File.to_file());
    assert!(LogDestination::Both.to_monitor());
    assert!(LogDestination::Both.to_file());
    assert_eq!(LogDestination::from_code("BOTH"), Some(LogDestination::Both));
    assert_eq!(LogDestination::from_code("printer"), None);
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "policy": "SRTF-P",
        "quantum_cycles": 5,
        "memory_kb": 2048,
        "cpu_cycle_ms": 4,
        "io_cycle_ms": 100,
        "log_to": "File"
    }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.policy, SchedulingPolicy::SrtfP);
    assert_eq!(config.quantum_cycles, 5);
    assert_eq!(config.memory_kb, 2048);
    assert_eq!(config.cpu_cycle_ms, 4);
    assert_eq!(config.io_cycle_ms, 100);
    assert_eq!(config.log_to, LogDestination::File);
}

#[test]
fn test_config_from_json_applies_defaults() {
    let config = Config::from_json(r#"{ "policy": "RR-P" }"#).unwrap();
    assert_eq!(config.policy, SchedulingPolicy::RrP);
    assert_eq!(config.quantum_cycles, 3);
    assert_eq!(config.memory_kb, 10_240);
    assert_eq!(config.log_to, LogDestination::Monitor);
}

#[test]
fn test_config_from_json_rejects_unknown_policy() {
    assert!(Config::from_json(r#"{ "policy": "MLFQ" }"#).is_err());
}
