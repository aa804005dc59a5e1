//! Structured-input validation tests: everything here must be rejected or
//! accepted before any resolution or API traffic happens.

use fleetctl::error::FleetctlError;
use fleetctl::validation::{
    parse_envvars, parse_exposed_ports, parse_image_name, parse_published_ports,
};

#[test]
fn test_ports_batch_parsing() {
    let ports = parse_exposed_ports(&["80/tcp".to_string(), "53/udp".to_string()]).unwrap();
    assert_eq!(ports.len(), 2);
    assert_eq!(ports[0].inner_port, 80);
    assert_eq!(ports[1].protocol, "udp");

    let err = parse_exposed_ports(&["80/tcp".to_string(), "oops".to_string()]).unwrap_err();
    assert!(matches!(err, FleetctlError::BadParameter(_)));
}

#[test]
fn test_published_ports_with_host_side() {
    let ports =
        parse_published_ports(&["8080:80/tcp".to_string(), "53/udp".to_string()]).unwrap();
    assert_eq!(ports[0].outer_port, Some(8080));
    assert_eq!(ports[0].inner_port, 80);
    assert!(ports[0].published);
    assert_eq!(ports[1].outer_port, None);
}

#[test]
fn test_envvars_batch_parsing() {
    let envvars =
        parse_envvars(&["GREETING=hello".to_string(), "_UNDER=ok".to_string()]).unwrap();
    assert_eq!(envvars[0].key, "GREETING");
    assert_eq!(envvars[1].key, "_UNDER");

    assert!(parse_envvars(&["=nokey".to_string()]).is_err());
    assert!(parse_envvars(&["KEY=a=b".to_string()]).is_err());
}

#[test]
fn test_image_name_forms() {
    let image = parse_image_name("acme/hello-world:v2").unwrap();
    assert_eq!(image.full_name, "acme/hello-world");
    assert_eq!(image.with_tag(), "acme/hello-world:v2");

    let image = parse_image_name("registry.local.co/acme/app").unwrap();
    assert_eq!(image.registry_host.as_deref(), Some("registry.local.co"));
    assert_eq!(image.full_name, "registry.local.co/acme/app");

    assert!(parse_image_name("bad image").is_err());
}

#[test]
fn test_bad_parameter_is_a_user_error() {
    let err = parse_exposed_ports(&["80".to_string()]).unwrap_err();
    assert_eq!(
        fleetctl::exit_codes::exit_code_for_error(&err),
        fleetctl::exit_codes::codes::USER_ERROR
    );
}
