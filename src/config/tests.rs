use super::*;
use serial_test::serial;

fn clear_env() {
    for var in [
        Config::ENV_PORT,
        Config::ENV_BIND_ADDR,
        Config::ENV_PET_SERVICE_URL,
        Config::ENV_SNS_SERVICE_URL,
        Config::ENV_MODEL_PATH,
        Config::ENV_HTTP_TIMEOUT_SECS,
        Config::ENV_TOP_PETSTARS,
        Config::ENV_CORS_ORIGINS,
        Config::ENV_CORS_ALLOW_CREDENTIALS,
    ] {
        unsafe {
            env::remove_var(var);
        }
    }
}

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.port, 8080);
    assert_eq!(config.bind_addr.to_string(), "127.0.0.1");
    assert_eq!(config.pet_service_url, DEFAULT_UPSTREAM_URL);
    assert_eq!(config.sns_service_url, DEFAULT_UPSTREAM_URL);
    assert!(config.model_path.is_none());
    assert_eq!(config.http_timeout_secs, 60);
    assert_eq!(config.top_petstars, 2);
    assert_eq!(config.cors_origins, vec!["*".to_string()]);
    assert!(config.cors_allow_credentials);
}

#[test]
#[serial]
fn test_config_from_env_defaults_when_unset() {
    clear_env();

    let config = Config::from_env().expect("Should load defaults");
    assert_eq!(config.port, 8080);
    assert_eq!(config.top_petstars, 2);
    assert!(config.cors_any_origin());
}

#[test]
#[serial]
fn test_config_from_env_overrides() {
    clear_env();
    unsafe {
        env::set_var(Config::ENV_PORT, "9000");
        env::set_var(Config::ENV_PET_SERVICE_URL, "http://pets:8001");
        env::set_var(Config::ENV_SNS_SERVICE_URL, "http://sns:8002");
        env::set_var(Config::ENV_TOP_PETSTARS, "5");
        env::set_var(Config::ENV_HTTP_TIMEOUT_SECS, "10");
    }

    let config = Config::from_env().expect("Should load");
    assert_eq!(config.port, 9000);
    assert_eq!(config.pet_service_url, "http://pets:8001");
    assert_eq!(config.sns_service_url, "http://sns:8002");
    assert_eq!(config.top_petstars, 5);
    assert_eq!(config.http_timeout_secs, 10);

    clear_env();
}

#[test]
#[serial]
fn test_config_invalid_port_rejected() {
    clear_env();
    unsafe {
        env::set_var(Config::ENV_PORT, "0");
    }

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPort { .. }));

    clear_env();
}

#[test]
#[serial]
fn test_config_unparseable_port_rejected() {
    clear_env();
    unsafe {
        env::set_var(Config::ENV_PORT, "not-a-port");
    }

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::PortParseError { .. }));

    clear_env();
}

#[test]
#[serial]
fn test_config_invalid_bind_addr_rejected() {
    clear_env();
    unsafe {
        env::set_var(Config::ENV_BIND_ADDR, "not.an.address");
    }

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));

    clear_env();
}

#[test]
#[serial]
fn test_config_unparseable_top_k_rejected() {
    clear_env();
    unsafe {
        env::set_var(Config::ENV_TOP_PETSTARS, "many");
    }

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::TopKParseError { .. }));

    clear_env();
}

#[test]
#[serial]
fn test_config_cors_origins_list() {
    clear_env();
    unsafe {
        env::set_var(
            Config::ENV_CORS_ORIGINS,
            "https://app.example.com, https://admin.example.com",
        );
        env::set_var(Config::ENV_CORS_ALLOW_CREDENTIALS, "false");
    }

    let config = Config::from_env().expect("Should load");
    assert_eq!(
        config.cors_origins,
        vec![
            "https://app.example.com".to_string(),
            "https://admin.example.com".to_string()
        ]
    );
    assert!(!config.cors_any_origin());
    assert!(!config.cors_allow_credentials);

    clear_env();
}

#[test]
#[serial]
fn test_config_model_path_whitespace_is_none() {
    clear_env();
    unsafe {
        env::set_var(Config::ENV_MODEL_PATH, "   ");
    }

    let config = Config::from_env().expect("Should load");
    assert!(config.model_path.is_none());

    clear_env();
}

#[test]
fn test_validate_missing_model_path() {
    let config = Config {
        model_path: Some(PathBuf::from("/definitely/not/here")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_model_path_must_be_directory() {
    let temp = tempfile::NamedTempFile::new().expect("temp file");
    let config = Config {
        model_path: Some(temp.path().to_path_buf()),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_socket_addr_format() {
    let config = Config {
        port: 9090,
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "127.0.0.1:9090");
}
