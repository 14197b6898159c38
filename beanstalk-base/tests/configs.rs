use beanstalk::{BeanError, Container, DuplicatePolicy, StaticDiscovery};
use beanstalk_base::{
    Config, ConfigSection, ConfigureExt as _, ContainerConfig, DuplicateNames, TracingConfig,
    bootstrap, bootstrap_with,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;
use tempfile::NamedTempFile;

mod beans {
    use beanstalk::{Autowired, Bean};

    #[derive(Bean, Default)]
    pub struct Settings {
        pub values: Vec<String>,
    }

    #[derive(Bean)]
    pub struct Scheduler {
        #[autowired]
        pub settings: Autowired<Settings>,
    }
}

mod clocks {
    use beanstalk::Bean;

    #[derive(Bean)]
    #[bean(name = "clock")]
    pub struct FakeClock;

    #[derive(Bean)]
    #[bean(name = "clock")]
    pub struct SystemClock;
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct ServerConfig {
    bind_addr: String,
    workers: u32,
}

impl ConfigSection for ServerConfig {
    fn key() -> &'static str {
        "server"
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct DatabaseConfig {
    host: String,
    #[serde(default)]
    port: u16,
    #[serde(default)]
    ssl: bool,
}

fn write_temp(text: &str) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), text).unwrap();
    file
}

#[tokio::test]
async fn test_config_new() {
    let config = Config::new();
    assert!(config.is_empty());
    assert_eq!(config.len(), 0);
}

#[tokio::test]
async fn test_config_set_and_get() {
    let mut config = Config::new();
    let server = ServerConfig {
        bind_addr: "127.0.0.1:8080".to_string(),
        workers: 4,
    };
    config.set("server", &server).unwrap();
    assert!(config.contains("server"));
    assert_eq!(config.get::<ServerConfig>("server").unwrap(), server);
    assert_eq!(config.section::<ServerConfig>().unwrap(), Some(server));
}

#[tokio::test]
async fn test_config_missing_section() {
    let config = Config::new();
    assert_eq!(config.get::<Option<String>>("missing").unwrap(), None);
    assert_eq!(config.section::<ServerConfig>().unwrap(), None);
    assert!(config.get::<ServerConfig>("server").is_err());
}

#[tokio::test]
async fn test_config_with() {
    let config = Config::new().with("workers", 8u32).unwrap();
    assert_eq!(config.get::<u32>("workers").unwrap(), 8);
    assert!(config.get::<String>("workers").is_err());
}

#[tokio::test]
async fn test_config_parse_invalid_json() {
    assert!(Config::parse(r#"{ "invalid": json }"#).is_err());
}

#[tokio::test]
async fn test_config_merge() {
    let mut config = Config::parse(
        r#"
    {
        "database": {"host": "localhost"},
        "tags": ["production", "web"],
        "port": 8080
    }
    "#,
    )
    .unwrap();
    let layer = Config::parse(
        r#"
    {
        "database": {"port": 5432, "ssl": true},
        "tags": ["monitoring"],
        "port": 9090,
        "cache": {"enabled": true}
    }
    "#,
    )
    .unwrap();
    config.merge_from(layer).unwrap();

    assert_eq!(
        config.get::<DatabaseConfig>("database").unwrap(),
        DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            ssl: true,
        }
    );
    assert_eq!(
        config.get::<Vec<String>>("tags").unwrap(),
        vec!["production", "web", "monitoring"]
    );
    assert_eq!(config.get::<u16>("port").unwrap(), 9090);
    assert!(config.contains("cache"));
}

#[tokio::test]
async fn test_config_merge_replaces_mismatched_kinds() {
    let mut config = Config::parse(r#"{"database": {"host": "localhost"}}"#).unwrap();
    config
        .merge_from(Config::parse(r#"{"database": "sqlite://memory"}"#).unwrap())
        .unwrap();
    assert_eq!(
        config.get::<String>("database").unwrap(),
        "sqlite://memory"
    );
}

#[tokio::test]
async fn test_config_parse_file() {
    let file = write_temp(r#"{"server": {"bind_addr": "0.0.0.0:80", "workers": 2}}"#);
    let config = Config::parse_file(file.path()).await.unwrap();
    assert_eq!(
        config.section::<ServerConfig>().unwrap(),
        Some(ServerConfig {
            bind_addr: "0.0.0.0:80".to_string(),
            workers: 2,
        })
    );
}

#[tokio::test]
async fn test_config_parse_file_not_found() {
    assert!(Config::parse_file("nonexistent_file.json").await.is_err());
}

#[tokio::test]
async fn test_config_parse_files() {
    let base = write_temp(r#"{"server": {"bind_addr": "127.0.0.1:80", "workers": 1}}"#);
    let local = write_temp(r#"{"server": {"workers": 16}}"#);
    let config = Config::parse_files([base.path(), local.path()])
        .await
        .unwrap();
    assert_eq!(
        config.section::<ServerConfig>().unwrap(),
        Some(ServerConfig {
            bind_addr: "127.0.0.1:80".to_string(),
            workers: 16,
        })
    );
}

#[tokio::test]
async fn test_config_serialization() {
    let config = Config::new().with("name", "beanstalk").unwrap();
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(text, r#"{"name":"beanstalk"}"#);
    let config = Config::parse(text).unwrap();
    assert_eq!(config.get::<String>("name").unwrap(), "beanstalk");
}

#[tokio::test]
async fn test_container_config() {
    let config = Config::parse(
        r#"{"container": {"scan": "configs::beans", "duplicate_names": "last_wins"}}"#,
    )
    .unwrap();
    let section = config.section::<ContainerConfig>().unwrap().unwrap();
    assert_eq!(section.scan.as_deref(), Some("configs::beans"));
    assert_eq!(section.duplicate_names, DuplicateNames::LastWins);
    assert_eq!(
        DuplicatePolicy::from(section.duplicate_names),
        DuplicatePolicy::LastWins
    );

    let section: ContainerConfig = Config::parse(r#"{"container": {}}"#)
        .unwrap()
        .get(ContainerConfig::key())
        .unwrap();
    assert_eq!(section, ContainerConfig::default());
    assert_eq!(section.duplicate_names, DuplicateNames::Reject);

    assert!(
        Config::parse(r#"{"container": {"duplicate_names": "first_wins"}}"#)
            .unwrap()
            .section::<ContainerConfig>()
            .is_err()
    );
}

#[tokio::test]
async fn test_tracing_config() {
    let config = Config::parse(r#"{"tracing": {"level": "info", "directives": ["beanstalk=trace"]}}"#)
        .unwrap();
    let section = config.section::<TracingConfig>().unwrap().unwrap();
    assert_eq!(section.level, tracing::Level::INFO);
    assert_eq!(section.directives, vec!["beanstalk=trace"]);
    assert_eq!(
        serde_json::to_value(&section).unwrap()["level"],
        serde_json::json!("INFO")
    );

    let section: TracingConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(section, TracingConfig::default());
    assert_eq!(section.level, tracing::Level::DEBUG);

    assert!(serde_json::from_str::<TracingConfig>(r#"{"level": "loud"}"#).is_err());
}

#[tokio::test]
async fn test_bootstrap() {
    let file = write_temp(r#"{"container": {"scan": "configs::beans"}}"#);
    let config = Config::parse_file(file.path()).await.unwrap();
    let app = bootstrap(&config).unwrap();
    assert!(app.tracing.is_none());

    let container = &app.container;
    assert_eq!(
        container.bean_names().collect::<Vec<_>>(),
        vec!["scheduler", "settings"]
    );
    let scheduler = container.get_bean::<beans::Scheduler>("scheduler").unwrap();
    let settings = container.get_bean::<beans::Settings>("settings").unwrap();
    assert!(settings.values.is_empty());
    assert!(Arc::ptr_eq(scheduler.settings.get().unwrap(), &settings));
}

#[tokio::test]
async fn test_bootstrap_without_container_section() {
    let app = bootstrap(&Config::new()).unwrap();
    assert!(app.container.is_empty());
    assert!(app.tracing.is_none());
}

#[tokio::test]
async fn test_bootstrap_duplicate_names() {
    let config = Config::parse(r#"{"container": {"scan": "configs::clocks"}}"#).unwrap();
    let err = bootstrap(&config).unwrap_err();
    let err = err.downcast::<BeanError>().unwrap();
    assert!(matches!(
        *err,
        BeanError::ConfigurationConflict { ref name, .. } if name == "clock"
    ));

    let config = Config::parse(
        r#"{"container": {"scan": "configs::clocks", "duplicate_names": "last_wins"}}"#,
    )
    .unwrap();
    let app = bootstrap(&config).unwrap();
    assert_eq!(app.container.len(), 1);
    assert!(app.container.get_bean::<clocks::SystemClock>("clock").is_ok());
}

#[tokio::test]
async fn test_bootstrap_with_discovery() {
    let config = Config::parse(r#"{"container": {"scan": "configs"}}"#).unwrap();
    let app = bootstrap_with(
        &config,
        Container::builder().with_discovery(StaticDiscovery::new().add::<beans::Settings>()),
    )
    .unwrap();
    assert_eq!(app.container.bean_names().collect::<Vec<_>>(), vec!["settings"]);
}

#[tokio::test]
async fn test_configure_builder() {
    let section = ContainerConfig {
        scan: Some("configs::clocks".to_string()),
        duplicate_names: DuplicateNames::LastWins,
    };
    let container = Container::builder().configure(&section).build(&section).unwrap();
    assert!(container.contains_bean("clock"));
}

#[tokio::test]
async fn test_bootstrap_installs_tracing() {
    let config = Config::parse(r#"{"tracing": {"level": "warn"}}"#).unwrap();
    let app = bootstrap(&config).unwrap();
    let handle = app.tracing.unwrap();
    assert_eq!(handle.default_level(), tracing::Level::WARN);
    handle.set_level(Some(tracing::Level::TRACE)).unwrap();
    handle.set_level(None).unwrap();
}
