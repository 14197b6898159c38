use beanstalk::{
    Bean, BeanError, BeanMarkers, ConfigurationRoot, Container, Dependencies, DiscoveryError,
    Scope, Wirable, component_scan,
};
use std::sync::Arc;

mod shop {
    use beanstalk::{Autowired, Bean};

    #[derive(Bean, Default)]
    pub struct Repository {
        pub name: String,
    }

    #[derive(Bean)]
    pub struct Service {
        #[autowired]
        pub repository: Autowired<Repository>,
    }

    #[derive(Bean)]
    #[bean(lazy)]
    pub struct Mailer {
        #[autowired]
        pub service: Autowired<Service>,
    }

    #[derive(Bean)]
    #[bean(name = "checkout", scope = "prototype")]
    pub struct CheckoutFlow {
        #[autowired]
        pub service: Autowired<Service>,
        #[autowired]
        pub r#type: Autowired<Kind>,
        pub step: u32,
    }

    #[derive(Bean)]
    #[bean(name = "type", lazy = false)]
    pub struct Kind;

    #[derive(Bean)]
    #[bean(lazy)]
    pub struct URLResolver;

    pub mod nested {
        use beanstalk::{Bean, component_scan};

        #[derive(Bean)]
        #[bean(lazy = true)]
        pub struct Auditor;

        #[component_scan]
        pub struct NestedConfig;
    }
}

#[component_scan("macros::shop")]
struct ShopConfig;

#[component_scan("macros::warehouse")]
struct MissingConfig;

struct NoScan;

impl ConfigurationRoot for NoScan {}

#[test]
fn test_component_scan() {
    assert_eq!(ShopConfig.component_scan(), Some("macros::shop"));
    assert_eq!(
        shop::nested::NestedConfig.component_scan(),
        Some("macros::shop::nested")
    );
    assert_eq!(NoScan.component_scan(), None);
}

#[test]
fn test_derived_markers() {
    assert_eq!(<shop::Repository as Bean>::markers(), BeanMarkers::new());
    assert_eq!(<shop::Mailer as Bean>::markers(), BeanMarkers::new().lazy());
    assert_eq!(
        <shop::CheckoutFlow as Bean>::markers(),
        BeanMarkers::new().name("checkout").scope("prototype")
    );
    assert_eq!(
        <shop::Kind as Bean>::markers(),
        BeanMarkers::new().name("type")
    );
    assert_eq!(
        <shop::nested::Auditor as Bean>::markers(),
        BeanMarkers::new().lazy()
    );
    assert_eq!(<shop::CheckoutFlow as Bean>::simple_name(), "CheckoutFlow");
    assert_eq!(<shop::URLResolver as Bean>::simple_name(), "URLResolver");
}

#[test]
fn test_derived_dependencies() {
    assert_eq!(
        <shop::CheckoutFlow as Wirable>::dependencies(),
        Dependencies::new().slot("service").slot("type")
    );
    assert!(<shop::Repository as Wirable>::dependencies().is_empty());
    assert!(<shop::Kind as Wirable>::dependencies().is_empty());
}

#[test]
fn test_derived_unknown_slot() {
    let mut kind = <shop::Kind as Bean>::instantiate().unwrap();
    let bean: beanstalk::BeanRef = Arc::new(shop::Repository::default());
    assert!(kind.wire("repository", bean).is_err());
}

#[test]
fn test_inventory_discovery() {
    let container = Container::new(&ShopConfig).unwrap();
    assert_eq!(
        container.bean_names().collect::<Vec<_>>(),
        vec![
            "checkout",
            "type",
            "mailer",
            "repository",
            "service",
            "URLResolver",
            "auditor",
        ]
    );
    assert_eq!(
        container.definition("checkout").unwrap().scope(),
        Scope::Prototype
    );
    assert!(container.definition("mailer").unwrap().is_lazy());

    assert!(container.is_instantiated("repository"));
    assert!(container.is_instantiated("service"));
    assert!(container.is_instantiated("type"));
    assert!(!container.is_instantiated("mailer"));
    assert!(!container.is_instantiated("URLResolver"));
    assert!(!container.is_instantiated("auditor"));
    assert!(!container.is_instantiated("checkout"));
}

#[test]
fn test_inventory_wiring() {
    let container = Container::new(&ShopConfig).unwrap();
    let service = container.get_bean::<shop::Service>("service").unwrap();
    let repository = container
        .get_bean::<shop::Repository>("repository")
        .unwrap();
    assert!(Arc::ptr_eq(service.repository.get().unwrap(), &repository));
    assert!(service.repository.name.is_empty());

    let mailer = container.get_bean::<shop::Mailer>("mailer").unwrap();
    assert!(container.is_instantiated("mailer"));
    assert!(Arc::ptr_eq(mailer.service.get().unwrap(), &service));

    let first = container.get_bean::<shop::CheckoutFlow>("checkout").unwrap();
    let second = container.get_bean::<shop::CheckoutFlow>("checkout").unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.step, 0);
    assert!(Arc::ptr_eq(first.service.get().unwrap(), &service));
    assert!(Arc::ptr_eq(
        first.r#type.get().unwrap(),
        second.r#type.get().unwrap()
    ));
}

#[test]
fn test_nested_scan() {
    let container = Container::new(&shop::nested::NestedConfig).unwrap();
    assert_eq!(container.bean_names().collect::<Vec<_>>(), vec!["auditor"]);
    assert!(!container.is_instantiated("auditor"));
    container
        .get_bean::<shop::nested::Auditor>("auditor")
        .unwrap();
    assert!(container.is_instantiated("auditor"));
    assert!(matches!(
        container.get_bean_ref("repository"),
        Err(BeanError::UnknownBean(name)) if name == "repository"
    ));
}

#[test]
fn test_missing_scan_root() {
    let err = Container::new(&MissingConfig).unwrap_err();
    assert!(matches!(
        err,
        BeanError::Discovery(DiscoveryError::UnresolvedRoot(root)) if root == "macros::warehouse"
    ));
}

#[test]
fn test_no_scan_marker() {
    let container = Container::new(&NoScan).unwrap();
    assert!(container.is_empty());
}
